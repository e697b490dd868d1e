//! `key=value;key=value` data as stored in DATA measures.

use crate::errors::{Error, Result};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Parse pairs separated by `;`, each written `key=value`. Empty input and
/// empty segments yield nothing.
pub fn parse<K, V>(data: &str) -> Result<Vec<(K, V)>>
where
    K: FromStr,
    V: FromStr,
{
    data.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| Error::parse(format!("missing '=' in pair '{pair}'")))?;
            let key = key
                .trim()
                .parse::<K>()
                .map_err(|_| Error::parse(format!("invalid key in pair '{pair}'")))?;
            let value = value
                .trim()
                .parse::<V>()
                .map_err(|_| Error::parse(format!("invalid value in pair '{pair}'")))?;
            Ok((key, value))
        })
        .collect()
}

/// Per-line counts, e.g. `coverage_line_hits_data`.
pub fn parse_int_int(data: &str) -> Result<BTreeMap<u32, i32>> {
    Ok(parse::<u32, i32>(data)?.into_iter().collect())
}
