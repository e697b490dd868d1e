//! Range histograms such as `function_complexity_distribution`.
//!
//! A distribution is encoded `bottom_limit=count;...`, e.g. `1=4;2=0;4=1`
//! counts values in `[1,2)`, `[2,4)` and `[4,∞)`. Histograms are only
//! additive when they share the same bottom limits; merging mismatched
//! histograms poisons the builder.

use super::key_value;
use crate::errors::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct RangeDistributionBuilder {
    /// `(bottom_limit, count)` ordered by limit; `None` until first data.
    ranges: Option<Vec<(f64, i64)>>,
    valid: bool,
}

impl Default for RangeDistributionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RangeDistributionBuilder {
    pub fn new() -> Self {
        Self {
            ranges: None,
            valid: true,
        }
    }

    /// Add an encoded distribution. Fails only on malformed data.
    pub fn add(&mut self, data: &str) -> Result<&mut Self> {
        let mut ranges = key_value::parse::<f64, i64>(data)?;
        if ranges.is_empty() {
            return Ok(self);
        }
        ranges.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.add_ranges(&ranges);
        Ok(self)
    }

    /// Merge another builder, e.g. a child subtree's histogram.
    pub fn merge(&mut self, other: &RangeDistributionBuilder) {
        if !other.valid {
            self.valid = false;
            return;
        }
        if let Some(ranges) = &other.ranges {
            self.add_ranges(ranges);
        }
    }

    fn add_ranges(&mut self, ranges: &[(f64, i64)]) {
        if !self.valid {
            return;
        }
        let Some(mut current) = self.ranges.take() else {
            self.ranges = Some(ranges.to_vec());
            return;
        };
        let same_limits = current.len() == ranges.len()
            && current.iter().zip(ranges).all(|(a, b)| a.0 == b.0);
        if same_limits {
            for (slot, (_, count)) in current.iter_mut().zip(ranges) {
                slot.1 = slot.1.saturating_add(*count);
            }
        } else {
            self.valid = false;
        }
        self.ranges = Some(current);
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_none()
    }

    /// Encoded histogram, or `None` when empty or built from mismatched limits.
    pub fn build(&self) -> Option<String> {
        if !self.valid {
            return None;
        }
        let ranges = self.ranges.as_ref()?;
        Some(
            ranges
                .iter()
                .map(|(limit, count)| format!("{}={}", format_limit(*limit), count))
                .collect::<Vec<_>>()
                .join(";"),
        )
    }
}

fn format_limit(limit: f64) -> String {
    if limit.fract() == 0.0 && limit.abs() < 1e15 {
        format!("{}", limit as i64)
    } else {
        format!("{limit}")
    }
}
