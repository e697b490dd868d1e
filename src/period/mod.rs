//! New code baseline: what it is, how it is resolved, and who can read it.
//!
//! Once per analysis [`PeriodResolver`] turns the configured
//! [`NewCodePeriod`] into at most one [`Period`], stored write-once in a
//! [`PeriodHolder`] that every formula pass reads afterwards.

pub mod history;
pub mod reference_branch;
pub mod resolver;

pub use history::{AnalysisHistory, InMemoryAnalysisHistory, Snapshot, SnapshotStatus, VersionEvent};
pub use reference_branch::{
    InMemoryReferenceBranchStore, NewCodeReferenceBranchComponentUuids, ReferenceBranch,
    ReferenceBranchStore,
};
pub use resolver::PeriodResolver;

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NewCodePeriodType {
    #[serde(alias = "DAYS")]
    NumberOfDays,
    #[default]
    PreviousVersion,
    SpecificAnalysis,
    ReferenceBranch,
}

impl NewCodePeriodType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NumberOfDays => "NUMBER_OF_DAYS",
            Self::PreviousVersion => "PREVIOUS_VERSION",
            Self::SpecificAnalysis => "SPECIFIC_ANALYSIS",
            Self::ReferenceBranch => "REFERENCE_BRANCH",
        }
    }
}

impl fmt::Display for NewCodePeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewCodePeriodType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NUMBER_OF_DAYS" | "DAYS" => Ok(Self::NumberOfDays),
            "PREVIOUS_VERSION" => Ok(Self::PreviousVersion),
            "SPECIFIC_ANALYSIS" => Ok(Self::SpecificAnalysis),
            "REFERENCE_BRANCH" => Ok(Self::ReferenceBranch),
            _ => Err(Error::Configuration(format!(
                "Unknown new code period type '{s}'"
            ))),
        }
    }
}

/// The project's configured "new code" definition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewCodePeriod {
    #[serde(rename = "type", default)]
    pub period_type: NewCodePeriodType,
    #[serde(default)]
    pub value: Option<String>,
}

impl NewCodePeriod {
    pub fn new(period_type: NewCodePeriodType, value: Option<impl Into<String>>) -> Self {
        Self {
            period_type,
            value: value.map(Into::into),
        }
    }

    pub fn number_of_days(days: u32) -> Self {
        Self::new(NewCodePeriodType::NumberOfDays, Some(days.to_string()))
    }

    pub fn previous_version() -> Self {
        Self::new(NewCodePeriodType::PreviousVersion, None::<String>)
    }

    pub fn specific_analysis(analysis_uuid: impl Into<String>) -> Self {
        Self::new(NewCodePeriodType::SpecificAnalysis, Some(analysis_uuid))
    }

    pub fn reference_branch(branch_key: impl Into<String>) -> Self {
        Self::new(NewCodePeriodType::ReferenceBranch, Some(branch_key))
    }
}

/// Resolved new code baseline. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    mode: NewCodePeriodType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mode_parameter: Option<String>,
    /// Baseline timestamp in epoch millis; absent only for reference branches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<i64>,
}

impl Period {
    pub fn new(mode: NewCodePeriodType, mode_parameter: Option<String>, date: Option<i64>) -> Self {
        Self {
            mode,
            mode_parameter,
            date,
        }
    }

    pub fn mode(&self) -> NewCodePeriodType {
        self.mode
    }

    pub fn mode_parameter(&self) -> Option<&str> {
        self.mode_parameter.as_deref()
    }

    pub fn date(&self) -> Option<i64> {
        self.date
    }

    /// Whether something dated `date` (epoch millis) is newer than the
    /// baseline, compared at second precision.
    pub fn is_on_period(&self, date: i64) -> bool {
        self.date
            .is_some_and(|baseline| date > truncate_to_seconds(baseline))
    }
}

fn truncate_to_seconds(millis: i64) -> i64 {
    millis - millis.rem_euclid(1000)
}

/// Write-once holder of the resolved period for one analysis.
///
/// `Uninitialized → NoPeriod | HasPeriod`, terminal for the run. Reads
/// before initialization and a second write are contract violations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PeriodHolder {
    #[default]
    Uninitialized,
    NoPeriod,
    HasPeriod(Period),
}

impl PeriodHolder {
    pub fn new() -> Self {
        Self::Uninitialized
    }

    pub fn set_period(&mut self, period: Option<Period>) -> Result<()> {
        if self.is_initialized() {
            return Err(Error::illegal_state("Period have already been initialized"));
        }
        *self = match period {
            Some(period) => Self::HasPeriod(period),
            None => Self::NoPeriod,
        };
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        !matches!(self, Self::Uninitialized)
    }

    pub fn has_period(&self) -> Result<bool> {
        match self {
            Self::Uninitialized => Err(not_initialized()),
            Self::NoPeriod => Ok(false),
            Self::HasPeriod(_) => Ok(true),
        }
    }

    pub fn period(&self) -> Result<&Period> {
        match self {
            Self::Uninitialized => Err(not_initialized()),
            Self::NoPeriod => Err(Error::illegal_state(
                "There is no period. Use has_period() before calling this method",
            )),
            Self::HasPeriod(period) => Ok(period),
        }
    }

    /// The period if one was resolved; fails only when uninitialized.
    pub fn get(&self) -> Result<Option<&Period>> {
        match self {
            Self::Uninitialized => Err(not_initialized()),
            Self::NoPeriod => Ok(None),
            Self::HasPeriod(period) => Ok(Some(period)),
        }
    }
}

fn not_initialized() -> Error {
    Error::illegal_state("Period have not been initialized yet")
}
