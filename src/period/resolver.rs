use super::history::{AnalysisHistory, Snapshot};
use super::{NewCodePeriod, NewCodePeriodType, Period};
use crate::errors::{Error, Result};
use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

/// Resolves the configured new code definition against project history.
pub struct PeriodResolver<'a> {
    history: &'a dyn AnalysisHistory,
}

impl<'a> PeriodResolver<'a> {
    pub fn new(history: &'a dyn AnalysisHistory) -> Self {
        Self { history }
    }

    /// Resolve the baseline for the analysis of `root_uuid` running at
    /// `reference_date` (epoch millis).
    ///
    /// Malformed settings yield [`Error::InvalidNewCodePeriod`]; history
    /// that no longer backs the setting yields [`Error::IllegalState`].
    pub fn resolve(
        &self,
        root_uuid: &str,
        project_version: Option<&str>,
        reference_date: i64,
        definition: &NewCodePeriod,
    ) -> Result<Period> {
        let value = definition.value.as_deref();
        match definition.period_type {
            NewCodePeriodType::NumberOfDays => {
                let days = parse_days(value)?;
                self.resolve_by_days(root_uuid, days, reference_date)
            }
            NewCodePeriodType::PreviousVersion => {
                self.resolve_by_previous_version(root_uuid, project_version)
            }
            NewCodePeriodType::SpecificAnalysis => {
                let analysis_uuid = value
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| Error::invalid_period("", "no analysis is specified"))?;
                self.resolve_by_analysis(root_uuid, analysis_uuid)
            }
            NewCodePeriodType::ReferenceBranch => Ok(resolve_by_reference_branch(
                value.unwrap_or_default(),
            )),
        }
    }

    fn resolve_by_days(&self, root_uuid: &str, days: i64, reference_date: i64) -> Result<Period> {
        let analyses = self.history.processed_analyses(root_uuid);
        if analyses.is_empty() {
            return Err(no_analysis());
        }
        let target = target_date(reference_date, days)?;
        debug!(
            "Resolving new code period by {} days: {}",
            days,
            target.format("%Y-%m-%d")
        );
        let baseline = nearest_to(&analyses, target.timestamp_millis()).ok_or_else(no_analysis)?;
        Ok(Period::new(
            NewCodePeriodType::NumberOfDays,
            Some(days.to_string()),
            Some(baseline.created_at),
        ))
    }

    fn resolve_by_previous_version(
        &self,
        root_uuid: &str,
        project_version: Option<&str>,
    ) -> Result<Period> {
        let versions = self.history.versions_most_recent_first(root_uuid);
        let only_current = versions.len() == 1
            && project_version.is_some_and(|current| versions[0].name == current);
        if versions.is_empty() || only_current {
            return self.resolve_to_first_analysis(root_uuid);
        }

        let most_recent_is_current =
            project_version.is_some_and(|current| versions[0].name == current);
        let index = usize::from(most_recent_is_current);
        let Some(previous) = versions.get(index) else {
            return self.resolve_to_first_analysis(root_uuid);
        };

        debug!("Resolving new code period by previous version: {}", previous.name);
        let analysis = self
            .history
            .snapshot_by_uuid(&previous.analysis_uuid)
            .ok_or_else(|| {
                Error::illegal_state(format!(
                    "Analysis '{}' for version event '{}' has been deleted",
                    previous.analysis_uuid, previous.name
                ))
            })?;
        Ok(Period::new(
            NewCodePeriodType::PreviousVersion,
            Some(previous.name.clone()),
            Some(analysis.created_at),
        ))
    }

    fn resolve_to_first_analysis(&self, root_uuid: &str) -> Result<Period> {
        debug!("Resolving first analysis as new code period as there is only one existing version");
        let oldest = self
            .history
            .oldest_analysis(root_uuid)
            .ok_or_else(no_analysis)?;
        Ok(Period::new(
            NewCodePeriodType::PreviousVersion,
            None,
            Some(oldest.created_at),
        ))
    }

    fn resolve_by_analysis(&self, root_uuid: &str, analysis_uuid: &str) -> Result<Period> {
        let analysis = self
            .history
            .snapshot_by_uuid(analysis_uuid)
            .filter(|s| s.root_component_uuid == root_uuid)
            .ok_or_else(|| {
                Error::illegal_state(format!(
                    "Analysis '{analysis_uuid}' of project '{root_uuid}' defined as the baseline does not exist"
                ))
            })?;
        debug!("Resolving new code period with a specific analysis");
        Ok(Period::new(
            NewCodePeriodType::SpecificAnalysis,
            Some(analysis_uuid.to_string()),
            Some(analysis.created_at),
        ))
    }
}

fn resolve_by_reference_branch(branch_key: &str) -> Period {
    debug!("Resolving new code period with reference branch '{}'", branch_key);
    Period::new(
        NewCodePeriodType::ReferenceBranch,
        Some(branch_key.to_string()),
        None,
    )
}

fn parse_days(value: Option<&str>) -> Result<i64> {
    let raw = value.unwrap_or_default().trim();
    let days: i64 = raw
        .parse()
        .map_err(|_| Error::invalid_period(raw, "number of days is not an integer"))?;
    if days <= 0 {
        return Err(Error::invalid_period(raw, "number of days is <= 0"));
    }
    Ok(days)
}

fn target_date(reference_date: i64, days: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(reference_date)
        .zip(TimeDelta::try_days(days))
        .and_then(|(reference, delta)| reference.checked_sub_signed(delta))
        .ok_or_else(|| {
            Error::invalid_period(days.to_string(), "number of days is out of range")
        })
}

/// Snapshot closest to `target`. Analyses are iterated oldest first and a
/// later one only wins when strictly closer, so on a tie the older one is
/// kept.
fn nearest_to(analyses: &[Snapshot], target: i64) -> Option<&Snapshot> {
    let mut nearest: Option<(&Snapshot, u64)> = None;
    for analysis in analyses {
        let distance = analysis.created_at.abs_diff(target);
        match nearest {
            Some((_, best)) if distance >= best => {}
            _ => nearest = Some((analysis, distance)),
        }
    }
    nearest.map(|(analysis, _)| analysis)
}

fn no_analysis() -> Error {
    Error::illegal_state("Attempting to resolve period while no analysis exist for project")
}
