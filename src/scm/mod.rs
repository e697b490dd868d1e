//! Per-line SCM data and the set of lines considered new code.

use crate::component::Component;
use crate::errors::Result;
use crate::period::{NewCodePeriodType, NewCodeReferenceBranchComponentUuids, PeriodHolder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changeset {
    /// Epoch millis
    pub date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl Changeset {
    pub fn at(date: i64) -> Self {
        Self {
            date,
            revision: None,
            author: None,
        }
    }
}

/// Changesets of one file, by line number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScmInfo {
    changesets: BTreeMap<u32, Changeset>,
}

impl ScmInfo {
    pub fn new(changesets: BTreeMap<u32, Changeset>) -> Self {
        Self { changesets }
    }

    pub fn lines(&self) -> impl Iterator<Item = (u32, &Changeset)> {
        self.changesets.iter().map(|(line, changeset)| (*line, changeset))
    }
}

pub trait ScmInfoRepository {
    fn scm_info(&self, component: &Component) -> Option<&ScmInfo>;

    /// Lines changed relative to the reference branch, when known.
    fn changed_lines(&self, component: &Component) -> Option<&BTreeSet<u32>>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryScmInfoRepository {
    #[serde(default)]
    pub files: BTreeMap<String, ScmInfo>,
    #[serde(default)]
    pub changed_lines: BTreeMap<String, BTreeSet<u32>>,
}

impl InMemoryScmInfoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, component_key: impl Into<String>, info: ScmInfo) -> &mut Self {
        self.files.insert(component_key.into(), info);
        self
    }

    pub fn add_changed_lines(
        &mut self,
        component_key: impl Into<String>,
        lines: impl IntoIterator<Item = u32>,
    ) -> &mut Self {
        self.changed_lines
            .insert(component_key.into(), lines.into_iter().collect());
        self
    }
}

impl ScmInfoRepository for InMemoryScmInfoRepository {
    fn scm_info(&self, component: &Component) -> Option<&ScmInfo> {
        self.files.get(component.key())
    }

    fn changed_lines(&self, component: &Component) -> Option<&BTreeSet<u32>> {
        self.changed_lines.get(component.key())
    }
}

/// Source of the lines of a leaf that count as new code.
pub trait NewLinesProvider {
    /// `None` when new code can not be determined for this component.
    fn new_lines(&self, component: &Component) -> Result<Option<BTreeSet<u32>>>;
}

pub struct NewLinesRepository<'a> {
    scm: &'a dyn ScmInfoRepository,
    period_holder: &'a PeriodHolder,
    reference_branch: Option<NewCodeReferenceBranchComponentUuids<'a>>,
}

impl<'a> NewLinesRepository<'a> {
    pub fn new(
        scm: &'a dyn ScmInfoRepository,
        period_holder: &'a PeriodHolder,
        reference_branch: Option<NewCodeReferenceBranchComponentUuids<'a>>,
    ) -> Self {
        Self {
            scm,
            period_holder,
            reference_branch,
        }
    }

    fn reference_branch_lines(&self, component: &Component) -> Result<Option<BTreeSet<u32>>> {
        if let Some(uuids) = &self.reference_branch {
            if uuids.component_uuid(component.key())?.is_none() {
                return Ok(Some(all_lines(component)));
            }
        }
        Ok(self.scm.changed_lines(component).cloned())
    }
}

impl NewLinesProvider for NewLinesRepository<'_> {
    fn new_lines(&self, component: &Component) -> Result<Option<BTreeSet<u32>>> {
        let Some(period) = self.period_holder.get()? else {
            return Ok(None);
        };
        if period.mode() == NewCodePeriodType::ReferenceBranch {
            return self.reference_branch_lines(component);
        }
        Ok(self.scm.scm_info(component).map(|info| {
            info.lines()
                .filter(|(_, changeset)| period.is_on_period(changeset.date))
                .map(|(line, _)| line)
                .collect()
        }))
    }
}

fn all_lines(component: &Component) -> BTreeSet<u32> {
    let count = component.file_attributes().map_or(0, |attrs| attrs.lines);
    (1..=count).collect()
}
