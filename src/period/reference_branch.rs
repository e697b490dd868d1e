//! Component lookup in the reference branch for REFERENCE_BRANCH periods.

use super::{NewCodePeriodType, PeriodHolder};
use crate::errors::{Error, Result};
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read access to other branches of the project.
pub trait ReferenceBranchStore {
    /// Branch used when the configured key is empty.
    fn default_branch(&self) -> Option<&str>;

    /// Uuid of the branch's last analysis, if it was ever analyzed.
    fn last_analysis(&self, branch_key: &str) -> Option<&str>;

    /// Component key to uuid in the branch's last analysis.
    fn component_uuids(&self, branch_key: &str) -> BTreeMap<String, String>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceBranch {
    pub key: String,
    #[serde(default)]
    pub last_analysis: Option<String>,
    #[serde(default)]
    pub components: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryReferenceBranchStore {
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub branches: Vec<ReferenceBranch>,
}

impl InMemoryReferenceBranchStore {
    fn branch(&self, key: &str) -> Option<&ReferenceBranch> {
        self.branches.iter().find(|b| b.key == key)
    }
}

impl ReferenceBranchStore for InMemoryReferenceBranchStore {
    fn default_branch(&self) -> Option<&str> {
        self.default_branch.as_deref()
    }

    fn last_analysis(&self, branch_key: &str) -> Option<&str> {
        self.branch(branch_key)?.last_analysis.as_deref()
    }

    fn component_uuids(&self, branch_key: &str) -> BTreeMap<String, String> {
        self.branch(branch_key)
            .map(|b| b.components.clone())
            .unwrap_or_default()
    }
}

/// Lazily loaded key → uuid map of the reference branch's last analysis.
///
/// Loaded at most once per analysis. A component with no uuid here is
/// entirely new code.
pub struct NewCodeReferenceBranchComponentUuids<'a> {
    store: &'a dyn ReferenceBranchStore,
    period_holder: &'a PeriodHolder,
    uuids: OnceCell<BTreeMap<String, String>>,
}

impl<'a> NewCodeReferenceBranchComponentUuids<'a> {
    pub fn new(store: &'a dyn ReferenceBranchStore, period_holder: &'a PeriodHolder) -> Self {
        Self {
            store,
            period_holder,
            uuids: OnceCell::new(),
        }
    }

    pub fn component_uuid(&self, component_key: &str) -> Result<Option<&str>> {
        let uuids = self.uuids.get_or_try_init(|| self.load())?;
        Ok(uuids.get(component_key).map(String::as_str))
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        let period = self.period_holder.period()?;
        if period.mode() != NewCodePeriodType::ReferenceBranch {
            return Err(Error::illegal_state(format!(
                "Reference branch lookup requires a {} period, got {}",
                NewCodePeriodType::ReferenceBranch,
                period.mode()
            )));
        }
        let configured = period.mode_parameter().unwrap_or_default();
        let branch_key = if configured.is_empty() {
            self.store.default_branch().unwrap_or_default()
        } else {
            configured
        };
        if self.store.last_analysis(branch_key).is_none() {
            return Ok(BTreeMap::new());
        }
        Ok(self.store.component_uuids(branch_key))
    }
}
