use crate::period::NewCodePeriod;
use serde::{Deserialize, Serialize};

/// Root configuration structure for formulary
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormularyConfig {
    /// How the new code baseline is chosen
    #[serde(default)]
    pub new_code_period: NewCodePeriod,

    /// Which computation steps run
    #[serde(default)]
    pub steps: StepsConfig,
}

/// Toggles for the computation steps. The new code period is always
/// loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepsConfig {
    #[serde(default = "default_enabled")]
    pub coverage: bool,

    #[serde(default = "default_enabled")]
    pub new_coverage: bool,

    #[serde(default = "default_enabled")]
    pub complexity: bool,

    #[serde(default = "default_enabled")]
    pub size: bool,
}

pub fn default_enabled() -> bool {
    true
}

impl Default for StepsConfig {
    fn default() -> Self {
        Self {
            coverage: default_enabled(),
            new_coverage: default_enabled(),
            complexity: default_enabled(),
            size: default_enabled(),
        }
    }
}
