//! JSON description of one analysis: the component tree, raw measures and
//! everything period resolution and SCM-based computation need.

use crate::component::Component;
use crate::errors::{Error, Result, ResultExt};
use crate::measure::{InMemoryMeasureRepository, Measure};
use crate::period::{InMemoryAnalysisHistory, InMemoryReferenceBranchStore};
use crate::pipeline::AnalysisMetadata;
use crate::scm::InMemoryScmInfoRepository;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub metadata: AnalysisMetadata,
    pub tree: Component,
    /// component key → metric key → measure
    #[serde(default)]
    pub measures: BTreeMap<String, BTreeMap<String, Measure>>,
    #[serde(default)]
    pub history: InMemoryAnalysisHistory,
    #[serde(default)]
    pub scm: Option<InMemoryScmInfoRepository>,
    #[serde(default)]
    pub reference_branches: Option<InMemoryReferenceBranchStore>,
}

impl AnalysisInput {
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::from(e).with_context(format!("Failed to read {}", path.display())))?;
        Self::from_json(&contents).context(format!("Invalid analysis input {}", path.display()))
    }

    /// Raw measures loaded into a fresh repository.
    pub fn measure_repository(&self) -> InMemoryMeasureRepository {
        let mut repository = InMemoryMeasureRepository::new();
        for (component_key, measures) in &self.measures {
            for (metric_key, measure) in measures {
                repository.add_raw(component_key.as_str(), metric_key.as_str(), measure.clone());
            }
        }
        repository
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentType;
    use indoc::indoc;

    #[test]
    fn test_minimal_input() {
        let input = AnalysisInput::from_json(indoc! {r#"
            {
              "metadata": { "analysis_date": 1000 },
              "tree": {
                "key": "p", "uuid": "p-uuid", "type": "PROJECT",
                "children": [
                  { "key": "p:a.rs", "uuid": "a-uuid", "type": "FILE",
                    "file_attributes": { "lines": 12 } }
                ]
              },
              "measures": {
                "p:a.rs": {
                  "ncloc": { "value": 10 },
                  "new_lines_to_cover": { "value": null, "variation": 3.0 }
                }
              }
            }
        "#})
        .unwrap();

        assert_eq!(input.tree.component_type(), ComponentType::Project);
        assert_eq!(input.tree.children()[0].file_attributes().unwrap().lines, 12);
        assert!(!input.metadata.first_analysis);
        assert!(input.scm.is_none());

        let measures = input.measure_repository();
        assert_eq!(measures.get("p:a.rs", "ncloc"), Some(&Measure::int(10)));
        assert_eq!(
            measures.get("p:a.rs", "new_lines_to_cover"),
            Some(&Measure::variation_only(3.0))
        );
    }

    #[test]
    fn test_malformed_input_is_not_user_fixable() {
        let err = AnalysisInput::from_json("{ \"tree\": 3 }").unwrap_err();
        assert!(!err.is_user_fixable());
    }
}
