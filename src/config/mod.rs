//! `.formulary.toml` model and loading.
//!
//! ```toml
//! [new_code_period]
//! type = "NUMBER_OF_DAYS"
//! value = "30"
//!
//! [steps]
//! complexity = false
//! ```

mod core;
mod loader;

pub use core::{default_enabled, FormularyConfig, StepsConfig};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_file, parse_config,
    CONFIG_FILE_NAME,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::{NewCodePeriod, NewCodePeriodType};
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config, FormularyConfig::default());
        assert_eq!(config.new_code_period.period_type, NewCodePeriodType::PreviousVersion);
        assert!(config.steps.coverage && config.steps.size);
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(indoc! {r#"
            [new_code_period]
            type = "NUMBER_OF_DAYS"
            value = "30"

            [steps]
            complexity = false
        "#})
        .unwrap();
        assert_eq!(config.new_code_period, NewCodePeriod::number_of_days(30));
        assert!(!config.steps.complexity);
        assert!(config.steps.new_coverage);
    }

    #[test]
    fn test_unknown_period_type_is_configuration_error() {
        let err = parse_config(indoc! {r#"
            [new_code_period]
            type = "LAST_WEEK"
        "#})
        .unwrap_err();
        assert!(err.is_user_fixable());
    }

    #[test]
    fn test_discovery_walks_up() {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            indoc! {r#"
                [new_code_period]
                type = "REFERENCE_BRANCH"
                value = "main"
            "#},
        )
        .unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let config = discover_config(nested);
        assert_eq!(config.new_code_period, NewCodePeriod::reference_branch("main"));
    }

    #[test]
    fn test_discovered_broken_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[steps\n").unwrap();
        assert_eq!(
            discover_config(dir.path().to_path_buf()),
            FormularyConfig::default()
        );
    }

    #[test]
    fn test_explicit_broken_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[steps\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
        assert!(load_config_file(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_directory_ancestors_respects_depth() {
        let dir = TempDir::new().unwrap();
        let deep = dir.path().join("1").join("2").join("3");
        let ancestors: Vec<_> = directory_ancestors(deep.clone(), 2).collect();
        assert_eq!(ancestors, vec![deep.clone(), deep.parent().unwrap().to_path_buf()]);
    }
}
