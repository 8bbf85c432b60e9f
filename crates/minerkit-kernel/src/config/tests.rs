//! Integration tests for multi-format configuration support
//!
//! Exercises loading, env substitution, extension probing and write-back.

#[cfg(test)]
mod integration_tests {
    use crate::config::*;
    use serde::{Deserialize, Serialize};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct TestOption {
        id: String,
        short_name: String,
        default_value: Option<String>,
    }

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct TestPackage {
        #[serde(default)]
        general_options: Vec<TestOption>,
        #[serde(default)]
        temperature_options: Vec<TestOption>,
    }

    fn sample_package() -> TestPackage {
        TestPackage {
            general_options: vec![
                TestOption {
                    id: "bminer_cpu_intensity".into(),
                    short_name: "-intensity".into(),
                    default_value: Some("6".into()),
                },
                TestOption {
                    id: "bminer_logfile".into(),
                    short_name: "-logfile=".into(),
                    default_value: None,
                },
            ],
            temperature_options: vec![TestOption {
                id: "bminer_max_temp".into(),
                short_name: "-max-temperature".into(),
                default_value: Some("85".into()),
            }],
        }
    }

    fn create_test_file(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
        let path = dir.path().join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format("config.yaml").unwrap(), FileFormat::Yaml);
        assert_eq!(detect_format("config.yml").unwrap(), FileFormat::Yaml);
        assert_eq!(detect_format("config.toml").unwrap(), FileFormat::Toml);
        assert_eq!(detect_format("config.JSON").unwrap(), FileFormat::Json);
        assert_eq!(detect_format("config.ini").unwrap(), FileFormat::Ini);
        assert_eq!(detect_format("config.ron").unwrap(), FileFormat::Ron);
        assert_eq!(detect_format("config.json5").unwrap(), FileFormat::Json5);
        assert!(detect_format("config.txt").is_err());
        assert!(detect_format("config").is_err());
    }

    #[test]
    fn test_json_and_yaml_load_same_package() {
        let temp_dir = TempDir::new().unwrap();

        let json = r#"{
    "general_options": [
        { "id": "bminer_cpu_intensity", "short_name": "-intensity", "default_value": "6" },
        { "id": "bminer_logfile", "short_name": "-logfile=" }
    ],
    "temperature_options": [
        { "id": "bminer_max_temp", "short_name": "-max-temperature", "default_value": "85" }
    ]
}"#;
        let json_path = create_test_file(&temp_dir, "package.json", json);
        let from_json: TestPackage = load_config(&json_path).unwrap();
        assert_eq!(from_json, sample_package());

        let yaml = r#"
general_options:
  - id: bminer_cpu_intensity
    short_name: "-intensity"
    default_value: "6"
  - id: bminer_logfile
    short_name: "-logfile="
temperature_options:
  - id: bminer_max_temp
    short_name: "-max-temperature"
    default_value: "85"
"#;
        let yaml_path = create_test_file(&temp_dir, "package.yaml", yaml);
        let from_yaml: TestPackage = load_config(&yaml_path).unwrap();
        assert_eq!(from_yaml, sample_package());
    }

    #[test]
    fn test_env_var_substitution() {
        unsafe { std::env::set_var("MINERKIT_TEST_INTENSITY", "9"); }

        let yaml = r#"
general_options:
  - id: bminer_cpu_intensity
    short_name: "-intensity"
    default_value: "${MINERKIT_TEST_INTENSITY}"
"#;
        let package: TestPackage = from_str(yaml, FileFormat::Yaml).unwrap();
        assert_eq!(package.general_options[0].default_value.as_deref(), Some("9"));
    }

    #[test]
    fn test_unset_env_var_left_untouched() {
        let out = substitute_env_vars("a ${MINERKIT_SURELY_UNSET_VAR} b $MINERKIT_SURELY_UNSET_VAR");
        assert_eq!(out, "a ${MINERKIT_SURELY_UNSET_VAR} b $MINERKIT_SURELY_UNSET_VAR");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let result: ConfigResult<TestPackage> = load_config(temp_dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_file(&temp_dir, "broken.json", "{ not json");
        let result: ConfigResult<TestPackage> = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_find_config_file_priority() {
        let temp_dir = TempDir::new().unwrap();
        assert!(find_config_file(temp_dir.path(), "Package").is_none());

        create_test_file(&temp_dir, "Package.toml", "");
        assert_eq!(
            find_config_file(temp_dir.path(), "Package"),
            Some(temp_dir.path().join("Package.toml"))
        );

        create_test_file(&temp_dir, "Package.json", "{}");
        assert_eq!(
            find_config_file(temp_dir.path(), "Package"),
            Some(temp_dir.path().join("Package.json"))
        );
    }

    #[test]
    fn test_save_then_load_each_writable_format() {
        let temp_dir = TempDir::new().unwrap();

        for name in ["nested/out.json", "out.yaml", "out.toml"] {
            let path = temp_dir.path().join(name);
            save_config(&path, &sample_package()).unwrap();
            let loaded: TestPackage = load_config(&path).unwrap();
            assert_eq!(loaded, sample_package(), "format of {name}");
        }
    }

    #[test]
    fn test_save_rejects_read_only_formats() {
        let temp_dir = TempDir::new().unwrap();
        let result = save_config(temp_dir.path().join("out.ron"), &sample_package());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
