use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::operations::ExistingFilePolicy;
use crate::core::split::{RemainderPolicy, SplitOptions};
use crate::error::{SplitError, SplitResult};

/// Config file read when none is given on the command line
pub const DEFAULT_CONFIG_NAME: &str = "split_dataset_on_train_val.yaml";

fn default_to_shuffle() -> bool {
    true
}

/// Dataset split configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Directory with the source images
    pub input_image_path: PathBuf,

    /// Directory with the source annotations
    pub input_annotation_path: PathBuf,

    /// Output part names, e.g. train / val / test
    pub part_names: Vec<String>,

    /// Relative part sizes, same length as `part_names`
    pub part_sizes: Vec<f64>,

    /// Root of the image part directories
    pub output_image_path: PathBuf,

    /// Root of the annotation part directories
    pub output_annotation_path: PathBuf,

    /// Regex whose capture groups form the key of an image filename
    #[serde(default)]
    pub image_template: Option<String>,

    /// Regex whose capture groups form the key of an annotation filename
    #[serde(default)]
    pub annotation_template: Option<String>,

    #[serde(default = "default_to_shuffle")]
    pub to_shuffle: bool,

    /// Give copied annotations the base name of their paired image
    #[serde(default)]
    pub rename_annotations: bool,

    /// Seed for a reproducible shuffle
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub on_existing: ExistingFilePolicy,

    #[serde(default)]
    pub remainder: RemainderPolicy,
}

impl SplitConfig {
    /// Load and validate a config file.
    ///
    /// `.json` files are parsed as JSON, everything else as YAML.
    pub fn load(path: &Path) -> SplitResult<Self> {
        info!("Loading config from: {:?}", path);
        let contents = fs::read_to_string(path).map_err(|e| SplitError::io(path, e))?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let config = if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_yaml_str(&contents)
        }
        .map_err(|e| match e {
            SplitError::Config(msg) => SplitError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;

        info!(
            "Config loaded: parts {:?} with sizes {:?}, shuffle: {}",
            config.part_names, config.part_sizes, config.to_shuffle
        );
        Ok(config)
    }

    pub fn from_yaml_str(contents: &str) -> SplitResult<Self> {
        let config: SplitConfig =
            serde_yaml::from_str(contents).map_err(|e| SplitError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(contents: &str) -> SplitResult<Self> {
        let config: SplitConfig =
            serde_json::from_str(contents).map_err(|e| SplitError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check part names and sizes before any dataset I/O happens
    pub fn validate(&self) -> SplitResult<()> {
        if self.part_names.len() != self.part_sizes.len() {
            return Err(SplitError::Config(format!(
                "part_names has {} entries but part_sizes has {}",
                self.part_names.len(),
                self.part_sizes.len()
            )));
        }

        let mut seen = HashSet::new();
        for name in &self.part_names {
            if name.is_empty() {
                return Err(SplitError::Config("part names must not be empty".to_string()));
            }
            if !seen.insert(name.as_str()) {
                return Err(SplitError::Config(format!("duplicate part name '{}'", name)));
            }
        }

        if let Some(size) = self
            .part_sizes
            .iter()
            .find(|s| !s.is_finite() || **s < 0.0)
        {
            return Err(SplitError::Config(format!(
                "part sizes must be finite and non-negative, got {}",
                size
            )));
        }

        Ok(())
    }

    /// Splitter options derived from this config
    pub fn split_options(&self) -> SplitOptions {
        SplitOptions {
            part_names: self.part_names.clone(),
            part_sizes: self.part_sizes.clone(),
            to_shuffle: self.to_shuffle,
            remainder: self.remainder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
input_image_path: data/images
input_annotation_path: data/annotations
part_names: [train, val]
part_sizes: [3, 1]
output_image_path: out/images
output_annotation_path: out/annotations
"#;

    #[test]
    fn test_defaults() {
        let config = SplitConfig::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(config.part_names, vec!["train", "val"]);
        assert_eq!(config.part_sizes, vec![3.0, 1.0]);
        assert!(config.to_shuffle);
        assert!(!config.rename_annotations);
        assert!(config.image_template.is_none());
        assert!(config.annotation_template.is_none());
        assert!(config.seed.is_none());
        assert_eq!(config.on_existing, ExistingFilePolicy::Overwrite);
        assert_eq!(config.remainder, RemainderPolicy::Drop);
    }

    #[test]
    fn test_optional_keys() {
        let yaml = format!(
            "{}image_template: '(\\w+)\\.jpg'\nto_shuffle: false\nrename_annotations: true\nseed: 42\non_existing: skip\nremainder: largest_remainder\n",
            MINIMAL
        );
        let config = SplitConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(config.image_template.as_deref(), Some(r"(\w+)\.jpg"));
        assert!(!config.to_shuffle);
        assert!(config.rename_annotations);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.on_existing, ExistingFilePolicy::Skip);
        assert_eq!(config.remainder, RemainderPolicy::LargestRemainder);
    }

    #[test]
    fn test_missing_required_key() {
        let yaml = MINIMAL.replace("output_image_path: out/images\n", "");
        let err = SplitConfig::from_yaml_str(&yaml).unwrap_err();
        match err {
            SplitError::Config(msg) => assert!(msg.contains("output_image_path"), "{}", msg),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let yaml = MINIMAL.replace("part_sizes: [3, 1]", "part_sizes: [3, 1, 1]");
        assert!(matches!(
            SplitConfig::from_yaml_str(&yaml),
            Err(SplitError::Config(_))
        ));
    }

    #[test]
    fn test_duplicate_and_negative_parts_rejected() {
        let yaml = MINIMAL.replace("part_names: [train, val]", "part_names: [train, train]");
        assert!(matches!(
            SplitConfig::from_yaml_str(&yaml),
            Err(SplitError::Config(_))
        ));

        let yaml = MINIMAL.replace("part_sizes: [3, 1]", "part_sizes: [3, -1]");
        assert!(matches!(
            SplitConfig::from_yaml_str(&yaml),
            Err(SplitError::Config(_))
        ));
    }

    #[test]
    fn test_load_json_and_yaml_files() {
        let tmp = tempfile::tempdir().unwrap();

        let yaml_path = tmp.path().join("split.yaml");
        fs::write(&yaml_path, MINIMAL).unwrap();
        let from_yaml = SplitConfig::load(&yaml_path).unwrap();

        let json_path = tmp.path().join("split.json");
        fs::write(&json_path, serde_json::to_string_pretty(&from_yaml).unwrap()).unwrap();
        let from_json = SplitConfig::load(&json_path).unwrap();

        assert_eq!(from_json.part_names, from_yaml.part_names);
        assert_eq!(from_json.input_image_path, PathBuf::from("data/images"));
    }

    #[test]
    fn test_load_error_names_file_once() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("split.yaml");
        fs::write(&path, MINIMAL.replace("part_sizes: [3, 1]", "part_sizes: [3]")).unwrap();

        let err = SplitConfig::load(&path).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, SplitError::Config(_)));
        assert!(message.contains("split.yaml"), "{}", message);
        assert_eq!(message.matches("configuration error").count(), 1, "{}", message);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = SplitConfig::load(&tmp.path().join(DEFAULT_CONFIG_NAME)).unwrap_err();
        assert!(matches!(err, SplitError::Io { .. }));
    }
}
