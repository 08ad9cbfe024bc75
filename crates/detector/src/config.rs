use preprocess::{DEFAULT_MEAN, DEFAULT_SCALE, NormalizeConfig};
use std::env;
use std::path::PathBuf;

/// Serving tag of the packaged model
pub const DEFAULT_TAG: &str = "serve";
/// Name of the model's image input
pub const DEFAULT_INPUT_NAME: &str = "input_tensor";
/// Name of the model's softmax output
pub const DEFAULT_OUTPUT_NAME: &str = "nsfw_cls_model/final_prediction";

const DEFAULT_MODEL_PATH: &str = "assets/nsfw";

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Directory holding the exported model and `labels.txt`
    pub model_dir: PathBuf,
    pub tags: Vec<String>,
    pub input_name: String,
    pub output_name: String,
    pub normalize: NormalizeConfig,
}

impl DetectorConfig {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            tags: vec![DEFAULT_TAG.to_string()],
            input_name: DEFAULT_INPUT_NAME.to_string(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            normalize: NormalizeConfig::default(),
        }
    }

    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        let model_dir =
            env::var("NSFW_MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string());

        let tags = env::var("NSFW_MODEL_TAGS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|tags| !tags.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_TAG.to_string()]);

        let input_name =
            env::var("NSFW_INPUT_NAME").unwrap_or_else(|_| DEFAULT_INPUT_NAME.to_string());

        let output_name =
            env::var("NSFW_OUTPUT_NAME").unwrap_or_else(|_| DEFAULT_OUTPUT_NAME.to_string());

        let mean = env::var("NSFW_MEAN")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MEAN);

        let scale = env::var("NSFW_SCALE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SCALE);

        Self {
            model_dir: PathBuf::from(model_dir),
            tags,
            input_name,
            output_name,
            normalize: NormalizeConfig {
                mean,
                scale,
                ..NormalizeConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 6] = [
        "NSFW_MODEL_PATH",
        "NSFW_MODEL_TAGS",
        "NSFW_INPUT_NAME",
        "NSFW_OUTPUT_NAME",
        "NSFW_MEAN",
        "NSFW_SCALE",
    ];

    fn clear_env() {
        for var in VARS {
            // SAFETY: every test touching these variables is #[serial]
            unsafe { env::remove_var(var) };
        }
    }

    #[test]
    fn test_new_uses_packaged_model_defaults() {
        let config = DetectorConfig::new("/models/nsfw");

        assert_eq!(config.model_dir, PathBuf::from("/models/nsfw"));
        assert_eq!(config.tags, vec!["serve"]);
        assert_eq!(config.input_name, "input_tensor");
        assert_eq!(config.output_name, "nsfw_cls_model/final_prediction");
        assert_eq!(config.normalize.mean, 117.0);
        assert_eq!(config.normalize.scale, 1.0);
        assert_eq!(config.normalize.input_size, (224, 224));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();

        let config = DetectorConfig::from_env();
        assert_eq!(config.model_dir, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(config.tags, vec![DEFAULT_TAG]);
        assert_eq!(config.normalize, NormalizeConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        unsafe {
            env::set_var("NSFW_MODEL_PATH", "/srv/models/nsfw");
            env::set_var("NSFW_MODEL_TAGS", "serve, gpu ,");
            env::set_var("NSFW_MEAN", "127.5");
            env::set_var("NSFW_SCALE", "not-a-number");
        }

        let config = DetectorConfig::from_env();
        assert_eq!(config.model_dir, PathBuf::from("/srv/models/nsfw"));
        assert_eq!(config.tags, vec!["serve", "gpu"]);
        assert_eq!(config.normalize.mean, 127.5);
        assert_eq!(config.normalize.scale, DEFAULT_SCALE);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_tag_list_falls_back() {
        clear_env();
        unsafe { env::set_var("NSFW_MODEL_TAGS", " , ") };

        let config = DetectorConfig::from_env();
        assert_eq!(config.tags, vec![DEFAULT_TAG]);

        clear_env();
    }
}
