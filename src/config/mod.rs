mod split_config;

pub use split_config::{SplitConfig, DEFAULT_CONFIG_NAME};
