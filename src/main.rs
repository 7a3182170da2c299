use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use split_dataset::logging::setup_logging;
use split_dataset::{SplitConfig, DEFAULT_CONFIG_NAME};

/// Splits a dataset on train/val/test parts.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Config file for the splitter (YAML, or JSON with a .json extension).
    #[arg(short = 'c', long = "config_name", default_value = DEFAULT_CONFIG_NAME)]
    config_name: PathBuf,
    /// Also write a timestamped log file into this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(args.log_dir.as_deref()).context("failed to set up logging")?;

    info!("Starting dataset split with config {:?}", args.config_name);
    let config = SplitConfig::load(&args.config_name)
        .with_context(|| format!("loading config {}", args.config_name.display()))?;

    let summary = split_dataset::run(&config).context("dataset split failed")?;
    for part in &summary.parts {
        info!("{}: {} records", part.name, part.count);
    }
    if summary.dropped > 0 {
        info!("{} records left out by part size rounding", summary.dropped);
    }
    info!(
        "Summary: {}",
        serde_json::to_string(&summary).context("serializing split summary")?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_name_defaults() {
        let args = Args::try_parse_from(["split-dataset"]).unwrap();
        assert_eq!(args.config_name, PathBuf::from("split_dataset_on_train_val.yaml"));
        assert!(args.log_dir.is_none());
    }

    #[test]
    fn test_config_name_short_and_long_flags() {
        let short = Args::try_parse_from(["split-dataset", "-c", "x.yaml"]).unwrap();
        assert_eq!(short.config_name, PathBuf::from("x.yaml"));

        let long = Args::try_parse_from(["split-dataset", "--config_name", "x.yaml"]).unwrap();
        assert_eq!(long.config_name, PathBuf::from("x.yaml"));
    }

    #[test]
    fn test_log_dir_flag() {
        let args = Args::try_parse_from(["split-dataset", "--log-dir", "logs"]).unwrap();
        assert_eq!(args.log_dir, Some(PathBuf::from("logs")));
    }
}
