//! End-to-end dataset split: read keys, check them, split, copy.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{info, info_span};

use crate::config::SplitConfig;
use crate::core::dataset::{check_template, get_dataset_filenames};
use crate::core::operations::{copy_files, CopyStats};
use crate::core::split::split_names;
use crate::error::SplitResult;

/// Key count of one output part
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartSummary {
    pub name: String,
    pub count: usize,
}

/// What a split run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitSummary {
    pub total_keys: usize,
    pub parts: Vec<PartSummary>,
    /// Keys that fell into no part because of rounding
    pub dropped: usize,
    pub images: CopyStats,
    pub annotations: CopyStats,
}

/// Run a split with the configured seed, or the thread-local RNG without one
pub fn run(config: &SplitConfig) -> SplitResult<SplitSummary> {
    match config.seed {
        Some(seed) => {
            info!("Shuffling with seed {}", seed);
            run_with_rng(config, &mut StdRng::seed_from_u64(seed))
        }
        None => run_with_rng(config, &mut rand::thread_rng()),
    }
}

/// Run a split drawing shuffle randomness from `rng`
pub fn run_with_rng<R: Rng + ?Sized>(config: &SplitConfig, rng: &mut R) -> SplitResult<SplitSummary> {
    let _span = info_span!("split_dataset").entered();
    config.validate()?;

    let image_names =
        get_dataset_filenames(&config.input_image_path, config.image_template.as_deref())?;
    let annotation_names = get_dataset_filenames(
        &config.input_annotation_path,
        config.annotation_template.as_deref(),
    )?;
    check_template(image_names.keys(), annotation_names.keys())?;

    let split = split_names(image_names.keys(), &config.split_options(), rng)?;

    info!("Copying images into {:?}", config.output_image_path);
    let images = copy_files(
        &config.input_image_path,
        &image_names,
        &split,
        &config.output_image_path,
        None,
        config.on_existing,
    )?;

    let new_ann_names = config.rename_annotations.then_some(&image_names);
    info!(
        "Copying annotations into {:?} (renamed to image names: {})",
        config.output_annotation_path,
        new_ann_names.is_some()
    );
    let annotations = copy_files(
        &config.input_annotation_path,
        &annotation_names,
        &split,
        &config.output_annotation_path,
        new_ann_names,
        config.on_existing,
    )?;

    let summary = SplitSummary {
        total_keys: image_names.len(),
        parts: split
            .parts()
            .iter()
            .map(|p| PartSummary {
                name: p.name.clone(),
                count: p.keys.len(),
            })
            .collect(),
        dropped: split.dropped(),
        images,
        annotations,
    };
    info!(
        "Split complete: {} keys, {} images and {} annotations copied",
        summary.total_keys, summary.images.copied, summary.annotations.copied
    );
    Ok(summary)
}
