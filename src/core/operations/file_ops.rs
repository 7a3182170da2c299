use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::core::dataset::FilenameMap;
use crate::core::split::Partition;
use crate::error::{SplitError, SplitResult};

/// What to do when a destination file is already present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExistingFilePolicy {
    /// Replace the existing file
    #[default]
    Overwrite,
    /// Keep the existing file and move on
    Skip,
    /// Abort the run
    Fail,
}

impl ExistingFilePolicy {
    pub fn as_str(&self) -> &str {
        match self {
            ExistingFilePolicy::Overwrite => "overwrite",
            ExistingFilePolicy::Skip => "skip",
            ExistingFilePolicy::Fail => "fail",
        }
    }
}

/// Counters for a single `copy_files` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CopyStats {
    pub copied: usize,
    pub skipped: usize,
}

/// Split a filename into base name and extension (extension keeps its dot).
///
/// The extension starts at the last `.`; leading dots never start one, so
/// `.bashrc` has no extension and `archive.tar.gz` has `.gz`.
pub fn split_extension(filename: &str) -> (&str, &str) {
    let leading_dots = filename.len() - filename.trim_start_matches('.').len();
    match filename.rfind('.') {
        Some(idx) if idx >= leading_dots => filename.split_at(idx),
        _ => (filename, ""),
    }
}

/// Rename `output_filename` to carry the extension of `input_filename`.
///
/// `make_output_filename("photo.jpg", "image_001.png")` gives `"image_001.jpg"`.
pub fn make_output_filename(input_filename: &str, output_filename: &str) -> String {
    let (_, input_ext) = split_extension(input_filename);
    let (output_name, _) = split_extension(output_filename);
    format!("{}{}", output_name, input_ext)
}

/// Copy every file of `split` into `output_path/<part name>/`.
///
/// # Arguments
/// * `input_path` - Directory holding the source files
/// * `file_names` - key -> source filename
/// * `split` - Keys for each part
/// * `output_path` - Root of the part directories
/// * `output_filenames` - Optional key -> filename whose base name replaces the
///   source base name (the source extension is kept)
/// * `on_existing` - What to do with destination files that already exist
///
/// # Returns
/// * `Ok(CopyStats)` with the number of copied and skipped files
/// * `Err(SplitError)` on the first missing key or I/O failure; files copied
///   before the failure stay in place
pub fn copy_files(
    input_path: &Path,
    file_names: &FilenameMap,
    split: &Partition,
    output_path: &Path,
    output_filenames: Option<&FilenameMap>,
    on_existing: ExistingFilePolicy,
) -> SplitResult<CopyStats> {
    let mut stats = CopyStats::default();
    info!(
        "Copying {} parts from {:?} to {:?} (existing files: {})",
        split.len(),
        input_path,
        output_path,
        on_existing.as_str()
    );

    for part in split.parts() {
        let target_path = output_path.join(&part.name);
        fs::create_dir_all(&target_path).map_err(|e| {
            error!("Failed to create directory {:?}: {}", target_path, e);
            SplitError::io(&target_path, e)
        })?;

        for key in &part.keys {
            let input_filename = file_names
                .get(key)
                .ok_or_else(|| SplitError::MissingKey(key.clone()))?;
            let output_filename = match output_filenames {
                Some(renames) => {
                    let target = renames
                        .get(key)
                        .ok_or_else(|| SplitError::MissingKey(key.clone()))?;
                    make_output_filename(input_filename, target)
                }
                None => input_filename.clone(),
            };

            let src = input_path.join(input_filename);
            let dest = target_path.join(&output_filename);

            if dest.exists() {
                match on_existing {
                    ExistingFilePolicy::Overwrite => {}
                    ExistingFilePolicy::Skip => {
                        debug!("Destination exists, skipping: {:?}", dest);
                        stats.skipped += 1;
                        continue;
                    }
                    ExistingFilePolicy::Fail => return Err(SplitError::DestinationExists(dest)),
                }
            }

            debug!("Copying {:?} -> {:?}", src, dest);
            fs::copy(&src, &dest).map_err(|e| {
                error!("Failed to copy file from {:?} to {:?}: {}", src, dest, e);
                SplitError::io(&src, e)
            })?;
            stats.copied += 1;
        }

        info!(
            "Part '{}': {} files into {:?}",
            part.name,
            part.keys.len(),
            target_path
        );
    }

    Ok(stats)
}
