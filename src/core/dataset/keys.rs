use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{SplitError, SplitResult};

/// Mapping from dataset key to the original filename inside a directory
pub type FilenameMap = BTreeMap<String, String>;

/// Separator used to join template capture groups into a key
pub const KEY_SEPARATOR: &str = "_";

/// Compile a filename template.
///
/// The template is compiled as written; anchoring to the start of a filename
/// happens in `extract_key`. Lookaround and backreferences are not supported
/// by `regex` and fail here with `SplitError::Pattern`.
pub fn compile_template(template: &str) -> SplitResult<Regex> {
    Ok(Regex::new(template)?)
}

/// Build the dataset key for `filename`.
///
/// Without a template the filename itself is the key. With a template the key
/// is every capture group joined with `_`; a group that did not take part in
/// the match contributes an empty string. Returns `None` when the template
/// does not match at the start of the filename.
pub fn extract_key(filename: &str, template: Option<&Regex>) -> Option<String> {
    let Some(re) = template else {
        return Some(filename.to_string());
    };

    // leftmost-first search, so a match at offset 0 is found if one exists
    let captures = re
        .captures(filename)
        .filter(|c| c.get(0).map_or(false, |m| m.start() == 0))?;
    let groups: Vec<&str> = captures
        .iter()
        .skip(1)
        .map(|group| group.map_or("", |m| m.as_str()))
        .collect();
    Some(groups.join(KEY_SEPARATOR))
}

/// Scan `path` and return key -> filename for every regular file in it.
///
/// # Arguments
/// * `path` - Directory to scan (not recursive)
/// * `template` - Optional regex whose capture groups form the key
///
/// # Returns
/// * `Ok(FilenameMap)` with one entry per matching file; later duplicates of a
///   key replace earlier ones
/// * `Err(SplitError::Pattern)` if the template does not compile
/// * `Err(SplitError::Io)` if the directory cannot be read
pub fn get_dataset_filenames(path: &Path, template: Option<&str>) -> SplitResult<FilenameMap> {
    let re_template = template.map(compile_template).transpose()?;

    info!("Reading dataset files from: {:?}", path);
    let entries = fs::read_dir(path).map_err(|e| SplitError::io(path, e))?;

    let mut filenames = FilenameMap::new();
    let mut skipped = 0usize;
    for entry in entries {
        let entry = entry.map_err(|e| SplitError::io(path, e))?;
        let file_type = entry.file_type().map_err(|e| SplitError::io(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }

        let Some(filename) = entry.file_name().to_str().map(str::to_string) else {
            warn!("Skipping non UTF-8 filename: {:?}", entry.path());
            continue;
        };

        match extract_key(&filename, re_template.as_ref()) {
            Some(key) => {
                if let Some(previous) = filenames.insert(key.clone(), filename.clone()) {
                    debug!("Key '{}' from {} replaces {}", key, filename, previous);
                }
            }
            None => {
                debug!("Filename does not match template, skipping: {}", filename);
                skipped += 1;
            }
        }
    }

    info!(
        "Found {} keys in {:?} ({} files skipped by template)",
        filenames.len(),
        path,
        skipped
    );
    Ok(filenames)
}
