//! Splitting dataset keys into named, size-proportional parts.
//!
//! Part sizes are relative weights. They are turned into integer counts with
//! `floor(total * size / sum(sizes))`, so a few trailing keys may end up in no
//! part at all. `RemainderPolicy::LargestRemainder` hands those keys out
//! instead.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{SplitError, SplitResult};

/// What to do with keys left over after truncating part counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RemainderPolicy {
    /// Leftover keys belong to no part
    #[default]
    Drop,
    /// Leftover keys go to the parts with the largest fractional remainders
    LargestRemainder,
}

impl RemainderPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            RemainderPolicy::Drop => "drop",
            RemainderPolicy::LargestRemainder => "largest_remainder",
        }
    }
}

/// Options controlling how keys are split
#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub part_names: Vec<String>,
    pub part_sizes: Vec<f64>,
    /// Shuffle keys before slicing; otherwise keys are sorted
    pub to_shuffle: bool,
    pub remainder: RemainderPolicy,
}

impl SplitOptions {
    pub fn new(part_names: Vec<String>, part_sizes: Vec<f64>) -> Self {
        Self {
            part_names,
            part_sizes,
            to_shuffle: true,
            remainder: RemainderPolicy::Drop,
        }
    }
}

/// A single named part and its keys, in slice order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub keys: Vec<String>,
}

/// Disjoint parts in configured part-name order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    parts: Vec<Part>,
    dropped: usize,
}

impl Partition {
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.keys.as_slice())
    }

    /// Sizes of every part, in part order
    pub fn sizes(&self) -> Vec<usize> {
        self.parts.iter().map(|p| p.keys.len()).collect()
    }

    /// Number of keys assigned to any part
    pub fn assigned(&self) -> usize {
        self.parts.iter().map(|p| p.keys.len()).sum()
    }

    /// Number of keys left out because of rounding
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }
}

fn validate_sizes(sizes: &[f64]) -> SplitResult<f64> {
    if let Some(bad) = sizes.iter().find(|s| !s.is_finite() || **s < 0.0) {
        return Err(SplitError::InvalidPartSizes(format!(
            "sizes must be finite and non-negative, got {}",
            bad
        )));
    }
    let sum: f64 = sizes.iter().sum();
    if !sizes.is_empty() && sum <= 0.0 {
        return Err(SplitError::InvalidPartSizes(
            "sizes must not sum to zero".to_string(),
        ));
    }
    Ok(sum)
}

/// Turn relative part sizes into integer counts for `total` keys.
///
/// With `RemainderPolicy::Drop` each count is `floor(total * size / sum)` and
/// the counts may sum to less than `total`. With
/// `RemainderPolicy::LargestRemainder` the missing keys go one each to the
/// parts with the largest fractional parts (earlier part wins ties), so the
/// counts always sum to `total`.
pub fn normalize_sizes(
    sizes: &[f64],
    total: usize,
    remainder: RemainderPolicy,
) -> SplitResult<Vec<usize>> {
    let sum = validate_sizes(sizes)?;
    if sizes.is_empty() {
        return Ok(Vec::new());
    }

    let exact: Vec<f64> = sizes.iter().map(|v| total as f64 * v / sum).collect();
    let mut counts: Vec<usize> = exact.iter().map(|v| *v as usize).collect();

    if remainder == RemainderPolicy::LargestRemainder {
        let assigned: usize = counts.iter().sum();
        let missing = total.saturating_sub(assigned);

        let mut order: Vec<usize> = (0..counts.len()).collect();
        order.sort_by(|&a, &b| {
            let frac_a = exact[a] - counts[a] as f64;
            let frac_b = exact[b] - counts[b] as f64;
            frac_b.total_cmp(&frac_a).then(a.cmp(&b))
        });
        for &idx in order.iter().take(missing) {
            counts[idx] += 1;
        }
    }

    Ok(counts)
}

/// Split dataset keys into the parts described by `options`.
///
/// Keys are shuffled with `rng` when `options.to_shuffle` is set and sorted
/// ascending otherwise, then sliced into consecutive runs in part-name order.
///
/// # Returns
/// * `Ok(Partition)` with disjoint parts; zero-size parts are empty
/// * `Err(SplitError::PartCountMismatch)` if names and sizes differ in length
/// * `Err(SplitError::InvalidPartSizes)` for negative, non-finite or all-zero sizes
pub fn split_names<K, R>(names: K, options: &SplitOptions, rng: &mut R) -> SplitResult<Partition>
where
    K: IntoIterator,
    K::Item: Into<String>,
    R: Rng + ?Sized,
{
    if options.part_names.len() != options.part_sizes.len() {
        return Err(SplitError::PartCountMismatch {
            names: options.part_names.len(),
            sizes: options.part_sizes.len(),
        });
    }

    let mut keys: Vec<String> = names.into_iter().map(Into::into).collect();
    let counts = normalize_sizes(&options.part_sizes, keys.len(), options.remainder)?;

    if options.to_shuffle {
        keys.shuffle(rng);
    } else {
        keys.sort();
    }

    let mut parts = Vec::with_capacity(counts.len());
    let mut cur_idx = 0;
    for (name, count) in options.part_names.iter().zip(counts) {
        let end = (cur_idx + count).min(keys.len());
        debug!("Part '{}' takes keys [{}, {})", name, cur_idx, end);
        parts.push(Part {
            name: name.clone(),
            keys: keys[cur_idx..end].to_vec(),
        });
        cur_idx = end;
    }

    let dropped = keys.len() - cur_idx;
    let partition = Partition { parts, dropped };
    info!(
        "Split {} keys into {} parts {:?} ({} dropped by rounding, remainder policy: {})",
        keys.len(),
        partition.len(),
        partition.sizes(),
        dropped,
        options.remainder.as_str()
    );
    Ok(partition)
}
