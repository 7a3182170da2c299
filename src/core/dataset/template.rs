use tracing::{info, warn};

use crate::error::{SplitError, SplitResult};

/// Check that image keys and annotation keys line up.
///
/// Both sequences are sorted and compared position by position. The first
/// position where they differ is reported as a `TemplateMismatch`.
///
/// The comparison is positional, not a set comparison: when the lengths
/// differ only the common prefix length is compared, and the extra trailing
/// keys of the longer side are not reported here.
pub fn check_template<I, A, S, T>(image_names: I, annotation_names: A) -> SplitResult<()>
where
    I: IntoIterator<Item = S>,
    A: IntoIterator<Item = T>,
    S: AsRef<str>,
    T: AsRef<str>,
{
    let mut image_names: Vec<S> = image_names.into_iter().collect();
    let mut annotation_names: Vec<T> = annotation_names.into_iter().collect();
    image_names.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));
    annotation_names.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));

    if image_names.len() != annotation_names.len() {
        warn!(
            "Image and annotation key counts differ: {} != {}; only the first {} sorted keys are compared",
            image_names.len(),
            annotation_names.len(),
            image_names.len().min(annotation_names.len())
        );
    }

    for (index, (image, annotation)) in image_names.iter().zip(annotation_names.iter()).enumerate() {
        if image.as_ref() != annotation.as_ref() {
            return Err(SplitError::TemplateMismatch {
                index,
                image: image.as_ref().to_string(),
                annotation: annotation.as_ref().to_string(),
            });
        }
    }

    info!("Image and annotation keys match");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dataset::keys::{compile_template, extract_key};

    #[test]
    fn test_matching_templates_pass() {
        let image_re = compile_template(r"(\w+)\.jpg").unwrap();
        let ann_re = compile_template(r"(\w+)\.xml").unwrap();
        let images: Vec<String> = ["b.jpg", "a.jpg"]
            .iter()
            .filter_map(|n| extract_key(n, Some(&image_re)))
            .collect();
        let annotations: Vec<String> = ["a.xml", "b.xml"]
            .iter()
            .filter_map(|n| extract_key(n, Some(&ann_re)))
            .collect();

        assert!(check_template(&images, &annotations).is_ok());
    }

    #[test]
    fn test_mismatch_reports_first_sorted_difference() {
        let err = check_template(["b", "a"], ["c", "a"]).unwrap_err();
        match err {
            SplitError::TemplateMismatch {
                index,
                image,
                annotation,
            } => {
                assert_eq!(index, 1);
                assert_eq!(image, "b");
                assert_eq!(annotation, "c");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extra_trailing_keys_are_not_compared() {
        assert!(check_template(["a", "b", "c"], ["a", "b"]).is_ok());
        assert!(check_template(Vec::<&str>::new(), ["a"]).is_ok());
    }

    #[test]
    fn test_length_difference_still_catches_prefix_mismatch() {
        let err = check_template(["a", "c"], ["a", "b", "c"]).unwrap_err();
        assert!(matches!(err, SplitError::TemplateMismatch { index: 1, .. }));
    }
}
