mod keys;
mod template;

pub use keys::{compile_template, extract_key, get_dataset_filenames, FilenameMap, KEY_SEPARATOR};
pub use template::check_template;
