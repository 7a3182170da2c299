mod file_ops;

pub use file_ops::{
    copy_files, make_output_filename, split_extension, CopyStats, ExistingFilePolicy,
};
