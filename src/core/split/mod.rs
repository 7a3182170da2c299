mod partitioner;

pub use partitioner::{
    normalize_sizes, split_names, Part, Partition, RemainderPolicy, SplitOptions,
};
