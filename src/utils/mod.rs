mod fs;
mod hash;

pub use fs::{open_file, read_full};
pub use hash::{hash_block, hash_children};
