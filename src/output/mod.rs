pub mod manifest;
pub mod writer;

pub use manifest::SelectionManifest;
pub use writer::{read_index_list, write_indices, OutputError, SelectionWriter};
