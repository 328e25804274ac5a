pub mod error;
pub mod text;
pub mod tree;
mod tsv;
pub mod wide;

pub use error::OutputError;
pub use text::write_text;
pub use tree::write_tree_sheet;
pub use wide::write_wide;
