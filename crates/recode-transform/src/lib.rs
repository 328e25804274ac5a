pub mod error;
pub mod paths;
pub mod pipeline;
pub mod wide;

pub use error::TransformError;
pub use paths::{PathMap, read_tree_template, substitute_repeat};
pub use pipeline::{TranslateContext, TranslatedTable, translate_text, translate_tree};
pub use wide::{WideTable, pivot};
