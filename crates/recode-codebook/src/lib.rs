pub mod codebook;
pub mod dedupe;
pub mod error;
pub mod registry;
pub mod source;
pub mod xml;

pub use codebook::Codebook;
pub use dedupe::WarnDedupe;
pub use error::CodebookError;
pub use registry::{HOUSEKEEPING_PREFIX, HousekeepingRegistry, ProtocolRegistry};
pub use source::{DirSource, MemorySource, SourceError, TerminologySource, VersionInfo};
pub use xml::{Element, XmlError, parse_document};
