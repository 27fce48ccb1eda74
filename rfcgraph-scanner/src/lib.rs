pub mod error;
pub mod extract;
pub mod result;
pub mod source;

pub use error::ScanError;
pub use result::{DocumentId, RelationKind, RelationSet, Relations};
pub use source::{MemorySource, RelationSource, RfcEditorSource, DEFAULT_BASE_URL};
