pub mod manifest;
pub mod side;
pub mod source;

pub use manifest::{Manifest, ManifestEntry};
pub use side::Side;
pub use source::SourceId;
