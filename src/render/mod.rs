//! Plain-text previews of projected trees for terminals and logs.
//!
//! Debug output only; the wire format is the JSON in [`crate::tree`].

mod core;

pub use self::core::{PreviewSettings, TablePreview};
