mod manifest;

pub use manifest::{ManifestError, PathManifest};
