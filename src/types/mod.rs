mod checksum;
pub mod config;
mod error;
mod package;
mod source;
mod version;

pub use checksum::Checksum;
pub use error::ExplorerError;
pub use package::{parse_package_index, PackageRecord};
pub use source::{SourceEntry, SourceOptions};
pub use version::{CompareMode, VersionSpec};
