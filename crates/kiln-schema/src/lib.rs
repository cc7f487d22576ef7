//! Shared data model for kiln recipes.
//!
//! Everything in this crate is plain data: the settings a build targets,
//! the options a recipe declares, the dependencies it requires, and the
//! metadata it exports to consumers. No IO happens here.

pub mod cpp_info;
pub mod options;
pub mod package_id;
pub mod require;
pub mod settings;
pub mod source;

// Re-exports
pub use cpp_info::CppInfo;
pub use options::{Domain, OptionDecl, OptionError, OptionSet, OptionValue};
pub use package_id::PackageId;
pub use require::Requirement;
pub use settings::{Arch, BuildType, Compiler, Os, Settings, SettingsError};
pub use source::{SourceArchive, SourceError};
