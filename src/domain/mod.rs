//! Domain logic - pure release rules independent of git operations

pub mod module;
pub mod tag;
pub mod version;

pub use module::{enforce_major_module_rule, GoModule};
pub use tag::ReleaseTag;
pub use version::ProposedVersion;
