use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::catalog::HandlerCatalog;
use crate::error::DefinitionError;

pub mod command;
pub mod event;
pub mod helper;
pub mod schema;

pub use command::CommandModule;
pub use event::EventModule;
pub use helper::HelperModule;

/// Where a module descriptor came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    Manual,
    File(PathBuf),
}

/// A module variant that can be constructed from a manifest file.
pub trait ModuleKind<T>: Sized {
    /// Used in log lines, e.g. "command" or "helper".
    const KIND: &'static str;

    type Manifest: DeserializeOwned;

    fn from_manifest(
        manifest: Self::Manifest,
        catalog: &HandlerCatalog<T>,
        path: &Path,
    ) -> Result<Self, DefinitionError>;

    fn name(&self) -> &str;
}
