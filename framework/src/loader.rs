//! Discovery of module manifests on disk.
//!
//! Every call reads the files again, there is no parse cache, so a reload
//! observes edits, new files and deleted files. Paths are sorted before
//! loading, which makes "last one wins" on duplicate names deterministic.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::catalog::HandlerCatalog;
use crate::error::{DefinitionError, LoadError};
use crate::module::ModuleKind;

pub const DEFAULT_EXTENSIONS: [&str; 2] = ["toml", "json"];

#[derive(Clone, Debug)]
pub struct ModuleLoader {
    root: PathBuf,
    extensions: Vec<String>,
}

/// Result of one discovery pass.
pub struct Discovery<M> {
    pub modules: Vec<M>,
    pub rejected: Vec<Rejection>,
}

#[derive(Debug)]
pub struct Rejection {
    pub path: PathBuf,
    pub reason: RejectReason,
}

#[derive(Debug)]
pub enum RejectReason {
    /// The file couldn't be read or parsed.
    Load(LoadError),
    /// The file parsed but isn't a valid module.
    Shape(DefinitionError),
}

impl<M> Default for Discovery<M> {
    fn default() -> Self {
        Self {
            modules: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

impl ModuleLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists every file under the root with a recognised extension, sorted.
    pub fn discover(&self) -> Result<Vec<PathBuf>, LoadError> {
        let root = self
            .root
            .to_str()
            .ok_or_else(|| LoadError::InvalidRoot(self.root.clone()))?;
        let root = glob::Pattern::escape(root);

        let mut files = Vec::new();
        for ext in &self.extensions {
            let pattern = format!("{}/**/*.{}", root.trim_end_matches('/'), ext);

            for entry in glob::glob(&pattern)? {
                match entry {
                    Ok(path) if path.is_file() => files.push(path),
                    Ok(_) => (),
                    Err(err) => tracing::warn!(path = ?err.path(), "couldn't read entry: {}", err),
                }
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Loads and validates every module under the root. Failures are logged
    /// and collected, they never abort the pass.
    pub async fn load<T, M: ModuleKind<T>>(&self, catalog: &HandlerCatalog<T>) -> Discovery<M> {
        let mut discovery = Discovery::default();

        let files = match self.discover() {
            Ok(files) => files,
            Err(err) => {
                tracing::error!(root = ?self.root, "couldn't scan for {} modules: {}", M::KIND, err);
                return discovery;
            }
        };

        if files.is_empty() {
            tracing::warn!(root = ?self.root, "no {} modules found", M::KIND);
            return discovery;
        }

        for path in files {
            match load_file::<T, M>(&path, catalog).await {
                Ok(module) => {
                    tracing::debug!(path = ?path, "loaded {} {}", M::KIND, module.name());
                    discovery.modules.push(module);
                }
                Err(RejectReason::Load(err)) => {
                    tracing::error!(path = ?path, "failed to load {} module: {}", M::KIND, err);
                    discovery.rejected.push(Rejection {
                        path,
                        reason: RejectReason::Load(err),
                    });
                }
                Err(RejectReason::Shape(err)) => {
                    tracing::warn!(path = ?path, "skipping invalid {} module: {}", M::KIND, err);
                    discovery.rejected.push(Rejection {
                        path,
                        reason: RejectReason::Shape(err),
                    });
                }
            }
        }

        discovery
    }
}

async fn load_file<T, M: ModuleKind<T>>(
    path: &Path,
    catalog: &HandlerCatalog<T>,
) -> Result<M, RejectReason> {
    let raw = read_manifest(path).await.map_err(RejectReason::Load)?;
    let manifest: M::Manifest = serde_json::from_value(raw)
        .map_err(|err| RejectReason::Shape(DefinitionError::Malformed(err.to_string())))?;

    M::from_manifest(manifest, catalog, path).map_err(RejectReason::Shape)
}

/// Reads a manifest into a format-independent value.
async fn read_manifest(path: &Path) -> Result<Value, LoadError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Ok(serde_json::to_value(toml::from_str::<toml::Table>(&contents)?)?),
        Some("json") => Ok(serde_json::from_str(&contents)?),
        ext => Err(LoadError::Extension(ext.unwrap_or_default().to_string())),
    }
}
