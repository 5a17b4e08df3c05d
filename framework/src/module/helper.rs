use std::path::Path;

use serde::Deserialize;

use super::{ModuleKind, Origin};
use crate::catalog::HandlerCatalog;
use crate::error::DefinitionError;
use crate::handler::helper_handler::{ArgShape, HelperFunc};

pub struct HelperModule<T> {
    pub name: String,
    pub shape: ArgShape,
    pub func: HelperFunc<T>,
    pub description: Option<String>,
    pub origin: Origin,
}

impl<T> HelperModule<T> {
    pub fn new(name: &str, shape: ArgShape, func: HelperFunc<T>) -> Result<Self, DefinitionError> {
        if name.is_empty() {
            return Err(DefinitionError::EmptyName);
        }

        Ok(Self {
            name: name.to_string(),
            shape,
            func,
            description: None,
            origin: Origin::Manual,
        })
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Deserialize, Debug)]
pub struct HelperManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub shape: String,
    pub execute: String,
    pub description: Option<String>,
}

impl<T> ModuleKind<T> for HelperModule<T> {
    const KIND: &'static str = "helper";

    type Manifest = HelperManifest;

    fn from_manifest(
        manifest: HelperManifest,
        catalog: &HandlerCatalog<T>,
        path: &Path,
    ) -> Result<Self, DefinitionError> {
        let shape: ArgShape = manifest.shape.parse()?;
        let func = catalog.helper_func(&manifest.execute).ok_or_else(|| {
            DefinitionError::UnknownHandler {
                kind: "helper",
                symbol: manifest.execute.clone(),
            }
        })?;

        let mut module = HelperModule::new(&manifest.name, shape, func)?;
        module.description = manifest.description;
        module.origin = Origin::File(path.to_path_buf());
        Ok(module)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn catalog() -> HandlerCatalog<()> {
        HandlerCatalog::<()>::new().helper("echo", |call| {
            Box::pin(async move { Ok::<_, crate::Error>(json!(call.args())) })
        })
    }

    fn manifest(shape: &str) -> HelperManifest {
        HelperManifest {
            name: "echo".into(),
            shape: shape.into(),
            execute: "echo".into(),
            description: Some("Echoes its arguments".into()),
        }
    }

    #[test]
    fn from_manifest() {
        let module =
            HelperModule::from_manifest(manifest("Args"), &catalog(), Path::new("echo.toml"))
                .unwrap();

        assert_eq!(module.shape, ArgShape::Args);
        assert_eq!(module.description.as_deref(), Some("Echoes its arguments"));
    }

    #[test]
    fn unknown_shape_is_rejected() {
        let result =
            HelperModule::from_manifest(manifest("Everything"), &catalog(), Path::new("echo.toml"));

        assert!(matches!(result, Err(DefinitionError::UnknownShape(_))));
    }
}
