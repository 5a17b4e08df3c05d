use std::collections::HashMap;

use serde_json::Value;
use twilight_model::application::interaction::Interaction;

use crate::catalog::HandlerCatalog;
use crate::context::Context;
use crate::error::DispatchError;
use crate::handler::run_guarded;
use crate::loader::ModuleLoader;
use crate::module::HelperModule;

/// Helpers by name. Filled once at startup, never reloaded.
pub struct HelperRegistry<T> {
    helpers: HashMap<String, HelperModule<T>>,
}

impl<T> HelperRegistry<T> {
    pub fn new() -> Self {
        Self {
            helpers: HashMap::new(),
        }
    }

    pub async fn init(loader: &ModuleLoader, catalog: &HandlerCatalog<T>) -> Self {
        let mut registry = Self::new();

        for module in loader.load::<T, HelperModule<T>>(catalog).await.modules {
            tracing::info!("[HELPER] loaded helper: {} ({})", module.name, module.shape);
            registry.insert(module);
        }

        registry
    }

    pub fn insert(&mut self, module: HelperModule<T>) {
        if let Some(previous) = self.helpers.insert(module.name.clone(), module) {
            tracing::warn!(helper = %previous.name, "helper defined more than once, using the last one");
        }
    }

    pub fn get(&self, name: &str) -> Option<&HelperModule<T>> {
        self.helpers.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.helpers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.helpers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }
}

impl<T: Clone + Send + Sync + 'static> HelperRegistry<T> {
    /// Runs the helper `name` with its arguments arranged according to its
    /// shape. Never panics, a failing or panicking helper comes back as an
    /// error.
    pub async fn dispatch(
        &self,
        name: &str,
        interaction: Option<Interaction>,
        client: Context<T>,
        args: Vec<Value>,
    ) -> Result<Value, DispatchError> {
        let Some(helper) = self.helpers.get(name) else {
            tracing::warn!(helper = name, "no helper with that name");
            return Err(DispatchError::UnknownHelper(name.to_string()));
        };

        let Some(call) = helper.shape.adapt(interaction, client, args) else {
            tracing::warn!(helper = name, shape = %helper.shape, "helper needs an interaction");
            return Err(DispatchError::MissingInteraction(name.to_string()));
        };

        tracing::debug!(helper = name, shape = %helper.shape, "dispatching helper");
        let result = run_guarded(name, (helper.func)(call)).await;
        crate::metrics::track_helper(name, result.is_ok());

        if let Err(err) = &result {
            tracing::error!(helper = name, "{}", err);
        }

        result
    }
}

impl<T> Default for HelperRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::Arc};

    use serde_json::json;
    use tokio::sync::RwLock;
    use twilight_model::id::Id;

    use super::*;
    use crate::api::testing::RecordingApi;
    use crate::handler::helper_handler::HelperCall;
    use crate::registry::command::{CollisionPolicy, CommandRegistry};
    use crate::{handler_func, ArgShape, HelperArgs};

    #[derive(Clone)]
    struct Services {
        greeting: &'static str,
    }

    fn catalog() -> HandlerCatalog<Services> {
        HandlerCatalog::<Services>::new()
            .helper("echo", |call| {
                Box::pin(async move { Ok::<_, crate::Error>(Value::Array(call.args().to_vec())) })
            })
            .helper("greet", |call| {
                Box::pin(async move {
                    let HelperArgs::ClientArgs(client, args) = call else {
                        return Err("unexpected shape".into());
                    };
                    let name = args.first().and_then(Value::as_str).unwrap_or("nobody");
                    Ok::<_, crate::Error>(json!(format!("{}, {}", client.services.greeting, name)))
                })
            })
            .helper("fail", |_call| {
                Box::pin(async { Err::<Value, crate::Error>("helper broke".into()) })
            })
            .helper("panic", handler_func!(explode))
    }

    async fn explode(_call: HelperCall<Services>) -> Result<Value, crate::Error> {
        panic!("helper panicked")
    }

    fn registry() -> HelperRegistry<Services> {
        let catalog = catalog();
        let mut registry = HelperRegistry::new();
        for (name, shape) in [
            ("echo", ArgShape::Args),
            ("greet", ArgShape::ClientArgs),
            ("fail", ArgShape::Client),
            ("panic", ArgShape::Args),
            ("needs_interaction", ArgShape::InteractionArgs),
        ] {
            let func = catalog
                .helper_func(if name == "needs_interaction" { "echo" } else { name })
                .unwrap();
            registry.insert(HelperModule::new(name, shape, func).unwrap());
        }
        registry
    }

    fn context(helpers: HelperRegistry<Services>) -> Context<Services> {
        let commands = CommandRegistry::new(
            None,
            Arc::new(HandlerCatalog::new()),
            Arc::new(RecordingApi::default()),
            CollisionPolicy::default(),
        );

        Context::new(
            Id::new(1),
            Arc::new(twilight_http::Client::new(String::new())),
            Services { greeting: "hello" },
            Arc::new(helpers),
            Arc::new(RwLock::new(commands)),
        )
    }

    #[tokio::test]
    async fn dispatch_shapes_arguments() {
        let ctx = context(registry());

        let echoed = ctx
            .dispatch_helper("echo", None, vec![json!(1), json!("two")])
            .await
            .unwrap();
        assert_eq!(echoed, json!([1, "two"]));

        let greeting = ctx
            .dispatch_helper("greet", None, vec![json!("world")])
            .await
            .unwrap();
        assert_eq!(greeting, json!("hello, world"));
    }

    #[tokio::test]
    async fn unknown_helper_is_a_noop() {
        let ctx = context(registry());

        assert!(matches!(
            ctx.dispatch_helper("missing", None, vec![]).await,
            Err(DispatchError::UnknownHelper(name)) if name == "missing"
        ));
    }

    #[tokio::test]
    async fn interaction_shapes_need_an_interaction() {
        let ctx = context(registry());

        assert!(matches!(
            ctx.dispatch_helper("needs_interaction", None, vec![json!(1)]).await,
            Err(DispatchError::MissingInteraction(_))
        ));
    }

    #[tokio::test]
    async fn failures_are_contained() {
        let ctx = context(registry());

        assert!(matches!(
            ctx.dispatch_helper("fail", None, vec![]).await,
            Err(DispatchError::Failed { name, .. }) if name == "fail"
        ));
        assert!(matches!(
            ctx.dispatch_helper("panic", None, vec![]).await,
            Err(DispatchError::Panicked(name)) if name == "panic"
        ));
    }

    #[tokio::test]
    async fn init_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("echo.toml"),
            "name = \"echo\"\ntype = \"Args\"\nexecute = \"echo\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("bad.toml"),
            "name = \"bad\"\ntype = \"Sometimes\"\nexecute = \"echo\"\n",
        )
        .unwrap();

        let registry = HelperRegistry::init(&ModuleLoader::new(dir.path()), &catalog()).await;

        assert_eq!(registry.names(), vec!["echo"]);
        assert_eq!(registry.get("echo").unwrap().shape, ArgShape::Args);
    }
}
