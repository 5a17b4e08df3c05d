use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::RwLock;
use twilight_gateway::{Event, EventType};
use twilight_http::Client;
use twilight_model::id::{
    marker::{ApplicationMarker, UserMarker},
    Id,
};

use crate::api::{CommandApi, HttpCommandApi};
use crate::builtin;
use crate::bus::EventBus;
use crate::catalog::HandlerCatalog;
use crate::context::Context;
use crate::error::{DefinitionError, DispatchError};
use crate::interaction;
use crate::loader::{ModuleLoader, DEFAULT_EXTENSIONS};
use crate::module::{CommandModule, EventModule, HelperModule};
use crate::registry::{
    command::{CollisionPolicy, CommandRegistry},
    event::EventRegistry,
    helper::HelperRegistry,
};
use crate::scope::ScopeSettings;
use crate::EventMeta;

#[derive(Clone, Debug)]
pub struct FrameworkConfig {
    pub commands_dir: PathBuf,
    pub events_dir: PathBuf,
    pub helpers_dir: PathBuf,
    /// Recognised manifest extensions.
    pub extensions: Vec<String>,

    pub scope: ScopeSettings,
    pub collision_policy: CollisionPolicy,
    pub use_default_interaction_handler: bool,
    /// Adds the owner-only `reload` command.
    pub reload_command: bool,
    pub owner_id: Option<Id<UserMarker>>,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            commands_dir: PathBuf::from("./modules/commands"),
            events_dir: PathBuf::from("./modules/events"),
            helpers_dir: PathBuf::from("./modules/helpers"),
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),

            scope: ScopeSettings::default(),
            collision_policy: CollisionPolicy::default(),
            use_default_interaction_handler: true,
            reload_command: false,
            owner_id: None,
        }
    }
}

impl FrameworkConfig {
    fn loader(&self, dir: &Path) -> ModuleLoader {
        ModuleLoader::new(dir).with_extensions(self.extensions.iter().cloned())
    }
}

pub struct FrameworkBuilder<T> {
    config: FrameworkConfig,
    catalog: HandlerCatalog<T>,
    api: Option<Arc<dyn CommandApi>>,

    commands: Vec<CommandModule<T>>,
    events: Vec<EventModule<T>>,
    helpers: Vec<HelperModule<T>>,
}

/// Owns the registries and the event bus. Feed it every gateway event with
/// [`handle`](Framework::handle).
pub struct Framework<T> {
    context: Context<T>,
    events: EventRegistry<T>,
    bus: EventBus<T>,
}

impl<T: Clone + Send + Sync + 'static> Framework<T> {
    pub fn builder(config: FrameworkConfig, catalog: HandlerCatalog<T>) -> FrameworkBuilder<T> {
        FrameworkBuilder {
            config,
            catalog,
            api: None,
            commands: Vec::new(),
            events: Vec::new(),
            helpers: Vec::new(),
        }
    }

    pub fn context(&self) -> &Context<T> {
        &self.context
    }

    pub fn events(&self) -> &EventRegistry<T> {
        &self.events
    }

    pub fn bus_mut(&mut self) -> &mut EventBus<T> {
        &mut self.bus
    }

    /// Emits a gateway event on the bus. Handler failures are logged and
    /// returned, they never propagate.
    pub async fn handle(&mut self, meta: EventMeta, event: Event) -> Vec<DispatchError> {
        self.bus.emit(meta, &self.context, event).await
    }
}

impl<T: Clone + Send + Sync + 'static> FrameworkBuilder<T> {
    /// Adds a command to the manual layer.
    pub fn command(mut self, module: CommandModule<T>) -> Self {
        self.commands.push(module);
        self
    }

    pub fn event(mut self, module: EventModule<T>) -> Self {
        self.events.push(module);
        self
    }

    pub fn helper(mut self, module: HelperModule<T>) -> Self {
        self.helpers.push(module);
        self
    }

    /// Overrides the command API, defaults to the HTTP client.
    pub fn api(mut self, api: Arc<dyn CommandApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Loads every module, registers commands and binds events.
    pub async fn build(
        self,
        application_id: Id<ApplicationMarker>,
        client: Arc<Client>,
        services: T,
    ) -> Result<Framework<T>, DefinitionError> {
        let config = self.config;
        let catalog = Arc::new(self.catalog);

        // helpers
        let mut helpers = HelperRegistry::init(&config.loader(&config.helpers_dir), &catalog).await;
        for module in self.helpers {
            helpers.insert(module);
        }

        // commands
        let api: Arc<dyn CommandApi> = match self.api {
            Some(api) => api,
            None => Arc::new(HttpCommandApi::new(Arc::clone(&client), application_id)),
        };
        let mut commands = CommandRegistry::new(
            Some(config.loader(&config.commands_dir)),
            Arc::clone(&catalog),
            api,
            config.collision_policy,
        );
        for module in self.commands {
            commands.add_manual_command(module);
        }
        if config.reload_command {
            if config.owner_id.is_none() {
                tracing::warn!("reload command enabled without an owner, nobody can use it");
            }
            commands.add_manual_command(builtin::reload_command()?);
        }
        commands.load_commands().await;

        if config.scope.development_mode {
            tracing::info!(
                "[DEV] {} commands loaded: {}",
                commands.command_count(),
                commands.list_commands().join(", ")
            );
        }

        match config.scope.resolve() {
            Some(scope) => {
                tracing::info!(?scope, "registering commands");
                commands.register(&scope).await;
            }
            None => tracing::warn!("no command registration method matched, skipping registration"),
        }

        let context = Context::new(
            application_id,
            client,
            services,
            Arc::new(helpers),
            Arc::new(RwLock::new(commands)),
        )
        .with_owner(config.owner_id);

        // events
        let mut events = EventRegistry::init(&config.loader(&config.events_dir), &catalog).await;
        for module in self.events {
            events.insert(module);
        }

        let mut bus = EventBus::new();
        events.bind(&mut bus);
        if config.use_default_interaction_handler {
            interaction::bind_router(&mut bus);
        }
        bus.bind(
            EventType::Ready,
            "ready_log",
            |ctx| Box::pin(builtin::log_ready(ctx)),
            true,
        );

        Ok(Framework {
            context,
            events,
            bus,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::api::testing::RecordingApi;
    use crate::registry::command::Target;
    use crate::{handler_func, CommandContext, Error, Scope};

    async fn noop(_ctx: CommandContext<()>) -> Result<(), Error> {
        Ok(())
    }

    fn catalog() -> HandlerCatalog<()> {
        HandlerCatalog::<()>::new()
            .command("noop", handler_func!(noop))
            .event("log", |_ctx| Box::pin(async { Ok::<(), Error>(()) }))
    }

    fn config(dir: &std::path::Path) -> FrameworkConfig {
        for sub in ["commands", "events", "helpers"] {
            fs::create_dir_all(dir.join(sub)).unwrap();
        }
        fs::write(
            dir.join("commands/ping.toml"),
            "name = \"ping\"\ndescription = \"Ping\"\nexecute = \"noop\"\n",
        )
        .unwrap();
        fs::write(
            dir.join("events/guilds.toml"),
            "name = \"guilds\"\nevent = \"GUILD_CREATE\"\nexecute = \"log\"\n",
        )
        .unwrap();

        FrameworkConfig {
            commands_dir: dir.join("commands"),
            events_dir: dir.join("events"),
            helpers_dir: dir.join("helpers"),
            reload_command: true,
            owner_id: Some(Id::new(7)),
            scope: ScopeSettings {
                development_mode: true,
                development_guild_id: Some(Id::new(42)),
                global_register: true,
                guild_allowlist: vec![Id::new(1)],
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn build_registers_to_development_guild() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(RecordingApi::default());

        let framework = Framework::builder(config(dir.path()), catalog())
            .api(api.clone())
            .build(
                Id::new(1),
                Arc::new(Client::new(String::new())),
                (),
            )
            .await
            .unwrap();

        assert_eq!(
            api.calls(),
            vec![(
                Target::Guild(Id::new(42)),
                vec!["ping".to_string(), "reload".to_string()]
            )]
        );

        let commands = framework.context().commands().read().await;
        assert_eq!(commands.scope(), Some(&Scope::Development(Id::new(42))));
        assert!(commands.is_manual("reload"));
        drop(commands);

        assert_eq!(framework.events().names(), vec!["guilds"]);
    }

    #[tokio::test]
    async fn default_bindings() {
        let dir = tempfile::tempdir().unwrap();

        let mut framework = Framework::builder(config(dir.path()), catalog())
            .api(Arc::new(RecordingApi::default()))
            .build(
                Id::new(1),
                Arc::new(Client::new(String::new())),
                (),
            )
            .await
            .unwrap();

        let bus = framework.bus_mut();
        assert_eq!(bus.binding_count(EventType::InteractionCreate), 1);
        assert_eq!(bus.binding_count(EventType::Ready), 1);
        assert_eq!(bus.binding_count(EventType::GuildCreate), 1);
    }

    #[tokio::test]
    async fn no_scope_skips_registration() {
        let dir = tempfile::tempdir().unwrap();
        let api = Arc::new(RecordingApi::default());
        let config = FrameworkConfig {
            scope: ScopeSettings::default(),
            use_default_interaction_handler: false,
            ..config(dir.path())
        };

        let mut framework = Framework::builder(config, catalog())
            .api(api.clone())
            .build(
                Id::new(1),
                Arc::new(Client::new(String::new())),
                (),
            )
            .await
            .unwrap();

        assert!(api.calls().is_empty());
        assert_eq!(
            framework
                .bus_mut()
                .binding_count(EventType::InteractionCreate),
            0
        );
    }
}
