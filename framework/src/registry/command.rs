use std::{collections::HashMap, fmt, sync::Arc};

use twilight_model::{
    application::command::Command,
    id::{marker::GuildMarker, Id},
};

use super::layered::Layered;
pub use super::layered::CollisionPolicy;
use crate::api::CommandApi;
use crate::catalog::HandlerCatalog;
use crate::error::RegistryError;
use crate::loader::{ModuleLoader, Rejection};
use crate::module::CommandModule;
use crate::scope::Scope;
use crate::Error;

/// A registration target on the platform API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Global,
    Guild(Id<GuildMarker>),
}

impl Target {
    pub fn kind(&self) -> &'static str {
        match self {
            Target::Global => "global",
            Target::Guild(_) => "guild",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Global => f.write_str("global"),
            Target::Guild(id) => write!(f, "guild {}", id),
        }
    }
}

#[derive(Debug, Default)]
pub struct RegistrationReport {
    pub succeeded: Vec<Target>,
    pub failed: Vec<(Target, String)>,
}

impl RegistrationReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct CommandRegistry<T> {
    loader: Option<ModuleLoader>,
    catalog: Arc<HandlerCatalog<T>>,
    api: Arc<dyn CommandApi>,

    layers: Layered<Arc<CommandModule<T>>>,
    registered: HashMap<Target, Vec<Command>>,
    scope: Option<Scope>,
}

impl<T> CommandRegistry<T> {
    /// Creates an empty registry; nothing is loaded until
    /// [`load_commands`](Self::load_commands) is called.
    pub fn new(
        loader: Option<ModuleLoader>,
        catalog: Arc<HandlerCatalog<T>>,
        api: Arc<dyn CommandApi>,
        policy: CollisionPolicy,
    ) -> Self {
        Self {
            loader,
            catalog,
            api,
            layers: Layered::new(policy),
            registered: HashMap::new(),
            scope: None,
        }
    }

    /// Creates a registry and performs the first load.
    pub async fn init(
        loader: ModuleLoader,
        catalog: Arc<HandlerCatalog<T>>,
        api: Arc<dyn CommandApi>,
        policy: CollisionPolicy,
    ) -> Self {
        let mut registry = Self::new(Some(loader), catalog, api, policy);
        registry.load_commands().await;
        registry
    }

    /// Re-scans the command directory and rebuilds the active set. Manual
    /// commands are always kept.
    pub async fn load_commands(&mut self) -> Vec<Rejection> {
        let discovery = match &self.loader {
            Some(loader) => loader.load::<T, CommandModule<T>>(&self.catalog).await,
            None => Default::default(),
        };

        let (duplicates, collisions) = self.layers.replace_discovered(
            discovery
                .modules
                .into_iter()
                .map(|module| (module.name().to_string(), Arc::new(module))),
        );

        for name in duplicates {
            tracing::warn!(command = %name, "command defined by multiple files, using the last one");
        }
        self.log_collisions(collisions);

        for name in self.layers.discovered().keys() {
            tracing::info!("[CMD] loaded slash command: {}", name);
        }

        discovery.rejected
    }

    pub async fn reload_commands(&mut self) -> Vec<Rejection> {
        self.load_commands().await
    }

    /// Adds a command that survives every reload.
    pub fn add_manual_command(&mut self, module: CommandModule<T>) {
        let name = module.name().to_string();
        let collisions = self.layers.insert_manual(name.clone(), Arc::new(module));
        self.log_collisions(collisions);

        tracing::info!("[CMD] added manual command: {}", name);
    }

    fn log_collisions(&self, collisions: Vec<String>) {
        for name in collisions {
            tracing::warn!(
                command = %name,
                policy = ?self.layers.policy(),
                "manual and discovered command share a name"
            );
        }
    }

    pub fn get_command(&self, name: &str) -> Result<Arc<CommandModule<T>>, RegistryError> {
        self.layers
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::CommandNotFound(name.to_string()))
    }

    /// Active command names, sorted.
    pub fn list_commands(&self) -> Vec<String> {
        self.layers.names()
    }

    pub fn command_count(&self) -> usize {
        self.layers.len()
    }

    pub fn is_manual(&self, name: &str) -> bool {
        self.layers.manual().contains_key(name)
    }

    /// Registration payload for the active set, sorted by name.
    pub fn definitions(&self) -> Vec<Command> {
        let mut commands: Vec<Command> = self
            .layers
            .active()
            .values()
            .map(|module| module.definition.clone())
            .collect();
        commands.sort_by(|a, b| a.name.cmp(&b.name));
        commands
    }

    /// Overwrites the command set of each guild in turn. A failing guild is
    /// logged and doesn't stop the remaining ones.
    pub async fn register_guild_commands(
        &mut self,
        guild_ids: impl IntoIterator<Item = Id<GuildMarker>>,
    ) -> RegistrationReport {
        let commands = self.definitions();
        let mut report = RegistrationReport::default();

        for guild_id in guild_ids {
            let target = Target::Guild(guild_id);
            let result = self.api.set_guild_commands(guild_id, &commands).await;
            self.record(&mut report, target, result);
        }

        report
    }

    pub async fn register_global_commands(&mut self) -> RegistrationReport {
        let commands = self.definitions();
        let mut report = RegistrationReport::default();

        let result = self.api.set_global_commands(&commands).await;
        self.record(&mut report, Target::Global, result);

        report
    }

    /// Registers to `scope` and remembers it for later re-registration.
    pub async fn register(&mut self, scope: &Scope) -> RegistrationReport {
        self.scope = Some(scope.clone());

        match scope {
            Scope::Development(guild_id) => self.register_guild_commands([*guild_id]).await,
            Scope::Guilds(guild_ids) => self.register_guild_commands(guild_ids.clone()).await,
            Scope::Global => self.register_global_commands().await,
        }
    }

    /// The scope of the last [`register`](Self::register) call.
    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    fn record(
        &mut self,
        report: &mut RegistrationReport,
        target: Target,
        result: Result<Vec<Command>, Error>,
    ) {
        match result {
            Ok(registered) => {
                crate::metrics::track_registration(target.kind(), true);
                tracing::info!("registered {} commands ({})", registered.len(), target);
                self.registered.insert(target, registered);
                report.succeeded.push(target);
            }
            Err(err) => {
                crate::metrics::track_registration(target.kind(), false);
                tracing::error!("error registering commands ({}): {}", target, err);
                report.failed.push((target, err.to_string()));
            }
        }
    }

    pub async fn fetch_global_commands(&mut self) -> Result<Vec<Command>, Error> {
        let commands = self.api.global_commands().await?;
        self.registered.insert(Target::Global, commands.clone());
        Ok(commands)
    }

    pub async fn fetch_guild_commands(
        &mut self,
        guild_id: Id<GuildMarker>,
    ) -> Result<Vec<Command>, Error> {
        let commands = self.api.guild_commands(guild_id).await?;
        self.registered
            .insert(Target::Guild(guild_id), commands.clone());
        Ok(commands)
    }

    /// What the API last reported for `target`, from a registration or fetch.
    pub fn registered_commands(&self, target: Target) -> Option<&[Command]> {
        self.registered.get(&target).map(Vec::as_slice)
    }
}
