use serde::{Deserialize, Serialize};

pub use bus::EventBus;
pub use catalog::HandlerCatalog;
pub use context::{CommandContext, Context, EventContext};
pub use error::{ConfigError, DefinitionError, DispatchError, LoadError, RegistryError};
pub use framework::{Framework, FrameworkConfig};
pub use handler::helper_handler::{ArgShape, HelperArgs};
pub use loader::{Discovery, ModuleLoader, Rejection};
pub use module::{CommandModule, EventModule, HelperModule};
pub use registry::{
    command::{CollisionPolicy, CommandRegistry, RegistrationReport, Target},
    event::EventRegistry,
    helper::HelperRegistry,
};
pub use scope::{Scope, ScopeSettings};

pub mod api;
pub mod builtin;
pub mod bus;
pub mod catalog;
pub mod context;
pub mod error;
pub mod framework;
pub mod handler;
pub mod interaction;
pub mod loader;
pub mod macros;
pub mod metrics;
pub mod module;
pub mod registry;
pub mod scope;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Attached to every gateway event, used for tracing.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EventMeta {
    pub uuid: uuid::Uuid,
    pub shard: u32,
}

impl EventMeta {
    pub fn new(shard: u32) -> Self {
        Self {
            uuid: uuid::Uuid::now_v7(),
            shard,
        }
    }
}
