use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use twilight_http::{client::InteractionClient, Client};
use twilight_model::{
    application::interaction::Interaction,
    id::{
        marker::{ApplicationMarker, UserMarker},
        Id,
    },
};

use crate::error::DispatchError;
use crate::registry::{command::CommandRegistry, helper::HelperRegistry};

pub mod command_context;
pub mod event_context;

pub use command_context::CommandContext;
pub use event_context::EventContext;

/// The shared client handle, cloned into every handler context.
pub struct Context<T> {
    pub application_id: Id<ApplicationMarker>,
    pub owner_id: Option<Id<UserMarker>>,
    pub services: T,
    pub client: Arc<Client>,

    helpers: Arc<HelperRegistry<T>>,
    commands: Arc<RwLock<CommandRegistry<T>>>,
}

impl<T: Clone + Send + Sync + 'static> Context<T> {
    pub fn new(
        application_id: Id<ApplicationMarker>,
        client: Arc<Client>,
        services: T,
        helpers: Arc<HelperRegistry<T>>,
        commands: Arc<RwLock<CommandRegistry<T>>>,
    ) -> Self {
        Self {
            application_id,
            owner_id: None,
            services,
            client,
            helpers,
            commands,
        }
    }

    pub fn with_owner(mut self, owner_id: Option<Id<UserMarker>>) -> Self {
        self.owner_id = owner_id;
        self
    }

    pub fn interaction(&self) -> InteractionClient<'_> {
        self.client.interaction(self.application_id)
    }

    pub fn helpers(&self) -> &HelperRegistry<T> {
        &self.helpers
    }

    pub fn commands(&self) -> &Arc<RwLock<CommandRegistry<T>>> {
        &self.commands
    }

    /// Invokes the helper registered under `name`, shaping the arguments
    /// according to its declared [`ArgShape`](crate::ArgShape).
    pub async fn dispatch_helper(
        &self,
        name: &str,
        interaction: Option<Interaction>,
        args: Vec<Value>,
    ) -> Result<Value, DispatchError> {
        self.helpers
            .dispatch(name, interaction, self.clone(), args)
            .await
    }
}

impl<T: Clone> Clone for Context<T> {
    fn clone(&self) -> Self {
        Self {
            application_id: self.application_id,
            owner_id: self.owner_id,
            services: self.services.clone(),
            client: Arc::clone(&self.client),
            helpers: Arc::clone(&self.helpers),
            commands: Arc::clone(&self.commands),
        }
    }
}
