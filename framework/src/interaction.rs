//! Routes interactions to command handlers.
//!
//! Chat input commands run the command's `execute`, autocomplete requests run
//! its `autocomplete` action. Components and modals carry a custom id of the
//! form `command-action` and run that action. Anything that doesn't resolve
//! is ignored.

use std::sync::Arc;

use twilight_gateway::Event;
use twilight_model::application::interaction::{Interaction, InteractionData, InteractionType};

use crate::context::{CommandContext, Context, EventContext};
use crate::error::{DispatchError, RegistryError};
use crate::handler::{command_handler::CommandFunc, run_guarded};
use crate::module::command::{CommandModule, ACTION_DELIMITER, AUTOCOMPLETE_ACTION};
use crate::registry::command::CommandRegistry;
use crate::{Error, EventMeta};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Command(String),
    Autocomplete(String),
    Action { command: String, action: String },
    Ignore,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Handler {
    Execute,
    Action(String),
}

pub struct Resolved<T> {
    pub module: Arc<CommandModule<T>>,
    pub handler: Handler,
}

impl<T> Resolved<T> {
    pub fn func(&self) -> Option<CommandFunc<T>> {
        match &self.handler {
            Handler::Execute => Some(self.module.func),
            Handler::Action(action) => self.module.action(action),
        }
    }

    /// `command` or `command-action`, used in logs and metrics.
    pub fn label(&self) -> String {
        match &self.handler {
            Handler::Execute => self.module.name().to_string(),
            Handler::Action(action) => {
                format!("{}{}{}", self.module.name(), ACTION_DELIMITER, action)
            }
        }
    }
}

pub fn route(interaction: &Interaction) -> Route {
    match (&interaction.kind, &interaction.data) {
        (
            InteractionType::ApplicationCommandAutocomplete,
            Some(InteractionData::ApplicationCommand(data)),
        ) => Route::Autocomplete(data.name.clone()),
        (_, Some(InteractionData::ApplicationCommand(data))) => Route::Command(data.name.clone()),
        (_, Some(InteractionData::MessageComponent(data))) => route_custom_id(&data.custom_id),
        (_, Some(InteractionData::ModalSubmit(data))) => route_custom_id(&data.custom_id),
        _ => Route::Ignore,
    }
}

/// Splits `command-action` on the delimiter and takes the first two
/// segments, anything after the second is dropped. Both must be non-empty,
/// so `emoji-stats-sort` is action `stats` of `emoji`.
pub fn parse_custom_id(custom_id: &str) -> Option<(&str, &str)> {
    let mut segments = custom_id.split(ACTION_DELIMITER);
    let command = segments.next()?;
    let action = segments.next()?;
    if command.is_empty() || action.is_empty() {
        return None;
    }

    Some((command, action))
}

pub fn route_custom_id(custom_id: &str) -> Route {
    match parse_custom_id(custom_id) {
        Some((command, action)) => Route::Action {
            command: command.to_string(),
            action: action.to_string(),
        },
        None => Route::Ignore,
    }
}

/// Finds the handler for `route`. An unknown command is an error, a command
/// without the requested action is not.
pub fn resolve<T>(
    registry: &CommandRegistry<T>,
    route: &Route,
) -> Result<Option<Resolved<T>>, RegistryError> {
    let (name, handler) = match route {
        Route::Ignore => return Ok(None),
        Route::Command(name) => (name, Handler::Execute),
        Route::Autocomplete(name) => (name, Handler::Action(AUTOCOMPLETE_ACTION.to_string())),
        Route::Action { command, action } => (command, Handler::Action(action.clone())),
    };

    let module = registry.get_command(name)?;
    if let Handler::Action(action) = &handler {
        if module.action(action).is_none() {
            tracing::debug!(command = %name, action = %action, "no such action, ignoring");
            return Ok(None);
        }
    }

    Ok(Some(Resolved { module, handler }))
}

/// Resolves and runs the handler for one interaction.
///
/// The registry lock is released before the handler runs, so handlers can
/// take it for writing.
pub async fn handle_interaction<T: Clone + Send + Sync + 'static>(
    meta: EventMeta,
    context: &Context<T>,
    interaction: Interaction,
) -> Result<(), DispatchError> {
    let route = route(&interaction);
    if route == Route::Ignore {
        tracing::debug!(kind = ?interaction.kind, "ignoring interaction");
        return Ok(());
    }

    let resolved = {
        let registry = context.commands().read().await;
        resolve(&registry, &route)?
    };
    let Some((label, func)) = resolved.and_then(|r| Some((r.label(), r.func()?))) else {
        return Ok(());
    };

    tracing::info!(uuid = ?meta.uuid, "running {}", label);

    let ctx = CommandContext {
        meta,
        context: context.clone(),
        interaction,
    };
    let result = run_guarded(&label, func(ctx)).await;
    crate::metrics::track_command(&label, result.is_ok());

    result
}

async fn route_event<T: Clone + Send + Sync + 'static>(ctx: EventContext<T>) -> Result<(), Error> {
    let Event::InteractionCreate(event) = ctx.event else {
        return Ok(());
    };

    if let Err(err) = handle_interaction(ctx.meta, &ctx.context, event.0).await {
        tracing::warn!("error handling interaction: {}", err);
    }

    Ok(())
}

/// Binds the router to `INTERACTION_CREATE`.
pub fn bind_router<T: Clone + Send + Sync + 'static>(bus: &mut crate::bus::EventBus<T>) {
    bus.bind(
        twilight_gateway::EventType::InteractionCreate,
        "interaction_router",
        |ctx| Box::pin(route_event(ctx)),
        false,
    );
}
