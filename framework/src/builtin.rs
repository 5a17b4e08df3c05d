use twilight_gateway::Event;
use twilight_model::application::command::CommandType;
use twilight_util::builder::command::CommandBuilder;

use crate::context::{CommandContext, EventContext};
use crate::error::DefinitionError;
use crate::module::CommandModule;
use crate::Error;

pub const RELOAD_COMMAND: &str = "reload";

/// Owner-only command that re-scans the command directory and re-registers
/// to the last used scope. Lives in the manual layer.
pub fn reload_command<T: Clone + Send + Sync + 'static>(
) -> Result<CommandModule<T>, DefinitionError> {
    let definition = CommandBuilder::new(
        RELOAD_COMMAND,
        "Reload commands from disk",
        CommandType::ChatInput,
    )
    .build();

    CommandModule::builder(definition, |ctx| Box::pin(reload::<T>(ctx))).build()
}

async fn reload<T: Clone + Send + Sync + 'static>(ctx: CommandContext<T>) -> Result<(), Error> {
    if !ctx.is_owner() {
        ctx.reply("Only the bot owner can reload commands.").await?;
        return Ok(());
    }

    let (count, rejected, failed) = {
        let mut registry = ctx.context.commands().write().await;
        let rejected = registry.reload_commands().await.len();

        let failed = match registry.scope().cloned() {
            Some(scope) => registry.register(&scope).await.failed.len(),
            None => {
                tracing::warn!("commands reloaded but never registered, skipping registration");
                0
            }
        };

        (registry.command_count(), rejected, failed)
    };

    tracing::info!(count, rejected, failed, "commands reloaded");

    let mut message = format!("Reloaded {} commands.", count);
    if rejected > 0 {
        message.push_str(&format!(" {} files were skipped, check the logs.", rejected));
    }
    if failed > 0 {
        message.push_str(&format!(" Registration failed for {} targets.", failed));
    }
    ctx.reply(message).await?;

    Ok(())
}

pub(crate) async fn log_ready<T>(ctx: EventContext<T>) -> Result<(), Error> {
    if let Event::Ready(ready) = &ctx.event {
        tracing::info!(
            "logged in as {} ({}), {} guilds",
            ready.user.name,
            ready.user.id,
            ready.guilds.len()
        );
    }

    Ok(())
}
