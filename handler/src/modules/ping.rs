use serde_json::Value;

use discrafter_framework::Error;

use crate::context::CommandContext;

pub(crate) async fn ping(ctx: CommandContext) -> Result<(), Error> {
    let uptime = match ctx.dispatch_helper("uptime", Vec::new()).await {
        Ok(Value::String(uptime)) => uptime,
        Ok(other) => other.to_string(),
        Err(err) => {
            tracing::warn!("couldn't get uptime: {}", err);
            "unknown".to_string()
        }
    };

    ctx.reply(format!("Pong! Up for {}.", uptime)).await?;

    Ok(())
}
