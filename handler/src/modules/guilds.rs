use metrics::counter;
use twilight_gateway::Event;

use discrafter_framework::Error;

use crate::context::EventContext;

pub(crate) async fn joined(ctx: EventContext) -> Result<(), Error> {
    let (Event::GuildCreate(_), Some(guild_id)) = (&ctx.event, ctx.event.guild_id()) else {
        return Ok(());
    };

    tracing::info!(shard = ctx.meta.shard, uuid = ?ctx.meta.uuid, "guild available: {}", guild_id);
    counter!("handler_guild_events", "kind" => "joined").increment(1);

    Ok(())
}

pub(crate) async fn left(ctx: EventContext) -> Result<(), Error> {
    let (Event::GuildDelete(_), Some(guild_id)) = (&ctx.event, ctx.event.guild_id()) else {
        return Ok(());
    };

    tracing::info!(shard = ctx.meta.shard, uuid = ?ctx.meta.uuid, "guild removed: {}", guild_id);
    counter!("handler_guild_events", "kind" => "left").increment(1);

    Ok(())
}
