mod config;
mod context;
mod metrics;
mod modules;

use std::sync::Arc;

use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};

use discrafter_framework::{EventMeta, Framework};

use config::Config;
use context::Services;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // load .env into environment vars, ignore if not found
    match dotenvy::dotenv().map(|_| ()) {
        Err(err) if err.not_found() => {
            tracing::warn!("no .env file found");
        }
        result => result?,
    };

    // create config from environment vars
    let config = Config::from_env()?;
    let framework_config = config.framework_config()?;

    // set-up logging
    tracing_subscriber::fmt::init();

    // install metrics exporter
    if let Some(listen) = config.metrics_listen {
        metrics::install(listen)?;
        tracing::info!("metrics exporter listening on {}", listen);
    }

    let client = Arc::new(twilight_http::Client::new(config.discord_token.clone()));
    let app = client.current_user_application().await?.model().await?;
    tracing::info!("application: {} ({})", app.name, app.id);

    let mut framework = Framework::builder(framework_config, modules::catalog())
        .build(app.id, client, Services::new())
        .await?;

    // create the shard
    let mut shard = Shard::new(
        ShardId::ONE,
        config.discord_token,
        Intents::GUILDS | Intents::GUILD_MESSAGES,
    );

    // start main loop
    tracing::info!("starting main loop...");
    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(err) => {
                tracing::error!(?err, "error receiving discord event");
                continue;
            }
        };

        let meta = EventMeta::new(shard.id().number());
        tracing::debug!(
            event = ?event.kind(),
            uuid = ?meta.uuid,
            shard = meta.shard,
            "event received",
        );

        framework.handle(meta, event).await;
    }

    Ok(())
}
