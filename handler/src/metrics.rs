use std::{error::Error, net::SocketAddr};

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;

pub(crate) fn install(listen: SocketAddr) -> Result<(), Box<dyn Error>> {
    // install metrics collector and exporter
    PrometheusBuilder::new()
        .with_http_listener(listen)
        .add_global_label("process", "handler")
        .install()?;

    // define metrics
    discrafter_framework::metrics::describe();
    describe_counter!("handler_guild_events", "Guilds joined and left");

    Ok(())
}
