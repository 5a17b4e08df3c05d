use std::time::Duration;

use serde_json::Value;

use discrafter_framework::{Error, HelperArgs};

use crate::context::HelperCall;

/// `Client` helper, how long the handler has been running.
pub(crate) async fn uptime(call: HelperCall) -> Result<Value, Error> {
    let Some(client) = call.client() else {
        return Err("uptime needs the client".into());
    };

    Ok(Value::String(format_duration(
        client.services.started_at.elapsed(),
    )))
}

/// `InteractionArgs` helper, greets the interaction's author with the
/// first argument as salutation.
pub(crate) async fn greeting(call: HelperCall) -> Result<Value, Error> {
    let HelperArgs::InteractionArgs(interaction, args) = call else {
        return Err("greeting needs an interaction and arguments".into());
    };

    let salutation = args.first().and_then(Value::as_str).unwrap_or("Hello");
    let name = interaction
        .author()
        .map(|user| user.name.clone())
        .unwrap_or_else(|| "stranger".to_string());

    Ok(Value::String(format!("{}, {}", salutation, name)))
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (days, hours, minutes, seconds) = (
        secs / 86_400,
        (secs % 86_400) / 3_600,
        (secs % 3_600) / 60,
        secs % 60,
    );

    let parts: Vec<String> = [(days, "d"), (hours, "h"), (minutes, "m")]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .chain(std::iter::once(format!("{}s", seconds)))
        .collect();

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0s");
        assert_eq!(format_duration(Duration::from_secs(59)), "59s");
        assert_eq!(format_duration(Duration::from_secs(3_661)), "1h 1m 1s");
        assert_eq!(format_duration(Duration::from_secs(90_000)), "1d 1h 0s");
    }
}
