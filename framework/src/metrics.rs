use metrics::{counter, describe_counter};
use twilight_gateway::EventType;

/// Registers descriptions for every metric the framework emits. Call once
/// after installing a recorder.
pub fn describe() {
    describe_counter!("framework_events", "Gateway events dispatched to bindings");
    describe_counter!("framework_commands", "Command and sub-action invocations");
    describe_counter!("framework_helpers", "Helper dispatches");
    describe_counter!("framework_registrations", "Command registration calls");
}

pub(crate) fn event_name(kind: EventType) -> String {
    match kind.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", kind),
    }
}

pub(crate) fn track_event(kind: EventType) {
    counter!("framework_events", "event" => event_name(kind)).increment(1);
}

pub(crate) fn track_command(command: &str, success: bool) {
    counter!(
        "framework_commands",
        "command" => command.to_string(),
        "success" => success.to_string()
    )
    .increment(1);
}

pub(crate) fn track_helper(helper: &str, success: bool) {
    counter!(
        "framework_helpers",
        "helper" => helper.to_string(),
        "success" => success.to_string()
    )
    .increment(1);
}

pub(crate) fn track_registration(target: &str, success: bool) {
    counter!(
        "framework_registrations",
        "target" => target.to_string(),
        "success" => success.to_string()
    )
    .increment(1);
}
