use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use twilight_gateway::EventType;

use super::{ModuleKind, Origin};
use crate::catalog::HandlerCatalog;
use crate::error::DefinitionError;
use crate::handler::event_handler::EventFunc;

pub struct EventModule<T> {
    pub name: String,
    pub event: EventType,
    pub once: bool,
    pub func: EventFunc<T>,
    pub origin: Origin,
}

impl<T> EventModule<T> {
    pub fn new(
        name: &str,
        event: EventType,
        once: bool,
        func: EventFunc<T>,
    ) -> Result<Self, DefinitionError> {
        if name.is_empty() {
            return Err(DefinitionError::EmptyName);
        }

        Ok(Self {
            name: name.to_string(),
            event,
            once,
            func,
            origin: Origin::Manual,
        })
    }
}

#[derive(Deserialize, Debug)]
pub struct EventManifest {
    pub name: String,
    /// Defaults to `name`.
    pub event: Option<String>,
    #[serde(default)]
    pub once: bool,
    pub execute: String,
}

/// Parses a gateway event name, accepting both `MESSAGE_CREATE` and
/// `messageCreate` spellings.
pub fn parse_event_type(name: &str) -> Option<EventType> {
    let name = match name {
        "clientReady" => "READY".to_string(),
        name => screaming_snake_case(name),
    };

    serde_json::from_value(Value::String(name)).ok()
}

fn screaming_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;

    for c in name.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        out.push(c.to_ascii_uppercase());
    }

    out
}

impl<T> ModuleKind<T> for EventModule<T> {
    const KIND: &'static str = "event";

    type Manifest = EventManifest;

    fn from_manifest(
        manifest: EventManifest,
        catalog: &HandlerCatalog<T>,
        path: &Path,
    ) -> Result<Self, DefinitionError> {
        let event_name = manifest.event.as_deref().unwrap_or(&manifest.name);
        let event = parse_event_type(event_name)
            .ok_or_else(|| DefinitionError::UnknownEvent(event_name.to_string()))?;
        let func = catalog.event_func(&manifest.execute).ok_or_else(|| {
            DefinitionError::UnknownHandler {
                kind: "event",
                symbol: manifest.execute.clone(),
            }
        })?;

        let mut module = EventModule::new(&manifest.name, event, manifest.once, func)?;
        module.origin = Origin::File(path.to_path_buf());
        Ok(module)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_event_names() {
        assert_eq!(parse_event_type("MESSAGE_CREATE"), Some(EventType::MessageCreate));
        assert_eq!(parse_event_type("messageCreate"), Some(EventType::MessageCreate));
        assert_eq!(parse_event_type("ready"), Some(EventType::Ready));
        assert_eq!(parse_event_type("clientReady"), Some(EventType::Ready));
        assert_eq!(parse_event_type("bogus"), None);
    }

    #[test]
    fn snake_case_conversion() {
        assert_eq!(screaming_snake_case("interactionCreate"), "INTERACTION_CREATE");
        assert_eq!(screaming_snake_case("READY"), "READY");
        assert_eq!(screaming_snake_case("GUILD_CREATE"), "GUILD_CREATE");
    }

    #[test]
    fn empty_name_is_rejected() {
        let result = EventModule::<()>::new(
            "",
            EventType::Ready,
            true,
            |_ctx| Box::pin(async { Ok::<(), crate::Error>(()) }),
        );

        assert!(matches!(result, Err(DefinitionError::EmptyName)));
    }
}
