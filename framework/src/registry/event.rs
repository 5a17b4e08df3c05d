use std::collections::HashMap;

use crate::bus::EventBus;
use crate::catalog::HandlerCatalog;
use crate::loader::ModuleLoader;
use crate::module::EventModule;

/// Event modules by name. Filled once at startup, bindings live for the
/// lifetime of the bus.
pub struct EventRegistry<T> {
    events: HashMap<String, EventModule<T>>,
}

impl<T> EventRegistry<T> {
    pub fn new() -> Self {
        Self {
            events: HashMap::new(),
        }
    }

    pub async fn init(loader: &ModuleLoader, catalog: &HandlerCatalog<T>) -> Self {
        let mut registry = Self::new();

        for module in loader.load::<T, EventModule<T>>(catalog).await.modules {
            registry.insert(module);
        }

        registry
    }

    pub fn insert(&mut self, module: EventModule<T>) {
        if let Some(previous) = self.events.insert(module.name.clone(), module) {
            tracing::warn!(event = %previous.name, "event module defined more than once, using the last one");
        }
    }

    pub fn get(&self, name: &str) -> Option<&EventModule<T>> {
        self.events.get(name)
    }

    /// Binds every module to `bus`, in name order.
    pub fn bind(&self, bus: &mut EventBus<T>) {
        for name in self.names() {
            let module = &self.events[name];
            bus.bind(module.event, &module.name, module.func, module.once);

            tracing::info!(
                "[EVENT] bound {} to {:?}{}",
                module.name,
                module.event,
                if module.once { " (once)" } else { "" }
            );
        }
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.events.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<T> Default for EventRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use twilight_gateway::EventType;

    use super::*;

    fn catalog() -> HandlerCatalog<()> {
        HandlerCatalog::<()>::new().event("log", |_ctx| {
            Box::pin(async { Ok::<(), crate::Error>(()) })
        })
    }

    #[tokio::test]
    async fn init_and_bind() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("ready.toml"),
            "name = \"ready\"\nonce = true\nexecute = \"log\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("messages.json"),
            r#"{"name": "message_log", "event": "messageCreate", "execute": "log"}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("unknown.toml"),
            "name = \"bogus\"\nexecute = \"log\"\n",
        )
        .unwrap();

        let registry = EventRegistry::init(&ModuleLoader::new(dir.path()), &catalog()).await;
        assert_eq!(registry.names(), vec!["message_log", "ready"]);
        assert!(registry.get("ready").unwrap().once);

        let mut bus = EventBus::new();
        registry.bind(&mut bus);

        assert_eq!(bus.binding_count(EventType::Ready), 1);
        assert_eq!(bus.binding_count(EventType::MessageCreate), 1);
    }
}
