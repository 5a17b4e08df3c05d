use std::collections::HashMap;

use twilight_gateway::{Event, EventType};

use crate::context::{Context, EventContext};
use crate::error::DispatchError;
use crate::handler::{event_handler::EventFunc, run_guarded};
use crate::EventMeta;

pub struct Binding<T> {
    pub name: String,
    pub func: EventFunc<T>,
    pub once: bool,
}

/// In-process event bus, every gateway event is emitted on it.
pub struct EventBus<T> {
    bindings: HashMap<EventType, Vec<Binding<T>>>,
}

impl<T> EventBus<T> {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn bind(&mut self, event: EventType, name: &str, func: EventFunc<T>, once: bool) {
        tracing::debug!(binding = name, ?event, once, "binding event handler");

        self.bindings.entry(event).or_default().push(Binding {
            name: name.to_string(),
            func,
            once,
        });
    }

    pub fn binding_count(&self, event: EventType) -> usize {
        self.bindings.get(&event).map_or(0, Vec::len)
    }

    /// Takes the bindings to run for `event`, dropping one-shot bindings
    /// from the bus.
    fn take(&mut self, event: EventType) -> Vec<Binding<T>> {
        let Some(bindings) = self.bindings.get_mut(&event) else {
            return Vec::new();
        };

        let snapshot: Vec<Binding<T>> = bindings
            .iter()
            .map(|binding| Binding {
                name: binding.name.clone(),
                func: binding.func,
                once: binding.once,
            })
            .collect();
        bindings.retain(|binding| !binding.once);

        snapshot
    }
}

impl<T: Clone + Send + Sync + 'static> EventBus<T> {
    /// Runs every binding for the event in bind order. Failures are logged
    /// and returned, they never stop the remaining bindings.
    pub async fn emit(
        &mut self,
        meta: EventMeta,
        context: &Context<T>,
        event: Event,
    ) -> Vec<DispatchError> {
        let kind = event.kind();
        crate::metrics::track_event(kind);

        let bindings = self.take(kind);
        if bindings.is_empty() {
            tracing::trace!(event = ?kind, "no bindings");
            return Vec::new();
        }

        tracing::debug!(
            event = ?kind,
            uuid = ?meta.uuid,
            shard = meta.shard,
            "running {} event bindings",
            bindings.len()
        );

        let mut errors = Vec::new();
        for binding in bindings {
            let ctx = EventContext {
                meta: meta.clone(),
                context: context.clone(),
                event: event.clone(),
            };

            if let Err(err) = run_guarded(&binding.name, (binding.func)(ctx)).await {
                tracing::warn!(event = ?kind, "error running event handler: {}", err);
                errors.push(err);
            }
        }

        errors
    }
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}
