use std::collections::HashMap;

use crate::handler::{
    command_handler::CommandFunc, event_handler::EventFunc, helper_handler::HelperFunc,
};

/// Handler functions known to the binary, keyed by the symbol name module
/// manifests refer to in their `execute` and `actions` fields.
pub struct HandlerCatalog<T> {
    commands: HashMap<String, CommandFunc<T>>,
    events: HashMap<String, EventFunc<T>>,
    helpers: HashMap<String, HelperFunc<T>>,
}

impl<T> HandlerCatalog<T> {
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
            events: HashMap::new(),
            helpers: HashMap::new(),
        }
    }

    /// Registers a command handler or sub-action.
    pub fn command(mut self, symbol: &str, func: CommandFunc<T>) -> Self {
        self.commands.insert(symbol.to_string(), func);
        self
    }

    pub fn event(mut self, symbol: &str, func: EventFunc<T>) -> Self {
        self.events.insert(symbol.to_string(), func);
        self
    }

    pub fn helper(mut self, symbol: &str, func: HelperFunc<T>) -> Self {
        self.helpers.insert(symbol.to_string(), func);
        self
    }

    pub fn command_func(&self, symbol: &str) -> Option<CommandFunc<T>> {
        self.commands.get(symbol).copied()
    }

    pub fn event_func(&self, symbol: &str) -> Option<EventFunc<T>> {
        self.events.get(symbol).copied()
    }

    pub fn helper_func(&self, symbol: &str) -> Option<HelperFunc<T>> {
        self.helpers.get(symbol).copied()
    }
}

impl<T> Default for HandlerCatalog<T> {
    fn default() -> Self {
        Self::new()
    }
}
