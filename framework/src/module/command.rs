use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use serde::Deserialize;
use twilight_model::application::command::Command;

use super::{schema::CommandSchema, ModuleKind, Origin};
use crate::catalog::HandlerCatalog;
use crate::error::DefinitionError;
use crate::handler::command_handler::CommandFunc;

/// Delimiter between command and action name in component custom ids.
pub const ACTION_DELIMITER: char = '-';

/// Sub-action invoked for autocomplete interactions.
pub const AUTOCOMPLETE_ACTION: &str = "autocomplete";

pub struct CommandModule<T> {
    pub definition: Command,
    pub func: CommandFunc<T>,
    pub actions: HashMap<String, CommandFunc<T>>,
    pub origin: Origin,
}

impl<T> CommandModule<T> {
    pub fn builder(definition: Command, func: CommandFunc<T>) -> CommandModuleBuilder<T> {
        CommandModuleBuilder {
            definition,
            func,
            actions: HashMap::new(),
            origin: Origin::Manual,
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn action(&self, name: &str) -> Option<CommandFunc<T>> {
        self.actions.get(name).copied()
    }

    pub fn action_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

pub struct CommandModuleBuilder<T> {
    definition: Command,
    func: CommandFunc<T>,
    actions: HashMap<String, CommandFunc<T>>,
    origin: Origin,
}

impl<T> CommandModuleBuilder<T> {
    pub fn action(mut self, name: &str, func: CommandFunc<T>) -> Self {
        self.actions.insert(name.to_string(), func);
        self
    }

    pub fn origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn build(self) -> Result<CommandModule<T>, DefinitionError> {
        if self.definition.name.is_empty() {
            return Err(DefinitionError::EmptyName);
        }
        if self.actions.keys().any(String::is_empty) {
            return Err(DefinitionError::EmptyAction);
        }

        let has_component_actions = self
            .actions
            .keys()
            .any(|action| action != AUTOCOMPLETE_ACTION);
        if has_component_actions && self.definition.name.contains(ACTION_DELIMITER) {
            tracing::warn!(
                command = %self.definition.name,
                "command name contains '{}', its actions can't be reached from components",
                ACTION_DELIMITER
            );
        }
        for action in self.actions.keys().filter(|a| a.contains(ACTION_DELIMITER)) {
            tracing::warn!(
                command = %self.definition.name,
                action = %action,
                "action name contains '{}', it can't be reached from components",
                ACTION_DELIMITER
            );
        }

        Ok(CommandModule {
            definition: self.definition,
            func: self.func,
            actions: self.actions,
            origin: self.origin,
        })
    }
}

#[derive(Deserialize, Debug)]
pub struct CommandManifest {
    #[serde(flatten)]
    pub definition: CommandSchema,
    pub execute: String,
    #[serde(default)]
    pub actions: BTreeMap<String, String>,
}

fn resolve<T>(catalog: &HandlerCatalog<T>, symbol: &str) -> Result<CommandFunc<T>, DefinitionError> {
    catalog
        .command_func(symbol)
        .ok_or_else(|| DefinitionError::UnknownHandler {
            kind: "command",
            symbol: symbol.to_string(),
        })
}

impl<T> ModuleKind<T> for CommandModule<T> {
    const KIND: &'static str = "command";

    type Manifest = CommandManifest;

    fn from_manifest(
        manifest: CommandManifest,
        catalog: &HandlerCatalog<T>,
        path: &Path,
    ) -> Result<Self, DefinitionError> {
        let definition = manifest.definition.build()?;
        let mut builder = CommandModule::builder(definition, resolve(catalog, &manifest.execute)?)
            .origin(Origin::File(path.to_path_buf()));

        for (action, symbol) in &manifest.actions {
            builder = builder.action(action, resolve(catalog, symbol)?);
        }

        builder.build()
    }

    fn name(&self) -> &str {
        CommandModule::name(self)
    }
}

#[cfg(test)]
mod tests {
    use twilight_model::application::command::CommandType;
    use twilight_util::builder::command::CommandBuilder;

    use super::*;
    use crate::{handler_func, CommandContext, Error};

    async fn noop(_ctx: CommandContext<()>) -> Result<(), Error> {
        Ok(())
    }

    fn catalog() -> HandlerCatalog<()> {
        HandlerCatalog::<()>::new()
            .command("profile", handler_func!(noop))
            .command("profile_edit", handler_func!(noop))
    }

    fn manifest(toml: &str) -> CommandManifest {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn builder_rejects_empty_name() {
        let definition = CommandBuilder::new("", "nameless", CommandType::ChatInput).build();

        assert!(matches!(
            CommandModule::<()>::builder(definition, handler_func!(noop)).build(),
            Err(DefinitionError::EmptyName)
        ));
    }

    #[test]
    fn builder_rejects_empty_action() {
        let definition = CommandBuilder::new("ping", "Ping", CommandType::ChatInput).build();

        assert!(matches!(
            CommandModule::<()>::builder(definition, handler_func!(noop))
                .action("", handler_func!(noop))
                .build(),
            Err(DefinitionError::EmptyAction)
        ));
    }

    #[test]
    fn from_manifest_resolves_actions() {
        let module = CommandModule::from_manifest(
            manifest(
                r#"
                name = "profile"
                description = "Show a profile"
                execute = "profile"

                [actions]
                edit = "profile_edit"
                "#,
            ),
            &catalog(),
            Path::new("commands/profile.toml"),
        )
        .unwrap();

        assert_eq!(module.name(), "profile");
        assert_eq!(module.action_names(), vec!["edit"]);
        assert!(module.action("delete").is_none());
        assert_eq!(
            module.origin,
            Origin::File("commands/profile.toml".into())
        );
    }

    #[test]
    fn from_manifest_unknown_symbol() {
        let result = CommandModule::from_manifest(
            manifest(
                r#"
                name = "profile"
                description = "Show a profile"
                execute = "profile"

                [actions]
                edit = "missing"
                "#,
            ),
            &catalog(),
            Path::new("profile.toml"),
        );

        assert!(matches!(
            result,
            Err(DefinitionError::UnknownHandler { symbol, .. }) if symbol == "missing"
        ));
    }
}
