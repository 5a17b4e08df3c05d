//! Declarative command schema as written in command manifests.
//!
//! A [`CommandSchema`] is turned into the platform's [`Command`] with the
//! twilight builders, which also validate names, descriptions and options.

use serde::Deserialize;
use twilight_model::{
    application::{
        command::{Command, CommandOption, CommandType},
        interaction::InteractionContextType,
    },
    guild::Permissions,
};
use twilight_util::builder::command::{
    AttachmentBuilder, BooleanBuilder, ChannelBuilder, CommandBuilder, IntegerBuilder,
    MentionableBuilder, NumberBuilder, RoleBuilder, StringBuilder, UserBuilder,
};

use crate::error::DefinitionError;

#[derive(Deserialize, Debug, Clone)]
pub struct CommandSchema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: CommandKind,
    #[serde(default)]
    pub options: Vec<OptionSchema>,
    /// Whether the command can be used in DMs with the bot, guilds are
    /// always allowed.
    pub dm_permission: Option<bool>,
    /// Raw permission bits.
    pub default_member_permissions: Option<u64>,
    #[serde(default)]
    pub nsfw: bool,
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    #[default]
    ChatInput,
    User,
    Message,
}

#[derive(Deserialize, Debug, Clone)]
pub struct OptionSchema {
    pub name: String,
    pub description: String,
    pub kind: OptionKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub autocomplete: bool,
    #[serde(default)]
    pub choices: Vec<ChoiceSchema>,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    String,
    Integer,
    Number,
    Boolean,
    User,
    Channel,
    Role,
    Mentionable,
    Attachment,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChoiceSchema {
    pub name: String,
    pub value: String,
}

impl From<CommandKind> for CommandType {
    fn from(kind: CommandKind) -> Self {
        match kind {
            CommandKind::ChatInput => CommandType::ChatInput,
            CommandKind::User => CommandType::User,
            CommandKind::Message => CommandType::Message,
        }
    }
}

impl CommandSchema {
    pub fn build(&self) -> Result<Command, DefinitionError> {
        if self.name.is_empty() {
            return Err(DefinitionError::EmptyName);
        }

        let mut builder =
            CommandBuilder::new(&self.name, &self.description, self.kind.into()).nsfw(self.nsfw);

        if let Some(dm_permission) = self.dm_permission {
            builder = builder.contexts(contexts(dm_permission));
        }
        if let Some(bits) = self.default_member_permissions {
            let permissions = Permissions::from_bits(bits).ok_or_else(|| {
                DefinitionError::InvalidCommand(format!("unknown permission bits in {}", bits))
            })?;
            builder = builder.default_member_permissions(permissions);
        }
        for option in &self.options {
            builder = builder.option(option.build());
        }

        builder
            .validate()
            .map(CommandBuilder::build)
            .map_err(|err| DefinitionError::InvalidCommand(err.to_string()))
    }
}

fn contexts(dm_permission: bool) -> Vec<InteractionContextType> {
    if dm_permission {
        vec![InteractionContextType::Guild, InteractionContextType::BotDm]
    } else {
        vec![InteractionContextType::Guild]
    }
}

impl OptionSchema {
    pub fn build(&self) -> CommandOption {
        let (name, description) = (self.name.as_str(), self.description.as_str());

        match self.kind {
            OptionKind::String => {
                let mut builder = StringBuilder::new(name, description)
                    .required(self.required)
                    .autocomplete(self.autocomplete);
                if !self.choices.is_empty() {
                    builder = builder.choices(
                        self.choices
                            .iter()
                            .map(|choice| (choice.name.clone(), choice.value.clone())),
                    );
                }
                builder.build()
            }
            OptionKind::Integer => {
                let mut builder = IntegerBuilder::new(name, description)
                    .required(self.required)
                    .autocomplete(self.autocomplete);
                if let Some(min) = self.min_value {
                    builder = builder.min_value(min);
                }
                if let Some(max) = self.max_value {
                    builder = builder.max_value(max);
                }
                builder.build()
            }
            OptionKind::Number => NumberBuilder::new(name, description)
                .required(self.required)
                .autocomplete(self.autocomplete)
                .build(),
            OptionKind::Boolean => BooleanBuilder::new(name, description)
                .required(self.required)
                .build(),
            OptionKind::User => UserBuilder::new(name, description)
                .required(self.required)
                .build(),
            OptionKind::Channel => ChannelBuilder::new(name, description)
                .required(self.required)
                .build(),
            OptionKind::Role => RoleBuilder::new(name, description)
                .required(self.required)
                .build(),
            OptionKind::Mentionable => MentionableBuilder::new(name, description)
                .required(self.required)
                .build(),
            OptionKind::Attachment => AttachmentBuilder::new(name, description)
                .required(self.required)
                .build(),
        }
    }
}
