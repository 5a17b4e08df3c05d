use serde_json::Value;
use twilight_http::{client::InteractionClient, response::marker::EmptyBody};
use twilight_model::{
    application::interaction::{application_command::CommandData, Interaction, InteractionData},
    guild::Guild,
    http::interaction::{InteractionResponse, InteractionResponseType},
};
use twilight_util::builder::InteractionResponseDataBuilder;

use super::Context;
use crate::error::DispatchError;
use crate::{Error, EventMeta};

/// Passed to a command's `execute` handler and to every one of its sub-actions.
#[derive(Clone)]
pub struct CommandContext<T> {
    pub meta: EventMeta,
    pub context: Context<T>,

    pub interaction: Interaction,
}

impl<T: Clone + Send + Sync + 'static> CommandContext<T> {
    pub fn interaction(&self) -> InteractionClient<'_> {
        self.context.interaction()
    }

    /// Set for chat input and autocomplete interactions.
    pub fn command(&self) -> Option<&CommandData> {
        match &self.interaction.data {
            Some(InteractionData::ApplicationCommand(data)) => {
                let data: &CommandData = data;
                Some(data)
            }
            _ => None,
        }
    }

    /// Set for component and modal interactions.
    pub fn custom_id(&self) -> Option<&str> {
        match &self.interaction.data {
            Some(InteractionData::MessageComponent(data)) => Some(data.custom_id.as_str()),
            Some(InteractionData::ModalSubmit(data)) => Some(data.custom_id.as_str()),
            _ => None,
        }
    }

    pub fn is_owner(&self) -> bool {
        self.context
            .owner_id
            .is_some_and(|owner| self.interaction.author_id() == Some(owner))
    }

    pub async fn guild(&self) -> Result<Option<Guild>, Error> {
        let Some(guild_id) = self.interaction.guild_id else {
            return Ok(None);
        };

        Ok(Some(
            self.context.client.guild(guild_id).await?.model().await?,
        ))
    }

    pub async fn response(
        &self,
        response: InteractionResponse,
    ) -> Result<twilight_http::Response<EmptyBody>, twilight_http::Error> {
        self.interaction()
            .create_response(self.interaction.id, &self.interaction.token, &response)
            .await
    }

    pub async fn reply(
        &self,
        message: impl Into<String>,
    ) -> Result<twilight_http::Response<EmptyBody>, twilight_http::Error> {
        let response = InteractionResponseDataBuilder::new()
            .content(message)
            .build();

        self.response(InteractionResponse {
            kind: InteractionResponseType::ChannelMessageWithSource,
            data: Some(response),
        })
        .await
    }

    /// Dispatches a helper with this context's interaction.
    pub async fn dispatch_helper(
        &self,
        name: &str,
        args: Vec<Value>,
    ) -> Result<Value, DispatchError> {
        self.context
            .dispatch_helper(name, Some(self.interaction.clone()), args)
            .await
    }
}
