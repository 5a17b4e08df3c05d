use std::sync::Arc;

use async_trait::async_trait;
use twilight_http::Client;
use twilight_model::{
    application::command::Command,
    id::{
        marker::{ApplicationMarker, GuildMarker},
        Id,
    },
};

use crate::Error;

/// The platform's command registration endpoints. Every `set_*` call is a
/// bulk overwrite of the target's command set.
#[async_trait]
pub trait CommandApi: Send + Sync {
    async fn set_global_commands(&self, commands: &[Command]) -> Result<Vec<Command>, Error>;

    async fn set_guild_commands(
        &self,
        guild_id: Id<GuildMarker>,
        commands: &[Command],
    ) -> Result<Vec<Command>, Error>;

    async fn global_commands(&self) -> Result<Vec<Command>, Error>;

    async fn guild_commands(&self, guild_id: Id<GuildMarker>) -> Result<Vec<Command>, Error>;
}

pub struct HttpCommandApi {
    client: Arc<Client>,
    application_id: Id<ApplicationMarker>,
}

impl HttpCommandApi {
    pub fn new(client: Arc<Client>, application_id: Id<ApplicationMarker>) -> Self {
        Self {
            client,
            application_id,
        }
    }
}

#[async_trait]
impl CommandApi for HttpCommandApi {
    async fn set_global_commands(&self, commands: &[Command]) -> Result<Vec<Command>, Error> {
        Ok(self
            .client
            .interaction(self.application_id)
            .set_global_commands(commands)
            .await?
            .model()
            .await?)
    }

    async fn set_guild_commands(
        &self,
        guild_id: Id<GuildMarker>,
        commands: &[Command],
    ) -> Result<Vec<Command>, Error> {
        Ok(self
            .client
            .interaction(self.application_id)
            .set_guild_commands(guild_id, commands)
            .await?
            .model()
            .await?)
    }

    async fn global_commands(&self) -> Result<Vec<Command>, Error> {
        Ok(self
            .client
            .interaction(self.application_id)
            .global_commands()
            .await?
            .model()
            .await?)
    }

    async fn guild_commands(&self, guild_id: Id<GuildMarker>) -> Result<Vec<Command>, Error> {
        Ok(self
            .client
            .interaction(self.application_id)
            .guild_commands(guild_id)
            .await?
            .model()
            .await?)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{collections::HashSet, sync::Mutex};

    use super::*;
    use crate::registry::command::Target;

    /// Records every call, fails for the configured guilds.
    #[derive(Default)]
    pub(crate) struct RecordingApi {
        pub failing: HashSet<Id<GuildMarker>>,
        pub calls: Mutex<Vec<(Target, Vec<String>)>>,
    }

    impl RecordingApi {
        pub(crate) fn failing(guilds: impl IntoIterator<Item = Id<GuildMarker>>) -> Self {
            Self {
                failing: guilds.into_iter().collect(),
                calls: Mutex::default(),
            }
        }

        pub(crate) fn calls(&self) -> Vec<(Target, Vec<String>)> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, target: Target, commands: &[Command]) {
            self.calls.lock().unwrap().push((
                target,
                commands.iter().map(|cmd| cmd.name.clone()).collect(),
            ));
        }
    }

    #[async_trait]
    impl CommandApi for RecordingApi {
        async fn set_global_commands(&self, commands: &[Command]) -> Result<Vec<Command>, Error> {
            self.record(Target::Global, commands);
            Ok(commands.to_vec())
        }

        async fn set_guild_commands(
            &self,
            guild_id: Id<GuildMarker>,
            commands: &[Command],
        ) -> Result<Vec<Command>, Error> {
            self.record(Target::Guild(guild_id), commands);
            if self.failing.contains(&guild_id) {
                return Err(format!("missing access to guild {}", guild_id).into());
            }
            Ok(commands.to_vec())
        }

        async fn global_commands(&self) -> Result<Vec<Command>, Error> {
            Ok(Vec::new())
        }

        async fn guild_commands(&self, _guild_id: Id<GuildMarker>) -> Result<Vec<Command>, Error> {
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_api_builds_without_connecting() {
        let client = Arc::new(Client::new("token".to_string()));
        let api: Arc<dyn CommandApi> = Arc::new(HttpCommandApi::new(client, Id::new(1)));

        assert_eq!(Arc::strong_count(&api), 1);
    }
}
