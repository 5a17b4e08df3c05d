use std::{net::SocketAddr, path::PathBuf};

use serde::{Deserialize, Serialize};
use serde_envfile::Error;
use twilight_model::id::Id;

use discrafter_framework::{CollisionPolicy, ConfigError, FrameworkConfig, ScopeSettings};

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Config {
    pub discord_token: String,

    #[serde(default)]
    pub development_mode: bool,
    pub development_guild_id: Option<String>,
    #[serde(default)]
    pub global_register: bool,
    /// Comma separated guild ids.
    pub guild_allowlist: Option<String>,

    pub owner_id: Option<String>,
    #[serde(default)]
    pub reload_command: bool,
    /// `discovered_wins` or `manual_wins`.
    pub collision_policy: Option<CollisionPolicy>,
    pub use_default_interaction_handler: Option<bool>,

    pub commands_dir: Option<PathBuf>,
    pub events_dir: Option<PathBuf>,
    pub helpers_dir: Option<PathBuf>,

    pub metrics_listen: Option<SocketAddr>,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        serde_envfile::from_env()
    }

    pub fn framework_config(&self) -> Result<FrameworkConfig, ConfigError> {
        let defaults = FrameworkConfig::default();

        let guild_allowlist = match &self.guild_allowlist {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| parse_id("guild_allowlist", id))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(FrameworkConfig {
            commands_dir: self.commands_dir.clone().unwrap_or(defaults.commands_dir),
            events_dir: self.events_dir.clone().unwrap_or(defaults.events_dir),
            helpers_dir: self.helpers_dir.clone().unwrap_or(defaults.helpers_dir),
            extensions: defaults.extensions,

            scope: ScopeSettings {
                development_mode: self.development_mode,
                development_guild_id: self
                    .development_guild_id
                    .as_deref()
                    .map(|id| parse_id("development_guild_id", id))
                    .transpose()?,
                global_register: self.global_register,
                guild_allowlist,
            },
            collision_policy: self.collision_policy.unwrap_or_default(),
            use_default_interaction_handler: self
                .use_default_interaction_handler
                .unwrap_or(defaults.use_default_interaction_handler),
            reload_command: self.reload_command,
            owner_id: self
                .owner_id
                .as_deref()
                .map(|id| parse_id("owner_id", id))
                .transpose()?,
        })
    }
}

/// Parses a non-zero snowflake.
fn parse_id<M>(field: &'static str, value: &str) -> Result<Id<M>, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(Id::new_checked)
        .ok_or_else(|| ConfigError::InvalidId {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use discrafter_framework::Scope;

    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default().framework_config().unwrap();

        assert!(config.use_default_interaction_handler);
        assert!(!config.reload_command);
        assert_eq!(config.commands_dir, PathBuf::from("./modules/commands"));
        assert_eq!(config.collision_policy, CollisionPolicy::DiscoveredWins);
        assert_eq!(config.scope.resolve(), None);
    }

    #[test]
    fn allowlist_is_split() {
        let config = Config {
            guild_allowlist: Some("1, 2,,3".into()),
            ..Default::default()
        }
        .framework_config()
        .unwrap();

        assert_eq!(
            config.scope.resolve(),
            Some(Scope::Guilds(vec![Id::new(1), Id::new(2), Id::new(3)]))
        );
    }

    #[test]
    fn development_scope() {
        let config = Config {
            development_mode: true,
            development_guild_id: Some("42".into()),
            global_register: true,
            guild_allowlist: Some("1".into()),
            ..Default::default()
        }
        .framework_config()
        .unwrap();

        assert_eq!(config.scope.resolve(), Some(Scope::Development(Id::new(42))));
    }

    #[test]
    fn invalid_values() {
        let result = Config {
            owner_id: Some("0".into()),
            ..Default::default()
        }
        .framework_config();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidId { field: "owner_id", .. })
        ));

        let result = Config {
            guild_allowlist: Some("1,abc".into()),
            ..Default::default()
        }
        .framework_config();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidId { field: "guild_allowlist", .. })
        ));
    }

    #[test]
    fn collision_policy_from_env() {
        let config: Config = serde_envfile::from_str(
            "DISCORD_TOKEN=token\nCOLLISION_POLICY=manual_wins\nOWNER_ID=7\n",
        )
        .unwrap();
        assert_eq!(config.collision_policy, Some(CollisionPolicy::ManualWins));

        let framework = config.framework_config().unwrap();
        assert_eq!(framework.collision_policy, CollisionPolicy::ManualWins);
        assert_eq!(framework.owner_id, Some(Id::new(7)));

        let result = serde_envfile::from_str::<Config>(
            "DISCORD_TOKEN=token\nCOLLISION_POLICY=newest_wins\n",
        );
        assert!(result.is_err());
    }
}
