use twilight_model::id::{marker::GuildMarker, Id};

/// Where commands get registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Only the development guild.
    Development(Id<GuildMarker>),
    Global,
    Guilds(Vec<Id<GuildMarker>>),
}

#[derive(Clone, Debug, Default)]
pub struct ScopeSettings {
    pub development_mode: bool,
    pub development_guild_id: Option<Id<GuildMarker>>,
    pub global_register: bool,
    pub guild_allowlist: Vec<Id<GuildMarker>>,
}

impl ScopeSettings {
    /// Picks exactly one registration scope. Development mode always wins so
    /// test commands never reach other guilds.
    ///
    /// Returns `None` when nothing is configured.
    pub fn resolve(&self) -> Option<Scope> {
        if self.development_mode {
            if let Some(guild_id) = self.development_guild_id {
                return Some(Scope::Development(guild_id));
            }
            tracing::warn!("development mode is on but no development guild is set");
        }

        if self.global_register {
            return Some(Scope::Global);
        }

        if !self.guild_allowlist.is_empty() {
            return Some(Scope::Guilds(self.guild_allowlist.clone()));
        }

        None
    }
}
