use std::{collections::HashMap, fmt, sync::Arc, time::Instant};

use tokio::sync::RwLock;
use twilight_model::id::{marker::UserMarker, Id};

pub type CommandContext = discrafter_framework::CommandContext<Services>;
pub type EventContext = discrafter_framework::EventContext<Services>;
pub type HelperCall = discrafter_framework::handler::helper_handler::HelperCall<Services>;

#[derive(Clone, Debug)]
pub struct Services {
    pub started_at: Instant,
    pub profiles: Arc<RwLock<HashMap<Id<UserMarker>, Theme>>>,
}

impl Services {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            profiles: Arc::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Plain,
    Midnight,
    Forest,
    Ocean,
    Sunset,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Plain,
        Theme::Midnight,
        Theme::Forest,
        Theme::Ocean,
        Theme::Sunset,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Plain => "plain",
            Theme::Midnight => "midnight",
            Theme::Forest => "forest",
            Theme::Ocean => "ocean",
            Theme::Sunset => "sunset",
        }
    }

    pub fn color(self) -> u32 {
        match self {
            Theme::Plain => 0x99AAB5,
            Theme::Midnight => 0x2C2F33,
            Theme::Forest => 0x2ECC71,
            Theme::Ocean => 0x3498DB,
            Theme::Sunset => 0xE67E22,
        }
    }

    pub fn try_from_string(value: &str) -> Result<Self, String> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.name() == value)
            .ok_or_else(|| format!("unknown theme: {}", value))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
