use twilight_gateway::Event;

use super::Context;
use crate::EventMeta;

#[derive(Clone)]
pub struct EventContext<T> {
    pub meta: EventMeta,
    pub context: Context<T>,

    pub event: Event,
}
