use discrafter_framework::{handler_func, HandlerCatalog};

use crate::context::Services;

pub(crate) mod guilds;
pub(crate) mod helpers;
pub(crate) mod ping;
pub(crate) mod profile;

/// Every handler the manifests under `modules/` can refer to.
pub(crate) fn catalog() -> HandlerCatalog<Services> {
    HandlerCatalog::<Services>::new()
        // commands
        .command("ping", handler_func!(ping::ping))
        .command("profile", handler_func!(profile::profile))
        .command("profile_theme", handler_func!(profile::select_theme))
        .command("profile_autocomplete", handler_func!(profile::autocomplete_theme))
        // events
        .event("guild_joined", handler_func!(guilds::joined))
        .event("guild_left", handler_func!(guilds::left))
        // helpers
        .helper("uptime", handler_func!(helpers::uptime))
        .helper("greeting", handler_func!(helpers::greeting))
}
