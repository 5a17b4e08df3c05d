use serde_json::{json, Value};
use twilight_model::{
    application::{
        command::{CommandOptionChoice, CommandOptionChoiceValue},
        interaction::{application_command::CommandOptionValue, InteractionData},
    },
    channel::message::{
        component::{ActionRow, SelectMenu, SelectMenuOption, SelectMenuType},
        Component, Embed,
    },
    http::interaction::{InteractionResponse, InteractionResponseType},
    user::User,
};
use twilight_util::builder::{embed::EmbedBuilder, InteractionResponseDataBuilder};

use discrafter_framework::Error;

use crate::context::{CommandContext, Theme};

/// Custom id of the theme menu, routed to the `theme` action of `/profile`.
const THEME_MENU_ID: &str = "profile-theme";

fn theme_menu(current: Theme) -> Component {
    ActionRow {
        components: vec![SelectMenu {
            custom_id: THEME_MENU_ID.into(),
            kind: SelectMenuType::Text,
            options: Some(
                Theme::ALL
                    .into_iter()
                    .map(|theme| SelectMenuOption {
                        default: theme == current,
                        description: None,
                        emoji: None,
                        value: theme.name().into(),
                        label: theme.name().into(),
                    })
                    .collect(),
            ),
            placeholder: Some("Theme".into()),

            // defaults
            disabled: false,
            max_values: None,
            min_values: None,
            default_values: None,
            channel_types: None,
        }
        .into()],
    }
    .into()
}

fn profile_embed(user: &User, greeting: &str, theme: Theme) -> Embed {
    EmbedBuilder::new()
        .title(format!("{}'s profile", user.name))
        .description(format!("{}! Your theme is **{}**.", greeting, theme))
        .color(theme.color())
        .build()
}

fn string_option(ctx: &CommandContext, name: &str) -> Option<String> {
    ctx.command()?
        .options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| match &option.value {
            CommandOptionValue::String(value) => Some(value.clone()),
            _ => None,
        })
}

/// `/profile [theme]`, shows the caller's profile and optionally sets the theme.
pub(crate) async fn profile(ctx: CommandContext) -> Result<(), Error> {
    let user = ctx.interaction.author().ok_or("interaction without author")?.clone();

    let theme = match string_option(&ctx, "theme") {
        Some(name) => {
            let theme = Theme::try_from_string(&name)?;
            ctx.context
                .services
                .profiles
                .write()
                .await
                .insert(user.id, theme);
            theme
        }
        None => ctx
            .context
            .services
            .profiles
            .read()
            .await
            .get(&user.id)
            .copied()
            .unwrap_or_default(),
    };

    let greeting = match ctx.dispatch_helper("greeting", vec![json!("Welcome back")]).await {
        Ok(Value::String(greeting)) => greeting,
        _ => "Welcome back".to_string(),
    };

    ctx.response(InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(
            InteractionResponseDataBuilder::new()
                .embeds([profile_embed(&user, &greeting, theme)])
                .components([theme_menu(theme)])
                .build(),
        ),
    })
    .await?;

    Ok(())
}

/// `profile-theme` select menu.
pub(crate) async fn select_theme(ctx: CommandContext) -> Result<(), Error> {
    let Some(InteractionData::MessageComponent(data)) = &ctx.interaction.data else {
        return Err("theme selection without component data".into());
    };
    let Some(selected) = data.values.first() else {
        return Err("couldn't get selected value".into());
    };
    let theme = Theme::try_from_string(selected)?;

    let user = ctx.interaction.author().ok_or("interaction without author")?.clone();
    ctx.context
        .services
        .profiles
        .write()
        .await
        .insert(user.id, theme);
    tracing::debug!(user = %user.id, %theme, "theme updated");

    ctx.response(InteractionResponse {
        kind: InteractionResponseType::UpdateMessage,
        data: Some(
            InteractionResponseDataBuilder::new()
                .embeds([profile_embed(&user, "Updated", theme)])
                .components([theme_menu(theme)])
                .build(),
        ),
    })
    .await?;

    Ok(())
}

/// Suggests themes starting with what's been typed so far.
pub(crate) async fn autocomplete_theme(ctx: CommandContext) -> Result<(), Error> {
    let typed = ctx
        .command()
        .and_then(|command| {
            command.options.iter().find_map(|option| match &option.value {
                CommandOptionValue::Focused(value, _) => Some(value.to_lowercase()),
                _ => None,
            })
        })
        .unwrap_or_default();

    let choices = matching_themes(&typed)
        .into_iter()
        .map(|theme| CommandOptionChoice {
            name: theme.name().into(),
            name_localizations: None,
            value: CommandOptionChoiceValue::String(theme.name().into()),
        });

    ctx.response(InteractionResponse {
        kind: InteractionResponseType::ApplicationCommandAutocompleteResult,
        data: Some(InteractionResponseDataBuilder::new().choices(choices).build()),
    })
    .await?;

    Ok(())
}

fn matching_themes(typed: &str) -> Vec<Theme> {
    Theme::ALL
        .into_iter()
        .filter(|theme| theme.name().starts_with(typed))
        .collect()
}
