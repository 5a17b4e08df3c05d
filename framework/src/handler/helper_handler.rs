use std::{fmt, future::Future, pin::Pin, str::FromStr};

use serde_json::Value;
use twilight_model::application::interaction::Interaction;

use crate::context::Context;
use crate::error::DefinitionError;
use crate::Error;

pub type HelperFunc<T> =
    fn(HelperCall<T>) -> Pin<Box<dyn Future<Output = Result<Value, Error>> + Send>>;

/// The argument tuple a helper receives, as produced by [`ArgShape::adapt`].
pub type HelperCall<T> = HelperArgs<Interaction, Context<T>>;

/// Declared argument shape of a helper.
///
/// Helpers are called by name from arbitrary call sites, so the shape is the
/// only thing telling the dispatcher how to order the arguments. The
/// interaction always comes first, the client second, extra arguments last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArgShape {
    Interaction,
    Client,
    Args,
    InteractionClient,
    InteractionArgs,
    ClientArgs,
    All,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HelperArgs<I, C> {
    Interaction(I),
    Client(C),
    Args(Vec<Value>),
    InteractionClient(I, C),
    InteractionArgs(I, Vec<Value>),
    ClientArgs(C, Vec<Value>),
    All(I, C, Vec<Value>),
}

impl ArgShape {
    pub const ALL: [ArgShape; 7] = [
        ArgShape::Interaction,
        ArgShape::Client,
        ArgShape::Args,
        ArgShape::InteractionClient,
        ArgShape::InteractionArgs,
        ArgShape::ClientArgs,
        ArgShape::All,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ArgShape::Interaction => "Interaction",
            ArgShape::Client => "Client",
            ArgShape::Args => "Args",
            ArgShape::InteractionClient => "InteractionClient",
            ArgShape::InteractionArgs => "InteractionArgs",
            ArgShape::ClientArgs => "ClientArgs",
            ArgShape::All => "All",
        }
    }

    pub fn needs_interaction(self) -> bool {
        matches!(
            self,
            ArgShape::Interaction
                | ArgShape::InteractionClient
                | ArgShape::InteractionArgs
                | ArgShape::All
        )
    }

    /// Builds the argument tuple for this shape.
    ///
    /// Returns `None` if the shape takes an interaction and none was given.
    pub fn adapt<I, C>(
        self,
        interaction: Option<I>,
        client: C,
        args: Vec<Value>,
    ) -> Option<HelperArgs<I, C>> {
        Some(match self {
            ArgShape::Interaction => HelperArgs::Interaction(interaction?),
            ArgShape::Client => HelperArgs::Client(client),
            ArgShape::Args => HelperArgs::Args(args),
            ArgShape::InteractionClient => HelperArgs::InteractionClient(interaction?, client),
            ArgShape::InteractionArgs => HelperArgs::InteractionArgs(interaction?, args),
            ArgShape::ClientArgs => HelperArgs::ClientArgs(client, args),
            ArgShape::All => HelperArgs::All(interaction?, client, args),
        })
    }
}

impl FromStr for ArgShape {
    type Err = DefinitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArgShape::ALL
            .into_iter()
            .find(|shape| shape.name() == s)
            .ok_or_else(|| DefinitionError::UnknownShape(s.to_string()))
    }
}

impl fmt::Display for ArgShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<I, C> HelperArgs<I, C> {
    pub fn shape(&self) -> ArgShape {
        match self {
            HelperArgs::Interaction(_) => ArgShape::Interaction,
            HelperArgs::Client(_) => ArgShape::Client,
            HelperArgs::Args(_) => ArgShape::Args,
            HelperArgs::InteractionClient(..) => ArgShape::InteractionClient,
            HelperArgs::InteractionArgs(..) => ArgShape::InteractionArgs,
            HelperArgs::ClientArgs(..) => ArgShape::ClientArgs,
            HelperArgs::All(..) => ArgShape::All,
        }
    }

    pub fn interaction(&self) -> Option<&I> {
        match self {
            HelperArgs::Interaction(i)
            | HelperArgs::InteractionClient(i, _)
            | HelperArgs::InteractionArgs(i, _)
            | HelperArgs::All(i, _, _) => Some(i),
            _ => None,
        }
    }

    pub fn client(&self) -> Option<&C> {
        match self {
            HelperArgs::Client(c)
            | HelperArgs::InteractionClient(_, c)
            | HelperArgs::ClientArgs(c, _)
            | HelperArgs::All(_, c, _) => Some(c),
            _ => None,
        }
    }

    pub fn args(&self) -> &[Value] {
        match self {
            HelperArgs::Args(args)
            | HelperArgs::InteractionArgs(_, args)
            | HelperArgs::ClientArgs(_, args)
            | HelperArgs::All(_, _, args) => args,
            _ => &[],
        }
    }
}
