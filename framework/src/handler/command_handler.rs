use std::{future::Future, pin::Pin};

use crate::context::CommandContext;
use crate::Error;

/// Signature shared by a command's primary handler and all of its sub-actions.
pub type CommandFunc<T> =
    fn(CommandContext<T>) -> Pin<Box<dyn Future<Output = Result<(), Error>> + Send>>;
