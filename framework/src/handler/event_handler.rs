use std::{future::Future, pin::Pin};

use crate::context::EventContext;
use crate::Error;

pub type EventFunc<T> =
    fn(EventContext<T>) -> Pin<Box<dyn Future<Output = Result<(), Error>> + Send>>;
