use std::{future::Future, panic::AssertUnwindSafe};

use futures::FutureExt as _;

use crate::error::DispatchError;
use crate::Error;

pub mod command_handler;
pub mod event_handler;
pub mod helper_handler;

/// Runs a handler future, turning both its error and a panic into a
/// [`DispatchError`] tagged with `name`.
pub(crate) async fn run_guarded<F, R>(name: &str, fut: F) -> Result<R, DispatchError>
where
    F: Future<Output = Result<R, Error>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => Err(DispatchError::Failed {
            name: name.to_string(),
            source,
        }),
        Err(_) => Err(DispatchError::Panicked(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn guarded_success_and_failure() {
        assert_eq!(run_guarded("ok", async { Ok(1) }).await.unwrap(), 1);

        let err = run_guarded::<_, ()>("broken", async { Err("nope".into()) })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "broken failed: nope");
    }

    #[tokio::test]
    async fn guarded_panic() {
        let err = run_guarded::<_, ()>("boom", async { panic!("boom") })
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Panicked(name) if name == "boom"));
    }
}
