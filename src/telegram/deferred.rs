//! Deferred two-phase reply protocol: acknowledge now, edit with the real
//! result once the background work finishes.
//!
//! Validation belongs to the calling handler; by the time work reaches this
//! runner the invocation is past its Rejected exit. The runner sends exactly
//! one acknowledgment before any blocking work, then spawns the work as a
//! cancellable task. Success and failure both edit the acknowledgment, so
//! the user is never left on a permanent "thinking" message.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::responder::ChatResponder;
use crate::error::{Error, Result};

pub const FAILURE_TEXT: &str =
    "Something went wrong while preparing your result. Please try again.";
pub const CANCELLED_TEXT: &str =
    "The bot shut down before this finished. Please retry in a moment.";

/// Acknowledge, run `work` in the background, and edit the acknowledgment
/// with the outcome. Returns the handle of the spawned task.
///
/// An error here means the acknowledgment itself could not be sent; no work
/// is started in that case.
pub async fn run_deferred<F>(
    responder: Arc<dyn ChatResponder>,
    ack_text: &str,
    mut shutdown: watch::Receiver<bool>,
    work: F,
) -> Result<JoinHandle<()>>
where
    F: Future<Output = Result<String>> + Send + 'static,
{
    let ack = responder.send(ack_text).await?;

    let handle = tokio::spawn(async move {
        // Held for the task's full life, including the outcome edit.
        let _in_flight = crate::shutdown::task_guard();

        let cancelled = async {
            loop {
                if *shutdown.borrow() {
                    break;
                }
                // A closed channel means the process is tearing down.
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
        };

        let outcome = tokio::select! {
            biased;
            result = work => result,
            _ = cancelled => Err(Error::Cancelled("shutdown requested".to_string())),
        };

        match outcome {
            Ok(text) => {
                if let Err(e) = responder.edit(ack, &text).await {
                    tracing::error!("Failed to edit deferred response: {}", e);
                }
            }
            Err(e) => {
                let visible = match &e {
                    Error::Cancelled(_) => CANCELLED_TEXT,
                    _ => FAILURE_TEXT,
                };
                tracing::error!("Deferred command failed: {}", e);
                if let Err(edit_err) = responder.edit(ack, visible).await {
                    tracing::error!("Failed to edit failure response: {}", edit_err);
                }
            }
        }
    });

    Ok(handle)
}
