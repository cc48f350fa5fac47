//! Handle for talking to a running controller task.

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::state::PresentationState;
use crate::selection::SelectionIntent;

/// Errors returned by [`ControllerHandle`].
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The controller task is no longer receiving intents
    #[error("Controller has stopped")]
    Stopped,

    /// The controller task panicked or was aborted
    #[error("Controller task failed: {0}")]
    TaskFailed(String),
}

/// Presentation-side end of a controller session.
///
/// Intents go in through `intents`; every published [`PresentationState`]
/// comes out through `state`.
pub struct ControllerHandle {
    pub intents: mpsc::Sender<SelectionIntent>,
    pub state: watch::Receiver<PresentationState>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ControllerHandle {
    pub(super) fn new(
        intents: mpsc::Sender<SelectionIntent>,
        state: watch::Receiver<PresentationState>,
        cancel: CancellationToken,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            intents,
            state,
            cancel,
            task,
        }
    }

    /// Queue an intent for the controller.
    pub async fn send(&self, intent: SelectionIntent) -> Result<(), ControllerError> {
        self.intents
            .send(intent)
            .await
            .map_err(|_| ControllerError::Stopped)
    }

    /// The most recently published state.
    pub fn current(&self) -> PresentationState {
        self.state.borrow().clone()
    }

    /// A fresh receiver for published states.
    pub fn subscribe(&self) -> watch::Receiver<PresentationState> {
        self.state.clone()
    }

    /// Token that stops the controller when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the controller and wait for its task to exit.
    ///
    /// In-flight fetches are dropped with the task.
    pub async fn shutdown(self) -> Result<(), ControllerError> {
        self.cancel.cancel();
        self.task.await.map_err(|e| {
            tracing::warn!(error = %e, "Controller task did not exit cleanly");
            ControllerError::TaskFailed(e.to_string())
        })
    }
}
