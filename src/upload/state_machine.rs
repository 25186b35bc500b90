use crate::upload::error::{UploadError, UploadResult};
use crate::upload::types::{UploadEvent, UploadState};
use tokio::sync::watch;

/// Single-slot upload lifecycle.
///
/// Checking and applying a transition happen under one lock, so two concurrent
/// `Start` events can never both leave the machine `Transferring`.
pub struct UploadStateMachine {
    state: watch::Sender<UploadState>,
}

impl Default for UploadStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadStateMachine {
    pub fn new() -> Self {
        let (state, _) = watch::channel(UploadState::Idle);
        Self { state }
    }

    /// Get current state
    pub fn current_state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    /// Transition state based on event
    pub fn transition(&self, event: UploadEvent) -> UploadResult<UploadState> {
        let mut outcome = Err(UploadError::InvalidStateTransition(String::new()));

        self.state.send_if_modified(|state| match next_state(state, &event) {
            Ok(new_state) => {
                let changed = *state != new_state;
                *state = new_state.clone();
                outcome = Ok(new_state);
                changed
            }
            Err(e) => {
                outcome = Err(e);
                false
            }
        });

        if let Ok(state) = &outcome {
            tracing::trace!(?state, "upload state");
        }
        outcome
    }
}

fn next_state(state: &UploadState, event: &UploadEvent) -> UploadResult<UploadState> {
    let new_state = match (state, event) {
        // Starting transfer; a finished upload's banner may still be showing
        (
            UploadState::Idle | UploadState::Succeeded { .. } | UploadState::Failed { .. },
            UploadEvent::Start {
                upload_id,
                file_name,
            },
        ) => UploadState::Transferring {
            upload_id: *upload_id,
            file_name: file_name.clone(),
            progress: 0,
        },

        // Only one upload in flight
        (UploadState::Transferring { .. }, UploadEvent::Start { .. }) => {
            return Err(UploadError::Busy);
        }

        // Progress never regresses
        (
            UploadState::Transferring {
                upload_id,
                file_name,
                progress,
            },
            UploadEvent::Progress { percent },
        ) => UploadState::Transferring {
            upload_id: *upload_id,
            file_name: file_name.clone(),
            progress: (*progress).max((*percent).min(100)),
        },

        (UploadState::Transferring { upload_id, .. }, UploadEvent::Succeed { summary }) => {
            UploadState::Succeeded {
                upload_id: *upload_id,
                summary: summary.clone(),
            }
        }

        (UploadState::Transferring { upload_id, .. }, UploadEvent::Fail { reason }) => {
            UploadState::Failed {
                upload_id: *upload_id,
                reason: reason.clone(),
            }
        }

        // Acknowledge only the upload that produced the terminal state
        (
            UploadState::Succeeded { upload_id, .. } | UploadState::Failed { upload_id, .. },
            UploadEvent::Acknowledge { upload_id: acked },
        ) if upload_id == acked => UploadState::Idle,

        // Invalid transition
        _ => {
            return Err(UploadError::InvalidStateTransition(format!(
                "Cannot handle {event:?} in state {state:?}"
            )));
        }
    };

    Ok(new_state)
}
