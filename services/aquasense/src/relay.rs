//! Dispensing action relay: user-initiated request/approve/cancel

use std::sync::Arc;

use crate::api::{ActionResponse, ApiClient, DispensingRequest};
use crate::error::ErrorSink;
use crate::notification::{NotificationCenter, NotificationKind};
use crate::view::View;

pub const DISPENSED_MESSAGE: &str = "Mineral dispensed successfully!";
pub const CANCELLED_MESSAGE: &str = "Dispensing request cancelled";

/// Result of an action the server answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed { message: Option<String> },
    Rejected { status: String, message: Option<String> },
}

impl From<ActionResponse> for ActionOutcome {
    fn from(response: ActionResponse) -> Self {
        if response.is_success() {
            ActionOutcome::Completed {
                message: response.message,
            }
        } else {
            ActionOutcome::Rejected {
                status: response.status,
                message: response.message,
            }
        }
    }
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed { .. })
    }
}

/// Sends dispensing actions and reflects their result on the view.
///
/// Transport and parse failures go to the error sink and are also returned.
#[derive(Debug, Clone)]
pub struct DispensingRelay {
    api: ApiClient,
    view: Arc<dyn View>,
    notifications: Arc<NotificationCenter>,
    sink: Arc<dyn ErrorSink>,
}

impl DispensingRelay {
    pub fn new(
        api: ApiClient,
        view: Arc<dyn View>,
        notifications: Arc<NotificationCenter>,
        sink: Arc<dyn ErrorSink>,
    ) -> Self {
        Self {
            api,
            view,
            notifications,
            sink,
        }
    }

    /// Ask the server to propose a dispensing action.
    ///
    /// The resulting prompt appears with the next poll.
    pub async fn request_dispensing(
        &self,
        mineral: &str,
        reason: &str,
    ) -> crate::Result<ActionOutcome> {
        let request = DispensingRequest {
            mineral: mineral.to_string(),
            reason: reason.to_string(),
        };
        let outcome = self
            .report("requesting dispensing", self.api.request_dispensing(&request).await)?;
        match &outcome {
            ActionOutcome::Completed { .. } => {
                tracing::info!("Dispensing request created for {}", mineral)
            }
            ActionOutcome::Rejected { status, message } => tracing::warn!(
                "Dispensing request for {} rejected: {} {:?}",
                mineral,
                status,
                message
            ),
        }
        Ok(outcome)
    }

    pub async fn approve_dispensing(&self) -> crate::Result<ActionOutcome> {
        let outcome = self.report("approving dispensing", self.api.approve_dispensing().await)?;
        self.conclude(&outcome, DISPENSED_MESSAGE, NotificationKind::Success);
        Ok(outcome)
    }

    pub async fn cancel_dispensing(&self) -> crate::Result<ActionOutcome> {
        let outcome = self.report("cancelling dispensing", self.api.cancel_dispensing().await)?;
        self.conclude(&outcome, CANCELLED_MESSAGE, NotificationKind::Info);
        Ok(outcome)
    }

    fn report(
        &self,
        operation: &str,
        result: crate::Result<ActionResponse>,
    ) -> crate::Result<ActionOutcome> {
        result.map(ActionOutcome::from).inspect_err(|e| {
            self.sink.report(operation, e);
        })
    }

    fn conclude(&self, outcome: &ActionOutcome, message: &str, kind: NotificationKind) {
        match outcome {
            ActionOutcome::Completed { .. } => {
                self.view.hide_dispensing_prompt();
                self.view.commit();
                self.notifications.show(message, kind);
            }
            ActionOutcome::Rejected { status, message } => {
                tracing::warn!("Dispensing action rejected: {} {:?}", status, message);
            }
        }
    }
}
