use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use shared::error::ApiResult;
use tracing::{info, warn};

use crate::notify::{Notice, NotificationShell};

/// Pre-network validation failure, surfaced inline per field and never sent
/// to the notification shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// What happened to a submitted action. Errors are reported, never
/// propagated as failures of the call itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Completed,
    Failed,
    /// Another submission of the same kind was still in flight; no request
    /// was issued.
    Blocked,
    Invalid(Vec<FieldError>),
}

#[derive(Debug, Clone)]
pub struct MutationMessages {
    pub success_title: String,
    pub success_body: String,
    pub error_title: String,
    pub error_fallback: String,
}

impl MutationMessages {
    pub fn new(
        success_title: impl Into<String>,
        success_body: impl Into<String>,
        error_title: impl Into<String>,
        error_fallback: impl Into<String>,
    ) -> Self {
        Self {
            success_title: success_title.into(),
            success_body: success_body.into(),
            error_title: error_title.into(),
            error_fallback: error_fallback.into(),
        }
    }
}

/// Runs one mutation per user confirmation. While a run is in flight the
/// affordance is considered disabled and further submissions are rejected
/// without touching the network. On success the confirmation dialog is
/// closed, a success notice is shown and the caller-supplied refresh runs;
/// on failure an error notice carries the backend message when one exists.
pub struct MutationRunner {
    notifier: Arc<dyn NotificationShell>,
    in_flight: AtomicBool,
}

impl MutationRunner {
    pub fn new(notifier: Arc<dyn NotificationShell>) -> Self {
        Self {
            notifier,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub async fn run<A, R>(
        &self,
        action: A,
        messages: &MutationMessages,
        refresh: R,
    ) -> SubmitOutcome
    where
        A: Future<Output = ApiResult<()>>,
        R: Future<Output = ()>,
    {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            info!("mutation: submission ignored while another is in flight");
            return SubmitOutcome::Blocked;
        }

        let outcome = match action.await {
            Ok(()) => {
                self.notifier.close();
                self.notifier.open(Notice::success(
                    messages.success_title.clone(),
                    messages.success_body.clone(),
                ));
                refresh.await;
                SubmitOutcome::Completed
            }
            Err(err) => {
                warn!(status = err.status, "mutation: action failed: {}", err.message);
                let body = if err.is_generic() {
                    messages.error_fallback.clone()
                } else {
                    err.message
                };
                self.notifier
                    .open(Notice::error(messages.error_title.clone(), body));
                SubmitOutcome::Failed
            }
        };

        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }
}
