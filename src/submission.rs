//! Submission orchestration: form → request → recommendations → advisory
//! → result handoff.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::api::RecommendationClient;
use crate::error::SubmissionError;
use crate::results::{ResultBundle, ResultStore};
use crate::wizard::ProfileFormState;

/// Where the wizard is in its submit lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    /// Collecting input; nothing submitted yet (or the last result was read).
    Editing,
    /// Both remote stages and the handoff are running. Re-submission is refused.
    InProgress { submission_id: Uuid },
    /// The bundle is in the store; the front-end should show results.
    Completed { submission_id: Uuid },
    /// Orchestration failed after the remote stages. The form is untouched.
    Failed { message: String, retryable: bool },
}

/// Drives one wizard submission end to end.
pub struct SubmissionPipeline {
    client: RecommendationClient,
    store: Arc<dyn ResultStore>,
    status: RwLock<SubmissionStatus>,
}

impl SubmissionPipeline {
    pub fn new(client: RecommendationClient, store: Arc<dyn ResultStore>) -> Self {
        Self {
            client,
            store,
            status: RwLock::new(SubmissionStatus::Editing),
        }
    }

    pub async fn status(&self) -> SubmissionStatus {
        self.status.read().await.clone()
    }

    /// Submit the form.
    ///
    /// Remote failures never surface here; they resolve through fallback.
    /// An `Err` means the orchestration itself failed. The form is not
    /// modified, so the caller can offer a retry when
    /// [`SubmissionError::is_retryable`] says so.
    pub async fn submit(&self, form: &ProfileFormState) -> Result<ResultBundle, SubmissionError> {
        form.ensure_submittable()?;

        let submission_id = Uuid::new_v4();
        {
            let mut status = self.status.write().await;
            if matches!(*status, SubmissionStatus::InProgress { .. }) {
                warn!("Submission refused: another one is in progress");
                return Err(SubmissionError::AlreadyInProgress);
            }
            *status = SubmissionStatus::InProgress { submission_id };
        }
        info!(%submission_id, city = %form.location.current_city, "Submission started");

        let request = form.to_request();
        let scored = self.client.get_recommendations(&request).await;
        let advisory = self
            .client
            .get_advisory(&form.profile, &form.location, &form.family_health, &scored)
            .await;

        let bundle = ResultBundle::assemble(submission_id, scored, advisory, form);

        if let Err(e) = self.store.put(&bundle).await {
            error!(%submission_id, error = %e, "Result handoff failed");
            let err = SubmissionError::Handoff(e);
            *self.status.write().await = SubmissionStatus::Failed {
                message: err.to_string(),
                retryable: err.is_retryable(),
            };
            return Err(err);
        }

        *self.status.write().await = SubmissionStatus::Completed { submission_id };
        info!(
            %submission_id,
            used_fallback = bundle.used_fallback(),
            "Submission completed"
        );
        Ok(bundle)
    }

    /// Return to editing after the results were shown or a failure was
    /// acknowledged.
    pub async fn reset(&self) {
        let mut status = self.status.write().await;
        if !matches!(*status, SubmissionStatus::InProgress { .. }) {
            *status = SubmissionStatus::Editing;
        }
    }
}
