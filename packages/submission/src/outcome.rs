//! Mapping of a batch result onto per-shape feedback.

use map_drawer_registry::{Feedback, ShapeSubmission};
use map_drawer_shape_models::ShapeId;
use map_drawer_submission_models::{ResultStatus, SendRectanglesResponse};

use crate::SubmissionError;

/// Result of sending one batch, tagged with the shapes it carried.
#[derive(Debug)]
pub struct BatchOutcome {
    pub shape_ids: Vec<ShapeId>,
    pub result: Result<SendRectanglesResponse, SubmissionError>,
}

impl BatchOutcome {
    #[must_use]
    pub fn new(
        batch: &[ShapeSubmission],
        result: Result<SendRectanglesResponse, SubmissionError>,
    ) -> Self {
        Self {
            shape_ids: batch.iter().map(|s| s.id).collect(),
            result,
        }
    }

    /// Feedback for every shape this batch carried, and no others.
    #[must_use]
    pub fn feedback(&self) -> Vec<(ShapeId, Feedback)> {
        self.shape_ids
            .iter()
            .map(|&id| (id, feedback_for(id, &self.result)))
            .collect()
    }
}

/// Feedback for one shape given its batch's result.
#[must_use]
pub fn feedback_for(
    id: ShapeId,
    result: &Result<SendRectanglesResponse, SubmissionError>,
) -> Feedback {
    match result {
        Ok(response) => match response.result_for(id) {
            Some(r) if r.status == ResultStatus::Success => {
                Feedback::success(format!("Server response: {}", r.message))
            }
            Some(r) if r.status == ResultStatus::Error => {
                Feedback::error(format!("Error: {}", r.message))
            }
            _ => Feedback::success("Server response received."),
        },
        Err(SubmissionError::Http { status, body }) => Feedback::error(format!(
            "Error sending data: {} - {body}",
            status.as_u16()
        )),
        Err(e @ (SubmissionError::Transport(_) | SubmissionError::Decode(_))) => {
            Feedback::error(format!("Network error: {e}"))
        }
        Err(SubmissionError::EmptyBatch) => Feedback::skipped(),
    }
}
