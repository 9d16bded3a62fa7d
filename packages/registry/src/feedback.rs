//! Per-shape status messages shown next to each shape after a batch send.

/// Status text shown while a shape's batch is in flight.
pub const PENDING_MESSAGE: &str = "Sending data to server...";

/// Status text for shapes left out of a batch.
pub const SKIPPED_MESSAGE: &str = "Rectangles not sent to server (toggle is off).";

/// Outcome category of a feedback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTone {
    /// Request in flight.
    Pending,
    /// Endpoint accepted the shape.
    Success,
    /// Endpoint rejected the shape or the request failed.
    Error,
    /// Shape was not part of the batch.
    Skipped,
}

impl FeedbackTone {
    /// Display color used by presentation adapters.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Pending => "orange",
            Self::Success => "green",
            Self::Error => "red",
            Self::Skipped => "gray",
        }
    }
}

/// A status message for one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub message: String,
    pub tone: FeedbackTone,
}

impl Feedback {
    #[must_use]
    pub fn new(tone: FeedbackTone, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone,
        }
    }

    #[must_use]
    pub fn pending() -> Self {
        Self::new(FeedbackTone::Pending, PENDING_MESSAGE)
    }

    #[must_use]
    pub fn skipped() -> Self {
        Self::new(FeedbackTone::Skipped, SKIPPED_MESSAGE)
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FeedbackTone::Success, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(FeedbackTone::Error, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_pick_matching_tone_and_color() {
        assert_eq!(Feedback::pending().message, PENDING_MESSAGE);
        assert_eq!(Feedback::pending().tone.color(), "orange");
        assert_eq!(Feedback::skipped().message, SKIPPED_MESSAGE);
        assert_eq!(Feedback::skipped().tone.color(), "gray");
        assert_eq!(Feedback::success("ok").tone.color(), "green");
        assert_eq!(Feedback::error("nope").tone.color(), "red");
    }
}
