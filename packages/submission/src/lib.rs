#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the remote rectangle endpoint.
//!
//! Takes the owned batch snapshot produced by
//! [`map_drawer_registry::ShapeRegistry::prepare_batch`], posts it to
//! `send_multiple_rectangles`, and turns the outcome into per-shape
//! [`Feedback`](map_drawer_registry::Feedback) for the registry. Each call
//! only reports on the shapes it carried, so several batches can be in
//! flight at once without clobbering one another's feedback.
//!
//! Requests are never retried; a failed batch is resent by running the
//! process command again.

pub mod client;
pub mod config;
pub mod outcome;

use thiserror::Error;

pub use client::SubmissionClient;
pub use config::{ConfigError, SubmissionConfig};
pub use outcome::{BatchOutcome, feedback_for};

/// Errors from talking to the remote endpoint.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Response status.
        status: reqwest::StatusCode,
        /// Response body text.
        body: String,
    },

    /// The request never got a response.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered 2xx with a body that is not the expected JSON.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// There were no shapes to send.
    #[error("No shapes toggled for sending")]
    EmptyBatch,
}
