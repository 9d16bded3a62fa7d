//! `reqwest`-backed transport for the remote endpoint.

use std::time::Duration;

use map_drawer_registry::ShapeSubmission;
use map_drawer_submission_models::{SendRectanglesRequest, SendRectanglesResponse, SubmittedShape};
use serde::de::DeserializeOwned;

use crate::outcome::BatchOutcome;
use crate::{SubmissionConfig, SubmissionError};

/// HTTP client bound to one endpoint configuration.
#[derive(Debug, Clone)]
pub struct SubmissionClient {
    client: reqwest::Client,
    config: SubmissionConfig,
}

impl SubmissionClient {
    /// Builds a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::Transport`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: SubmissionConfig) -> Result<Self, SubmissionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &SubmissionConfig {
        &self.config
    }

    /// Posts a batch of shapes to the rectangle endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::EmptyBatch`] without sending anything if
    /// `batch` is empty, [`SubmissionError::Http`] for a non-2xx answer,
    /// [`SubmissionError::Transport`] if no answer arrives, and
    /// [`SubmissionError::Decode`] if the answer is not the expected JSON.
    pub async fn send_batch(
        &self,
        batch: &[ShapeSubmission],
    ) -> Result<SendRectanglesResponse, SubmissionError> {
        if batch.is_empty() {
            return Err(SubmissionError::EmptyBatch);
        }

        let request = SendRectanglesRequest {
            shapes: batch
                .iter()
                .map(|shape| SubmittedShape {
                    id: shape.id,
                    name: shape.name.clone(),
                    rectangles: shape.reported_rectangles(),
                })
                .collect(),
        };

        let url = self.config.send_url();
        log::info!("Sending {} shapes to {url}", request.shapes.len());

        self.post_json(&url, &request).await
    }

    /// Sends a batch and maps the result onto per-shape feedback.
    ///
    /// Takes the batch by value so the future owns everything it needs and
    /// can be spawned while the registry keeps handling commands.
    pub async fn process_batch(&self, batch: Vec<ShapeSubmission>) -> BatchOutcome {
        let result = self.send_batch(&batch).await;
        match &result {
            Ok(response) => log::info!(
                "Endpoint answered for {} of {} shapes",
                response.results.len(),
                batch.len()
            ),
            Err(e) => log::error!("Error sending multiple shapes data: {e}"),
        }
        BatchOutcome::new(&batch, result)
    }

    /// Posts an empty JSON object to the proxy endpoint and returns its
    /// JSON answer unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::Http`] for a non-2xx answer,
    /// [`SubmissionError::Transport`] if no answer arrives, and
    /// [`SubmissionError::Decode`] if the answer is not JSON.
    pub async fn proxy_request(&self) -> Result<serde_json::Value, SubmissionError> {
        let url = self.config.proxy_url();
        log::info!("Sending proxy request to {url}");
        self.post_json(&url, &serde_json::json!({})).await
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R, SubmissionError>
    where
        B: serde::Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self.client.post(url).json(body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            log::warn!("{url} returned {status}: {text}");
            return Err(SubmissionError::Http { status, body: text });
        }

        serde_json::from_str(&text).map_err(|e| SubmissionError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpResponse, HttpServer, web};
    use map_drawer_registry::{Feedback, FeedbackTone, ShapeRegistry};
    use map_drawer_shape_models::{Polygon, ShapeId};
    use map_drawer_submission_models::{ResultStatus, ShapeResult};

    use super::*;

    /// Behaves like the reference endpoint: shapes without rectangles are
    /// rejected individually, an empty batch is a 400.
    async fn accept_rectangles(body: web::Json<SendRectanglesRequest>) -> HttpResponse {
        if body.shapes.is_empty() {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "message": "No shapes data received.",
                "results": []
            }));
        }

        let results = body
            .shapes
            .iter()
            .map(|shape| {
                if shape.rectangles.is_empty() {
                    ShapeResult {
                        shape_id: shape.id,
                        status: ResultStatus::Error,
                        message: format!("No rectangles received for '{}'.", shape.name),
                    }
                } else {
                    ShapeResult {
                        shape_id: shape.id,
                        status: ResultStatus::Success,
                        message: format!("Rectangles for '{}' received successfully.", shape.name),
                    }
                }
            })
            .collect();

        HttpResponse::Ok().json(SendRectanglesResponse {
            message: Some("Processed all toggled shapes.".to_string()),
            results,
        })
    }

    async fn echo_listing() -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({"Paging": {"TotalRecords": 2}}))
    }

    async fn fail() -> HttpResponse {
        HttpResponse::InternalServerError().body("boom")
    }

    async fn not_json() -> HttpResponse {
        HttpResponse::Ok().body("<html>hello</html>")
    }

    fn healthy_endpoint(cfg: &mut web::ServiceConfig) {
        cfg.route("/send_multiple_rectangles", web::post().to(accept_rectangles))
            .route("/proxy_realtor_request", web::post().to(echo_listing));
    }

    fn failing_endpoint(cfg: &mut web::ServiceConfig) {
        cfg.route("/send_multiple_rectangles", web::post().to(fail))
            .route("/proxy_realtor_request", web::post().to(fail));
    }

    fn garbled_endpoint(cfg: &mut web::ServiceConfig) {
        cfg.route("/send_multiple_rectangles", web::post().to(not_json));
    }

    fn spawn_endpoint(configure: fn(&mut web::ServiceConfig)) -> SubmissionClient {
        let server = HttpServer::new(move || App::new().configure(configure))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .unwrap();
        let addr = server.addrs()[0];
        actix_rt::spawn(server.run());

        let config = SubmissionConfig::default()
            .with_base_url_override(Some(format!("http://{addr}")))
            .unwrap();
        SubmissionClient::new(config).unwrap()
    }

    fn square() -> Polygon {
        Polygon::from(vec![(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)])
    }

    #[actix_rt::test]
    async fn successful_batch_marks_shapes_per_result() {
        let client = spawn_endpoint(healthy_endpoint);

        let mut registry = ShapeRegistry::new();
        let full = registry.create_shape(square(), Some("Block"), 4).unwrap();
        let empty = registry
            .create_shape(Polygon::from(vec![(0.0, 0.0), (1.0, 1.0)]), Some("Line"), 4)
            .unwrap();
        let idle = registry.create_shape(square(), Some("Idle"), 4).unwrap();
        registry.set_send_to_server(full, true).unwrap();
        registry.set_send_to_server(empty, true).unwrap();

        let batch = registry.prepare_batch();
        let outcome = client.process_batch(batch).await;
        registry.apply_feedback(outcome.feedback());

        assert_eq!(
            registry.feedback(full),
            Some(&Feedback::success(
                "Server response: Rectangles for 'Block' received successfully."
            ))
        );
        assert_eq!(
            registry.feedback(empty),
            Some(&Feedback::error("Error: No rectangles received for 'Line'."))
        );
        assert_eq!(registry.feedback(idle), Some(&Feedback::skipped()));
    }

    #[actix_rt::test]
    async fn non_success_status_marks_every_carried_shape() {
        let client = spawn_endpoint(failing_endpoint);

        let mut registry = ShapeRegistry::new();
        let a = registry.create_shape(square(), None, 2).unwrap();
        let b = registry.create_shape(square(), None, 2).unwrap();
        registry.set_send_to_server(a, true).unwrap();
        registry.set_send_to_server(b, true).unwrap();

        let outcome = client.process_batch(registry.prepare_batch()).await;
        assert!(matches!(
            outcome.result,
            Err(SubmissionError::Http { status, ref body })
                if status == reqwest::StatusCode::INTERNAL_SERVER_ERROR && body == "boom"
        ));

        registry.apply_feedback(outcome.feedback());
        for id in [a, b] {
            assert_eq!(
                registry.feedback(id),
                Some(&Feedback::error("Error sending data: 500 - boom"))
            );
        }
    }

    #[actix_rt::test]
    async fn garbled_body_is_a_decode_error() {
        let client = spawn_endpoint(garbled_endpoint);
        let batch = vec![ShapeSubmission {
            id: ShapeId(1),
            name: "A".to_string(),
            rectangles: vec![],
        }];
        assert!(matches!(
            client.send_batch(&batch).await,
            Err(SubmissionError::Decode(_))
        ));
    }

    #[actix_rt::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let config = SubmissionConfig::default()
            .with_base_url_override(Some(format!("http://{addr}")))
            .unwrap();
        let client = SubmissionClient::new(config).unwrap();

        let batch = vec![ShapeSubmission {
            id: ShapeId(1),
            name: "A".to_string(),
            rectangles: vec![],
        }];
        let outcome = client.process_batch(batch).await;
        assert!(matches!(outcome.result, Err(SubmissionError::Transport(_))));

        let feedback = outcome.feedback();
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback[0].1.tone, FeedbackTone::Error);
        assert!(feedback[0].1.message.starts_with("Network error: "));
    }

    #[actix_rt::test]
    async fn empty_batch_is_never_sent() {
        let client = spawn_endpoint(failing_endpoint);
        assert!(matches!(
            client.send_batch(&[]).await,
            Err(SubmissionError::EmptyBatch)
        ));
    }

    #[actix_rt::test]
    async fn concurrent_batches_only_report_their_own_shapes() {
        let client = spawn_endpoint(healthy_endpoint);

        let mut registry = ShapeRegistry::new();
        let first = registry.create_shape(square(), Some("First"), 3).unwrap();
        registry.set_send_to_server(first, true).unwrap();
        let first_batch = registry.prepare_batch();

        let second = registry.create_shape(square(), Some("Second"), 3).unwrap();
        registry.set_send_to_server(first, false).unwrap();
        registry.set_send_to_server(second, true).unwrap();
        let second_batch = registry.prepare_batch();

        let (a, b) = futures::future::join(
            client.process_batch(first_batch),
            client.process_batch(second_batch),
        )
        .await;

        assert_eq!(a.shape_ids, vec![first]);
        assert_eq!(b.shape_ids, vec![second]);

        registry.apply_feedback(b.feedback());
        registry.apply_feedback(a.feedback());
        assert_eq!(
            registry.feedback(first).map(|f| f.tone),
            Some(FeedbackTone::Success)
        );
        assert_eq!(
            registry.feedback(second).map(|f| f.tone),
            Some(FeedbackTone::Success)
        );
    }

    #[actix_rt::test]
    async fn proxy_returns_json_verbatim() {
        let client = spawn_endpoint(healthy_endpoint);
        let body = client.proxy_request().await.unwrap();
        assert_eq!(body, serde_json::json!({"Paging": {"TotalRecords": 2}}));
    }

    #[actix_rt::test]
    async fn proxy_failure_carries_status() {
        let client = spawn_endpoint(failing_endpoint);
        assert!(matches!(
            client.proxy_request().await,
            Err(SubmissionError::Http { status, .. }) if status.as_u16() == 500
        ));
    }
}
