//! Interactive session for drawing and managing shapes.
//!
//! Each menu action maps onto one [`ShapeRegistry`] call. Batch sends are
//! spawned onto the runtime so the menu stays usable while requests are in
//! flight; finished sends are folded back into the registry before the menu
//! is shown again.

use std::path::Path;

use dialoguer::{Input, Select};
use map_drawer_registry::{DEFAULT_BAND_COUNT, ShapeRegistry};
use map_drawer_shape_models::ShapeId;
use map_drawer_submission::{BatchOutcome, SubmissionClient, SubmissionConfig};
use tokio::task::JoinHandle;

use crate::commands::print_rectangles;
use crate::vertices::polygon_from_input;

/// Top-level actions in the interactive menu.
enum Action {
    Draw,
    List,
    Activate,
    SetBands,
    ToggleVisible,
    ToggleSend,
    ShowResults,
    Process,
    Proxy,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Draw,
        Self::List,
        Self::Activate,
        Self::SetBands,
        Self::ToggleVisible,
        Self::ToggleSend,
        Self::ShowResults,
        Self::Process,
        Self::Proxy,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Draw => "Draw a shape",
            Self::List => "List shapes",
            Self::Activate => "Select active shape",
            Self::SetBands => "Set band count (active shape)",
            Self::ToggleVisible => "Toggle visibility",
            Self::ToggleSend => "Toggle send to server",
            Self::ShowResults => "Show active shape rectangles",
            Self::Process => "Process (send toggled shapes)",
            Self::Proxy => "Send proxy request",
            Self::Quit => "Quit",
        }
    }
}

/// State of one interactive session.
struct Session {
    registry: ShapeRegistry,
    client: SubmissionClient,
    /// Band count applied to newly drawn shapes; follows the active shape.
    band_count: u32,
    in_flight: Vec<JoinHandle<BatchOutcome>>,
}

/// Runs the interactive menu until the user quits.
///
/// # Errors
///
/// Returns an error if the endpoint config is invalid or a prompt fails.
pub async fn run(config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let client = SubmissionClient::new(SubmissionConfig::load(config)?)?;
    log::info!("Endpoint: {}", client.config().base_url);

    let mut session = Session {
        registry: ShapeRegistry::new(),
        client,
        band_count: DEFAULT_BAND_COUNT,
        in_flight: Vec::new(),
    };

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        session.collect_finished().await;

        let idx = Select::new()
            .with_prompt("Map drawer")
            .items(&labels)
            .default(0)
            .interact()?;

        let result = match Action::ALL[idx] {
            Action::Draw => session.handle_draw(),
            Action::List => {
                session.handle_list();
                Ok(())
            }
            Action::Activate => session.handle_activate(),
            Action::SetBands => session.handle_set_bands(),
            Action::ToggleVisible => session.handle_toggle_visible(),
            Action::ToggleSend => session.handle_toggle_send(),
            Action::ShowResults => {
                session.handle_show_results();
                Ok(())
            }
            Action::Process => {
                session.handle_process();
                Ok(())
            }
            Action::Proxy => {
                session.handle_proxy().await;
                Ok(())
            }
            Action::Quit => break,
        };

        if let Err(e) = result {
            println!("Error: {e}");
        }
    }

    session.wait_for_in_flight().await;
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

impl Session {
    fn handle_draw(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let source: String = Input::new()
            .with_prompt("Vertices (lat,lon; lat,lon; ...) or path to a GeoJSON file")
            .interact_text()?;

        let polygon = polygon_from_input(&source)?;

        let name: String = Input::new()
            .with_prompt("Shape name (blank for automatic)")
            .allow_empty(true)
            .interact_text()?;

        let id = self
            .registry
            .create_shape(polygon, Some(&name), self.band_count)?;
        let shape = self.registry.get(id)?;
        println!("Created {}", shape.label());
        print_rectangles(shape.polygon(), shape.rectangles());
        Ok(())
    }

    fn handle_list(&self) {
        if self.registry.is_empty() {
            println!("No shapes drawn yet.");
            return;
        }

        let active = self.registry.active_id();
        for shape in self.registry.shapes() {
            let marker = if Some(shape.id()) == active { '>' } else { ' ' };
            let visible = if shape.is_visible() { "shown " } else { "hidden" };
            let send = if shape.send_to_server() {
                "send"
            } else {
                "    "
            };
            print!("{marker} [{visible}] [{send}] {}", shape.label());
            if let Some(feedback) = self.registry.feedback(shape.id()) {
                print!("  [{}] {}", feedback.tone.color(), feedback.message);
            }
            println!();
        }
    }

    fn handle_activate(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let Some(id) = self.pick_shape("Activate which shape?")? else {
            return Ok(());
        };
        self.registry.activate(id)?;

        let shape = self.registry.get(id)?;
        self.band_count = shape.band_count().get();
        print_rectangles(shape.polygon(), shape.rectangles());
        Ok(())
    }

    fn handle_set_bands(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let bands: u32 = Input::new()
            .with_prompt("Band count")
            .default(self.band_count)
            .validate_with(|n: &u32| if *n >= 1 { Ok(()) } else { Err("must be at least 1") })
            .interact_text()?;

        self.band_count = bands;

        let Some(id) = self.registry.active_id() else {
            println!("No active shape; new shapes will use {bands} bands.");
            return Ok(());
        };

        self.registry.set_band_count(id, bands)?;
        let shape = self.registry.get(id)?;
        println!("Updated {}", shape.label());
        print_rectangles(shape.polygon(), shape.rectangles());
        Ok(())
    }

    fn handle_toggle_visible(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let Some(id) = self.pick_shape("Toggle visibility of which shape?")? else {
            return Ok(());
        };
        let visible = self.registry.toggle_visible(id)?;
        println!(
            "{} is now {}",
            self.registry.get(id)?.name(),
            if visible { "shown" } else { "hidden" }
        );
        Ok(())
    }

    fn handle_toggle_send(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let Some(id) = self.pick_shape("Toggle sending of which shape?")? else {
            return Ok(());
        };
        let send = self.registry.toggle_send_to_server(id)?;
        println!(
            "{} will {}be sent",
            self.registry.get(id)?.name(),
            if send { "" } else { "not " }
        );
        Ok(())
    }

    fn handle_show_results(&self) {
        match self.registry.active() {
            Some(shape) => {
                println!("{}", shape.label());
                print_rectangles(shape.polygon(), shape.rectangles());
            }
            None => println!("No active shape."),
        }
    }

    fn handle_process(&mut self) {
        let batch = self.registry.prepare_batch();
        if batch.is_empty() {
            println!(
                "No shapes toggled for sending to server. Please toggle at least one shape \
                 or draw a polygon first."
            );
            return;
        }

        println!("Sending {} shape(s) in the background...", batch.len());
        let client = self.client.clone();
        self.in_flight
            .push(tokio::spawn(async move { client.process_batch(batch).await }));
    }

    async fn handle_proxy(&self) {
        println!("Sending proxy request...");
        match self.client.proxy_request().await {
            Ok(body) => match serde_json::to_string_pretty(&body) {
                Ok(pretty) => println!("Proxy response:\n{pretty}"),
                Err(e) => println!("Proxy response could not be printed: {e}"),
            },
            Err(e) => println!("Proxy request failed: {e}"),
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Prompts for a shape, defaulting to the active one. Returns `None`
    /// when there are no shapes.
    fn pick_shape(&self, prompt: &str) -> Result<Option<ShapeId>, dialoguer::Error> {
        let shapes = self.registry.shapes();
        if shapes.is_empty() {
            println!("No shapes drawn yet.");
            return Ok(None);
        }

        let labels: Vec<String> = shapes.iter().map(map_drawer_registry::Shape::label).collect();
        let default = self
            .registry
            .active_id()
            .and_then(|id| shapes.iter().position(|s| s.id() == id))
            .unwrap_or(0);

        let idx = Select::new()
            .with_prompt(prompt)
            .items(&labels)
            .default(default)
            .interact()?;

        Ok(Some(shapes[idx].id()))
    }

    /// Applies the feedback of every send that has completed.
    async fn collect_finished(&mut self) {
        let (done, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.in_flight)
            .into_iter()
            .partition(JoinHandle::is_finished);
        self.in_flight = pending;

        for handle in done {
            self.apply(handle).await;
        }
    }

    async fn wait_for_in_flight(&mut self) {
        if !self.in_flight.is_empty() {
            println!("Waiting for {} send(s) to finish...", self.in_flight.len());
        }
        for handle in std::mem::take(&mut self.in_flight) {
            self.apply(handle).await;
        }
    }

    async fn apply(&mut self, handle: JoinHandle<BatchOutcome>) {
        match handle.await {
            Ok(outcome) => {
                let updates = outcome.feedback();
                for (id, feedback) in &updates {
                    if let Ok(shape) = self.registry.get(*id) {
                        println!("{}: {}", shape.name(), feedback.message);
                    }
                }
                self.registry.apply_feedback(updates);
            }
            Err(e) => log::error!("Send task failed: {e}"),
        }
    }
}
