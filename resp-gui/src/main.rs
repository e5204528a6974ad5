//! # Respiratory Sound Analysis - Desktop GUI
//!
//! This module contains the main GUI application. It walks the user through
//! two steps: picking a recording to upload, then reading the analysis.
//!
//! ## Architecture
//! - **Main Thread**: Iced GUI application with dark theme
//! - **Inference Thread**: `resp_core::worker::InferenceWorker` runs the
//!   service call off the UI thread
//! - **Handoff**: the upload flow and the results flow each hold a
//!   `ResultHandoff` from one `SessionScope` owned by the app
//! - **Updates**: a tick subscription polls the worker while a call is pending

mod ui;

use iced::{Element, Subscription, Task, Theme};
use resp_core::config::{AppConfig, DEFAULT_CONFIG_FILE};
use resp_core::inference::HttpInferenceClient;
use resp_core::report::AnalysisReport;
use resp_core::session::{ResultHandoff, SessionScope};
use resp_core::upload::{self, AudioFile};
use resp_core::worker::{InferenceOutcome, InferenceWorker};
use resp_core::TransportError;
use tracing_subscriber::EnvFilter;

/// How often the worker is polled while an analysis is running.
const POLL_INTERVAL_MS: u64 = 50;

/// Main entry point for the application.
///
/// Installs logging, then starts the Iced application with the dark theme.
pub fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,resp_core=debug,resp_gui=debug")),
        )
        .init();

    tracing::info!("starting respiratory sound analysis GUI");
    let result = iced::application("Respiratory Sound Analysis", RespApp::update, RespApp::view)
        .subscription(RespApp::subscription)
        .theme(RespApp::theme)
        .run_with(RespApp::new);
    tracing::info!(?result, "application finished");
    result
}

/// Application message types.
#[derive(Debug, Clone)]
pub enum Message {
    // Upload step
    PathChanged(String),   // User edited the file path field
    ChooseFile,            // Validate the typed path and select it
    RemoveFile,            // Clear the current selection
    Analyze,               // Send the selected file for analysis
    CancelAnalysis,        // Leave the pending analysis behind
    OpenResults,           // Go to the results step without uploading

    // Results step
    AnalyzeAnother,        // Back to the upload step

    // Background events
    HealthChecked(Result<(), TransportError>),
    Tick,                  // Poll the inference worker
}

/// Which step of the flow is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Upload,
    Results,
}

/// Reachability of the analysis service, as last checked.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceStatus {
    Checking,
    Online,
    Offline(String),
}

/// State of the upload step.
#[derive(Debug, Clone, Default)]
pub struct UploadDisplay {
    pub path_input: String,
    pub file: Option<AudioFile>,
    pub error: Option<String>,
    pub loading: bool,
}

/// What the results step shows.
#[derive(Debug, Clone)]
pub enum ResultsDisplay {
    Ready(Box<AnalysisReport>),
    Unavailable(String),
}

/// UI-specific data needed for rendering the interface.
#[derive(Debug, Clone)]
pub struct AppDisplayData {
    pub screen: Screen,
    pub upload: UploadDisplay,
    pub results: ResultsDisplay,
    pub service_status: ServiceStatus,
    pub api_base: String,
}

/// Main application state.
struct RespApp {
    worker: Option<InferenceWorker>,
    // Owns the session; the handoffs below borrow its storage.
    _session: SessionScope,
    upload_handoff: ResultHandoff,
    results_handoff: ResultHandoff,
    display_data: AppDisplayData,
}

impl RespApp {
    /// Creates the application and starts the service health check.
    fn new() -> (Self, Task<Message>) {
        let file_config = match AppConfig::load(DEFAULT_CONFIG_FILE) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "could not load config, using defaults");
                AppConfig::default()
            }
        };
        // Leave an editable starter file behind on first run.
        if !std::path::Path::new(DEFAULT_CONFIG_FILE).exists() {
            match file_config.save(DEFAULT_CONFIG_FILE) {
                Ok(()) => tracing::info!(path = DEFAULT_CONFIG_FILE, "wrote default config"),
                Err(e) => tracing::warn!(error = %e, "could not write default config"),
            }
        }
        let config = file_config.apply_env();

        let session = SessionScope::new();
        let upload_handoff = session.handoff();
        let results_handoff = session.handoff();

        let mut display_data = AppDisplayData {
            screen: Screen::Upload,
            upload: UploadDisplay::default(),
            results: ResultsDisplay::Unavailable(String::new()),
            service_status: ServiceStatus::Checking,
            api_base: config.api_base.clone(),
        };

        let (worker, health_task) = match HttpInferenceClient::new(&config) {
            Ok(client) => {
                display_data.api_base = client.api_base().to_string();
                let health_client = client.clone();
                let task = Task::perform(async move { health_client.health().await }, Message::HealthChecked);
                match InferenceWorker::spawn(client) {
                    Ok(worker) => (Some(worker), task),
                    Err(e) => {
                        tracing::error!(error = %e, "could not start inference worker");
                        display_data.upload.error = Some(format!("Analysis is unavailable: {e}"));
                        (None, task)
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "could not build inference client");
                display_data.service_status = ServiceStatus::Offline(e.to_string());
                (None, Task::none())
            }
        };

        let app = Self {
            worker,
            _session: session,
            upload_handoff,
            results_handoff,
            display_data,
        };
        (app, health_task)
    }

    /// Handles application state updates based on incoming messages.
    fn update(&mut self, message: Message) {
        if !matches!(message, Message::Tick) {
            tracing::debug!(?message, "update");
        }

        match message {
            Message::PathChanged(path) => {
                self.display_data.upload.path_input = path;
            }
            Message::ChooseFile => self.choose_file(),
            Message::RemoveFile => {
                self.display_data.upload.file = None;
                self.display_data.upload.error = None;
            }
            Message::Analyze => self.analyze(),
            Message::CancelAnalysis => {
                if let Some(worker) = self.worker.as_mut() {
                    worker.abandon();
                }
                self.display_data.upload.loading = false;
            }
            Message::OpenResults => {
                if let Some(worker) = self.worker.as_mut() {
                    worker.abandon();
                }
                self.display_data.upload.loading = false;
                self.show_results();
            }
            Message::AnalyzeAnother => {
                self.results_handoff.clear();
                self.display_data.screen = Screen::Upload;
                self.display_data.upload = UploadDisplay::default();
            }
            Message::HealthChecked(outcome) => {
                self.display_data.service_status = match outcome {
                    Ok(()) => ServiceStatus::Online,
                    Err(e) => {
                        tracing::warn!(error = %e, "analysis service health check failed");
                        ServiceStatus::Offline(e.to_string())
                    }
                };
            }
            Message::Tick => {
                let outcome = self.worker.as_mut().and_then(InferenceWorker::poll);
                if let Some(outcome) = outcome {
                    self.process_outcome(outcome);
                }
            }
        }
    }

    /// Describes the typed path and validates it before selecting it.
    fn choose_file(&mut self) {
        let upload = &mut self.display_data.upload;
        let path = upload.path_input.trim();
        if path.is_empty() {
            return;
        }

        let file = match AudioFile::from_path(path) {
            Ok(file) => file,
            Err(e) => {
                upload.error = Some(format!("Could not open {path}: {e}"));
                return;
            }
        };

        match upload::validate(file.clone()) {
            Ok(_) => {
                upload.file = Some(file);
                upload.error = None;
            }
            Err(e) => upload.error = Some(e.to_string()),
        }
    }

    /// Re-validates the selection and hands it to the worker.
    fn analyze(&mut self) {
        let upload = &mut self.display_data.upload;
        if upload.loading {
            return;
        }
        let Some(file) = upload.file.clone() else {
            return;
        };

        let accepted = match upload::validate(file) {
            Ok(accepted) => accepted,
            Err(e) => {
                upload.error = Some(e.to_string());
                return;
            }
        };

        let Some(worker) = self.worker.as_mut() else {
            upload.error = Some("Analysis is unavailable.".to_string());
            return;
        };

        match worker.submit(accepted) {
            Ok(id) => {
                // A new analysis supersedes anything handed off earlier.
                self.upload_handoff.clear();
                tracing::info!(id, "analysis started");
                upload.error = None;
                upload.loading = true;
            }
            Err(e) => upload.error = Some(e.to_string()),
        }
    }

    /// Handles the worker's answer for the pending analysis.
    fn process_outcome(&mut self, outcome: InferenceOutcome) {
        self.display_data.upload.loading = false;
        match outcome.result {
            Ok(result) => match self.upload_handoff.put(&result) {
                Ok(()) => self.show_results(),
                Err(e) => {
                    tracing::error!(error = %e, "could not hand off analysis result");
                    self.display_data.upload.error = Some("Upload failed.".to_string());
                }
            },
            Err(e) => self.display_data.upload.error = Some(e.to_string()),
        }
    }

    /// Switches to the results step, loading whatever was handed off.
    fn show_results(&mut self) {
        self.display_data.results = match self.results_handoff.take() {
            Ok(result) => ResultsDisplay::Ready(Box::new(AnalysisReport::build(&result))),
            Err(e) => ResultsDisplay::Unavailable(e.to_string()),
        };
        self.display_data.screen = Screen::Results;
    }

    fn view(&self) -> Element<'_, Message> {
        match self.display_data.screen {
            Screen::Upload => ui::upload_view::create_upload_view(&self.display_data),
            Screen::Results => ui::results_view::create_results_view(&self.display_data.results),
        }
    }

    /// Polls the worker only while an analysis is pending.
    fn subscription(&self) -> Subscription<Message> {
        let busy = self.worker.as_ref().is_some_and(InferenceWorker::is_busy);
        if busy {
            iced::time::every(std::time::Duration::from_millis(POLL_INTERVAL_MS))
                .map(|_| Message::Tick)
        } else {
            Subscription::none()
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}
