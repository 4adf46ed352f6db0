//! # Permit Checklist GUI
//!
//! Graphical front end for the permit document checklist. Built with Iced
//! for native (Windows, macOS, Linux) and WASM/WebGPU targets.
//!
//! The [`App`] owns a [`Tracker`] and never talks to the backend directly:
//! each [`Message`] updates the tracker and returns at most one [`Task`]
//! running a [`session`] workflow, whose result comes back as another message.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use iced::keyboard::{self, key::Named, Key};
use iced::widget::{button, column, container, scrollable, stack, text, text_editor, Column, Space};
use iced::{event, window, Element, Event, Length, Subscription, Task};
use tracing::{debug, error, info, warn};

use checklist_core::config::{self, Config};
use checklist_core::display::parse_due_date_input;
use checklist_core::tracker::ReferenceData;
use checklist_core::{
    session, Checklist, ChecklistApi, ChecklistError, ChecklistKey, ChecklistResult, HttpApi, MemoryApi,
    PendingToggle, ProgressSummary, Tracker,
};

mod browser;
mod ui;

use ui::header::PermitChoice;
use ui::modal::ModalType;

const ALERT_STARTUP: &str = "Failed to load application. Please refresh the page.";
const ALERT_DOCUMENTS: &str = "Failed to load documents";
const ALERT_TOGGLE: &str = "Failed to update document status";
const ALERT_NOTES: &str = "Failed to save notes";
const ALERT_RESET: &str = "Failed to reset progress";

#[cfg(not(target_arch = "wasm32"))]
fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    run()
}

#[cfg(target_arch = "wasm32")]
fn main() -> iced::Result {
    console_error_panic_hook::set_once();
    run()
}

fn run() -> iced::Result {
    iced::application(App::boot, App::update, App::view)
        .title(App::title)
        .subscription(App::subscription)
        .window_size((960.0, 820.0))
        .run()
}

/// Pick the backend from configuration.
fn connect(cfg: &Config) -> ChecklistResult<(Arc<dyn ChecklistApi>, String)> {
    if cfg.demo {
        info!("demo mode: using the built-in sample catalogue");
        return Ok((Arc::new(MemoryApi::sample()), "Demo data".to_string()));
    }
    let api = HttpApi::from_config(cfg)?;
    let label = api.base_url().to_string();
    info!(api = %label, "using checklist API");
    Ok((Arc::new(api), label))
}

/// Top-level screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    /// Startup failed; the message is the technical cause
    Failed(String),
}

#[derive(Debug, Clone)]
pub enum Message {
    // Startup
    ReferenceLoaded(ChecklistResult<ReferenceData>),
    Reload,

    // Selection
    PermitSelected(PermitChoice),
    ProfileToggled(String),
    ChecklistLoaded(ChecklistKey, ChecklistResult<Checklist>),
    ProfilesApplied(ChecklistKey, ChecklistResult<Checklist>),

    // Completion
    ToggleDocument(String),
    ToggleSaved(ChecklistResult<Option<ProgressSummary>>),

    // Notes editor
    OpenNotes(String),
    NotesAction(text_editor::Action),
    DueDateChanged(String),
    ClearDueDate,
    SaveNotes,
    NotesSaved {
        document_id: String,
        notes: String,
        due_date: Option<NaiveDate>,
        result: ChecklistResult<()>,
    },

    // Reset
    ResetRequested,
    ResetConfirmed,
    ResetFinished(ChecklistResult<Checklist>),

    // Misc
    ModalCancel,
    OpenUrl(String),
}

pub struct App {
    api: Option<Arc<dyn ChecklistApi>>,
    backend: String,
    phase: Phase,
    tracker: Tracker,

    /// A mutation chain is in flight; mutation controls are disabled
    busy: bool,
    pending_toggle: Option<PendingToggle>,

    modal: Option<ModalType>,
    notes_editor: text_editor::Content,
    due_date_input: String,

    status: String,
}

impl App {
    fn boot() -> (Self, Task<Message>) {
        let connected = config::from_environment(browser::default_api_base())
            .map_err(ChecklistError::from)
            .and_then(|cfg| connect(&cfg));

        match connected {
            Ok((api, backend)) => {
                let app = App::new(Some(api), backend);
                let task = app.load_reference();
                (app, task)
            }
            Err(e) => {
                error!(code = e.error_code(), error = %e, "configuration error");
                let mut app = App::new(None, String::new());
                app.phase = Phase::Failed(e.to_string());
                app.status = "Configuration error".to_string();
                (app, Task::none())
            }
        }
    }

    fn new(api: Option<Arc<dyn ChecklistApi>>, backend: String) -> Self {
        App {
            api,
            backend,
            phase: Phase::Loading,
            tracker: Tracker::default(),
            busy: false,
            pending_toggle: None,
            modal: None,
            notes_editor: text_editor::Content::new(),
            due_date_input: String::new(),
            status: "Loading...".to_string(),
        }
    }

    fn title(&self) -> String {
        match self.tracker.current_permit() {
            Some(permit) => format!("Permit Checklist - {}", permit.name_en),
            None => "Permit Checklist".to_string(),
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window: window::Id| match event {
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: Key::Named(Named::Escape),
                ..
            }) => Some(Message::ModalCancel),
            _ => None,
        })
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ReferenceLoaded(Ok(data)) => {
                self.tracker = Tracker::new(data);
                self.phase = Phase::Ready;
                self.status = "Ready".to_string();
                Task::none()
            }
            Message::ReferenceLoaded(Err(e)) => {
                error!(code = e.error_code(), error = %e, "startup failed");
                self.phase = Phase::Failed(e.to_string());
                self.status = ALERT_STARTUP.to_string();
                Task::none()
            }
            Message::Reload => {
                if self.api.is_none() {
                    return Task::none();
                }
                self.phase = Phase::Loading;
                self.status = "Loading...".to_string();
                self.load_reference()
            }

            Message::PermitSelected(choice) => {
                self.modal = None;
                match self.tracker.select_permit(choice.id.as_deref()) {
                    Some(key) => {
                        self.status = "Loading documents...".to_string();
                        let Some(api) = self.api.clone() else {
                            return Task::none();
                        };
                        Task::perform(
                            async move { (key.clone(), session::load_checklist(api.as_ref(), key).await) },
                            |(key, result)| Message::ChecklistLoaded(key, result),
                        )
                    }
                    None => {
                        self.status = "Ready".to_string();
                        Task::none()
                    }
                }
            }
            Message::ProfileToggled(profile_id) => {
                if self.busy {
                    return Task::none();
                }
                let Some(api) = self.api.clone() else {
                    return Task::none();
                };
                match self.tracker.toggle_profile(&profile_id) {
                    Some(key) => {
                        self.busy = true;
                        Task::perform(
                            async move { (key.clone(), session::change_profiles(api.as_ref(), key).await) },
                            |(key, result)| Message::ProfilesApplied(key, result),
                        )
                    }
                    None => {
                        let profiles = self.tracker.selected_profiles().clone();
                        Task::future(async move { session::save_profiles_best_effort(api.as_ref(), &profiles).await })
                            .discard()
                    }
                }
            }
            Message::ChecklistLoaded(key, result) => {
                self.apply_loaded(&key, result);
                Task::none()
            }
            Message::ProfilesApplied(key, result) => {
                self.busy = false;
                self.apply_loaded(&key, result);
                Task::none()
            }

            Message::ToggleDocument(document_id) => {
                if self.busy || self.pending_toggle.is_some() {
                    return Task::none();
                }
                let (Some(api), Some(key)) = (self.api.clone(), self.tracker.checklist_key()) else {
                    return Task::none();
                };
                let pending = match self.tracker.begin_toggle(&document_id) {
                    Ok(pending) => pending,
                    Err(e) => {
                        warn!(error = %e, "toggle ignored");
                        return Task::none();
                    }
                };
                let complete = pending.target();
                self.pending_toggle = Some(pending);
                self.busy = true;
                Task::perform(
                    async move { session::set_completion(api.as_ref(), &key, &document_id, complete).await },
                    Message::ToggleSaved,
                )
            }
            Message::ToggleSaved(result) => {
                self.busy = false;
                let Some(pending) = self.pending_toggle.take() else {
                    return Task::none();
                };
                match result {
                    Ok(progress) => {
                        self.status = if pending.target() {
                            "Marked complete".to_string()
                        } else {
                            "Marked incomplete".to_string()
                        };
                        self.tracker.commit_toggle(pending, progress);
                    }
                    Err(e) => {
                        self.tracker.rollback_toggle(pending);
                        self.alert(ALERT_TOGGLE, &e);
                    }
                }
                Task::none()
            }

            Message::OpenNotes(document_id) => {
                if self.busy {
                    return Task::none();
                }
                match self.tracker.open_editor(&document_id) {
                    Ok(draft) => {
                        self.notes_editor = text_editor::Content::with_text(&draft.notes);
                        self.due_date_input = draft.due_date;
                        self.modal = Some(ModalType::Notes {
                            document_id: draft.document_id,
                            title: draft.title,
                            error: None,
                        });
                    }
                    Err(e) => warn!(error = %e, "notes editor not opened"),
                }
                Task::none()
            }
            Message::NotesAction(action) => {
                self.notes_editor.perform(action);
                Task::none()
            }
            Message::DueDateChanged(value) => {
                self.due_date_input = value;
                Task::none()
            }
            Message::ClearDueDate => {
                self.due_date_input.clear();
                Task::none()
            }
            Message::SaveNotes => self.save_notes(),
            Message::NotesSaved {
                document_id,
                notes,
                due_date,
                result,
            } => {
                self.busy = false;
                match result {
                    Ok(()) => {
                        self.tracker.apply_annotations(&document_id, &notes, due_date);
                        if matches!(&self.modal, Some(ModalType::Notes { document_id: open, .. }) if *open == document_id)
                        {
                            self.modal = None;
                        }
                        self.status = "Notes saved".to_string();
                    }
                    Err(e) => {
                        error!(code = e.error_code(), error = %e, "{ALERT_NOTES}");
                        if let Some(ModalType::Notes { error, .. }) = &mut self.modal {
                            *error = Some(ALERT_NOTES.to_string());
                        } else {
                            self.alert(ALERT_NOTES, &e);
                        }
                    }
                }
                Task::none()
            }

            Message::ResetRequested => {
                if !self.busy && self.tracker.checklist_key().is_some() {
                    self.modal = Some(ModalType::ConfirmReset);
                }
                Task::none()
            }
            Message::ResetConfirmed => {
                self.modal = None;
                if self.busy {
                    return Task::none();
                }
                let (Some(api), Some(key)) = (self.api.clone(), self.tracker.checklist_key()) else {
                    return Task::none();
                };
                self.busy = true;
                Task::perform(
                    async move { session::reset_permit(api.as_ref(), key).await },
                    Message::ResetFinished,
                )
            }
            Message::ResetFinished(result) => {
                self.busy = false;
                match result {
                    Ok(checklist) => {
                        self.tracker.apply_checklist(checklist);
                        self.status = "Progress reset".to_string();
                    }
                    Err(e) => self.alert(ALERT_RESET, &e),
                }
                Task::none()
            }

            Message::ModalCancel => {
                if matches!(self.modal, Some(ModalType::Notes { .. })) {
                    self.tracker.close_editor();
                }
                self.modal = None;
                Task::none()
            }
            Message::OpenUrl(url) => {
                debug!(url, "opening link");
                browser::open_url(&url);
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let body: Element<'_, Message> = match &self.phase {
            Phase::Loading => container(text("Loading...").size(14))
                .center(Length::Fill)
                .into(),
            Phase::Failed(cause) => self.view_failed(cause),
            Phase::Ready => self.view_ready(),
        };

        let main = column![
            body,
            ui::status_bar::view_status_bar(&self.backend, self.busy, &self.status),
        ]
        .padding(12);

        match &self.modal {
            Some(modal) => stack![
                main,
                ui::modal::view_backdrop(),
                ui::modal::view_modal(modal, &self.notes_editor, &self.due_date_input, self.busy),
            ]
            .into(),
            None => main.into(),
        }
    }

    fn view_ready(&self) -> Element<'_, Message> {
        let mut content: Column<'_, Message> = column![ui::header::view_header(&self.tracker)].spacing(16);

        if self.tracker.current_permit().is_some() {
            content = content.push(ui::profile_selector::view_profile_selector(&self.tracker, self.busy));
            if let Some(progress) = self.tracker.progress() {
                content = content.push(ui::progress_panel::view_progress_panel(progress, self.busy));
            }
            content = content.push(ui::documents_panel::view_documents_panel(&self.tracker, today(), self.busy));
            content = content.push(ui::links_panel::view_links_panel(
                self.tracker.important_links(),
                self.tracker.metadata(),
            ));
        }

        scrollable(content.padding(8)).height(Length::Fill).into()
    }

    fn view_failed<'a>(&self, cause: &'a str) -> Element<'a, Message> {
        let mut reload = button(text("Reload").size(12)).style(button::primary);
        if self.api.is_some() {
            reload = reload.on_press(Message::Reload);
        }

        container(
            column![
                text(ALERT_STARTUP).size(16),
                text(cause).size(11).color(ui::MUTED),
                Space::new().height(12),
                reload,
            ]
            .spacing(6)
            .align_x(iced::Alignment::Center),
        )
        .center(Length::Fill)
        .into()
    }

    fn load_reference(&self) -> Task<Message> {
        let Some(api) = self.api.clone() else {
            return Task::none();
        };
        Task::perform(
            async move { session::load_reference_data(api.as_ref()).await },
            Message::ReferenceLoaded,
        )
    }

    fn apply_loaded(&mut self, key: &ChecklistKey, result: ChecklistResult<Checklist>) {
        match result {
            Ok(checklist) => {
                if self.tracker.apply_checklist(checklist) {
                    self.status = self
                        .tracker
                        .progress()
                        .map(|p| p.stats_line())
                        .unwrap_or_default();
                }
            }
            Err(e) => {
                if self.tracker.abandon_checklist(key) {
                    self.alert(ALERT_DOCUMENTS, &e);
                } else {
                    debug!(permit = %key.permit_id, error = %e, "ignoring failure for a checklist no longer shown");
                }
            }
        }
    }

    fn save_notes(&mut self) -> Task<Message> {
        if self.busy {
            return Task::none();
        }
        let Some(ModalType::Notes { document_id, error, .. }) = &mut self.modal else {
            return Task::none();
        };
        let due_date = match parse_due_date_input(&self.due_date_input) {
            Ok(due_date) => due_date,
            Err(e) => {
                *error = Some(e.to_string());
                return Task::none();
            }
        };
        *error = None;

        let Some(api) = self.api.clone() else {
            return Task::none();
        };
        let document_id = document_id.clone();
        let notes = self.notes_editor.text().trim().to_string();
        self.busy = true;

        Task::perform(
            async move {
                let result = session::save_annotations(api.as_ref(), &document_id, &notes, due_date).await;
                (document_id, notes, due_date, result)
            },
            |(document_id, notes, due_date, result)| Message::NotesSaved {
                document_id,
                notes,
                due_date,
                result,
            },
        )
    }

    /// Show a user-facing alert and log the technical cause.
    fn alert(&mut self, message: &str, cause: &ChecklistError) {
        error!(code = cause.error_code(), error = %cause, "{message}");
        self.status = message.to_string();
        self.modal = Some(ModalType::Alert(message.to_string()));
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
