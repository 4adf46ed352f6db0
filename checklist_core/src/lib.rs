//! # checklist_core - Permit Document Checklist
//!
//! `checklist_core` is the engine behind the checklist GUI: the wire model of
//! the checklist backend, a typed API client, and a pure view-state object
//! that the UI renders from. Everything except the API client is free of I/O,
//! so the behaviour of the app is testable without a window or a server.
//!
//! ## Design Philosophy
//!
//! - **Server-owned data**: the backend owns documents; the client caches the
//!   last fetch and mutates it optimistically
//! - **Explicit state**: [`Tracker`] changes only through named methods
//! - **Rich Errors**: structured [`ChecklistError`] values, not strings
//!
//! ## Quick Start
//!
//! ```rust
//! use checklist_core::api::MemoryApi;
//! use checklist_core::{session, Tracker};
//!
//! # futures::executor::block_on(async {
//! let api = MemoryApi::sample();
//! let mut tracker = Tracker::new(session::load_reference_data(&api).await?);
//!
//! if let Some(key) = tracker.select_permit(Some("carte_resident")) {
//!     let checklist = session::load_checklist(&api, key).await?;
//!     tracker.apply_checklist(checklist);
//! }
//! assert_eq!(tracker.progress().map(|p| p.percentage), Some(0));
//! # Ok::<(), checklist_core::ChecklistError>(())
//! # }).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`models`] - Wire types (documents, permit types, envelope)
//! - [`api`] - `ChecklistApi` trait, HTTP and in-memory backends
//! - [`tracker`] - View state and the optimistic toggle transaction
//! - [`session`] - Async workflows chaining API calls per user action
//! - [`grouping`] - Category ordering for rendering
//! - [`progress`] - Completion percentage and tone
//! - [`display`] - Due-date badges and text formatting
//! - [`selection`] - Profile filter
//! - [`config`] - YAML + environment configuration
//! - [`errors`] - Structured error types

pub mod api;
pub mod config;
pub mod display;
pub mod errors;
pub mod grouping;
pub mod models;
pub mod progress;
pub mod selection;
pub mod session;
pub mod tracker;

// Re-export commonly used types at crate root for convenience
pub use api::{ChecklistApi, HttpApi, MemoryApi};
pub use config::Config;
pub use errors::{ChecklistError, ChecklistResult};
pub use models::{Document, PermitType, ProgressSummary};
pub use selection::ProfileSelection;
pub use tracker::{Checklist, ChecklistKey, PendingToggle, Tracker};
