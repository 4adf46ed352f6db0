//! UI module for the checklist GUI
//!
//! Every function here is a pure `state -> Element` view; interaction goes
//! back through [`crate::Message`].
//!
//! # Panel Structure
//! - `header` - Title, permit type picker, permit description
//! - `profile_selector` - One checkbox per applicant profile
//! - `progress_panel` - Progress bar, percentage, reset button
//! - `documents_panel` - Document cards grouped by category
//! - `links_panel` - Important links and "last verified" line
//! - `status_bar` - Bottom status messages
//!
//! # Overlays
//! - `modal` - Notes editor, reset confirmation, alerts

pub mod header;
pub mod profile_selector;
pub mod progress_panel;
pub mod documents_panel;
pub mod links_panel;
pub mod status_bar;

pub mod modal;

/// Secondary text colour
pub const MUTED: [f32; 3] = [0.5, 0.5, 0.5];

/// Error text colour
pub const DANGER: [f32; 3] = [0.8, 0.2, 0.2];
