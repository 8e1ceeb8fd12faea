//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the shell chrome and the pieces shared between pages
//! while reading shared state from Leptos context providers.

pub mod app_shell;
pub mod confirm_dialog;
pub mod export_panel;
pub mod notice_toast;
pub mod prediction_list;
pub mod record_card;
