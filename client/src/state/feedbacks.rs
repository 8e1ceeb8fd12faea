//! Per-radiologist record browsing for administrators.

#[cfg(test)]
#[path = "feedbacks_test.rs"]
mod feedbacks_test;

use super::export::ExportForm;
use super::records::RecordsState;
use crate::net::api::ApiError;
use crate::net::types::{DiagnosticRecord, Radiologist};

#[derive(Clone, Debug, Default)]
pub struct FeedbacksState {
    pub radiologists: Vec<Radiologist>,
    pub selected: Option<String>,
    pub records: RecordsState,
    pub export: ExportForm,
}

impl FeedbacksState {
    /// Pick a radiologist chip. Returns the id to fetch, or `None` when the
    /// chip was already selected.
    pub fn select(&mut self, id: &str) -> Option<String> {
        if self.selected.as_deref() == Some(id) {
            return None;
        }
        self.selected = Some(id.to_owned());
        self.records = RecordsState::loading();
        Some(id.to_owned())
    }

    /// Apply a fetch result. Results for a chip that is no longer selected
    /// are dropped.
    pub fn finish_records(&mut self, id: &str, outcome: Result<Vec<DiagnosticRecord>, ApiError>) {
        if self.selected.as_deref() != Some(id) {
            log::debug!("feedbacks: dropping records for deselected radiologist {id}");
            return;
        }
        match outcome {
            Ok(items) => self.records.set_items(items),
            Err(e) => {
                log::warn!("feedbacks: records for {id} failed: {e}");
                self.records.loading = false;
                self.records.error = Some("No se pudieron cargar los registros.".to_owned());
            }
        }
    }

    #[must_use]
    pub fn selected_name(&self) -> Option<&str> {
        let id = self.selected.as_deref()?;
        self.radiologists.iter().find(|r| r.id == id).map(|r| r.username.as_str())
    }
}
