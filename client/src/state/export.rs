//! Bulk export form: validation into an [`ExportQuery`] and download naming.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use time::Date;

use crate::net::api::{ExportFile, ExportQuery};
use crate::net::types::ExportFormat;
use crate::util::format::{format_date, parse_leading_date};

pub const EXPORT_FAILED_TEXT: &str = "Error al exportar los registros";
pub const EXPORT_OK_TEXT: &str = "Exportación descargada";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("Fecha inválida: {value}")]
    InvalidDate { value: String },
    #[error("La fecha inicial no puede ser posterior a la fecha final.")]
    InvertedRange,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportForm {
    /// Radiologist id; blank exports every user.
    pub user_id: String,
    pub date_from: String,
    pub date_to: String,
    pub format: ExportFormat,
    pub include_images: bool,
    pub busy: bool,
}

impl ExportForm {
    /// Build the request query.
    ///
    /// # Errors
    ///
    /// A non-blank date that does not parse, or `date_from` after `date_to`.
    pub fn to_query(&self) -> Result<ExportQuery, ExportError> {
        let from = optional_date(&self.date_from)?;
        let to = optional_date(&self.date_to)?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(ExportError::InvertedRange);
            }
        }
        let user_id = self.user_id.trim();
        Ok(ExportQuery {
            user_id: (!user_id.is_empty()).then(|| user_id.to_owned()),
            date_from: from.map(format_date),
            date_to: to.map(format_date),
            format: self.format,
            include_images: self.format.supports_images() && self.include_images,
        })
    }

    /// Switching away from ZIP drops the image flag.
    pub fn set_format(&mut self, format: ExportFormat) {
        self.format = format;
        if !format.supports_images() {
            self.include_images = false;
        }
    }
}

fn optional_date(raw: &str) -> Result<Option<Date>, ExportError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    parse_leading_date(raw)
        .map(Some)
        .ok_or_else(|| ExportError::InvalidDate { value: raw.to_owned() })
}

/// Name for the saved file: the server's choice, else `registros_<today>.<ext>`.
#[must_use]
pub fn download_file_name(file: &ExportFile, format: ExportFormat, today: Date) -> String {
    match &file.file_name {
        Some(name) => name.clone(),
        None => format!("registros_{}.{}", format_date(today), format.as_str()),
    }
}
