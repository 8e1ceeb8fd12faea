//! Analysis flow: image selection, inference, observation, save.
//!
//! DESIGN
//! ======
//! The flow is an explicit state machine over [`AnalysisPhase`]. Each network
//! step is split in two: `begin_*` validates and returns the payload to send
//! (or an error, in which case nothing is sent), and `finish_*` applies the
//! outcome. Payloads carry the generation they were issued under so a
//! response that lands after a reset is dropped.
//!
//! Timed behavior (notice expiry, post-save redirect) happens only in
//! [`AnalysisState::tick`], driven by the app clock.

#[cfg(test)]
#[path = "analysis_test.rs"]
mod analysis_test;

use time::Date;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::net::api::ApiError;
use crate::net::types::{DiagnosticRecord, PredictResponse, Prediction, encode_resultados};
use crate::state::notice::{NoticeKind, NoticeQueue};
use crate::util::format::{format_date, today_utc};
use crate::util::image::{ImageError, ImageUpload};

pub const ANALYSIS_FAILED_TEXT: &str = "Ocurrió un error al procesar la imagen.";
pub const SAVE_FAILED_TEXT: &str = "Error al guardar el registro";
pub const SAVE_OK_TEXT: &str = "Registro guardado correctamente";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnalysisPhase {
    #[default]
    Idle,
    ImageSelected,
    Analyzing,
    ResultsReady,
    Saving,
    Saved,
}

/// Editable patient fields. `key` and `inference_date` are generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatientField {
    BirthDate,
    Gender,
    City,
    Parish,
    Canton,
}

impl PatientField {
    pub const ALL: [Self; 5] = [Self::BirthDate, Self::Gender, Self::City, Self::Parish, Self::Canton];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::BirthDate => "Fecha de nacimiento",
            Self::Gender => "Género",
            Self::City => "Ciudad",
            Self::Parish => "Parroquia",
            Self::Canton => "Cantón",
        }
    }
}

pub const GENDER_OPTIONS: [&str; 3] = ["Masculino", "Femenino", "Otro"];

/// Patient metadata for one analysis session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientForm {
    pub key: Uuid,
    pub birth_date: String,
    pub gender: String,
    pub city: String,
    pub parish: String,
    pub canton: String,
    pub inference_date: Date,
}

impl PatientForm {
    #[must_use]
    pub fn new(key: Uuid, inference_date: Date) -> Self {
        Self {
            key,
            birth_date: String::new(),
            gender: String::new(),
            city: String::new(),
            parish: String::new(),
            canton: String::new(),
            inference_date,
        }
    }

    /// Blank form with a new random key dated today (UTC).
    #[must_use]
    pub fn fresh() -> Self {
        Self::new(Uuid::new_v4(), today_utc())
    }

    #[must_use]
    pub fn get(&self, field: PatientField) -> &str {
        match field {
            PatientField::BirthDate => &self.birth_date,
            PatientField::Gender => &self.gender,
            PatientField::City => &self.city,
            PatientField::Parish => &self.parish,
            PatientField::Canton => &self.canton,
        }
    }

    pub fn set(&mut self, field: PatientField, value: String) {
        let slot = match field {
            PatientField::BirthDate => &mut self.birth_date,
            PatientField::Gender => &mut self.gender,
            PatientField::City => &mut self.city,
            PatientField::Parish => &mut self.parish,
            PatientField::Canton => &mut self.canton,
        };
        *slot = value;
    }

    /// Required fields that are blank after trimming, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<PatientField> {
        PatientField::ALL.into_iter().filter(|f| self.get(*f).trim().is_empty()).collect()
    }
}

/// Validation failures of the flow. `Display` is the user-facing message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("Selecciona una imagen antes de analizar.")]
    NoImage,
    #[error("Hay una operación en curso. Espera a que termine.")]
    Busy,
    #[error("Completa los datos del paciente antes de analizar: {}.", field_list(.missing))]
    IncompleteForm { missing: Vec<PatientField> },
    #[error("Realiza el análisis antes de guardar.")]
    MissingResults,
    #[error("La observación debe tener al menos {min} caracteres.")]
    ObservationTooShort { min: usize },
    #[error(transparent)]
    Image(#[from] ImageError),
}

fn field_list(fields: &[PatientField]) -> String {
    fields.iter().map(|f| f.label()).collect::<Vec<_>>().join(", ")
}

/// Signals the page must act on after a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowSignal {
    /// The save delay elapsed; the flow was reset and history should open.
    OpenHistory,
}

/// A payload issued by a `begin_*` call, tagged with its generation.
#[derive(Clone, Debug, PartialEq)]
pub struct Pending<T> {
    pub generation: u64,
    pub payload: T,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlowSettings {
    pub notice_ttl_ms: u64,
    pub redirect_delay_ms: u64,
    pub min_observation_chars: usize,
}

impl From<&ClientConfig> for FlowSettings {
    fn from(cfg: &ClientConfig) -> Self {
        Self {
            notice_ttl_ms: cfg.notice_ttl_ms,
            redirect_delay_ms: cfg.redirect_delay_ms,
            min_observation_chars: cfg.min_observation_chars,
        }
    }
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

/// State of the analysis page.
#[derive(Clone, Debug)]
pub struct AnalysisState {
    pub phase: AnalysisPhase,
    pub settings: FlowSettings,
    pub form: PatientForm,
    pub image: Option<ImageUpload>,
    pub predictions: Vec<Prediction>,
    pub precision: Option<f64>,
    pub observation: String,
    pub notices: NoticeQueue,
    redirect_at_ms: Option<u64>,
    generation: u64,
}

impl Default for AnalysisState {
    fn default() -> Self {
        Self::new(FlowSettings::default(), PatientForm::fresh())
    }
}

impl AnalysisState {
    #[must_use]
    pub fn new(settings: FlowSettings, form: PatientForm) -> Self {
        Self {
            phase: AnalysisPhase::Idle,
            settings,
            form,
            image: None,
            predictions: Vec::new(),
            precision: None,
            observation: String::new(),
            notices: NoticeQueue::default(),
            redirect_at_ms: None,
            generation: 0,
        }
    }

    /// A request is in flight; triggering controls are disabled.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, AnalysisPhase::Analyzing | AnalysisPhase::Saving)
    }

    /// Results panel is visible.
    #[must_use]
    pub fn shows_results(&self) -> bool {
        matches!(self.phase, AnalysisPhase::ResultsReady | AnalysisPhase::Saving | AnalysisPhase::Saved)
    }

    #[must_use]
    pub fn can_analyze(&self) -> bool {
        self.image.is_some() && !self.is_busy() && self.phase != AnalysisPhase::Saved
    }

    #[must_use]
    pub fn can_save(&self) -> bool {
        self.phase == AnalysisPhase::ResultsReady
    }

    // -------------------------------------------------------------------------
    // image selection
    // -------------------------------------------------------------------------

    /// Accept a picked or dropped file.
    ///
    /// Any previous results are discarded. Rejected files leave the state
    /// untouched and queue a warning.
    ///
    /// # Errors
    ///
    /// [`FlowError::Busy`] while a request is in flight or after saving, and
    /// [`FlowError::Image`] for empty or non-image files.
    pub fn select_file(&mut self, file_name: &str, content_type: &str, bytes: Vec<u8>, now_ms: u64) -> Result<(), FlowError> {
        if self.is_busy() || self.phase == AnalysisPhase::Saved {
            return Err(self.warn(FlowError::Busy, now_ms));
        }
        let upload = match ImageUpload::new(file_name, content_type, bytes) {
            Ok(upload) => upload,
            Err(e) => return Err(self.warn(e.into(), now_ms)),
        };
        self.image = Some(upload);
        self.predictions.clear();
        self.precision = None;
        self.phase = AnalysisPhase::ImageSelected;
        Ok(())
    }

    pub fn set_field(&mut self, field: PatientField, value: String) {
        self.form.set(field, value);
    }

    pub fn set_observation(&mut self, text: String) {
        self.observation = text;
    }

    // -------------------------------------------------------------------------
    // inference
    // -------------------------------------------------------------------------

    /// Validate and move to `Analyzing`, returning the image to upload.
    ///
    /// # Errors
    ///
    /// Returns a [`FlowError`] (and queues a warning) when no image is
    /// selected or the patient form is incomplete; no request must be sent.
    pub fn begin_analysis(&mut self, now_ms: u64) -> Result<Pending<ImageUpload>, FlowError> {
        if self.is_busy() || self.phase == AnalysisPhase::Saved {
            return Err(FlowError::Busy);
        }
        let Some(image) = self.image.clone() else {
            return Err(self.warn(FlowError::NoImage, now_ms));
        };
        let missing = self.form.missing_fields();
        if !missing.is_empty() {
            return Err(self.warn(FlowError::IncompleteForm { missing }, now_ms));
        }
        self.predictions.clear();
        self.precision = None;
        self.phase = AnalysisPhase::Analyzing;
        Ok(Pending { generation: self.generation, payload: image })
    }

    /// Apply the predict outcome issued under `generation`.
    pub fn finish_analysis(&mut self, generation: u64, outcome: Result<PredictResponse, ApiError>, now_ms: u64) {
        if generation != self.generation || self.phase != AnalysisPhase::Analyzing {
            log::debug!("dropping stale predict response");
            return;
        }
        match outcome {
            Ok(resp) => {
                self.predictions = resp.predictions;
                self.precision = resp.precision;
                self.phase = AnalysisPhase::ResultsReady;
            }
            Err(e) => {
                log::warn!("predict failed: {e}");
                self.phase = AnalysisPhase::ImageSelected;
                self.notices.push(NoticeKind::Error, ANALYSIS_FAILED_TEXT, now_ms, self.settings.notice_ttl_ms);
            }
        }
    }

    // -------------------------------------------------------------------------
    // save
    // -------------------------------------------------------------------------

    /// Validate and move to `Saving`, returning the record to persist.
    ///
    /// # Errors
    ///
    /// Returns a [`FlowError`] (and queues a warning) when there are no
    /// results yet or the observation is shorter than the configured minimum.
    pub fn begin_save(&mut self, now_ms: u64) -> Result<Pending<DiagnosticRecord>, FlowError> {
        if self.is_busy() || self.phase == AnalysisPhase::Saved {
            return Err(FlowError::Busy);
        }
        if self.phase != AnalysisPhase::ResultsReady {
            return Err(self.warn(FlowError::MissingResults, now_ms));
        }
        let min = self.settings.min_observation_chars;
        if self.observation.trim().chars().count() < min {
            return Err(self.warn(FlowError::ObservationTooShort { min }, now_ms));
        }
        let record = self.build_record();
        self.phase = AnalysisPhase::Saving;
        Ok(Pending { generation: self.generation, payload: record })
    }

    /// Apply the save outcome issued under `generation`.
    pub fn finish_save(&mut self, generation: u64, outcome: Result<(), ApiError>, now_ms: u64) {
        if generation != self.generation || self.phase != AnalysisPhase::Saving {
            log::debug!("dropping stale save response");
            return;
        }
        match outcome {
            Ok(()) => {
                self.phase = AnalysisPhase::Saved;
                self.notices.push(NoticeKind::Success, SAVE_OK_TEXT, now_ms, self.settings.notice_ttl_ms);
                self.redirect_at_ms = Some(now_ms.saturating_add(self.settings.redirect_delay_ms));
            }
            Err(e) => {
                log::warn!("save failed: {e}");
                self.phase = AnalysisPhase::ResultsReady;
                self.notices.push(NoticeKind::Error, SAVE_FAILED_TEXT, now_ms, self.settings.notice_ttl_ms);
            }
        }
    }

    fn build_record(&self) -> DiagnosticRecord {
        DiagnosticRecord {
            key: self.form.key.to_string(),
            inference_date: format_date(self.form.inference_date),
            birth_date: self.form.birth_date.clone(),
            gender: self.form.gender.clone(),
            city: self.form.city.clone(),
            parish: self.form.parish.clone(),
            canton: self.form.canton.clone(),
            precision: self.precision,
            resultados: encode_resultados(&self.predictions),
            feedback: self.observation.clone(),
            image: self.image.as_ref().map(|i| i.data_url.clone()).unwrap_or_default(),
        }
    }

    // -------------------------------------------------------------------------
    // clock + reset
    // -------------------------------------------------------------------------

    /// `tick(now_ms)` would change something. Lets the page skip writing the
    /// signal on idle ticks.
    #[must_use]
    pub fn tick_due(&self, now_ms: u64) -> bool {
        self.notices.has_expired(now_ms)
            || (self.phase == AnalysisPhase::Saved && self.redirect_at_ms.is_some_and(|at| now_ms >= at))
    }

    /// Advance time: expire notices and fire the post-save redirect.
    pub fn tick(&mut self, now_ms: u64) -> Option<FlowSignal> {
        self.notices.expire(now_ms);
        match self.redirect_at_ms {
            Some(at) if self.phase == AnalysisPhase::Saved && now_ms >= at => {
                self.reset();
                Some(FlowSignal::OpenHistory)
            }
            _ => None,
        }
    }

    /// Back to `Idle` with a fresh form. In-flight responses become stale.
    pub fn reset(&mut self) {
        self.reset_with(PatientForm::fresh());
    }

    pub(crate) fn reset_with(&mut self, form: PatientForm) {
        self.generation += 1;
        self.phase = AnalysisPhase::Idle;
        self.form = form;
        self.image = None;
        self.predictions.clear();
        self.precision = None;
        self.observation.clear();
        self.notices.clear();
        self.redirect_at_ms = None;
    }

    fn warn(&mut self, err: FlowError, now_ms: u64) -> FlowError {
        self.notices.push(NoticeKind::Warning, err.to_string(), now_ms, self.settings.notice_ttl_ms);
        err
    }
}
