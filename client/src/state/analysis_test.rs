use super::*;
use crate::net::types::parse_resultados;
use time::Month;

// =============================================================
// Helpers
// =============================================================

fn settings() -> FlowSettings {
    FlowSettings { notice_ttl_ms: 3_000, redirect_delay_ms: 3_000, min_observation_chars: 10 }
}

fn fixed_form() -> PatientForm {
    let date = Date::from_calendar_date(2025, Month::June, 2).unwrap();
    PatientForm::new(Uuid::from_u128(0x1234), date)
}

fn new_state() -> AnalysisState {
    AnalysisState::new(settings(), fixed_form())
}

fn fill_form(state: &mut AnalysisState) {
    state.set_field(PatientField::BirthDate, "1980-01-15".to_owned());
    state.set_field(PatientField::Gender, "Femenino".to_owned());
    state.set_field(PatientField::City, "Guayaquil".to_owned());
    state.set_field(PatientField::Parish, "Tarqui".to_owned());
    state.set_field(PatientField::Canton, "Guayaquil".to_owned());
}

fn with_image(state: &mut AnalysisState) {
    state.select_file("torax.png", "image/png", vec![1, 2, 3], 0).unwrap();
}

fn cardiomegaly() -> PredictResponse {
    PredictResponse {
        predictions: vec![Prediction { label: "Cardiomegaly".to_owned(), probability: 0.87 }],
        precision: Some(0.9),
    }
}

fn ready_state() -> AnalysisState {
    let mut state = new_state();
    with_image(&mut state);
    fill_form(&mut state);
    let pending = state.begin_analysis(0).unwrap();
    state.finish_analysis(pending.generation, Ok(cardiomegaly()), 10);
    state
}

// =============================================================
// Defaults + selection
// =============================================================

#[test]
fn new_state_is_idle_and_empty() {
    let state = new_state();
    assert_eq!(state.phase, AnalysisPhase::Idle);
    assert!(state.image.is_none());
    assert!(state.notices.is_empty());
    assert!(!state.can_analyze());
}

#[test]
fn select_file_moves_to_image_selected() {
    let mut state = new_state();
    with_image(&mut state);
    assert_eq!(state.phase, AnalysisPhase::ImageSelected);
    assert!(state.image.as_ref().unwrap().data_url.starts_with("data:image/png;base64,"));
    assert!(state.can_analyze());
}

#[test]
fn select_file_rejects_non_image_and_keeps_state() {
    let mut state = new_state();
    let err = state.select_file("report.pdf", "application/pdf", vec![1], 0).unwrap_err();
    assert_eq!(err, FlowError::Image(ImageError::NotAnImage));
    assert_eq!(state.phase, AnalysisPhase::Idle);
    assert_eq!(state.notices.current().unwrap().kind, NoticeKind::Warning);
}

#[test]
fn selecting_new_image_discards_results() {
    let mut state = ready_state();
    assert_eq!(state.phase, AnalysisPhase::ResultsReady);
    state.select_file("otra.jpg", "image/jpeg", vec![7], 20).unwrap();
    assert_eq!(state.phase, AnalysisPhase::ImageSelected);
    assert!(state.predictions.is_empty());
    assert_eq!(state.precision, None);
}

#[test]
fn select_file_while_analyzing_is_busy() {
    let mut state = new_state();
    with_image(&mut state);
    fill_form(&mut state);
    state.begin_analysis(0).unwrap();
    assert_eq!(state.select_file("b.png", "image/png", vec![1], 0), Err(FlowError::Busy));
    assert_eq!(state.phase, AnalysisPhase::Analyzing);
    let notice = state.notices.current().unwrap();
    assert_eq!(notice.kind, NoticeKind::Warning);
    assert_eq!(notice.text, FlowError::Busy.to_string());
}

// =============================================================
// begin_analysis validation
// =============================================================

#[test]
fn analyze_with_empty_form_produces_no_request() {
    let mut state = new_state();
    with_image(&mut state);

    let result = state.begin_analysis(0);
    let Err(FlowError::IncompleteForm { missing }) = result else {
        panic!("expected incomplete form, got {result:?}");
    };
    assert_eq!(missing, PatientField::ALL.to_vec());
    assert_eq!(state.phase, AnalysisPhase::ImageSelected);

    let notice = state.notices.current().unwrap();
    assert_eq!(notice.kind, NoticeKind::Warning);
    assert!(notice.text.starts_with("Completa los datos del paciente"));
    assert!(notice.text.contains("Parroquia"));
}

#[test]
fn analyze_names_only_missing_fields() {
    let mut state = new_state();
    with_image(&mut state);
    fill_form(&mut state);
    state.set_field(PatientField::Canton, "   ".to_owned());
    assert_eq!(
        state.begin_analysis(0),
        Err(FlowError::IncompleteForm { missing: vec![PatientField::Canton] })
    );
}

#[test]
fn analyze_without_image_is_rejected() {
    let mut state = new_state();
    fill_form(&mut state);
    assert_eq!(state.begin_analysis(0), Err(FlowError::NoImage));
    assert_eq!(state.phase, AnalysisPhase::Idle);
}

#[test]
fn second_analyze_while_in_flight_is_busy() {
    let mut state = new_state();
    with_image(&mut state);
    fill_form(&mut state);
    state.begin_analysis(0).unwrap();
    assert_eq!(state.begin_analysis(1), Err(FlowError::Busy));
}

// =============================================================
// finish_analysis
// =============================================================

#[test]
fn successful_predict_shows_results() {
    let state = ready_state();
    assert_eq!(state.phase, AnalysisPhase::ResultsReady);
    assert!(state.shows_results());
    assert_eq!(state.predictions.len(), 1);
    assert_eq!(crate::util::format::format_percent(state.predictions[0].probability), "87.00%");
    assert_eq!(state.precision, Some(0.9));
}

#[test]
fn failed_predict_reverts_to_image_selected_with_error_notice() {
    let mut state = new_state();
    with_image(&mut state);
    fill_form(&mut state);
    let pending = state.begin_analysis(100).unwrap();
    state.finish_analysis(pending.generation, Err(ApiError::Status { status: 500 }), 200);

    assert_eq!(state.phase, AnalysisPhase::ImageSelected);
    assert!(state.image.is_some());
    let notice = state.notices.current().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.text, ANALYSIS_FAILED_TEXT);
    assert_eq!(notice.expires_at_ms, 3_200);
}

#[test]
fn predict_response_after_reset_is_dropped() {
    let mut state = new_state();
    with_image(&mut state);
    fill_form(&mut state);
    let pending = state.begin_analysis(0).unwrap();
    state.reset_with(fixed_form());
    state.finish_analysis(pending.generation, Ok(cardiomegaly()), 5);

    assert_eq!(state.phase, AnalysisPhase::Idle);
    assert!(state.predictions.is_empty());
}

// =============================================================
// save
// =============================================================

#[test]
fn save_blocked_by_short_observation() {
    let mut state = ready_state();
    state.set_observation("corto".to_owned());
    assert_eq!(state.begin_save(0), Err(FlowError::ObservationTooShort { min: 10 }));
    assert_eq!(state.phase, AnalysisPhase::ResultsReady);
    assert!(state.notices.current().unwrap().text.contains("10 caracteres"));
}

#[test]
fn save_counts_trimmed_characters() {
    let mut state = ready_state();
    state.set_observation("   áéíóú     ".to_owned());
    assert!(state.begin_save(0).is_err());
    state.set_observation("  áéíóúñ aaa  ".to_owned());
    assert!(state.begin_save(0).is_ok());
}

#[test]
fn save_without_results_points_to_analysis() {
    let mut state = new_state();
    with_image(&mut state);
    state.set_observation("Sin hallazgos relevantes".to_owned());
    assert_eq!(state.begin_save(0), Err(FlowError::MissingResults));
    assert_eq!(state.notices.current().unwrap().text, "Realiza el análisis antes de guardar.");
}

#[test]
fn save_builds_full_record() {
    let mut state = ready_state();
    state.set_observation("Silueta cardiaca aumentada".to_owned());
    let pending = state.begin_save(0).unwrap();
    let record = pending.payload;

    assert_eq!(state.phase, AnalysisPhase::Saving);
    assert_eq!(record.key, Uuid::from_u128(0x1234).to_string());
    assert_eq!(record.inference_date, "2025-06-02");
    assert_eq!(record.parish, "Tarqui");
    assert_eq!(record.precision, Some(0.9));
    assert_eq!(record.feedback, "Silueta cardiaca aumentada");
    assert!(record.image.starts_with("data:image/png;base64,"));
    assert_eq!(parse_resultados(&record.resultados), cardiomegaly().predictions);
}

#[test]
fn successful_save_redirects_after_delay_and_resets() {
    let mut state = ready_state();
    state.set_observation("Silueta cardiaca aumentada".to_owned());
    let old_key = state.form.key;
    let pending = state.begin_save(1_000).unwrap();
    state.finish_save(pending.generation, Ok(()), 1_000);

    assert_eq!(state.phase, AnalysisPhase::Saved);
    assert_eq!(state.notices.current().unwrap().text, SAVE_OK_TEXT);
    assert_eq!(state.tick(3_999), None);
    assert_eq!(state.phase, AnalysisPhase::Saved);

    assert_eq!(state.tick(4_000), Some(FlowSignal::OpenHistory));
    assert_eq!(state.phase, AnalysisPhase::Idle);
    assert!(state.image.is_none());
    assert!(state.observation.is_empty());
    assert_ne!(state.form.key, old_key);
    assert_eq!(state.tick(10_000), None);
}

#[test]
fn failed_save_returns_to_results() {
    let mut state = ready_state();
    state.set_observation("Silueta cardiaca aumentada".to_owned());
    let pending = state.begin_save(0).unwrap();
    state.finish_save(pending.generation, Err(ApiError::Network("offline".to_owned())), 50);

    assert_eq!(state.phase, AnalysisPhase::ResultsReady);
    assert_eq!(state.notices.current().unwrap().text, SAVE_FAILED_TEXT);
    assert_eq!(state.tick(100_000), None);
}

#[test]
fn actions_after_save_are_busy_until_reset() {
    let mut state = ready_state();
    state.set_observation("Silueta cardiaca aumentada".to_owned());
    let pending = state.begin_save(0).unwrap();
    assert_eq!(state.begin_save(0), Err(FlowError::Busy));
    state.finish_save(pending.generation, Ok(()), 0);
    assert_eq!(state.begin_analysis(0), Err(FlowError::Busy));
    assert_eq!(state.select_file("x.png", "image/png", vec![1], 0), Err(FlowError::Busy));
}

// =============================================================
// reset + tick
// =============================================================

#[test]
fn reset_clears_everything() {
    let mut state = ready_state();
    state.set_observation("algo".to_owned());
    state.notices.push(NoticeKind::Error, "x", 0, 10_000);
    state.reset_with(fixed_form());

    assert_eq!(state.phase, AnalysisPhase::Idle);
    assert!(state.image.is_none());
    assert!(state.predictions.is_empty());
    assert!(state.observation.is_empty());
    assert!(state.notices.is_empty());
    assert!(state.form.missing_fields().len() == PatientField::ALL.len());
}

#[test]
fn reset_regenerates_key_and_date() {
    let mut state = new_state();
    let old_key = state.form.key;
    state.reset();
    assert_ne!(state.form.key, old_key);
    assert_eq!(state.form.inference_date, crate::util::format::today_utc());
}

#[test]
fn tick_expires_notices() {
    let mut state = new_state();
    with_image(&mut state);
    let _ = state.begin_analysis(0);
    assert!(!state.notices.is_empty());
    state.tick(3_000);
    assert!(state.notices.is_empty());
}

#[test]
fn flow_error_messages_are_user_facing() {
    let err = FlowError::IncompleteForm { missing: vec![PatientField::City, PatientField::Gender] };
    assert_eq!(err.to_string(), "Completa los datos del paciente antes de analizar: Ciudad, Género.");
    assert_eq!(
        FlowError::ObservationTooShort { min: 10 }.to_string(),
        "La observación debe tener al menos 10 caracteres."
    );
}

#[test]
fn tick_due_only_when_something_changes() {
    let mut state = ready_state();
    assert!(!state.tick_due(1_000_000));

    state.set_observation("Opacidad basal derecha".to_owned());
    let pending = state.begin_save(1_000).unwrap();
    state.finish_save(pending.generation, Ok(()), 1_000);
    assert!(!state.tick_due(3_999));
    assert!(state.tick_due(4_000));
    assert_eq!(state.tick(4_000), Some(FlowSignal::OpenHistory));
    assert!(!state.tick_due(4_000));
}
