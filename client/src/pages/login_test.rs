use super::*;

#[test]
fn validate_credentials_trims_both_fields() {
    assert_eq!(
        validate_credentials("  dra.perez ", " clave "),
        Ok(("dra.perez".to_owned(), "clave".to_owned()))
    );
}

#[test]
fn validate_credentials_requires_both_fields() {
    assert_eq!(validate_credentials("", "clave"), Err(LoginError::MissingCredentials));
    assert_eq!(validate_credentials("ana", "   "), Err(LoginError::MissingCredentials));
    assert_eq!(LoginError::MissingCredentials.to_string(), "Completa usuario y contraseña.");
}

#[test]
fn rejected_credentials_map_to_rejected() {
    assert_eq!(LoginError::from(ApiError::Status { status: 401 }), LoginError::Rejected);
    assert_eq!(LoginError::from(ApiError::Status { status: 400 }), LoginError::Rejected);
}

#[test]
fn transport_failures_map_to_unreachable() {
    assert_eq!(LoginError::from(ApiError::Status { status: 503 }), LoginError::Unreachable);
    assert_eq!(LoginError::from(ApiError::Network("offline".to_owned())), LoginError::Unreachable);
    assert_eq!(LoginError::from(ApiError::Decode("bad json".to_owned())), LoginError::Unreachable);
}
