//! REST client for the ToraxVIEW backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR) and native tests: every call returns
//! [`ApiError::Unavailable`] since these endpoints are only meaningful in the
//! browser.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, ApiError>`. Callers turn errors into notices;
//! nothing here panics or retries.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::types::{DiagnosticRecord, ExportFormat, LoginResponse, PredictResponse, Radiologist, UserPayload};
#[cfg(feature = "hydrate")]
use super::types::{LoginRequest, parse_radiologist_list, parse_record_list};
use crate::util::image::ImageUpload;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request failed: {status}")]
    Status { status: u16 },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("not available on server")]
    Unavailable,
}

impl ApiError {
    /// The backend rejected the bearer token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403 })
    }
}

/// Query parameters of `GET /export/registros`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportQuery {
    pub user_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub format: ExportFormat,
    pub include_images: bool,
}

impl ExportQuery {
    /// Query pairs in a stable order. Absent filters are omitted and
    /// `include_images` is only sent for ZIP.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = &self.user_id {
            pairs.push(("user_id", id.clone()));
        }
        if let Some(from) = &self.date_from {
            pairs.push(("date_from", from.clone()));
        }
        if let Some(to) = &self.date_to {
            pairs.push(("date_to", to.clone()));
        }
        pairs.push(("format", self.format.as_str().to_owned()));
        if self.format.supports_images() {
            pairs.push(("include_images", self.include_images.to_string()));
        }
        pairs
    }
}

/// A downloaded export body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub content_type: String,
    /// File name from `Content-Disposition`, if the backend sent one.
    pub file_name: Option<String>,
}

/// Extract `filename` from a `Content-Disposition` header value.
#[must_use]
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|part| {
        let (name, value) = part.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let value = value.trim().trim_matches('"');
        if value.is_empty() { None } else { Some(value.to_owned()) }
    })
}

/// Backend client bound to a base URL and, optionally, a bearer token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_owned(), token }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn radiologist_endpoint(&self, id: &str) -> String {
        self.endpoint(&format!("/radiologos/{id}"))
    }

    fn records_by_radiologist_endpoint(&self, id: &str) -> String {
        self.endpoint(&format!("/registros_por_radiologo/{id}"))
    }

    fn bearer(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-2xx status, or undecodable body.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let body = LoginRequest { username: username.to_owned(), password: password.to_owned() };
            let resp = gloo_net::http::Request::post(&self.endpoint("/auth/login"))
                .json(&body)
                .map_err(network)?
                .send()
                .await
                .map_err(network)?;
            ensure_ok(&resp)?;
            resp.json::<LoginResponse>().await.map_err(decode)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (username, password);
            Err(ApiError::Unavailable)
        }
    }

    /// `POST /predict` with the image as multipart field `file`.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-2xx status, or non-JSON body.
    pub async fn predict(&self, image: &ImageUpload) -> Result<PredictResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let form = multipart_image(image)?;
            let mut req = gloo_net::http::Request::post(&self.endpoint("/predict"));
            if let Some(bearer) = self.bearer() {
                req = req.header("Authorization", &bearer);
            }
            let resp = req.body(form).map_err(network)?.send().await.map_err(network)?;
            ensure_ok(&resp)?;
            let value: serde_json::Value = resp.json().await.map_err(decode)?;
            Ok(PredictResponse::from_value(&value))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = image;
            Err(ApiError::Unavailable)
        }
    }

    /// `POST /guardar_registro`.
    ///
    /// # Errors
    ///
    /// Any transport failure or non-2xx status.
    pub async fn save_record(&self, record: &DiagnosticRecord) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = self.authorized(gloo_net::http::Request::post(&self.endpoint("/guardar_registro")))
                .json(record)
                .map_err(network)?
                .send()
                .await
                .map_err(network)?;
            ensure_ok(&resp)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = record;
            Err(ApiError::Unavailable)
        }
    }

    /// `GET /mis_registros`.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-2xx status, or non-JSON body.
    pub async fn my_records(&self) -> Result<Vec<DiagnosticRecord>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let value = self.get_json(&self.endpoint("/mis_registros")).await?;
            Ok(parse_record_list(value))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(ApiError::Unavailable)
        }
    }

    /// `GET /registros_por_radiologo/:id`.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-2xx status, or non-JSON body.
    pub async fn records_by_radiologist(&self, id: &str) -> Result<Vec<DiagnosticRecord>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let value = self.get_json(&self.records_by_radiologist_endpoint(id)).await?;
            Ok(parse_record_list(value))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = self.records_by_radiologist_endpoint(id);
            Err(ApiError::Unavailable)
        }
    }

    /// `GET /radiologos`.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-2xx status, or non-JSON body.
    pub async fn radiologists(&self) -> Result<Vec<Radiologist>, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let value = self.get_json(&self.endpoint("/radiologos")).await?;
            Ok(parse_radiologist_list(value))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(ApiError::Unavailable)
        }
    }

    /// `POST /radiologos`.
    ///
    /// # Errors
    ///
    /// Any transport failure or non-2xx status.
    pub async fn create_radiologist(&self, payload: &UserPayload) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = self.authorized(gloo_net::http::Request::post(&self.endpoint("/radiologos")))
                .json(payload)
                .map_err(network)?
                .send()
                .await
                .map_err(network)?;
            ensure_ok(&resp)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = payload;
            Err(ApiError::Unavailable)
        }
    }

    /// `PUT /radiologos/:id`.
    ///
    /// # Errors
    ///
    /// Any transport failure or non-2xx status.
    pub async fn update_radiologist(&self, id: &str, payload: &UserPayload) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = self.authorized(gloo_net::http::Request::put(&self.radiologist_endpoint(id)))
                .json(payload)
                .map_err(network)?
                .send()
                .await
                .map_err(network)?;
            ensure_ok(&resp)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (self.radiologist_endpoint(id), payload);
            Err(ApiError::Unavailable)
        }
    }

    /// `DELETE /radiologos/:id`.
    ///
    /// # Errors
    ///
    /// Any transport failure or non-2xx status.
    pub async fn delete_radiologist(&self, id: &str) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = self.authorized(gloo_net::http::Request::delete(&self.radiologist_endpoint(id)))
                .send()
                .await
                .map_err(network)?;
            ensure_ok(&resp)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = self.radiologist_endpoint(id);
            Err(ApiError::Unavailable)
        }
    }

    /// `GET /export/registros` returning the raw file.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-2xx status, or unreadable body.
    pub async fn export_records(&self, query: &ExportQuery) -> Result<ExportFile, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let pairs = query.pairs();
            let resp = self.authorized(gloo_net::http::Request::get(&self.endpoint("/export/registros")))
                .query(pairs.iter().map(|(k, v)| (*k, v.as_str())))
                .send()
                .await
                .map_err(network)?;
            ensure_ok(&resp)?;
            let headers = resp.headers();
            let content_type = headers
                .get("content-type")
                .unwrap_or_else(|| query.format.content_type().to_owned());
            let file_name = headers
                .get("content-disposition")
                .as_deref()
                .and_then(filename_from_content_disposition);
            let bytes = resp.binary().await.map_err(decode)?;
            Ok(ExportFile { bytes, content_type, file_name })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = query;
            Err(ApiError::Unavailable)
        }
    }

    #[cfg(feature = "hydrate")]
    fn authorized(&self, req: gloo_net::http::RequestBuilder) -> gloo_net::http::RequestBuilder {
        match self.bearer() {
            Some(bearer) => req.header("Authorization", &bearer),
            None => req,
        }
    }

    #[cfg(feature = "hydrate")]
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, ApiError> {
        let resp = self.authorized(gloo_net::http::Request::get(url))
            .send()
            .await
            .map_err(network)?;
        ensure_ok(&resp)?;
        resp.json().await.map_err(decode)
    }
}

#[cfg(feature = "hydrate")]
fn ensure_ok(resp: &gloo_net::http::Response) -> Result<(), ApiError> {
    if resp.ok() { Ok(()) } else { Err(ApiError::Status { status: resp.status() }) }
}

#[cfg(feature = "hydrate")]
fn network(e: gloo_net::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

#[cfg(feature = "hydrate")]
fn decode(e: gloo_net::Error) -> ApiError {
    ApiError::Decode(e.to_string())
}

#[cfg(feature = "hydrate")]
fn multipart_image(image: &ImageUpload) -> Result<web_sys::FormData, ApiError> {
    let blob = crate::util::download::blob_from_bytes(&image.bytes, &image.content_type)
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;
    let form = web_sys::FormData::new().map_err(|e| ApiError::Network(format!("{e:?}")))?;
    form.append_with_blob_and_filename("file", &blob, &image.file_name)
        .map_err(|e| ApiError::Network(format!("{e:?}")))?;
    Ok(form)
}
