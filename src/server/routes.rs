//! HTTP handlers for the scrape endpoint.

use crate::error::ScrapeError;
use crate::scrape::{ScrapeRequest, ScrapeResponse};
use crate::server::AppState;
use crate::sites;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, error, warn};

/// Error payload: `{ error, supportedSites?, stack? }`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_sites: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// An error response with its status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// Maps a scrape error to a response. Error chains are only exposed when
    /// `dev_mode` is set.
    pub fn from_scrape(err: ScrapeError, dev_mode: bool) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let stack = match &err {
            ScrapeError::Internal(inner) if dev_mode => Some(format!("{:?}", inner)),
            _ => None,
        };

        Self {
            status,
            body: ErrorBody {
                error: err.to_string(),
                supported_sites: err.supported_sites().map(<[_]>::to_vec),
                stack,
            },
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody { error: message.into(), supported_sites: None, stack: None },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// POST /api/scrape - Scrape one site's search results
///
/// # Request
/// - `productName`: Search term (optional if `category` is given)
/// - `category`: Category filter (optional if `productName` is given)
/// - `site`: Site identifier, case-insensitive (default "amazon")
/// - `maxResults`: Result cap (default 10)
///
/// # Errors
/// - 400 Bad Request: Missing query terms, unsupported site, or malformed JSON
/// - 500 Internal Server Error: Unexpected failure while scraping
pub async fn scrape_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected scrape request body: {}", rejection.body_text());
        ApiError::bad_request(rejection.body_text())
    })?;
    debug!("Scrape request: {:?}", request);

    let extractor = state.extractor.clone();
    let task = tokio::spawn(async move { extractor.scrape(&request).await });

    let result = match task.await {
        Ok(result) => result,
        Err(e) => Err(ScrapeError::Internal(anyhow::Error::new(e).context("Scrape task failed"))),
    };

    match result {
        Ok(response) => {
            debug!("Responding with {} results", response.results.len());
            Ok(Json(response))
        }
        Err(err) => {
            if err.is_client_error() {
                warn!("Invalid scrape request: {}", err);
            } else {
                error!("API error: {:?}", err);
            }
            Err(ApiError::from_scrape(err, state.dev_mode))
        }
    }
}

/// Supported site list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitesResponse {
    pub supported_sites: Vec<&'static str>,
}

/// GET /api/sites - List supported site identifiers
pub async fn sites_handler() -> Json<SitesResponse> {
    Json(SitesResponse { supported_sites: sites::supported_sites() })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
