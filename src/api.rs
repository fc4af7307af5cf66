//! HTTP wrapper around the analysis engine.
//!
//! Every request builds its own record set and result on a blocking thread;
//! the only shared state is read-only configuration and the keyword table.
//!
//! Upload and demo runs write their report into `<OUTPUT_DIR>/<run_id>/`,
//! which is also what `/static` serves. The service never deletes these
//! directories; pruning old runs is left to whoever operates the output
//! volume.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::{info, warn};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::analysis::{analyze, AnalysisResult};
use crate::config::AppConfig;
use crate::dataset::{self, LoadReport, RawReview};
use crate::dimensions::{Dimension, DimensionScore};
use crate::error::{AnalysisError, LoadError};
use crate::keywords::KeywordTable;
use crate::report::{
    ReportAssembler, ReportConfig, CHARTS_DIR, RADAR_CHART_FILE, REPORT_FILE, SENTIMENT_PIE_FILE,
};
use crate::sentiment::{BandCount, SentimentBand, SentimentDistribution};
use crate::stats::Summary;

pub struct AppState {
    pub config: AppConfig,
    pub keywords: Arc<KeywordTable>,
}

impl AppState {
    pub fn new(config: AppConfig, keywords: KeywordTable) -> Self {
        Self {
            config,
            keywords: Arc::new(keywords),
        }
    }

    /// Uses `KEYWORDS_PATH` when configured, the built-in table otherwise.
    pub fn from_config(config: AppConfig) -> Result<Self, AnalysisError> {
        let keywords = match &config.keywords_path {
            Some(path) => KeywordTable::from_path(path)?,
            None => KeywordTable::builtin().clone(),
        };
        Ok(Self::new(config, keywords))
    }

    fn report_config(&self, run_id: &str) -> ReportConfig {
        ReportConfig::new(self.config.product_name.clone(), self.config.output_dir.join(run_id))
            .with_locale(self.config.locale)
            .with_font(self.config.font_family.clone())
            .with_scale(self.config.scale)
    }

    /// Writes the report for one run. Collaborator failures only cost the
    /// URLs; the analysis result stands on its own.
    fn publish_report(&self, run_id: &str, result: &AnalysisResult) -> ArtifactUrls {
        let url = |file: String| format!("/static/{}/{}", run_id, file);
        match ReportAssembler::new(self.report_config(run_id)).assemble(result) {
            Ok(artifacts) => ArtifactUrls {
                report_url: Some(url(REPORT_FILE.to_string())),
                radar_chart_url: artifacts
                    .radar_chart
                    .map(|_| url(format!("{}/{}", CHARTS_DIR, RADAR_CHART_FILE))),
                sentiment_pie_url: artifacts
                    .sentiment_pie
                    .map(|_| url(format!("{}/{}", CHARTS_DIR, SENTIMENT_PIE_FILE))),
            },
            Err(e) => {
                warn!("⚠️ [{}] Report generation failed: {}", run_id, e);
                ArtifactUrls::default()
            }
        }
    }

    fn run(&self, run_id: String, loaded: LoadReport, with_report: bool) -> Result<AnalyzeResponse, ApiError> {
        let result = analyze(&loaded.records, &self.keywords)?;
        let urls = if with_report {
            self.publish_report(&run_id, &result)
        } else {
            ArtifactUrls::default()
        };
        info!("✅ [{}] Analysis finished for {} reviews", run_id, loaded.loaded_rows());

        Ok(AnalyzeResponse {
            message: "Analysis successful!".to_string(),
            run_id,
            rows_loaded: loaded.loaded_rows(),
            rows_dropped: loaded.dropped_rows,
            result,
            report_url: urls.report_url,
            radar_chart_url: urls.radar_chart_url,
            sentiment_pie_url: urls.sentiment_pie_url,
        })
    }
}

#[derive(Debug, Default)]
struct ArtifactUrls {
    report_url: Option<String>,
    radar_chart_url: Option<String>,
    sentiment_pie_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeResponse {
    #[schema(example = "Analysis successful!")]
    pub message: String,
    pub run_id: String,
    pub rows_loaded: usize,
    pub rows_dropped: usize,
    pub result: AnalysisResult,
    #[schema(example = "/static/6f1c.../analysis_report.md")]
    pub report_url: Option<String>,
    pub radar_chart_url: Option<String>,
    pub sentiment_pie_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeJsonRequest {
    pub reviews: Vec<RawReview>,
}

/// Multipart body of `POST /analyze`.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// CSV with `review_text` and `rating` columns
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub demo_mode: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) | ApiError::Load(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Analysis(AnalysisError::EmptyDataset) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Analysis(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("🔥 Request failed: {}", self);
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(format!("upload exceeds the size limit: {}", e.body_text()))
        } else {
            ApiError::BadRequest(e.body_text())
        }
    }
}

async fn run_blocking<F>(job: F) -> Result<Json<AnalyzeResponse>, ApiError>
where
    F: FnOnce() -> Result<AnalyzeResponse, ApiError> + Send + 'static,
{
    let response = tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| ApiError::Internal(format!("analysis task failed: {}", e)))??;
    Ok(Json(response))
}

/// Analyze an uploaded CSV and generate the report and charts
#[utoipa::path(
    post,
    path = "/analyze",
    tag = "analysis",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Analysis result with artifact URLs", body = AnalyzeResponse),
        (status = 400, description = "Missing file or malformed CSV", body = ErrorBody),
        (status = 413, description = "Upload larger than MAX_UPLOAD_BYTES", body = ErrorBody),
        (status = 422, description = "No usable reviews", body = ErrorBody)
    )
)]
pub async fn analyze_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        upload = Some((file_name, data));
    }

    let (file_name, data) = upload.ok_or_else(|| ApiError::BadRequest("No file part".to_string()))?;
    if file_name.is_empty() {
        return Err(ApiError::BadRequest("No selected file".to_string()));
    }

    let run_id = Uuid::new_v4().to_string();
    info!("📤 [{}] Received upload '{}' ({} bytes)", run_id, file_name, data.len());

    run_blocking(move || {
        let loaded = dataset::load_upload(&file_name, &data, state.config.scale)?;
        state.run(run_id, loaded, true)
    })
    .await
}

/// Analyze reviews posted as JSON rows
#[utoipa::path(
    post,
    path = "/analyze/json",
    tag = "analysis",
    request_body = AnalyzeJsonRequest,
    responses(
        (status = 200, description = "Analysis result without artifacts", body = AnalyzeResponse),
        (status = 422, description = "No usable reviews", body = ErrorBody)
    )
)]
pub async fn analyze_json(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeJsonRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let run_id = Uuid::new_v4().to_string();
    run_blocking(move || {
        let loaded = dataset::records_from_raw(req.reviews, state.config.scale);
        state.run(run_id, loaded, false)
    })
    .await
}

/// Analyze the seeded synthetic dataset (demo mode only)
#[utoipa::path(
    get,
    path = "/analyze/demo",
    tag = "analysis",
    responses(
        (status = 200, description = "Analysis of synthetic reviews", body = AnalyzeResponse),
        (status = 404, description = "Demo mode is disabled", body = ErrorBody)
    )
)]
pub async fn analyze_demo(State(state): State<Arc<AppState>>) -> Result<Json<AnalyzeResponse>, ApiError> {
    if !state.config.data_mode.is_demo() {
        return Err(ApiError::NotFound("demo mode is disabled".to_string()));
    }
    let run_id = Uuid::new_v4().to_string();
    run_blocking(move || {
        let loaded = dataset::load_source(None, state.config.scale, state.config.data_mode)?;
        state.run(run_id, loaded, true)
    })
    .await
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "analysis",
    responses((status = 200, body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        demo_mode: state.config.data_mode.is_demo(),
    })
}

#[derive(OpenApi)]
#[openapi(
    paths(analyze_upload, analyze_json, analyze_demo, health),
    components(schemas(
        AnalyzeResponse,
        AnalyzeJsonRequest,
        UploadForm,
        HealthResponse,
        ErrorBody,
        RawReview,
        AnalysisResult,
        SentimentDistribution,
        BandCount,
        SentimentBand,
        DimensionScore,
        Dimension,
        Summary
    )),
    tags((name = "analysis", description = "Review analysis API"))
)]
pub struct ApiDoc;

pub fn router(state: Arc<AppState>) -> Router {
    let artifacts = ServeDir::new(&state.config.output_dir);
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health))
        .route("/analyze", post(analyze_upload))
        .route("/analyze/json", post(analyze_json))
        .route("/analyze/demo", get(analyze_demo))
        .nest_service("/static", artifacts)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
