//! Quote command route handlers (JSON)

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Local;
use uuid::Uuid;

use crate::cache::SharedSession;
use crate::error::{AppError, Result};
use crate::export::{self, QuoteDocument};
use crate::pricing::requests::{CustomerRequest, ServiceRequest};
use crate::pricing::responses::{
    AddServiceResponse, ExportResponse, QuoteResponse, ServiceEntryResponse,
    SessionCreatedResponse, TotalsResponse,
};
use crate::pricing::{CommandOutcome, QuoteCommand, ServiceInput};
use crate::AppState;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const PDF_CONTENT_TYPE: &str = "application/pdf";

pub(crate) async fn load_session(state: &AppState, id: Uuid) -> Result<SharedSession> {
    state
        .cache
        .session(&id)
        .await
        .ok_or_else(|| AppError::NotFound("Quote session".to_string()))
}

/// Start a new quote session
pub async fn create(State(state): State<AppState>) -> impl IntoResponse {
    let session_id = state.cache.create_session(state.config.quote).await;
    (StatusCode::CREATED, Json(SessionCreatedResponse { session_id }))
}

/// Current customer, services, adjustments and totals
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuoteResponse>> {
    let session = load_session(&state, id).await?;
    let snapshot = session.lock().await.snapshot();
    Ok(Json(QuoteResponse::from(&snapshot)))
}

/// End a session and drop its cart
pub async fn end(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    if state.cache.end_session(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Quote session".to_string()))
    }
}

pub async fn set_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CustomerRequest>,
) -> Result<Json<QuoteResponse>> {
    let session = load_session(&state, id).await?;
    let mut session = session.lock().await;
    session.set_customer(request.into());
    Ok(Json(QuoteResponse::from(&session.snapshot())))
}

/// Price a service without adding it
pub async fn preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ServiceRequest>,
) -> Result<Json<ServiceEntryResponse>> {
    let session = load_session(&state, id).await?;
    let input = ServiceInput::from(request);
    let entry = session.lock().await.preview(&input)?;
    Ok(Json(ServiceEntryResponse::from(&entry)))
}

/// Price a service and add it to the cart
pub async fn add_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ServiceRequest>,
) -> Result<Json<AddServiceResponse>> {
    let session = load_session(&state, id).await?;
    let mut session = session.lock().await;

    match session.apply(QuoteCommand::AddService(request.into()))? {
        CommandOutcome::Added(outcome) => {
            tracing::debug!(session = %id, ?outcome, "Service added");
            Ok(Json(AddServiceResponse::new(outcome, &session.snapshot())))
        }
        other => Err(AppError::Internal(format!(
            "unexpected outcome for add: {:?}",
            other
        ))),
    }
}

pub async fn remove_service(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<QuoteResponse>> {
    let session = load_session(&state, id).await?;
    let mut session = session.lock().await;

    match session.apply(QuoteCommand::RemoveService(index))? {
        CommandOutcome::Removed(entry) => {
            tracing::debug!(session = %id, index, title = %entry.title, "Service removed");
            Ok(Json(QuoteResponse::from(&session.snapshot())))
        }
        CommandOutcome::NotFound(index) => {
            Err(AppError::NotFound(format!("Service #{}", index)))
        }
        other => Err(AppError::Internal(format!(
            "unexpected outcome for remove: {:?}",
            other
        ))),
    }
}

pub async fn totals(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TotalsResponse>> {
    let session = load_session(&state, id).await?;
    let outcome = session.lock().await.apply(QuoteCommand::Totals)?;

    match outcome {
        CommandOutcome::Totals(totals) => Ok(Json(totals.into())),
        other => Err(AppError::Internal(format!(
            "unexpected outcome for totals: {:?}",
            other
        ))),
    }
}

/// Snapshot the session and stamp it with a fresh quote number
async fn prepare_quote(state: &AppState, id: Uuid) -> Result<QuoteDocument> {
    let session = load_session(state, id).await?;
    let snapshot = session.lock().await.snapshot();
    Ok(QuoteDocument::prepare(
        snapshot,
        state.config.business.clone(),
        Local::now(),
    )?)
}

/// Write spreadsheet and PDF into the export directory
pub async fn export_files(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExportResponse>> {
    let quote = prepare_quote(&state, id).await?;
    let dir = state.config.export_dir.clone();
    let logo = state.config.logo_path.clone();
    let quote_number = quote.quote_number.clone();

    let paths = tokio::task::spawn_blocking(move || {
        export::write_exports(&quote, &dir, Some(&logo))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(Json(ExportResponse {
        quote_number,
        spreadsheet_path: paths.spreadsheet.display().to_string(),
        document_path: paths.document.display().to_string(),
    }))
}

/// Download the quote as `.xlsx`
pub async fn download_spreadsheet(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let quote = prepare_quote(&state, id).await?;
    let filename = format!("{}.xlsx", quote.quote_number);

    let bytes = tokio::task::spawn_blocking(move || export::render_spreadsheet(&quote))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(attachment(XLSX_CONTENT_TYPE, &filename, bytes))
}

/// Download the quote as PDF
pub async fn download_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let quote = prepare_quote(&state, id).await?;
    let filename = format!("{}.pdf", quote.quote_number);
    let logo = state.config.logo_path.clone();

    let bytes =
        tokio::task::spawn_blocking(move || export::render_document(&quote, Some(&logo)))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(attachment(PDF_CONTENT_TYPE, &filename, bytes))
}

fn attachment(content_type: &str, filename: &str, bytes: Vec<u8>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
}
