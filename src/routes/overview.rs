//! HTML quote overview

use askama::Template;
use axum::{
    extract::{Path, State},
    response::Html,
};
use base64::Engine;
use std::path::Path as FsPath;
use uuid::Uuid;

use crate::error::Result;
use crate::export::{quote_rows, RowStyle};
use crate::pricing::format_money;
use crate::AppState;

use super::quotes::load_session;

/// One rendered table row
struct RowView {
    description: String,
    amount: String,
    css_class: &'static str,
}

/// Quote overview template
#[derive(Template)]
#[template(path = "quote/overview.html")]
struct OverviewTemplate {
    business_name: String,
    logo_data_uri: String,
    has_logo: bool,
    customer_name: String,
    customer_email: String,
    customer_address: Vec<String>,
    has_customer: bool,
    rows: Vec<RowView>,
    has_services: bool,
}

/// Overview page for one session
pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Html<String>> {
    let session = load_session(&state, id).await?;
    let snapshot = session.lock().await.snapshot();

    let logo_data_uri = logo_data_uri(&state.config.logo_path).await;

    let rows = quote_rows(&snapshot)
        .into_iter()
        .map(|row| RowView {
            css_class: match row.style {
                RowStyle::ServiceTitle => "service-title",
                RowStyle::Line => "line",
                RowStyle::ServiceTotal => "service-total",
                RowStyle::Adjustment => "adjustment",
                RowStyle::Subtotal | RowStyle::Tax => "summary",
                RowStyle::Total => "grand-total",
            },
            amount: row.amount.map(format_money).unwrap_or_default(),
            description: row.description,
        })
        .collect();

    let template = OverviewTemplate {
        business_name: state.config.business.name.clone(),
        has_logo: logo_data_uri.is_some(),
        logo_data_uri: logo_data_uri.unwrap_or_default(),
        has_customer: snapshot.customer.has_name(),
        customer_name: snapshot.customer.name.clone(),
        customer_email: snapshot.customer.email.clone(),
        customer_address: snapshot
            .customer
            .address
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect(),
        rows,
        has_services: !snapshot.cart.entries.is_empty(),
    };

    Ok(Html(template.render()?))
}

/// Inline the logo so the page needs no static file route
async fn logo_data_uri(path: &FsPath) -> Option<String> {
    let mime = match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => return None,
    };
    let bytes = tokio::fs::read(path).await.ok()?;
    Some(format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    ))
}
