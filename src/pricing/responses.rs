//! Response DTOs for quote API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::calculators::round_money;
use super::cart::AddOutcome;
use super::models::{Adjustment, Customer, LineItem, QuoteTotals, ServiceEntry, ServiceKind};
use super::services::QuoteSnapshot;

pub const CURRENCY: &str = "EUR";

/// Money value for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

impl MoneyResponse {
    /// Cents-rounded euro amount
    pub fn eur(amount: Decimal) -> Self {
        Self {
            amount: round_money(amount, 2),
            currency: CURRENCY.to_string(),
        }
    }
}

/// Response for a newly created quote session
#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct LineItemResponse {
    pub label: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity: Decimal,
    pub unit_amount: MoneyResponse,
    pub amount: MoneyResponse,
}

impl From<&LineItem> for LineItemResponse {
    fn from(line: &LineItem) -> Self {
        Self {
            label: line.label.clone(),
            quantity: line.quantity.normalize(),
            unit_amount: MoneyResponse::eur(line.unit_amount),
            amount: MoneyResponse::eur(line.amount),
        }
    }
}

/// One service on the quote (or a preview of one)
#[derive(Debug, Serialize)]
pub struct ServiceEntryResponse {
    pub kind: ServiceKind,
    pub title: String,
    pub lines: Vec<LineItemResponse>,
    pub total: MoneyResponse,
}

impl From<&ServiceEntry> for ServiceEntryResponse {
    fn from(entry: &ServiceEntry) -> Self {
        Self {
            kind: entry.kind,
            title: entry.title.clone(),
            lines: entry.lines.iter().map(LineItemResponse::from).collect(),
            total: MoneyResponse::eur(entry.total),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdjustmentResponse {
    pub label: String,
    pub amount: MoneyResponse,
}

impl From<&Adjustment> for AdjustmentResponse {
    fn from(adjustment: &Adjustment) -> Self {
        Self {
            label: adjustment.label.clone(),
            amount: MoneyResponse::eur(adjustment.amount),
        }
    }
}

/// Response for quote totals
#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    pub subtotal: MoneyResponse,
    pub tax: MoneyResponse,
    pub grand_total: MoneyResponse,
}

impl From<QuoteTotals> for TotalsResponse {
    fn from(totals: QuoteTotals) -> Self {
        Self {
            subtotal: MoneyResponse::eur(totals.subtotal),
            tax: MoneyResponse::eur(totals.tax),
            grand_total: MoneyResponse::eur(totals.grand_total),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub name: String,
    pub address: String,
    pub email: String,
}

impl From<&Customer> for CustomerResponse {
    fn from(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            address: customer.address.clone(),
            email: customer.email.clone(),
        }
    }
}

/// Full quote state
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub session_id: Uuid,
    pub customer: CustomerResponse,
    pub services: Vec<ServiceEntryResponse>,
    pub adjustments: Vec<AdjustmentResponse>,
    pub totals: TotalsResponse,
}

impl From<&QuoteSnapshot> for QuoteResponse {
    fn from(snapshot: &QuoteSnapshot) -> Self {
        Self {
            session_id: snapshot.session_id,
            customer: CustomerResponse::from(&snapshot.customer),
            services: snapshot
                .cart
                .entries
                .iter()
                .map(ServiceEntryResponse::from)
                .collect(),
            adjustments: snapshot
                .cart
                .adjustments
                .iter()
                .map(AdjustmentResponse::from)
                .collect(),
            totals: snapshot.cart.totals.into(),
        }
    }
}

/// Response for an add-service command
#[derive(Debug, Serialize)]
pub struct AddServiceResponse {
    /// added | merged | nothing_to_add | transport_already_present
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub quote: QuoteResponse,
}

impl AddServiceResponse {
    pub fn new(outcome: AddOutcome, snapshot: &QuoteSnapshot) -> Self {
        let (outcome, index) = match outcome {
            AddOutcome::Added { index } => ("added", Some(index)),
            AddOutcome::Merged { index } => ("merged", Some(index)),
            AddOutcome::NothingToAdd => ("nothing_to_add", None),
            AddOutcome::TransportAlreadyPresent => ("transport_already_present", None),
        };
        Self {
            outcome,
            index,
            quote: QuoteResponse::from(snapshot),
        }
    }
}

/// Response for a written export
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub quote_number: String,
    pub spreadsheet_path: String,
    pub document_path: String,
}

/// Generic error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
