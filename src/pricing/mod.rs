//! Pricing engine module for ProWashCare quotes.
//!
//! Turns raw service inputs into priced line items, accumulates them in a
//! per-session cart and derives subtotal, tax and grand total.

pub mod calculators;
pub mod cart;
pub mod models;
pub mod requests;
pub mod responses;
pub mod services;

// Re-export commonly used items
pub use calculators::{compute_lines, format_money, round_money, TAX_RATE};
pub use cart::{AddOutcome, CartSnapshot, QuoteCart};
pub use models::{
    Customer, LineItem, PavementMinimum, QuoteSettings, QuoteTotals, ServiceEntry, ServiceInput,
    ServiceKind,
};
pub use services::{CommandOutcome, PricingError, QuoteCommand, QuoteSession, QuoteSnapshot};
