//! Pricing service functions with session state.
//!
//! A `QuoteSession` owns one customer and one cart and executes the quote
//! commands against them. Failed commands leave the session untouched.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::calculators::compute_lines;
use super::cart::{AddOutcome, CartSnapshot, QuoteCart};
use super::models::{Customer, QuoteSettings, QuoteTotals, ServiceEntry, ServiceInput};

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq)]
pub enum PricingError {
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },
    NoOptionsSelected {
        service: String,
    },
}

impl PricingError {
    /// A price that no longer fits in a `Decimal`
    pub fn amount_too_large(field: &str, value: Decimal) -> Self {
        PricingError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: "amount too large".to_string(),
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            PricingError::InvalidInput { .. } => "invalid_input",
            PricingError::NoOptionsSelected { .. } => "no_options_selected",
        }
    }
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingError::InvalidInput { field, value, reason } => {
                write!(f, "Invalid value {} for {}: {}", value, field, reason)
            }
            PricingError::NoOptionsSelected { service } => {
                write!(f, "Select at least one option for {}", service)
            }
        }
    }
}

impl std::error::Error for PricingError {}

/// Explicit quote commands issued by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteCommand {
    AddService(ServiceInput),
    RemoveService(usize),
    Totals,
}

/// Result of a successfully applied command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Added(AddOutcome),
    Removed(ServiceEntry),
    NotFound(usize),
    Totals(QuoteTotals),
}

/// Everything needed to render or export a quote
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSnapshot {
    pub session_id: Uuid,
    pub customer: Customer,
    pub cart: CartSnapshot,
}

/// One user's in-progress quote
#[derive(Debug, Clone)]
pub struct QuoteSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub customer: Customer,
    cart: QuoteCart,
}

impl QuoteSession {
    pub fn new(settings: QuoteSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            customer: Customer::default(),
            cart: QuoteCart::new(settings),
        }
    }

    pub fn cart(&self) -> &QuoteCart {
        &self.cart
    }

    pub fn set_customer(&mut self, customer: Customer) {
        self.customer = customer;
    }

    /// Price a service without touching the cart
    pub fn preview(&self, input: &ServiceInput) -> Result<ServiceEntry, PricingError> {
        compute_lines(input, self.cart.settings())
    }

    pub fn apply(&mut self, command: QuoteCommand) -> Result<CommandOutcome, PricingError> {
        match command {
            QuoteCommand::AddService(input) => {
                let entry = self.preview(&input)?;
                Ok(CommandOutcome::Added(self.cart.add(entry)?))
            }
            QuoteCommand::RemoveService(index) => Ok(match self.cart.remove(index) {
                Some(entry) => CommandOutcome::Removed(entry),
                None => CommandOutcome::NotFound(index),
            }),
            QuoteCommand::Totals => Ok(CommandOutcome::Totals(self.cart.totals())),
        }
    }

    /// Copy of the current customer and cart; later mutations are not seen
    pub fn snapshot(&self) -> QuoteSnapshot {
        QuoteSnapshot {
            session_id: self.id,
            customer: self.customer.clone(),
            cart: self.cart.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::{PavementOptions, PavementSurface, WindowCounts};
    use rust_decimal_macros::dec;

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::InvalidInput {
            field: "area_m2".to_string(),
            value: "-2".to_string(),
            reason: "area must be greater than zero".to_string(),
        };
        assert!(err.to_string().contains("area_m2"));
        assert_eq!(err.error_type(), "invalid_input");

        let err = PricingError::NoOptionsSelected {
            service: "Terrace".to_string(),
        };
        assert!(err.to_string().contains("Terrace"));
        assert_eq!(err.error_type(), "no_options_selected");
    }

    #[test]
    fn test_add_service_command() {
        let mut session = QuoteSession::new(QuoteSettings::default());

        let outcome = session
            .apply(QuoteCommand::AddService(ServiceInput::SolarPanels { panels: 20 }))
            .unwrap();

        assert_eq!(outcome, CommandOutcome::Added(AddOutcome::Added { index: 0 }));
        assert_eq!(
            session.apply(QuoteCommand::Totals).unwrap(),
            CommandOutcome::Totals(QuoteTotals {
                subtotal: dec!(100.00),
                tax: dec!(21.00),
                grand_total: dec!(121.00),
            })
        );
    }

    #[test]
    fn test_rejected_service_leaves_cart_unchanged() {
        let mut session = QuoteSession::new(QuoteSettings::default());
        session
            .apply(QuoteCommand::AddService(ServiceInput::Transport))
            .unwrap();
        let before = session.snapshot();

        let result = session.apply(QuoteCommand::AddService(ServiceInput::Pavement {
            surface: PavementSurface::Terrace,
            area_m2: dec!(25),
            options: PavementOptions::default(),
        }));

        assert!(matches!(result, Err(PricingError::NoOptionsSelected { .. })));
        assert_eq!(session.snapshot(), before);

        let result = session.apply(QuoteCommand::AddService(ServiceInput::Windows(
            WindowCounts {
                small_inside: 4,
                large_inside: -2,
                ..Default::default()
            },
        )));
        assert!(matches!(result, Err(PricingError::InvalidInput { .. })));
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_oversized_area_is_rejected_not_panicking() {
        let mut session = QuoteSession::new(QuoteSettings::default());

        let result = session.apply(QuoteCommand::AddService(ServiceInput::Facade {
            area_m2: Decimal::MAX,
            impregnate: false,
        }));

        match result {
            Err(PricingError::InvalidInput { reason, .. }) => {
                assert_eq!(reason, "amount too large")
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_preview_does_not_mutate() {
        let session = QuoteSession::new(QuoteSettings::default());
        let entry = session
            .preview(&ServiceInput::Facade {
                area_m2: dec!(70),
                impregnate: true,
            })
            .unwrap();

        assert_eq!(entry.total, dec!(630.00));
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_remove_service_command() {
        let mut session = QuoteSession::new(QuoteSettings::default());
        session
            .apply(QuoteCommand::AddService(ServiceInput::Transport))
            .unwrap();

        match session.apply(QuoteCommand::RemoveService(0)).unwrap() {
            CommandOutcome::Removed(entry) => assert_eq!(entry.total, dec!(8.00)),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(
            session.apply(QuoteCommand::RemoveService(0)).unwrap(),
            CommandOutcome::NotFound(0)
        );
    }

    #[test]
    fn test_snapshot_carries_customer() {
        let mut session = QuoteSession::new(QuoteSettings::default());
        session.set_customer(Customer {
            name: "Jan Peeters".to_string(),
            address: "Kerkstraat 1\n9000 Gent".to_string(),
            email: "jan@example.com".to_string(),
        });

        let snapshot = session.snapshot();
        assert_eq!(snapshot.session_id, session.id);
        assert_eq!(snapshot.customer.name, "Jan Peeters");
    }
}
