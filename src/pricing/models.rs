//! Domain models for quote pricing.
//!
//! Plain values shared by the calculator, the cart and the exporters.
//! Nothing here talks to HTTP; request/response DTOs live next door.

use rust_decimal::Decimal;
use serde::Serialize;

use super::services::PricingError;

/// Service families that can be put on a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Windows,
    SolarPanels,
    Facade,
    Pavement,
    Transport,
}

impl ServiceKind {
    /// Whether repeated additions fold into the existing entry
    pub fn is_mergeable(self) -> bool {
        matches!(self, ServiceKind::Windows)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::Windows => "windows",
            ServiceKind::SolarPanels => "solar_panels",
            ServiceKind::Facade => "facade",
            ServiceKind::Pavement => "pavement",
            ServiceKind::Transport => "transport",
        }
    }
}

/// Surface type for pavement work. Only changes the entry title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PavementSurface {
    #[default]
    Driveway,
    Terrace,
    CommercialYard,
}

impl PavementSurface {
    pub fn title(self) -> &'static str {
        match self {
            PavementSurface::Driveway => "Driveway",
            PavementSurface::Terrace => "Terrace",
            PavementSurface::CommercialYard => "Commercial yard",
        }
    }
}

/// Window counts per size and side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowCounts {
    pub small_inside: i64,
    pub small_outside: i64,
    pub large_inside: i64,
    pub large_outside: i64,
    pub hard_inside: i64,
    pub hard_outside: i64,
}

/// Checkbox options for pavement work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PavementOptions {
    pub clean: bool,
    pub sand_fill: bool,
    pub weed_resistant_sand: bool,
    pub coating: bool,
}

impl PavementOptions {
    pub fn any_selected(&self) -> bool {
        self.clean || self.sand_fill || self.weed_resistant_sand || self.coating
    }
}

/// Raw input for one service, as collected by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceInput {
    Windows(WindowCounts),
    SolarPanels {
        panels: i64,
    },
    Facade {
        area_m2: Decimal,
        impregnate: bool,
    },
    Pavement {
        surface: PavementSurface,
        area_m2: Decimal,
        options: PavementOptions,
    },
    Transport,
}

impl ServiceInput {
    pub fn kind(&self) -> ServiceKind {
        match self {
            ServiceInput::Windows(_) => ServiceKind::Windows,
            ServiceInput::SolarPanels { .. } => ServiceKind::SolarPanels,
            ServiceInput::Facade { .. } => ServiceKind::Facade,
            ServiceInput::Pavement { .. } => ServiceKind::Pavement,
            ServiceInput::Transport => ServiceKind::Transport,
        }
    }
}

/// One priced row within a service
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub label: String,
    pub quantity: Decimal,
    pub unit_amount: Decimal,
    pub amount: Decimal,
}

impl LineItem {
    /// Build a line with `amount = quantity * unit_amount`
    pub fn priced(
        label: impl Into<String>,
        quantity: Decimal,
        unit_amount: Decimal,
    ) -> Result<Self, PricingError> {
        let label = label.into();
        let amount = quantity
            .checked_mul(unit_amount)
            .ok_or_else(|| PricingError::amount_too_large(&label, quantity))?;
        Ok(Self {
            label,
            quantity,
            unit_amount,
            amount,
        })
    }
}

/// Sum of line amounts, `None` on overflow
pub fn sum_amounts(lines: &[LineItem]) -> Option<Decimal> {
    lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.amount))
}

/// One confirmed (or previewed) service on a quote
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceEntry {
    pub kind: ServiceKind,
    pub title: String,
    pub lines: Vec<LineItem>,
    pub total: Decimal,
}

impl ServiceEntry {
    /// Sum of line amounts before any minimum charge
    pub fn lines_total(&self) -> Option<Decimal> {
        sum_amounts(&self.lines)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Fold `lines` into this entry and re-apply `minimum` to the merged total.
    ///
    /// Lines with an identical label accumulate quantity and amount;
    /// unseen labels are appended in order. On overflow the entry is left
    /// unchanged.
    pub fn merge_lines(
        &mut self,
        lines: Vec<LineItem>,
        minimum: Decimal,
    ) -> Result<(), PricingError> {
        let mut merged = self.lines.clone();
        for line in lines {
            match merged.iter_mut().find(|l| l.label == line.label) {
                Some(existing) => {
                    let too_large = || PricingError::amount_too_large(&line.label, line.quantity);
                    existing.quantity = existing
                        .quantity
                        .checked_add(line.quantity)
                        .ok_or_else(too_large)?;
                    existing.amount = existing
                        .amount
                        .checked_add(line.amount)
                        .ok_or_else(too_large)?;
                }
                None => merged.push(line),
            }
        }

        let lines_total = sum_amounts(&merged)
            .ok_or_else(|| PricingError::amount_too_large(&self.title, Decimal::ZERO))?;
        self.lines = merged;
        self.total = minimum.max(lines_total);
        Ok(())
    }
}

/// Synthetic, non-removable cart line derived from the entries
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub label: String,
    pub amount: Decimal,
}

/// Subtotal, tax and grand total. Always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuoteTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub grand_total: Decimal,
}

/// Customer details printed on the quote
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Customer {
    pub name: String,
    pub address: String,
    pub email: String,
}

impl Customer {
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// How the pavement service minimum is enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PavementMinimum {
    /// No pavement minimum at all
    None,
    /// Each pavement entry is floored individually
    PerEntry,
    /// All pavement entries together are topped up by an adjustment line
    #[default]
    CartAggregate,
}

impl std::str::FromStr for PavementMinimum {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(PavementMinimum::None),
            "per_entry" | "entry" => Ok(PavementMinimum::PerEntry),
            "cart" | "aggregate" | "cart_aggregate" => Ok(PavementMinimum::CartAggregate),
            other => Err(format!(
                "unknown pavement minimum policy '{}' (expected none, per_entry or cart)",
                other
            )),
        }
    }
}

/// Per-session pricing behaviour, copied from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuoteSettings {
    /// Append transport once on the first non-transport service
    pub auto_transport: bool,
    pub pavement_minimum: PavementMinimum,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_line_item_priced_amount() {
        let line = LineItem::priced("Clean facade", dec!(12.5), dec!(5.00)).unwrap();
        assert_eq!(line.amount, dec!(62.50));
    }

    #[test]
    fn test_line_item_priced_overflow_is_rejected() {
        let err = LineItem::priced("Clean facade", Decimal::MAX, dec!(5.00)).unwrap_err();
        assert!(matches!(
            err,
            PricingError::InvalidInput { ref field, ref reason, .. }
                if field == "Clean facade" && reason == "amount too large"
        ));
    }

    #[test]
    fn test_merge_lines_accumulates_same_label() {
        let mut entry = ServiceEntry {
            kind: ServiceKind::Windows,
            title: "Window cleaning".to_string(),
            lines: vec![LineItem::priced("Small windows inside", dec!(3), dec!(2.00)).unwrap()],
            total: dec!(50),
        };

        entry
            .merge_lines(
                vec![
                    LineItem::priced("Small windows inside", dec!(2), dec!(2.00)).unwrap(),
                    LineItem::priced("Large windows outside", dec!(1), dec!(2.00)).unwrap(),
                ],
                dec!(50),
            )
            .unwrap();

        assert_eq!(entry.lines.len(), 2);
        assert_eq!(entry.lines[0].quantity, dec!(5));
        assert_eq!(entry.lines[0].amount, dec!(10.00));
        assert_eq!(entry.lines[1].label, "Large windows outside");
        assert_eq!(entry.total, dec!(50));
    }

    #[test]
    fn test_merge_lines_floor_applies_to_cumulative_total() {
        let mut entry = ServiceEntry {
            kind: ServiceKind::Windows,
            title: "Window cleaning".to_string(),
            lines: vec![LineItem::priced("Large windows inside", dec!(12), dec!(2.50)).unwrap()],
            total: dec!(50),
        };

        entry
            .merge_lines(
                vec![LineItem::priced("Large windows inside", dec!(12), dec!(2.50)).unwrap()],
                dec!(50),
            )
            .unwrap();

        assert_eq!(entry.total, dec!(60.00));
    }

    #[test]
    fn test_merge_lines_overflow_leaves_entry_unchanged() {
        let big = Decimal::MAX / dec!(4);
        let line = |qty| LineItem::priced("Large windows inside", qty, dec!(2.50)).unwrap();
        let mut entry = ServiceEntry {
            kind: ServiceKind::Windows,
            title: "Window cleaning".to_string(),
            lines: vec![line(big)],
            total: big * dec!(2.50),
        };
        let before = entry.clone();

        assert!(entry.merge_lines(vec![line(big)], dec!(50)).is_err());
        assert_eq!(entry, before);
    }

    #[test]
    fn test_customer_has_name_ignores_whitespace() {
        let customer = Customer {
            name: "   ".to_string(),
            ..Default::default()
        };
        assert!(!customer.has_name());
    }

    #[test]
    fn test_pavement_minimum_from_str() {
        assert_eq!("cart".parse::<PavementMinimum>(), Ok(PavementMinimum::CartAggregate));
        assert_eq!("PER_ENTRY".parse::<PavementMinimum>(), Ok(PavementMinimum::PerEntry));
        assert_eq!("none".parse::<PavementMinimum>(), Ok(PavementMinimum::None));
        assert!("sometimes".parse::<PavementMinimum>().is_err());
    }
}
