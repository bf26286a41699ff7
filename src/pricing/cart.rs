//! Quote cart: the ordered list of confirmed services.
//!
//! Owns the merge policy for repeatable services, the single-transport
//! guard and the pavement aggregate minimum. Totals are always derived
//! from the current entries.

use rust_decimal::Decimal;
use tracing::debug;

use super::calculators::{
    calculate_totals, minimum_charge, PAVEMENT_MINIMUM, TAX_RATE, TRANSPORT_FEE, TRANSPORT_TITLE,
};
use super::models::{
    Adjustment, LineItem, PavementMinimum, QuoteSettings, QuoteTotals, ServiceEntry, ServiceKind,
};
use super::services::PricingError;

pub const PAVEMENT_ADJUSTMENT_LABEL: &str = "Minimum pavement/terrace/commercial-yard rate";

/// What `QuoteCart::add` did with an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended as a new entry at `index`
    Added { index: usize },
    /// Folded into the existing entry at `index`
    Merged { index: usize },
    /// Entry had no lines
    NothingToAdd,
    /// A transport entry is already on the quote
    TransportAlreadyPresent,
}

/// Owned copy of the cart at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct CartSnapshot {
    pub entries: Vec<ServiceEntry>,
    pub adjustments: Vec<Adjustment>,
    pub totals: QuoteTotals,
}

#[derive(Debug, Clone, Default)]
pub struct QuoteCart {
    entries: Vec<ServiceEntry>,
    settings: QuoteSettings,
    auto_transport_done: bool,
}

impl QuoteCart {
    pub fn new(settings: QuoteSettings) -> Self {
        Self {
            entries: Vec::new(),
            settings,
            auto_transport_done: false,
        }
    }

    pub fn settings(&self) -> &QuoteSettings {
        &self.settings
    }

    pub fn entries(&self) -> &[ServiceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_transport(&self) -> bool {
        self.entries.iter().any(|e| e.kind == ServiceKind::Transport)
    }

    /// Add a priced entry.
    ///
    /// Windows entries merge into an existing Windows entry. Transport is
    /// kept at most once. With auto transport enabled, the first
    /// non-transport addition also appends the transport fee.
    ///
    /// Fails without touching the cart when the resulting totals would
    /// overflow.
    pub fn add(&mut self, entry: ServiceEntry) -> Result<AddOutcome, PricingError> {
        if entry.is_empty() {
            debug!(kind = entry.kind.as_str(), "Skipping entry without lines");
            return Ok(AddOutcome::NothingToAdd);
        }

        if entry.kind == ServiceKind::Transport && self.has_transport() {
            debug!("Transport already on quote, ignoring");
            return Ok(AddOutcome::TransportAlreadyPresent);
        }

        let mut next = self.clone();
        let outcome = next.merge_or_push(entry)?;

        if next.settings.auto_transport && !next.auto_transport_done {
            if let AddOutcome::Added { index } = outcome {
                if next.entries[index].kind != ServiceKind::Transport {
                    next.auto_transport_done = true;
                    if !next.has_transport() {
                        debug!("Auto-adding transport cost");
                        next.entries.push(transport_entry());
                    }
                }
            }
        }

        if next.checked_totals().is_none() {
            return Err(PricingError::amount_too_large("subtotal", Decimal::ZERO));
        }
        *self = next;
        Ok(outcome)
    }

    /// Remove the entry at `index` (insertion order)
    pub fn remove(&mut self, index: usize) -> Option<ServiceEntry> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index);
        debug!(index, kind = removed.kind.as_str(), "Removed entry");
        Some(removed)
    }

    /// Synthetic adjustment lines derived from the current entries.
    ///
    /// Only real pavement entries feed the shortfall, so the adjustment
    /// never counts towards itself.
    pub fn adjustments(&self) -> Vec<Adjustment> {
        if self.settings.pavement_minimum != PavementMinimum::CartAggregate {
            return Vec::new();
        }

        let mut pavement = self
            .entries
            .iter()
            .filter(|e| e.kind == ServiceKind::Pavement)
            .peekable();
        if pavement.peek().is_none() {
            return Vec::new();
        }

        match pavement.try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.total)) {
            Some(combined) if combined < PAVEMENT_MINIMUM => vec![Adjustment {
                label: PAVEMENT_ADJUSTMENT_LABEL.to_string(),
                amount: PAVEMENT_MINIMUM - combined,
            }],
            _ => Vec::new(),
        }
    }

    /// Subtotal, tax and grand total for the current state.
    ///
    /// `add` only accepts entries whose totals fit, and removing an entry
    /// never raises the subtotal, so the plain arithmetic cannot overflow.
    pub fn totals(&self) -> QuoteTotals {
        let entries: Decimal = self.entries.iter().map(|e| e.total).sum();
        let adjustments: Decimal = self.adjustments().iter().map(|a| a.amount).sum();
        calculate_totals(entries + adjustments)
    }

    fn checked_totals(&self) -> Option<QuoteTotals> {
        let subtotal = self
            .entries
            .iter()
            .map(|e| e.total)
            .chain(self.adjustments().into_iter().map(|a| a.amount))
            .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))?;
        let tax = subtotal.checked_mul(TAX_RATE)?;
        Some(QuoteTotals {
            subtotal,
            tax,
            grand_total: subtotal.checked_add(tax)?,
        })
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            entries: self.entries.clone(),
            adjustments: self.adjustments(),
            totals: self.totals(),
        }
    }

    fn merge_or_push(&mut self, entry: ServiceEntry) -> Result<AddOutcome, PricingError> {
        if entry.kind.is_mergeable() {
            if let Some(index) = self.entries.iter().position(|e| e.kind == entry.kind) {
                let minimum = minimum_charge(entry.kind, self.settings.pavement_minimum);
                self.entries[index].merge_lines(entry.lines, minimum)?;
                debug!(
                    index,
                    total = %self.entries[index].total,
                    "Merged into existing entry"
                );
                return Ok(AddOutcome::Merged { index });
            }
        }

        debug!(kind = entry.kind.as_str(), total = %entry.total, "Added entry");
        self.entries.push(entry);
        Ok(AddOutcome::Added {
            index: self.entries.len() - 1,
        })
    }
}

fn transport_entry() -> ServiceEntry {
    ServiceEntry {
        kind: ServiceKind::Transport,
        title: TRANSPORT_TITLE.to_string(),
        lines: vec![LineItem {
            label: TRANSPORT_TITLE.to_string(),
            quantity: Decimal::ONE,
            unit_amount: TRANSPORT_FEE,
            amount: TRANSPORT_FEE,
        }],
        total: TRANSPORT_FEE,
    }
}
