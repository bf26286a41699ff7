//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no session state, no I/O.
//! Every service kind is one arm of [`compute_lines`].

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::models::{
    sum_amounts, LineItem, PavementMinimum, PavementOptions, PavementSurface, QuoteSettings,
    QuoteTotals, ServiceEntry, ServiceInput, ServiceKind, WindowCounts,
};
use super::services::PricingError;

/// VAT applied to the cart subtotal
pub const TAX_RATE: Decimal = dec!(0.21);

/// Flat transport fee
pub const TRANSPORT_FEE: Decimal = dec!(8.00);

pub const WINDOWS_MINIMUM: Decimal = dec!(50.00);
pub const SOLAR_PANELS_MINIMUM: Decimal = dec!(79.00);
pub const FACADE_MINIMUM: Decimal = dec!(299.00);
pub const PAVEMENT_MINIMUM: Decimal = dec!(299.00);

const SMALL_INSIDE_RATE: Decimal = dec!(2.00);
const SMALL_OUTSIDE_RATE: Decimal = dec!(1.50);
const LARGE_INSIDE_RATE: Decimal = dec!(2.50);
const LARGE_OUTSIDE_RATE: Decimal = dec!(2.00);
const HARD_INSIDE_RATE: Decimal = dec!(2.50);
const HARD_OUTSIDE_RATE: Decimal = dec!(2.50);

const SOLAR_PANEL_RATE: Decimal = dec!(5.00);

const FACADE_CLEAN_RATE: Decimal = dec!(5.00);
const FACADE_IMPREGNATE_RATE: Decimal = dec!(4.00);

const PAVEMENT_CLEAN_RATE: Decimal = dec!(3.50);
const PAVEMENT_SAND_RATE: Decimal = dec!(1.00);
const PAVEMENT_WEED_SAND_RATE: Decimal = dec!(2.00);
const PAVEMENT_COATING_RATE: Decimal = dec!(3.50);

pub const WINDOWS_TITLE: &str = "Window cleaning";
pub const SOLAR_PANELS_TITLE: &str = "Solar panels";
pub const FACADE_TITLE: &str = "Facade cleaning";
pub const TRANSPORT_TITLE: &str = "Transport cost";

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use prowashcare_quote::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Format an amount for display, e.g. `€ 181.50`
pub fn format_money(amount: Decimal) -> String {
    format!("€ {:.2}", round_money(amount, 2))
}

/// Format a quantity without trailing zeros, e.g. `10` or `12.5`
pub fn format_quantity(quantity: Decimal) -> String {
    quantity.normalize().to_string()
}

/// Lowest billable total for a service kind under the given pavement policy
pub fn minimum_charge(kind: ServiceKind, pavement_minimum: PavementMinimum) -> Decimal {
    match kind {
        ServiceKind::Windows => WINDOWS_MINIMUM,
        ServiceKind::SolarPanels => SOLAR_PANELS_MINIMUM,
        ServiceKind::Facade => FACADE_MINIMUM,
        ServiceKind::Pavement => match pavement_minimum {
            PavementMinimum::PerEntry => PAVEMENT_MINIMUM,
            PavementMinimum::None | PavementMinimum::CartAggregate => Decimal::ZERO,
        },
        ServiceKind::Transport => Decimal::ZERO,
    }
}

/// Price one service.
///
/// Returns the entry that would be added to the cart. A Windows input with
/// every count at zero yields an entry without lines and a zero total; the
/// caller treats that as nothing to add.
pub fn compute_lines(
    input: &ServiceInput,
    settings: &QuoteSettings,
) -> Result<ServiceEntry, PricingError> {
    let (title, lines) = match input {
        ServiceInput::Windows(counts) => (WINDOWS_TITLE.to_string(), window_lines(counts)?),
        ServiceInput::SolarPanels { panels } => {
            (SOLAR_PANELS_TITLE.to_string(), solar_panel_lines(*panels)?)
        }
        ServiceInput::Facade {
            area_m2,
            impregnate,
        } => (FACADE_TITLE.to_string(), facade_lines(*area_m2, *impregnate)?),
        ServiceInput::Pavement {
            surface,
            area_m2,
            options,
        } => pavement_lines(*surface, *area_m2, options)?,
        ServiceInput::Transport => (TRANSPORT_TITLE.to_string(), transport_lines()?),
    };

    let kind = input.kind();
    let lines_total =
        sum_amounts(&lines).ok_or_else(|| PricingError::amount_too_large(&title, Decimal::ZERO))?;
    let total = if lines.is_empty() {
        Decimal::ZERO
    } else {
        minimum_charge(kind, settings.pavement_minimum).max(lines_total)
    };

    Ok(ServiceEntry {
        kind,
        title,
        lines,
        total,
    })
}

/// Derive subtotal, tax and grand total from a subtotal
pub fn calculate_totals(subtotal: Decimal) -> QuoteTotals {
    let tax = subtotal * TAX_RATE;
    QuoteTotals {
        subtotal,
        tax,
        grand_total: subtotal + tax,
    }
}

fn window_lines(counts: &WindowCounts) -> Result<Vec<LineItem>, PricingError> {
    let inputs = [
        ("small_inside", "Small windows inside", counts.small_inside, SMALL_INSIDE_RATE),
        ("small_outside", "Small windows outside", counts.small_outside, SMALL_OUTSIDE_RATE),
        ("large_inside", "Large windows inside", counts.large_inside, LARGE_INSIDE_RATE),
        ("large_outside", "Large windows outside", counts.large_outside, LARGE_OUTSIDE_RATE),
        (
            "hard_inside",
            "Skylights / hard to reach inside",
            counts.hard_inside,
            HARD_INSIDE_RATE,
        ),
        (
            "hard_outside",
            "Skylights / hard to reach outside",
            counts.hard_outside,
            HARD_OUTSIDE_RATE,
        ),
    ];

    for (field, _, count, _) in &inputs {
        ensure_non_negative(field, Decimal::from(*count))?;
    }

    inputs
        .into_iter()
        .filter(|(_, _, count, _)| *count > 0)
        .map(|(_, label, count, rate)| LineItem::priced(label, Decimal::from(count), rate))
        .collect()
}

fn solar_panel_lines(panels: i64) -> Result<Vec<LineItem>, PricingError> {
    if panels < 1 {
        return Err(PricingError::InvalidInput {
            field: "panels".to_string(),
            value: panels.to_string(),
            reason: "at least one panel is required".to_string(),
        });
    }

    Ok(vec![LineItem::priced(
        "Clean solar panels",
        Decimal::from(panels),
        SOLAR_PANEL_RATE,
    )?])
}

fn facade_lines(area_m2: Decimal, impregnate: bool) -> Result<Vec<LineItem>, PricingError> {
    ensure_positive_area(area_m2)?;

    let mut lines = vec![LineItem::priced("Clean facade", area_m2, FACADE_CLEAN_RATE)?];
    if impregnate {
        lines.push(LineItem::priced("Impregnate", area_m2, FACADE_IMPREGNATE_RATE)?);
    }
    Ok(lines)
}

fn pavement_lines(
    surface: PavementSurface,
    area_m2: Decimal,
    options: &PavementOptions,
) -> Result<(String, Vec<LineItem>), PricingError> {
    ensure_positive_area(area_m2)?;

    if !options.any_selected() {
        return Err(PricingError::NoOptionsSelected {
            service: surface.title().to_string(),
        });
    }

    let selected = [
        (options.clean, "Clean", PAVEMENT_CLEAN_RATE),
        (options.sand_fill, "Sand fill", PAVEMENT_SAND_RATE),
        (
            options.weed_resistant_sand,
            "Weed-resistant grout sand",
            PAVEMENT_WEED_SAND_RATE,
        ),
        (options.coating, "Coating", PAVEMENT_COATING_RATE),
    ];

    let lines = selected
        .into_iter()
        .filter(|(on, _, _)| *on)
        .map(|(_, label, rate)| LineItem::priced(label, area_m2, rate))
        .collect::<Result<_, _>>()?;

    Ok((surface.title().to_string(), lines))
}

fn transport_lines() -> Result<Vec<LineItem>, PricingError> {
    Ok(vec![LineItem::priced(TRANSPORT_TITLE, Decimal::ONE, TRANSPORT_FEE)?])
}

fn ensure_non_negative(field: &str, value: Decimal) -> Result<(), PricingError> {
    if value < Decimal::ZERO {
        return Err(PricingError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must not be negative".to_string(),
        });
    }
    Ok(())
}

fn ensure_positive_area(area_m2: Decimal) -> Result<(), PricingError> {
    if area_m2 <= Decimal::ZERO {
        return Err(PricingError::InvalidInput {
            field: "area_m2".to_string(),
            value: area_m2.to_string(),
            reason: "area must be greater than zero".to_string(),
        });
    }
    Ok(())
}
