//! Pricing calculator
//!
//! Combines the main service, selected add-ons, load count and resolved
//! delivery fee into a PricingSnapshot. The snapshot is persisted and
//! recomputed on every price-affecting mutation - it is never derived
//! lazily at display time, so historical totals stay stable after
//! admin-set add-on prices are finalized.

use std::collections::HashMap;

use rust_decimal::Decimal;
use shared::booking::{AddOnService, PricingSnapshot, ServiceOption, ServiceSelection};
use thiserror::Error;

use super::catalog::{add_on_default_price, main_service_unit_price};
use super::money::{is_valid_price, to_decimal, to_f64};

/// Pricing errors
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
}

/// Compute a pricing snapshot
///
/// `recorded_prices` holds admin-captured add-on prices from earlier
/// inspection; selected add-ons absent from it fall back to the catalog
/// default. The calculator sums whatever is recorded - 0 counts as
/// "not yet priced", never as a value to invent.
pub fn compute_pricing(
    selection: &ServiceSelection,
    service_option: ServiceOption,
    delivery_fee: f64,
    recorded_prices: &HashMap<AddOnService, f64>,
) -> Result<PricingSnapshot, PricingError> {
    if selection.load_count < 1 {
        return Err(PricingError::InvalidSelection(
            "load_count must be at least 1".to_string(),
        ));
    }
    if !is_valid_price(delivery_fee) {
        return Err(PricingError::InvalidSelection(format!(
            "invalid delivery fee: {}",
            delivery_fee
        )));
    }

    let main_service_price = to_f64(
        to_decimal(main_service_unit_price(selection.main_service))
            * Decimal::from(selection.load_count),
    );

    let mut add_on_prices: HashMap<AddOnService, f64> = HashMap::new();
    let mut add_on_total = Decimal::ZERO;
    for add_on in &selection.add_ons {
        let price = recorded_prices
            .get(add_on)
            .copied()
            .unwrap_or_else(|| add_on_default_price(*add_on));
        if !is_valid_price(price) {
            return Err(PricingError::InvalidSelection(format!(
                "invalid price for add-on {}: {}",
                add_on, price
            )));
        }
        add_on_prices.insert(*add_on, price);
        add_on_total += to_decimal(price);
    }

    // Delivery fee applies only when the order comes back to the customer
    let effective_delivery = match service_option {
        ServiceOption::PickupOnly => 0.0,
        ServiceOption::PickupAndDelivery => delivery_fee,
    };

    let total = to_decimal(main_service_price) + add_on_total + to_decimal(effective_delivery);

    Ok(PricingSnapshot {
        main_service_price,
        add_on_prices,
        delivery_fee,
        total_price: to_f64(total),
    })
}
