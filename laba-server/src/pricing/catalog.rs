//! Catalog prices
//!
//! The shop's menu prices in PHP. Main services are priced per load;
//! add-ons either carry a fixed catalog price or default to 0, meaning
//! "priced after inspection" - an admin records the real price at
//! order-review time via SetAddOnPrice.

use shared::booking::{AddOnService, MainService};

/// Per-load price of the mandatory main service
pub fn main_service_unit_price(service: MainService) -> f64 {
    match service {
        MainService::WashOnly => 99.0,
        MainService::WashDry => 159.0,
        MainService::WashDryFold => 199.0,
    }
}

/// Catalog default for an add-on; 0 means "priced after inspection"
pub fn add_on_default_price(add_on: AddOnService) -> f64 {
    match add_on {
        // Inspection-priced: the calculator never invents a value here
        AddOnService::DryCleaning => 0.0,
        AddOnService::Ironing => 0.0,
        // Fixed catalog prices
        AddOnService::FabricSoftener => 25.0,
        AddOnService::StainTreatment => 35.0,
    }
}
