//! Service and address catalog enums
//!
//! Closed enums for the service menu and the Calamba barangays used for
//! delivery-fee tiering. Prices live server-side in the pricing module;
//! these types only fix the legal vocabulary at the boundary.

use serde::{Deserialize, Serialize};

/// Mandatory base laundry service, priced per load
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MainService {
    WashOnly,
    WashDry,
    WashDryFold,
}

impl std::fmt::Display for MainService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainService::WashOnly => write!(f, "Wash Only"),
            MainService::WashDry => write!(f, "Wash & Dry"),
            MainService::WashDryFold => write!(f, "Wash, Dry & Fold"),
        }
    }
}

/// Optional per-item add-on service
///
/// Dry-cleaning-style add-ons carry no catalog price; they are priced by
/// an admin after physical inspection of the items.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddOnService {
    DryCleaning,
    Ironing,
    FabricSoftener,
    StainTreatment,
}

impl std::fmt::Display for AddOnService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddOnService::DryCleaning => write!(f, "Dry Cleaning"),
            AddOnService::Ironing => write!(f, "Ironing"),
            AddOnService::FabricSoftener => write!(f, "Fabric Softener"),
            AddOnService::StainTreatment => write!(f, "Stain Treatment"),
        }
    }
}

/// Calamba barangays served by the shop
///
/// Chosen at booking time from a fixed list. Anything the client sends
/// outside this list deserializes to `Unknown`, which the delivery-fee
/// resolver treats as the standard fee (fail-open).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Barangay {
    Halang,
    Parian,
    Real,
    Lecheria,
    Uno,
    Dos,
    Tres,
    Lawa,
    Looc,
    Mayapa,
    Banlic,
    Bubuyan,
    Bucal,
    Makiling,
    Pansol,
    Canlubang,
    Turbina,
    SirangLupa,
    PacianoRizal,
    Palingon,
    #[serde(other)]
    #[default]
    Unknown,
}
