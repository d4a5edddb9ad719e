use chrono::{DateTime, FixedOffset};

use crate::domain::value::ResourceId;

/// Amount of money with its ISO currency code.
#[derive(Debug, Clone, PartialEq)]
pub struct Money {
    pub amount: f64,
    pub currency_code: String,
}

/// Account balance.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub amount: f64,
    /// `RUB` on the current portal, the captured markup fragment (`руб.`) on the legacy one.
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferingSpeed {
    pub value: String,
    pub unit: String,
}

/// Snapshot of the plan currently assigned to a device.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentProduct {
    pub product_id: i64,
    pub offering_code: Option<String>,
    pub begin_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
    pub price: Money,
    pub speed: OfferingSpeed,
}

/// One decoded slider step, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderOffer {
    pub code: String,
    pub name: String,
    pub amount: f64,
    pub speed: String,
    pub speed_type: String,
}

/// One selectable tariff tier.
#[derive(Debug, Clone, PartialEq)]
pub struct TariffStep {
    pub code: String,
    pub name: String,
    pub amount: f64,
    /// Numeric speed as sent by the portal, or `"max"` for the unlimited tier.
    pub speed: String,
    pub speed_type: String,
    pub active: bool,
}

/// First device of the account as listed by the devices endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub product: CurrentProduct,
    pub resource_id: ResourceId,
    /// Code of the slider's current product, absent when no plan is assigned.
    pub current_code: Option<String>,
    pub offers: Vec<SliderOffer>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub account_type: String,
    pub email: String,
    pub phone: String,
    pub registered: DateTime<FixedOffset>,
    pub status: String,
    pub user_id: i64,
}

/// Upcoming scheduled payment.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub date: DateTime<FixedOffset>,
    pub amount: f64,
    pub offer_code: String,
    pub offer_name: String,
    pub device_name: String,
    pub iccid: String,
}

/// Past financial operation (deposit or write-down).
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub user_id: i64,
    pub operation_type: String,
    pub actual_date: DateTime<FixedOffset>,
    pub amount: Money,
    pub deposit_type: Option<String>,
    pub deposit_source: Option<String>,
    pub write_down_init_operation: Option<String>,
    pub write_down_type: Option<String>,
    pub offer_code: Option<String>,
    pub offer_name: Option<String>,
    pub resource_name: Option<String>,
    pub iccid: Option<String>,
}

/// Remaining validity of the current plan, as rendered by the legacy device page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remains {
    pub amount: u32,
    pub unit: String,
}
