//! Slider steps → flat tariff list.

use crate::domain::response::{SliderOffer, TariffStep};

/// Token the portal embeds in the speed field of the unlimited tier.
pub const MAX_SPEED_MARKER: &str = "maxvalue";

/// Speed reported for the unlimited tier after normalization.
pub const MAX_SPEED: &str = "max";

/// Map the unlimited-tier marker to [`MAX_SPEED`]; anything else passes through.
pub fn normalize_speed(raw: &str) -> String {
    if raw.contains(MAX_SPEED_MARKER) {
        MAX_SPEED.to_owned()
    } else {
        raw.to_owned()
    }
}

/// Flatten slider offers into tariff steps, keeping the portal's order.
///
/// A step is active when its code equals `current_code`.
pub fn normalize_tariffs(current_code: Option<&str>, offers: Vec<SliderOffer>) -> Vec<TariffStep> {
    offers
        .into_iter()
        .map(|offer| TariffStep {
            active: current_code == Some(offer.code.as_str()),
            speed: normalize_speed(&offer.speed),
            code: offer.code,
            name: offer.name,
            amount: offer.amount,
            speed_type: offer.speed_type,
        })
        .collect()
}
