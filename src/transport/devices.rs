use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use super::text::TransportText;
use super::{DecodeError, decode_json};
use crate::domain::{
    ChangeOffer, CurrentProduct, Device, Money, OfferingSpeed, ResourceId, SliderOffer,
};

const CHANGE_OFFER_OK: &str = "OK";

#[derive(Debug, Clone, Deserialize)]
struct DevicesJsonResponse {
    #[serde(default)]
    devices: Vec<DeviceJson>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeviceJson {
    product: ProductJson,
    physical_resource: PhysicalResourceJson,
    offering_speed: OfferingSpeedJson,
    #[serde(default)]
    slider: Option<SliderJson>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductJson {
    product_id: i64,
    begin_date: DateTime<FixedOffset>,
    end_date: DateTime<FixedOffset>,
    #[serde(default)]
    product_offering_code: Option<String>,
    price: PriceJson,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceJson {
    amount: f64,
    currency_code: String,
}

#[derive(Debug, Clone, Deserialize)]
struct PhysicalResourceJson {
    #[serde(rename = "resourceID")]
    resource_id: ResourceIdJson,
}

#[derive(Debug, Clone, Deserialize)]
struct ResourceIdJson {
    key: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfferingSpeedJson {
    speed_value: String,
    unit_of_measure: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SliderJson {
    #[serde(default)]
    steps: Vec<StepJson>,
    #[serde(default)]
    current_product: Option<CurrentStepJson>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StepJson {
    code: String,
    #[serde(default)]
    offer_description: String,
    amount: f64,
    #[serde(default)]
    speed: String,
    #[serde(default)]
    speed_type: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CurrentStepJson {
    #[serde(default)]
    code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChangeOfferJsonResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<TransportText>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOfferOutcome {
    Accepted,
    Rejected { code: Option<String> },
}

/// Decode the devices listing and keep the first device.
pub fn decode_devices_json_response(json: &str) -> Result<Device, DecodeError> {
    let parsed: DevicesJsonResponse = decode_json("devices", json)?;
    let device = parsed
        .devices
        .into_iter()
        .next()
        .ok_or(DecodeError::MissingField { field: "devices" })?;

    let (current_code, offers) = match device.slider {
        Some(slider) => (
            slider.current_product.and_then(|current| current.code),
            slider.steps.into_iter().map(SliderOffer::from).collect(),
        ),
        None => (None, Vec::new()),
    };

    Ok(Device {
        product: CurrentProduct {
            product_id: device.product.product_id,
            offering_code: device.product.product_offering_code,
            begin_date: device.product.begin_date,
            end_date: device.product.end_date,
            price: Money {
                amount: device.product.price.amount,
                currency_code: device.product.price.currency_code,
            },
            speed: OfferingSpeed {
                value: device.offering_speed.speed_value,
                unit: device.offering_speed.unit_of_measure,
            },
        },
        resource_id: ResourceId {
            key: device.physical_resource.resource_id.key,
            kind: device.physical_resource.resource_id.kind,
        },
        current_code,
        offers,
    })
}

impl From<StepJson> for SliderOffer {
    fn from(step: StepJson) -> Self {
        Self {
            code: step.code,
            name: step.offer_description,
            amount: step.amount,
            speed: step.speed,
            speed_type: step.speed_type,
        }
    }
}

pub fn encode_change_offer_json(request: &ChangeOffer) -> serde_json::Value {
    serde_json::json!({
        "currentProductId": request.current_product_id(),
        "disablingAutoprolong": request.disabling_autoprolong(),
        "offerCode": request.offer_code().as_str(),
        "resourceID": {
            "key": request.resource_id().key.as_str(),
            "type": request.resource_id().kind.as_str(),
        },
    })
}

pub fn decode_change_offer_json_response(json: &str) -> Result<ChangeOfferOutcome, DecodeError> {
    let parsed: ChangeOfferJsonResponse = decode_json("change offer", json)?;
    if parsed.message.as_deref() == Some(CHANGE_OFFER_OK) {
        return Ok(ChangeOfferOutcome::Accepted);
    }
    Ok(ChangeOfferOutcome::Rejected {
        code: parsed.code.map(TransportText::into_string),
    })
}
