//! Legacy device page scraping.
//!
//! The patterns below match the markup of the `selfcare` portal verbatim and
//! must not be loosened.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::text::TransportText;
use super::{DecodeError, decode_json, parse_decimal};
use crate::domain::{Balance, OfferCode, Remains, SliderOffer};

const SLIDER_DATA_PATTERN: &str = r"(?s)var sliderData = (\{.*?\});\s*(?:\n|</script>)";
const BALANCE_PATTERN: &str =
    r#"<dd id="balance-holder"><span>(-?\d+(?:[.,]\d+)?)</span>\s*(\w{3}\.?)"#;
const REMAINS_PATTERN: &str = r#"<div class="time"><strong>(\d+)</strong>\s*(\w{3})"#;

static SLIDER_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SLIDER_DATA_PATTERN).expect("valid slider data pattern"));
static BALANCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(BALANCE_PATTERN).expect("valid balance pattern"));
static REMAINS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(REMAINS_PATTERN).expect("valid remains pattern"));

const SLOT_FIELD: &str = "isSlot";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SliderDataJson {
    #[serde(default)]
    product_id: Option<TransportText>,
    #[serde(default)]
    steps: Vec<LegacyStepJson>,
    #[serde(default)]
    current_product: Option<LegacyCurrentJson>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyStepJson {
    code: String,
    #[serde(default)]
    name: String,
    amount_number: TransportText,
    #[serde(default)]
    speed_number: Option<TransportText>,
    #[serde(default)]
    speed_string: String,
}

#[derive(Debug, Clone, Deserialize)]
struct LegacyCurrentJson {
    #[serde(default)]
    code: Option<String>,
}

/// Slider of the first product listed on the legacy device page.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacySlider {
    pub product_id: String,
    pub current_code: Option<String>,
    pub offers: Vec<SliderOffer>,
}

fn captures<'h>(
    re: &Regex,
    pattern: &'static str,
    html: &'h str,
) -> Result<regex::Captures<'h>, DecodeError> {
    re.captures(html)
        .ok_or(DecodeError::PatternNotFound { pattern })
}

/// Numeric product ids sort by value, ahead of any non-numeric key.
fn product_key_order(key: &str) -> (u8, u64) {
    match key.parse::<u64>() {
        Ok(id) => (0, id),
        Err(_) => (1, 0),
    }
}

/// Extract the `sliderData` object assigned inside the page's `<script>`.
///
/// The object is keyed by product id; the numerically lowest id is taken.
pub fn decode_slider_data_html(html: &str) -> Result<LegacySlider, DecodeError> {
    let caps = captures(&SLIDER_DATA_RE, SLIDER_DATA_PATTERN, html)?;
    let parsed: BTreeMap<String, SliderDataJson> = decode_json("sliderData", &caps[1])?;
    let (key, slider) = parsed
        .into_iter()
        .min_by_key(|(key, _)| product_key_order(key))
        .ok_or(DecodeError::MissingField {
            field: "sliderData",
        })?;

    let offers = slider
        .steps
        .into_iter()
        .map(|step| {
            Ok(SliderOffer {
                amount: parse_decimal("amountNumber", step.amount_number.as_str())?,
                code: step.code,
                name: step.name,
                speed: step
                    .speed_number
                    .map(TransportText::into_string)
                    .unwrap_or_default(),
                speed_type: step.speed_string,
            })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(LegacySlider {
        product_id: slider
            .product_id
            .map(TransportText::into_string)
            .unwrap_or(key),
        current_code: slider.current_product.and_then(|current| current.code),
        offers,
    })
}

/// Balance from `<dd id="balance-holder">`; the amount may use a thousands or decimal comma.
pub fn decode_balance_html(html: &str) -> Result<Balance, DecodeError> {
    let caps = captures(&BALANCE_RE, BALANCE_PATTERN, html)?;
    Ok(Balance {
        amount: parse_decimal("balance", &caps[1])?,
        currency: caps[2].to_owned(),
    })
}

pub fn decode_remains_html(html: &str) -> Result<Remains, DecodeError> {
    let caps = captures(&REMAINS_RE, REMAINS_PATTERN, html)?;
    let amount = caps[1]
        .parse::<u32>()
        .map_err(|_| DecodeError::InvalidNumber {
            field: "remains",
            value: caps[1].to_owned(),
        })?;
    Ok(Remains {
        amount,
        unit: caps[2].to_owned(),
    })
}

pub fn encode_legacy_change_offer_form(
    product_id: &str,
    offer_code: &OfferCode,
) -> Vec<(String, String)> {
    vec![
        ("product".to_owned(), product_id.to_owned()),
        (OfferCode::FIELD.to_owned(), offer_code.as_str().to_owned()),
        (SLOT_FIELD.to_owned(), "false".to_owned()),
    ]
}
