//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod auth;
mod devices;
mod finance;
mod legacy;
mod profile;
mod text;

pub use auth::{
    decode_execution_json_response, decode_login_success_json_response,
    decode_status_legal_json_response, decode_tokens_json_response, decode_uid_lookup_response,
    encode_access_token_form, encode_execution_form, encode_login_form, encode_uid_lookup_form,
};
pub use devices::{
    ChangeOfferOutcome, decode_change_offer_json_response, decode_devices_json_response,
    encode_change_offer_json,
};
pub use finance::{
    decode_balance_json_response, decode_operation_history_json_response,
    decode_payments_json_response, encode_operation_history_query, encode_payments_query,
};
pub use legacy::{
    LegacySlider, decode_balance_html, decode_remains_html, decode_slider_data_html,
    encode_legacy_change_offer_form,
};
pub use profile::decode_user_info_json_response;

use serde::de::DeserializeOwned;

/// Failure to turn a response body into typed records.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Body is not valid JSON, or a required field is absent or mistyped.
    #[error("invalid {context} response: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A structurally required element is absent (e.g. an empty device list).
    #[error("response is missing `{field}`")]
    MissingField { field: &'static str },

    /// An HTML scraping pattern did not match the page.
    #[error("pattern `{pattern}` not found in response")]
    PatternNotFound { pattern: &'static str },

    #[error("invalid number in `{field}`: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

fn decode_json<T: DeserializeOwned>(context: &'static str, json: &str) -> Result<T, DecodeError> {
    serde_json::from_str(json).map_err(|source| DecodeError::Json { context, source })
}

/// Parse a portal number that may contain spaces and commas.
///
/// Commas that only ever precede three-digit groups (`1,234`, `1,234,567`)
/// separate thousands. Any other comma is a decimal separator (`87,50`).
fn parse_decimal(field: &'static str, raw: &str) -> Result<f64, DecodeError> {
    let compact = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>();
    let mut groups = compact.split(',');
    let head = groups.next().unwrap_or_default();
    let tail = groups.collect::<Vec<_>>();
    let thousands = !tail.is_empty()
        && !head.contains('.')
        && tail
            .iter()
            .all(|group| group.len() == 3 && group.bytes().all(|b| b.is_ascii_digit()));
    let normalized = if thousands {
        compact.replace(',', "")
    } else {
        compact.replace(',', ".")
    };
    normalized
        .parse::<f64>()
        .map_err(|_| DecodeError::InvalidNumber {
            field,
            value: raw.to_owned(),
        })
}
