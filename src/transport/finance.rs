use chrono::{DateTime, FixedOffset, Months, Utc};
use serde::Deserialize;

use super::{DecodeError, decode_json};
use crate::domain::{Balance, Money, Operation, Payment};

const WINDOW_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const PAYMENTS_WINDOW_MONTHS: u32 = 1;
const HISTORY_WINDOW_MONTHS: u32 = 6;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoneyJson {
    amount: f64,
    currency_code: String,
}

#[derive(Debug, Clone, Deserialize)]
struct PaymentsJsonResponse {
    #[serde(default)]
    payments: Vec<PaymentJson>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentJson {
    date_payment: DateTime<FixedOffset>,
    amount: f64,
    #[serde(default)]
    offer_code: String,
    #[serde(default)]
    offer_name: String,
    #[serde(default)]
    name_device: String,
    #[serde(default)]
    iccid: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationJson {
    user_id: i64,
    operation_type: String,
    actual_date: DateTime<FixedOffset>,
    amount: MoneyJson,
    #[serde(default)]
    deposit_type: Option<String>,
    #[serde(default)]
    deposit_source: Option<String>,
    #[serde(default)]
    write_down_init_operation: Option<String>,
    #[serde(default)]
    write_down_type: Option<String>,
    #[serde(default)]
    offer_code: Option<String>,
    #[serde(default)]
    offer_name: Option<String>,
    #[serde(default)]
    resource_name: Option<String>,
    #[serde(default)]
    iccid: Option<String>,
}

fn format_window_bound(at: DateTime<Utc>) -> String {
    at.format(WINDOW_FORMAT).to_string()
}

/// Window `[now, now + 1 month)` for upcoming payments.
pub fn encode_payments_query(now: DateTime<Utc>) -> Vec<(String, String)> {
    let end = now + Months::new(PAYMENTS_WINDOW_MONTHS);
    vec![
        ("startTs".to_owned(), format_window_bound(now)),
        ("endTs".to_owned(), format_window_bound(end)),
    ]
}

/// Window `[now - 6 months, now]` for past operations.
pub fn encode_operation_history_query(now: DateTime<Utc>) -> Vec<(String, String)> {
    let start = now - Months::new(HISTORY_WINDOW_MONTHS);
    vec![
        ("fromDate".to_owned(), format_window_bound(start)),
        ("toDate".to_owned(), format_window_bound(now)),
    ]
}

pub fn decode_balance_json_response(json: &str) -> Result<Balance, DecodeError> {
    let parsed: MoneyJson = decode_json("balance", json)?;
    Ok(Balance {
        amount: parsed.amount,
        currency: parsed.currency_code,
    })
}

pub fn decode_payments_json_response(json: &str) -> Result<Vec<Payment>, DecodeError> {
    let parsed: PaymentsJsonResponse = decode_json("payments", json)?;
    Ok(parsed
        .payments
        .into_iter()
        .map(|payment| Payment {
            date: payment.date_payment,
            amount: payment.amount,
            offer_code: payment.offer_code,
            offer_name: payment.offer_name,
            device_name: payment.name_device,
            iccid: payment.iccid,
        })
        .collect())
}

pub fn decode_operation_history_json_response(json: &str) -> Result<Vec<Operation>, DecodeError> {
    let parsed: Vec<OperationJson> = decode_json("operation history", json)?;
    Ok(parsed
        .into_iter()
        .map(|op| Operation {
            user_id: op.user_id,
            operation_type: op.operation_type,
            actual_date: op.actual_date,
            amount: Money {
                amount: op.amount.amount,
                currency_code: op.amount.currency_code,
            },
            deposit_type: op.deposit_type,
            deposit_source: op.deposit_source,
            write_down_init_operation: op.write_down_init_operation,
            write_down_type: op.write_down_type,
            offer_code: op.offer_code,
            offer_name: op.offer_name,
            resource_name: op.resource_name,
            iccid: op.iccid,
        })
        .collect())
}
