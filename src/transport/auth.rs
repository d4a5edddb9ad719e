use serde::Deserialize;

use super::{DecodeError, decode_json};
use crate::domain::{Password, SessionTokens, UserId, Username};

const CLIENT_ID: &str = "yota_mya";
const CLIENT_SECRET: &str = "password";
const REALM: &str = "/customer";
const SERVICE: &str = "dispatcher";
const GRANT_TYPE: &str = "urn:roox:params:oauth:grant-type:m2m";
const RESPONSE_TYPE: &str = "token cookie";

const LEGACY_ORG: &str = "customer";
const UID_LOOKUP_OK: &str = "ok";
const UID_LOOKUP_PREFIX_LEN: usize = 3;

#[derive(Debug, Clone, Deserialize)]
struct ExecutionJsonResponse {
    execution: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TokensJsonResponse {
    access_token: String,
    refresh_token: String,
    #[serde(rename = "JWTToken")]
    jwt: String,
}

#[derive(Debug, Clone, Deserialize)]
struct LoginSuccessJsonResponse {
    redirect: String,
}

#[derive(Debug, Clone, Deserialize)]
struct StatusLegalJsonResponse {
    legalize: bool,
}

fn client_params() -> Vec<(String, String)> {
    vec![
        ("client_id".to_owned(), CLIENT_ID.to_owned()),
        ("client_secret".to_owned(), CLIENT_SECRET.to_owned()),
        ("realm".to_owned(), REALM.to_owned()),
        ("service".to_owned(), SERVICE.to_owned()),
        ("grant_type".to_owned(), GRANT_TYPE.to_owned()),
        ("response_type".to_owned(), RESPONSE_TYPE.to_owned()),
    ]
}

pub fn encode_execution_form() -> Vec<(String, String)> {
    client_params()
}

pub fn encode_access_token_form(
    execution: &str,
    username: &Username,
    password: &Password,
) -> Vec<(String, String)> {
    let mut params = vec![
        ("execution".to_owned(), execution.to_owned()),
        (Username::FIELD.to_owned(), username.as_str().to_owned()),
        (Password::FIELD.to_owned(), password.as_str().to_owned()),
        ("_eventId".to_owned(), "next".to_owned()),
    ];
    params.extend(client_params());
    params
}

pub fn decode_execution_json_response(json: &str) -> Result<String, DecodeError> {
    let parsed: ExecutionJsonResponse = decode_json("execution", json)?;
    Ok(parsed.execution)
}

/// `None` when any of the three secrets is absent: the portal answers a wrong
/// password with a body that simply lacks them.
pub fn decode_tokens_json_response(json: &str) -> Option<SessionTokens> {
    let parsed: TokensJsonResponse = serde_json::from_str(json).ok()?;
    Some(SessionTokens {
        access_token: parsed.access_token,
        refresh_token: parsed.refresh_token,
        jwt: parsed.jwt,
    })
}

pub fn decode_login_success_json_response(json: &str) -> Result<String, DecodeError> {
    let parsed: LoginSuccessJsonResponse = decode_json("login success", json)?;
    Ok(parsed.redirect)
}

pub fn decode_status_legal_json_response(json: &str) -> Result<bool, DecodeError> {
    let parsed: StatusLegalJsonResponse = decode_json("legal status", json)?;
    Ok(parsed.legalize)
}

pub fn encode_uid_lookup_form(username: &Username) -> Vec<(String, String)> {
    vec![("value".to_owned(), username.as_str().to_owned())]
}

/// Body is `ok:<uid>` on success; the first three bytes are a status prefix.
pub fn decode_uid_lookup_response(body: &str) -> Option<UserId> {
    if !body.starts_with(UID_LOOKUP_OK) {
        return None;
    }
    let uid = body.get(UID_LOOKUP_PREFIX_LEN..)?;
    UserId::new(uid).ok()
}

pub fn encode_login_form(
    success_url: &str,
    fail_url: &str,
    username: &Username,
    password: &Password,
    user_id: &UserId,
) -> Vec<(String, String)> {
    vec![
        ("goto".to_owned(), success_url.to_owned()),
        ("gotoOnFail".to_owned(), fail_url.to_owned()),
        ("org".to_owned(), LEGACY_ORG.to_owned()),
        ("IDToken1".to_owned(), username.as_str().to_owned()),
        ("IDToken2".to_owned(), password.as_str().to_owned()),
        (UserId::FIELD.to_owned(), user_id.as_str().to_owned()),
    ]
}
