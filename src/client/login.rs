//! Login handshakes for both portal versions.

use log::{info, warn};

use super::http::Method;
use super::{AuthError, Protocol, YotaClient, YotaError};
use crate::domain::UserId;
use crate::transport::{
    decode_execution_json_response, decode_login_success_json_response,
    decode_status_legal_json_response, decode_tokens_json_response, decode_uid_lookup_response,
    encode_access_token_form, encode_execution_form, encode_login_form, encode_uid_lookup_form,
};

/// Redirect the portal hands out once the token session is usable.
const LOGIN_SUCCESS_REDIRECT: &str = "/devices";

impl YotaClient {
    /// Run the login handshake of the configured [`Protocol`].
    ///
    /// Any earlier session is dropped first; on error the client stays logged out.
    /// The cached legacy user id survives a re-login, and so does the cookie jar:
    /// cookies set during the previous session are still sent. Build a fresh
    /// client to start from an empty jar.
    pub fn login(&mut self) -> Result<(), YotaError> {
        self.session.authenticated = false;
        self.session.tokens = None;

        let result = match self.protocol {
            Protocol::Token => self.token_login(),
            Protocol::Form => self.form_login(),
        };
        match &result {
            Ok(()) => {
                self.session.authenticated = true;
                info!(
                    "logged in as {} ({} protocol)",
                    self.session.username().as_str(),
                    self.protocol
                );
            }
            Err(YotaError::Auth(err)) => warn!("login rejected: {err}"),
            Err(_) => {}
        }
        result
    }

    /// Every step is judged by its body; the portal answers some of them with
    /// error statuses even on a login that goes through.
    fn token_login(&mut self) -> Result<(), YotaError> {
        self.execute(self.api_request(Method::Post, &self.endpoints.token_info))?;

        let request = self
            .api_request(Method::Post, &self.endpoints.access_token)
            .form(encode_execution_form());
        let response = self.execute(request)?;
        let execution = decode_execution_json_response(&response.body)
            .map_err(|err| YotaError::Protocol(format!("no login execution issued: {err}")))?;

        let credentials = &self.session.credentials;
        let request = self
            .api_request(Method::Post, &self.endpoints.access_token)
            .form(encode_access_token_form(
                &execution,
                &credentials.username,
                &credentials.password,
            ));
        let response = self.execute(request)?;
        let tokens =
            decode_tokens_json_response(&response.body).ok_or(AuthError::InvalidCredentials)?;

        let request = self.api_request(Method::Get, &self.endpoints.login_success);
        let response = self.execute(request)?;
        let redirect = decode_login_success_json_response(&response.body)?;
        if redirect != LOGIN_SUCCESS_REDIRECT {
            return Err(AuthError::LoginRejected { location: redirect }.into());
        }

        let request = self.api_request(Method::Get, &self.endpoints.status_legal);
        let response = self.execute(request)?;
        if !decode_status_legal_json_response(&response.body)? {
            return Err(AuthError::NotLegalized.into());
        }

        self.execute(self.api_request(Method::Post, &self.endpoints.token_info))?;

        self.session.tokens = Some(tokens);
        Ok(())
    }

    fn form_login(&mut self) -> Result<(), YotaError> {
        let user_id = match self.session.user_id.clone() {
            Some(user_id) => user_id,
            None => {
                let user_id = self.lookup_user_id()?;
                self.session.user_id = Some(user_id.clone());
                user_id
            }
        };

        let credentials = &self.session.credentials;
        let request = self
            .page_request(Method::Post, &self.endpoints.legacy_login)
            .form(encode_login_form(
                &self.endpoints.legacy_devices,
                &self.endpoints.legacy_login_error,
                &credentials.username,
                &credentials.password,
                &user_id,
            ));
        let response = self.execute(request)?;
        if !same_url(&response.url, &self.endpoints.legacy_devices) {
            return Err(AuthError::LoginRejected {
                location: response.url,
            }
            .into());
        }
        Ok(())
    }

    fn lookup_user_id(&self) -> Result<UserId, YotaError> {
        let request = self
            .page_request(Method::Post, &self.endpoints.legacy_uid_by_mail)
            .form(encode_uid_lookup_form(self.session.username()));
        let response = self.send(request)?;
        decode_uid_lookup_response(&response.body).ok_or_else(|| {
            AuthError::UidLookupFailed {
                body: response.body,
            }
            .into()
        })
    }
}

fn same_url(actual: &str, expected: &str) -> bool {
    match (url::Url::parse(actual), url::Url::parse(expected)) {
        (Ok(actual), Ok(expected)) => actual == expected,
        _ => false,
    }
}
