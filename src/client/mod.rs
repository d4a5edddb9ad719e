//! Client layer: orchestrates transport calls and maps transport ↔ domain.

mod http;
mod login;

#[cfg(test)]
mod fake;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, warn};

use self::http::{BoxError, HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport};
use crate::domain::{
    Balance, ChangeOffer, CurrentProduct, Device, OfferCode, Operation, Password, Payment,
    Remains, SessionTokens, TariffStep, UserId, UserInfo, Username, ValidationError,
    normalize_tariffs,
};
use crate::transport::{
    ChangeOfferOutcome, DecodeError, LegacySlider, decode_balance_html,
    decode_balance_json_response, decode_change_offer_json_response,
    decode_devices_json_response, decode_operation_history_json_response,
    decode_payments_json_response, decode_remains_html, decode_slider_data_html,
    decode_user_info_json_response, encode_change_offer_json, encode_legacy_change_offer_form,
    encode_operation_history_query, encode_payments_query,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// User-Agent of a mainstream desktop browser; the portal serves other agents a stripped page.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/77.0.3865.120 Safari/537.36";

const ACCEPT_JSON: &str = "application/json";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3";

/// Public client credential shared by every user of the current portal's web app.
const PORTAL_BASIC_AUTH: &str = "Basic bmV3X2xrX3Jlc3Q6cGFzc3dvcmQ=";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Login protocol of the portal version being talked to.
///
/// The two versions share no endpoints and give no signal to tell them apart,
/// so the protocol is fixed when the client is built.
pub enum Protocol {
    /// Current portal (`/wa/v1`): OAuth-style token handshake, JSON resources.
    Token,
    /// Legacy `selfcare` portal: form login, scraped HTML resources.
    Form,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token => f.write_str("token"),
            Self::Form => f.write_str("form"),
        }
    }
}

#[derive(Debug, Clone)]
/// Portal login and password.
pub struct Credentials {
    username: Username,
    password: Password,
}

impl Credentials {
    /// Validate that both parts are non-empty.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }
}

#[derive(Debug, Clone)]
/// Per-client login state. Never written to disk.
pub struct Session {
    credentials: Credentials,
    tokens: Option<SessionTokens>,
    user_id: Option<UserId>,
    authenticated: bool,
}

impl Session {
    fn new(credentials: Credentials, user_id: Option<UserId>) -> Self {
        Self {
            credentials,
            tokens: None,
            user_id,
            authenticated: false,
        }
    }

    pub fn username(&self) -> &Username {
        &self.credentials.username
    }

    /// Secrets from the last token handshake.
    pub fn tokens(&self) -> Option<&SessionTokens> {
        self.tokens.as_ref()
    }

    /// Legacy user id, cached after the first lookup.
    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Every URL the client talks to.
pub struct PortalEndpoints {
    pub access_token: String,
    pub token_info: String,
    pub login_success: String,
    pub status_legal: String,
    pub devices: String,
    pub balance: String,
    pub profile: String,
    pub change_offer: String,
    pub payments: String,
    pub operation_history: String,
    pub legacy_uid_by_mail: String,
    pub legacy_login: String,
    /// Device page; also the redirect target of a successful legacy login.
    pub legacy_devices: String,
    pub legacy_login_error: String,
    pub legacy_change_offer: String,
}

impl Default for PortalEndpoints {
    fn default() -> Self {
        Self {
            access_token: "https://id.yota.ru/sso/oauth2/access_token?skipAutoLogin=true"
                .to_owned(),
            token_info: "https://my.yota.ru/wa/v1/auth/tokenInfo".to_owned(),
            login_success: "https://my.yota.ru/wa/v1/auth/loginSuccess".to_owned(),
            status_legal: "https://my.yota.ru/wa/v1/profile/statusLegal".to_owned(),
            devices: "https://my.yota.ru/wa/v1/devices/devices".to_owned(),
            balance: "https://my.yota.ru/wa/v1/finance/getBalance".to_owned(),
            profile: "https://my.yota.ru/wa/v1/profile/info".to_owned(),
            change_offer: "https://my.yota.ru/wa/v1/devices/changeOffer/change".to_owned(),
            payments: "https://my.yota.ru/wa/v1/finance/future/payments".to_owned(),
            operation_history: "https://my.yota.ru/wa/v1/finance/getOperationHistory".to_owned(),
            legacy_uid_by_mail: "https://my.yota.ru/selfcare/login/getUidByMail".to_owned(),
            legacy_login: "https://login.yota.ru/UI/Login".to_owned(),
            legacy_devices: "https://my.yota.ru/selfcare/devices".to_owned(),
            legacy_login_error: "https://my.yota.ru/selfcare/loginError".to_owned(),
            legacy_change_offer: "https://my.yota.ru/selfcare/devices/changeOffer".to_owned(),
        }
    }
}

impl PortalEndpoints {
    fn all(&self) -> [&String; 15] {
        [
            &self.access_token,
            &self.token_info,
            &self.login_success,
            &self.status_legal,
            &self.devices,
            &self.balance,
            &self.profile,
            &self.change_offer,
            &self.payments,
            &self.operation_history,
            &self.legacy_uid_by_mail,
            &self.legacy_login,
            &self.legacy_devices,
            &self.legacy_login_error,
            &self.legacy_change_offer,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Reasons the portal refused a login.
pub enum AuthError {
    /// Token endpoint did not issue session secrets.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Login finished somewhere other than the expected landing page.
    #[error("login rejected, portal sent us to {location:?}")]
    LoginRejected { location: String },

    /// Account requires legal acknowledgement on the portal before use.
    #[error("account is not legalized")]
    NotLegalized,

    /// Legacy uid-by-mail lookup answered with something other than `ok`.
    #[error("user id lookup failed: {body:?}")]
    UidLookupFailed { body: String },
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`YotaClient`].
pub enum YotaError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Response body could not be decoded into the expected records.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Server answered with a shape that breaks the login contract.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Portal refused the tariff change; `code` is the portal's error code.
    #[error("tariff change rejected (code {code:?})")]
    ChangeOfferRejected { code: Option<String> },

    #[error("{operation} is not available with the {protocol} protocol")]
    Unsupported {
        operation: &'static str,
        protocol: Protocol,
    },

    #[error("not logged in")]
    NotLoggedIn,

    #[error("invalid endpoint URL {url:?}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`YotaClient`].
///
/// Use this when you need to customize endpoints, timeout, user-agent or TLS checks.
pub struct YotaClientBuilder {
    credentials: Credentials,
    protocol: Protocol,
    endpoints: PortalEndpoints,
    user_id: Option<UserId>,
    timeout: Duration,
    user_agent: String,
    accept_invalid_certs: bool,
}

impl YotaClientBuilder {
    pub fn new(credentials: Credentials, protocol: Protocol) -> Self {
        Self {
            credentials,
            protocol,
            endpoints: PortalEndpoints::default(),
            user_id: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            accept_invalid_certs: false,
        }
    }

    /// Override the portal URLs.
    pub fn endpoints(mut self, endpoints: PortalEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Seed the legacy user id so login skips the uid-by-mail lookup.
    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Set an HTTP client timeout applied to each entire request (default 60 s).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Skip TLS certificate verification. Off by default.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    fn validate_endpoints(&self) -> Result<(), YotaError> {
        for endpoint in self.endpoints.all() {
            url::Url::parse(endpoint).map_err(|source| YotaError::InvalidEndpoint {
                url: endpoint.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Build a [`YotaClient`].
    pub fn build(self) -> Result<YotaClient, YotaError> {
        self.validate_endpoints()?;
        if self.accept_invalid_certs {
            warn!("TLS certificate verification is disabled");
        }

        let transport =
            ReqwestTransport::new(&self.user_agent, self.timeout, self.accept_invalid_certs)
                .map_err(|err| YotaError::Transport(Box::new(err)))?;

        Ok(YotaClient {
            protocol: self.protocol,
            session: Session::new(self.credentials, self.user_id),
            endpoints: self.endpoints,
            http: Arc::new(transport),
        })
    }
}

#[derive(Clone)]
/// Blocking client for one portal account.
///
/// Call [`YotaClient::login`] first; every getter re-fetches from the portal.
/// A client is not meant to be shared between threads mid-operation: `login`
/// takes `&mut self` and the cookie jar belongs to the session.
pub struct YotaClient {
    protocol: Protocol,
    session: Session,
    endpoints: PortalEndpoints,
    http: Arc<dyn HttpTransport>,
}

impl YotaClient {
    /// Create a client with default endpoints and settings.
    ///
    /// For more customization, use [`YotaClient::builder`].
    pub fn new(credentials: Credentials, protocol: Protocol) -> Result<Self, YotaError> {
        YotaClientBuilder::new(credentials, protocol).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials, protocol: Protocol) -> YotaClientBuilder {
        YotaClientBuilder::new(credentials, protocol)
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// First device with its current product, resource id and slider.
    pub fn device(&self) -> Result<Device, YotaError> {
        self.require(Protocol::Token, "device")?;
        self.fetch_device()
    }

    /// Selectable tariffs with the current one marked active.
    pub fn tariffs(&self) -> Result<Vec<TariffStep>, YotaError> {
        self.require_login()?;
        match self.protocol {
            Protocol::Token => {
                let device = self.fetch_device()?;
                Ok(normalize_tariffs(device.current_code.as_deref(), device.offers))
            }
            Protocol::Form => {
                let slider = self.fetch_legacy_slider()?;
                Ok(normalize_tariffs(slider.current_code.as_deref(), slider.offers))
            }
        }
    }

    pub fn current_product(&self) -> Result<CurrentProduct, YotaError> {
        self.require(Protocol::Token, "current_product")?;
        Ok(self.fetch_device()?.product)
    }

    pub fn balance(&self) -> Result<Balance, YotaError> {
        self.require_login()?;
        match self.protocol {
            Protocol::Token => {
                let response = self.send(self.api_request(Method::Get, &self.endpoints.balance))?;
                Ok(decode_balance_json_response(&response.body)?)
            }
            Protocol::Form => {
                let page = self.fetch_legacy_page()?;
                Ok(decode_balance_html(&page.body)?)
            }
        }
    }

    /// Remaining validity of the current plan as shown on the legacy device page.
    pub fn remains(&self) -> Result<Remains, YotaError> {
        self.require(Protocol::Form, "remains")?;
        let page = self.fetch_legacy_page()?;
        Ok(decode_remains_html(&page.body)?)
    }

    pub fn user_info(&self) -> Result<UserInfo, YotaError> {
        self.require(Protocol::Token, "user_info")?;
        let response = self.send(self.api_request(Method::Get, &self.endpoints.profile))?;
        Ok(decode_user_info_json_response(&response.body)?)
    }

    /// Payments scheduled within the next month.
    pub fn payments(&self) -> Result<Vec<Payment>, YotaError> {
        self.require(Protocol::Token, "payments")?;
        let request = self
            .api_request(Method::Get, &self.endpoints.payments)
            .query(encode_payments_query(Utc::now()));
        let response = self.send(request)?;
        Ok(decode_payments_json_response(&response.body)?)
    }

    /// Deposits and write-downs of the last six months.
    pub fn operation_history(&self) -> Result<Vec<Operation>, YotaError> {
        self.require(Protocol::Token, "operation_history")?;
        let request = self
            .api_request(Method::Get, &self.endpoints.operation_history)
            .query(encode_operation_history_query(Utc::now()));
        let response = self.send(request)?;
        Ok(decode_operation_history_json_response(&response.body)?)
    }

    /// Switch the first device to the tariff `offer_code`.
    ///
    /// Errors:
    /// - [`YotaError::ChangeOfferRejected`] when the portal refuses the switch,
    /// - [`YotaError::HttpStatus`] for non-2xx HTTP responses.
    pub fn change_tariff(&self, offer_code: &OfferCode) -> Result<(), YotaError> {
        self.require_login()?;
        match self.protocol {
            Protocol::Token => {
                let device = self.fetch_device()?;
                let change = ChangeOffer::for_device(&device, offer_code.clone());
                let request = self
                    .api_request(Method::Post, &self.endpoints.change_offer)
                    .json(encode_change_offer_json(&change));
                let response = self.send(request)?;
                match decode_change_offer_json_response(&response.body)? {
                    ChangeOfferOutcome::Accepted => Ok(()),
                    ChangeOfferOutcome::Rejected { code } => {
                        warn!(
                            "tariff change to {} rejected with code {code:?}",
                            offer_code.as_str()
                        );
                        Err(YotaError::ChangeOfferRejected { code })
                    }
                }
            }
            Protocol::Form => {
                let slider = self.fetch_legacy_slider()?;
                let request = self
                    .page_request(Method::Post, &self.endpoints.legacy_change_offer)
                    .form(encode_legacy_change_offer_form(&slider.product_id, offer_code));
                self.send(request)?;
                Ok(())
            }
        }
    }

    fn fetch_device(&self) -> Result<Device, YotaError> {
        let response = self.send(self.api_request(Method::Get, &self.endpoints.devices))?;
        Ok(decode_devices_json_response(&response.body)?)
    }

    fn fetch_legacy_page(&self) -> Result<HttpResponse, YotaError> {
        self.send(self.page_request(Method::Get, &self.endpoints.legacy_devices))
    }

    fn fetch_legacy_slider(&self) -> Result<LegacySlider, YotaError> {
        let page = self.fetch_legacy_page()?;
        Ok(decode_slider_data_html(&page.body)?)
    }

    fn require_login(&self) -> Result<(), YotaError> {
        if !self.session.authenticated {
            return Err(YotaError::NotLoggedIn);
        }
        Ok(())
    }

    fn require(&self, protocol: Protocol, operation: &'static str) -> Result<(), YotaError> {
        if self.protocol != protocol {
            return Err(YotaError::Unsupported {
                operation,
                protocol: self.protocol,
            });
        }
        self.require_login()
    }

    /// Request to the JSON API: shared Basic credential, JSON accept.
    fn api_request(&self, method: Method, url: &str) -> HttpRequest {
        HttpRequest::new(method, url)
            .header("Authorization", PORTAL_BASIC_AUTH)
            .header("Accept", ACCEPT_JSON)
    }

    /// Request to the legacy HTML portal: cookies only, browser accept.
    fn page_request(&self, method: Method, url: &str) -> HttpRequest {
        HttpRequest::new(method, url).header("Accept", ACCEPT_HTML)
    }

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, YotaError> {
        debug!("{} {}", request.method.as_str(), request.url);
        self.http.execute(request).map_err(YotaError::Transport)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, YotaError> {
        let response = self.execute(request)?;
        if !(200..=299).contains(&response.status) {
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(YotaError::HttpStatus {
                status: response.status,
                body,
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::http::RequestBody;

    use super::fake::FakeTransport;
    use super::*;

    pub(crate) const DEVICES_JSON: &str = r#"
    {
      "devices": [
        {
          "product": {
            "productId": 555001,
            "beginDate": "2024-03-01T10:00:00+03:00",
            "endDate": "2024-03-31T10:00:00+03:00",
            "productOfferingCode": "POS-MA14-0001",
            "price": { "amount": 400, "currencyCode": "RUB" }
          },
          "physicalResource": {
            "resourceID": { "key": "8970199000000000001", "type": "ICCID" }
          },
          "offeringSpeed": { "speedValue": "1.0", "unitOfMeasure": "mbps" },
          "slider": {
            "steps": [
              { "code": "POS-MA14-0001", "offerDescription": "1 Мбит/с", "amount": 400, "speed": "1.0", "speedType": "mbps" },
              { "code": "POS-MA14-0018", "offerDescription": "Максимальная", "amount": 1400, "speed": "maxvalue", "speedType": "mbps" }
            ],
            "currentProduct": { "code": "POS-MA14-0001" }
          }
        }
      ]
    }
    "#;

    pub(crate) const LEGACY_PAGE: &str = r#"
<dd id="balance-holder"><span>87,50</span> руб.</dd>
<div class="time"><strong>9</strong> дней</div>
<script>
var sliderData = {"4242": {"productId": "4242", "steps": [{"code": "POS-MA6-0001", "name": "64 Кбит/сек", "amountNumber": "0", "speedNumber": "64", "speedString": "Кбит/сек"}, {"code": "POS-MA6-0020", "name": "Максимальная", "amountNumber": "1 400", "speedNumber": "maxvalue", "speedString": ""}], "currentProduct": {"code": "POS-MA6-0020"}}};
</script>
"#;

    pub(crate) fn make_client(protocol: Protocol, transport: FakeTransport) -> YotaClient {
        YotaClient {
            protocol,
            session: Session::new(Credentials::new("user@example.com", "secret").unwrap(), None),
            endpoints: PortalEndpoints::default(),
            http: Arc::new(transport),
        }
    }

    fn logged_in(protocol: Protocol, transport: FakeTransport) -> YotaClient {
        let mut client = make_client(protocol, transport);
        client.session.authenticated = true;
        client
    }

    #[test]
    fn getters_require_login() {
        let transport = FakeTransport::new();
        let client = make_client(Protocol::Token, transport.clone());

        assert!(matches!(client.tariffs(), Err(YotaError::NotLoggedIn)));
        assert!(matches!(client.balance(), Err(YotaError::NotLoggedIn)));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn tariffs_from_devices_mark_current_and_max() {
        let transport = FakeTransport::new();
        transport.respond(200, DEVICES_JSON);
        let client = logged_in(Protocol::Token, transport.clone());

        let tariffs = client.tariffs().unwrap();
        assert_eq!(tariffs.len(), 2);
        assert!(tariffs[0].active);
        assert!(!tariffs[1].active);
        assert_eq!(tariffs[1].speed, "max");
        assert_eq!(tariffs[1].amount, 1400.0);

        let requests = transport.requests();
        assert_eq!(requests[0].url, PortalEndpoints::default().devices);
        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(
            requests[0].header_value("Authorization"),
            Some(PORTAL_BASIC_AUTH)
        );
        assert_eq!(requests[0].header_value("Accept"), Some(ACCEPT_JSON));
    }

    #[test]
    fn current_product_reads_first_device() {
        let transport = FakeTransport::new();
        transport.respond(200, DEVICES_JSON);
        let client = logged_in(Protocol::Token, transport);

        let product = client.current_product().unwrap();
        assert_eq!(product.product_id, 555_001);
        assert_eq!(product.price.amount, 400.0);
        assert_eq!(product.speed.unit, "mbps");
        assert_eq!(product.end_date.to_rfc3339(), "2024-03-31T10:00:00+03:00");
    }

    #[test]
    fn balance_uses_json_endpoint_for_token_protocol() {
        let transport = FakeTransport::new();
        transport.respond(200, r#"{"amount": 12.5, "currencyCode": "RUB"}"#);
        let client = logged_in(Protocol::Token, transport.clone());

        let balance = client.balance().unwrap();
        assert_eq!(balance.amount, 12.5);
        assert_eq!(balance.currency, "RUB");
        assert_eq!(transport.urls(), vec![PortalEndpoints::default().balance]);
    }

    #[test]
    fn legacy_getters_scrape_device_page() {
        let transport = FakeTransport::new();
        transport
            .respond(200, LEGACY_PAGE)
            .respond(200, LEGACY_PAGE)
            .respond(200, LEGACY_PAGE);
        let client = logged_in(Protocol::Form, transport.clone());

        let balance = client.balance().unwrap();
        assert_eq!(balance.amount, 87.5);
        assert_eq!(balance.currency, "руб.");

        let remains = client.remains().unwrap();
        assert_eq!(remains.amount, 9);

        let tariffs = client.tariffs().unwrap();
        assert_eq!(tariffs.iter().filter(|t| t.active).count(), 1);
        assert_eq!(tariffs[1].code, "POS-MA6-0020");
        assert!(tariffs[1].active);
        assert_eq!(tariffs[1].speed, "max");
        assert_eq!(tariffs[1].amount, 1400.0);

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.header_value("Authorization").is_none()));
        assert_eq!(requests[0].header_value("Accept"), Some(ACCEPT_HTML));
    }

    #[test]
    fn legacy_page_without_balance_is_a_decode_error() {
        let transport = FakeTransport::new();
        transport.respond(200, "<html>maintenance</html>");
        let client = logged_in(Protocol::Form, transport);

        let err = client.balance().unwrap_err();
        assert!(matches!(
            err,
            YotaError::Decode(DecodeError::PatternNotFound { .. })
        ));
    }

    #[test]
    fn protocol_specific_operations_are_reported_unsupported() {
        let client = logged_in(Protocol::Form, FakeTransport::new());
        assert!(matches!(
            client.payments(),
            Err(YotaError::Unsupported {
                operation: "payments",
                protocol: Protocol::Form
            })
        ));
        assert!(matches!(
            client.current_product(),
            Err(YotaError::Unsupported { .. })
        ));

        let client = logged_in(Protocol::Token, FakeTransport::new());
        assert!(matches!(
            client.remains(),
            Err(YotaError::Unsupported {
                operation: "remains",
                ..
            })
        ));
    }

    #[test]
    fn payments_and_history_send_time_windows() {
        let transport = FakeTransport::new();
        transport.respond(200, r#"{"payments": []}"#).respond(200, "[]");
        let client = logged_in(Protocol::Token, transport.clone());

        assert!(client.payments().unwrap().is_empty());
        assert!(client.operation_history().unwrap().is_empty());

        let requests = transport.requests();
        let keys = |r: &HttpRequest| r.query.iter().map(|(k, _)| k.clone()).collect::<Vec<_>>();
        assert_eq!(keys(&requests[0]), ["startTs", "endTs"]);
        assert_eq!(keys(&requests[1]), ["fromDate", "toDate"]);
        assert!(requests[0].query[0].1.ends_with('Z'));
        assert_eq!(requests[1].url, PortalEndpoints::default().operation_history);
    }

    #[test]
    fn change_tariff_echoes_product_and_resource_ids() {
        let transport = FakeTransport::new();
        transport
            .respond(200, DEVICES_JSON)
            .respond(200, r#"{"message": "OK"}"#);
        let client = logged_in(Protocol::Token, transport.clone());

        client
            .change_tariff(&OfferCode::new("POS-MA14-0018").unwrap())
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].url, PortalEndpoints::default().change_offer);
        assert_eq!(requests[1].method, Method::Post);
        let RequestBody::Json(body) = &requests[1].body else {
            panic!("expected JSON body, got {:?}", requests[1].body);
        };
        assert_eq!(body["currentProductId"], 555001);
        assert_eq!(body["offerCode"], "POS-MA14-0018");
        assert_eq!(body["disablingAutoprolong"], false);
        assert_eq!(body["resourceID"]["key"], "8970199000000000001");
        assert_eq!(body["resourceID"]["type"], "ICCID");
    }

    #[test]
    fn change_tariff_surfaces_portal_code() {
        let transport = FakeTransport::new();
        transport
            .respond(200, DEVICES_JSON)
            .respond(200, r#"{"message": "ERROR", "code": "NOT_ENOUGH_MONEY"}"#);
        let client = logged_in(Protocol::Token, transport);

        let err = client
            .change_tariff(&OfferCode::new("POS-MA14-0018").unwrap())
            .unwrap_err();
        match err {
            YotaError::ChangeOfferRejected { code } => {
                assert_eq!(code.as_deref(), Some("NOT_ENOUGH_MONEY"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn legacy_change_tariff_posts_product_form() {
        let transport = FakeTransport::new();
        transport.respond(200, LEGACY_PAGE).respond(200, "");
        let client = logged_in(Protocol::Form, transport.clone());

        client
            .change_tariff(&OfferCode::new("POS-MA6-0001").unwrap())
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests[1].url, PortalEndpoints::default().legacy_change_offer);
        assert_eq!(
            requests[1].body,
            RequestBody::Form(vec![
                ("product".to_owned(), "4242".to_owned()),
                ("offerCode".to_owned(), "POS-MA6-0001".to_owned()),
                ("isSlot".to_owned(), "false".to_owned()),
            ])
        );
    }

    #[test]
    fn maps_non_success_http_status() {
        let transport = FakeTransport::new();
        transport.respond(503, "oops").respond(500, "   ");
        let client = logged_in(Protocol::Token, transport);

        assert!(matches!(
            client.balance(),
            Err(YotaError::HttpStatus {
                status: 503,
                body: Some(_)
            })
        ));
        assert!(matches!(
            client.balance(),
            Err(YotaError::HttpStatus {
                status: 500,
                body: None
            })
        ));
    }

    #[test]
    fn transport_failures_propagate() {
        let transport = FakeTransport::new();
        transport.fail("connection reset");
        let client = logged_in(Protocol::Token, transport);

        let err = client.user_info().unwrap_err();
        assert!(matches!(err, YotaError::Transport(_)));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn credentials_validate_inputs() {
        assert!(Credentials::new("   ", "pass").is_err());
        assert!(Credentials::new("user", "").is_err());
    }

    #[test]
    fn builder_rejects_malformed_endpoint() {
        let endpoints = PortalEndpoints {
            devices: "not a url".to_owned(),
            ..PortalEndpoints::default()
        };
        let err = YotaClient::builder(
            Credentials::new("user", "pass").unwrap(),
            Protocol::Token,
        )
        .endpoints(endpoints)
        .build()
        .err()
        .unwrap();
        assert!(matches!(err, YotaError::InvalidEndpoint { .. }));
    }

    #[test]
    fn builder_applies_overrides() {
        let endpoints = PortalEndpoints {
            devices: "https://example.invalid/devices".to_owned(),
            ..PortalEndpoints::default()
        };
        let client = YotaClient::builder(
            Credentials::new("user", "pass").unwrap(),
            Protocol::Form,
        )
        .endpoints(endpoints)
        .user_id(UserId::new("12345").unwrap())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();

        assert_eq!(client.protocol(), Protocol::Form);
        assert_eq!(client.endpoints.devices, "https://example.invalid/devices");
        assert_eq!(client.session().user_id().map(UserId::as_str), Some("12345"));
        assert!(!client.session().is_authenticated());
    }
}
