//! Typed Rust client for the Yota self-service portal.
//!
//! The crate is split into a domain layer of strong types, a transport layer
//! for wire-format quirks (JSON schemas, scraped HTML) and a small blocking
//! client layer that drives the login handshake and fetches resources.
//!
//! ```rust,no_run
//! use yota::{Credentials, OfferCode, Protocol, YotaClient};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Credentials::new("user@example.com", "...")?;
//!     let mut client = YotaClient::new(credentials, Protocol::Token)?;
//!     client.login()?;
//!
//!     for step in client.tariffs()? {
//!         println!("{} {} {}", step.code, step.speed, step.active);
//!     }
//!     client.change_tariff(&OfferCode::new("POS-MA14-0018")?)?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    AuthError, Credentials, DEFAULT_USER_AGENT, PortalEndpoints, Protocol, Session, YotaClient,
    YotaClientBuilder, YotaError,
};
pub use domain::{
    Balance, ChangeOffer, CurrentProduct, Device, MAX_SPEED, Money, OfferCode, OfferingSpeed,
    Operation, Password, Payment, Remains, ResourceId, SessionTokens, SliderOffer, TariffStep,
    UserId, UserInfo, Username, ValidationError, normalize_speed, normalize_tariffs,
};
pub use transport::{DecodeError, LegacySlider};
