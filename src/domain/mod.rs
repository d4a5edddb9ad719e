//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod tariff;
mod validation;
mod value;

pub use request::ChangeOffer;
pub use response::{
    Balance, CurrentProduct, Device, Money, OfferingSpeed, Operation, Payment, Remains,
    SliderOffer, TariffStep, UserInfo,
};
pub use tariff::{MAX_SPEED, MAX_SPEED_MARKER, normalize_speed, normalize_tariffs};
pub use validation::ValidationError;
pub use value::{OfferCode, Password, ResourceId, SessionTokens, UserId, Username};
