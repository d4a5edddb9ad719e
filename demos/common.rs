use std::io;

use yota::{Credentials, Protocol};

pub fn env_var(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

pub fn credentials_from_env() -> Result<Credentials, Box<dyn std::error::Error>> {
    Ok(Credentials::new(
        env_var("YOTA_USERNAME")?,
        env_var("YOTA_PASSWORD")?,
    )?)
}

/// `YOTA_PROTOCOL` is `token` (the default) or `form`.
#[allow(dead_code)]
pub fn protocol_from_env() -> Result<Protocol, io::Error> {
    match std::env::var("YOTA_PROTOCOL").as_deref() {
        Ok("token") | Err(_) => Ok(Protocol::Token),
        Ok("form") => Ok(Protocol::Form),
        Ok(other) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("YOTA_PROTOCOL must be `token` or `form`, got {other:?}"),
        )),
    }
}
