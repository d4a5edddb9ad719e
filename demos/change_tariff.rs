mod common;

use yota::{OfferCode, YotaClient};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let offer_code = OfferCode::new(common::env_var("YOTA_OFFER_CODE")?)?;
    let mut client = YotaClient::new(common::credentials_from_env()?, common::protocol_from_env()?)?;
    client.login()?;

    let current = client.tariffs()?.into_iter().find(|step| step.active);
    if let Some(current) = &current {
        if current.code == offer_code.as_str() {
            println!("already on {}", current.code);
            return Ok(());
        }
        println!("switching from {} ({})", current.code, current.name);
    }

    client.change_tariff(&offer_code)?;
    println!("switched to {}", offer_code.as_str());

    Ok(())
}
