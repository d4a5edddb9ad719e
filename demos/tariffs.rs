mod common;

use yota::{Protocol, YotaClient};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = YotaClient::new(common::credentials_from_env()?, common::protocol_from_env()?)?;
    client.login()?;

    let balance = client.balance()?;
    println!("balance: {} {}", balance.amount, balance.currency);

    for step in client.tariffs()? {
        println!(
            "{} {:<14} {:>8.2} {} {}",
            if step.active { "*" } else { " " },
            step.code,
            step.amount,
            step.speed,
            step.speed_type
        );
    }

    if client.protocol() == Protocol::Form {
        let remains = client.remains()?;
        println!("remains: {} {}", remains.amount, remains.unit);
    }

    Ok(())
}
