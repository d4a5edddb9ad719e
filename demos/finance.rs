mod common;

use yota::{Protocol, YotaClient};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Finance endpoints exist only on the current portal.
    let mut client = YotaClient::new(common::credentials_from_env()?, Protocol::Token)?;
    client.login()?;

    let info = client.user_info()?;
    println!("account: {} ({}, {})", info.user_id, info.account_type, info.status);

    let product = client.current_product()?;
    println!(
        "product {}: {} {} until {}",
        product.product_id, product.price.amount, product.price.currency_code, product.end_date
    );

    for payment in client.payments()? {
        println!(
            "due {}: {} for {} on {}",
            payment.date, payment.amount, payment.offer_name, payment.device_name
        );
    }

    for operation in client.operation_history()? {
        println!(
            "{} {:<12} {} {}",
            operation.actual_date,
            operation.operation_type,
            operation.amount.amount,
            operation.amount.currency_code
        );
    }

    Ok(())
}
