//! Demo 2: Order History Export
//!
//! Showcases: lazy cursor pagination, streaming items page by page
//!
//! Run: cargo run --bin order_export -- <account_id> [days] > orders.csv

use bitgo_sdk::prelude::*;
use chrono::{Duration, Utc};
use colored::*;
use futures::StreamExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let account_id = args.next().ok_or("usage: order_export <account_id> [days]")?;
    let days: i64 = args.next().map(|d| d.parse()).transpose()?.unwrap_or(7);

    let client = BitgoClient::from_env()?;
    let now = Utc::now();
    let query = OrderQuery::new()
        .with_limit(100)
        .between(now - Duration::days(days), now);

    eprintln!("{} Exporting {} days of orders for {}", "→".cyan(), days, account_id);

    println!("id,time,product,side,type,status,quantity,filled,average_price");

    let mut orders = Box::pin(client.rest().list_orders(&account_id, &query)?.into_items());
    let mut exported = 0usize;
    let mut notional = Decimal::ZERO;

    while let Some(order) = orders.next().await {
        let order = match order {
            Ok(order) => order,
            Err(e) => {
                eprintln!("{} {}", "✗".red(), e);
                break;
            }
        };
        println!(
            "{},{},{},{},{:?},{},{},{},{}",
            order.id,
            order.time.to_rfc3339(),
            order.product,
            order.side,
            order.order_type,
            order.status,
            order.quantity,
            order.filled_quantity,
            order.average_price
        );
        exported += 1;
        notional += order.filled_quantity * order.average_price;
    }

    eprintln!(
        "{} {} orders exported, filled notional {}",
        "✓".green(),
        exported,
        notional.round_dp(2)
    );
    Ok(())
}
