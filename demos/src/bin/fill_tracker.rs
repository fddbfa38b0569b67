//! Demo 3: Fill Tracker
//!
//! Showcases: orders channel, fill detection, graceful Ctrl+C shutdown
//!
//! Run: cargo run --bin fill_tracker -- <account_id>

use bitgo_sdk::prelude::*;
use colored::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let account_id = std::env::args()
        .nth(1)
        .ok_or("usage: fill_tracker <account_id>")?;

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  FILL TRACKER".cyan().bold());
    println!("{}", "═".repeat(60).cyan());

    let client = BitgoClient::from_env()?;
    let mut session = client.session();
    session.subscribe_orders(&account_id)?;

    // product -> (bought, sold)
    let positions: Arc<Mutex<HashMap<String, (Decimal, Decimal)>>> = Arc::default();
    let tracked = positions.clone();

    session.on_order(move |update| {
        let (Some(qty), Some(price)) = (update.fill_quantity, update.fill_price) else {
            println!("  {} {} {}", update.order_id.dimmed(), update.product, update.status);
            return;
        };

        let side = match update.side {
            Side::Buy => "BUY ".green(),
            Side::Sell => "SELL".red(),
        };
        println!("  {} {} {} @ {}", side, update.product, qty, price);

        if let Ok(mut positions) = tracked.lock() {
            let entry = positions.entry(update.product.clone()).or_default();
            match update.side {
                Side::Buy => entry.0 += qty,
                Side::Sell => entry.1 += qty,
            }
        }
    });

    let handle = session.close_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.close();
        }
    });

    session.run().await?;

    println!("\n{}", "Net positions".bold());
    if let Ok(positions) = positions.lock() {
        for (product, (bought, sold)) in positions.iter() {
            println!("  {:<10} {}", product, bought - sold);
        }
    }
    Ok(())
}
