//! Example: Streaming level2 order book snapshots
//!
//! This example demonstrates:
//! - Declaring subscriptions before connecting
//! - Typed level2 snapshot and error handlers
//! - Closing the session on Ctrl+C
//!
//! Run with: cargo run --example level2_stream -- <account_id> [product...]

use bitgo_sdk::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let account_id = args.next().ok_or("usage: level2_stream <account_id> [product...]")?;
    let mut products: Vec<String> = args.collect();
    if products.is_empty() {
        products.push("BTC-USD".to_string());
    }

    println!("=== Level2 Stream Example ===\n");

    let client = BitgoClient::from_env()?;
    let mut session = client.session();

    for product in &products {
        session.subscribe_order_book(&account_id, product)?;
    }

    let snapshots = Arc::new(AtomicU64::new(0));
    let counter = snapshots.clone();

    session
        .on_level2_snapshot(move |book| {
            let count = counter.fetch_add(1, Ordering::Relaxed) + 1;
            match (book.best_bid(), book.best_ask()) {
                (Some(bid), Some(ask)) => println!(
                    "[{}] {} bid {} x {} | ask {} x {} | spread {}",
                    count,
                    book.product,
                    bid.price(),
                    bid.size(),
                    ask.price(),
                    ask.size(),
                    ask.price() - bid.price()
                ),
                _ => println!("[{}] {} one-sided book", count, book.product),
            }
        })
        .on_level2_error(|err| {
            eprintln!("level2 error: {}", err.message);
        });

    let handle = session.close_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nReceived Ctrl+C, closing session...");
            handle.close();
        }
    });

    session.run().await?;

    println!("Received {} snapshots", snapshots.load(Ordering::Relaxed));
    Ok(())
}
