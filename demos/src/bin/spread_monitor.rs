//! Demo 1: Real-time Spread Monitor
//!
//! Showcases: level2 snapshots over the subscription session
//!
//! Run: cargo run --bin spread_monitor -- <account_id> [product]

use colored::*;
use bitgo_sdk::prelude::*;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let account_id = args.next().ok_or("usage: spread_monitor <account_id> [product]")?;
    let product = args.next().unwrap_or_else(|| "BTC-USD".to_string());

    println!("{}", "═".repeat(60).cyan());
    println!("{}", "  REAL-TIME SPREAD MONITOR".cyan().bold());
    println!("{}", "  BitGo Prime level2 stream".cyan());
    println!("{}", "═".repeat(60).cyan());
    println!();

    let client = BitgoClient::from_env()?;
    let mut session = client.session().with_hooks(Hooks::new().on_connect(|info| {
        println!("{} Connected to {}", "✓".green(), info.endpoint);
    }));
    session.subscribe_order_book(&account_id, &product)?;

    let updates = Arc::new(AtomicU64::new(0));
    let counter = updates.clone();
    let start = Instant::now();

    session
        .on_level2_snapshot(move |book| {
            let count = counter.fetch_add(1, Ordering::Relaxed) + 1;
            let (Some(bid), Some(ask), Some(spread)) =
                (book.best_bid(), book.best_ask(), book.spread())
            else {
                return;
            };
            let elapsed = start.elapsed().as_secs();

            print!("\r\x1B[K");
            print!(
                "  {} {}  {} {}  {} {}  ",
                "BID:".yellow(),
                bid.price(),
                "ASK:".yellow(),
                ask.price(),
                "SPREAD:".green(),
                spread
            );
            print!(
                "│ {} {}/s",
                "Rate:".dimmed(),
                if elapsed > 0 { count / elapsed } else { 0 }
            );
            let _ = std::io::stdout().flush();
        })
        .on_level2_error(|err| {
            println!("\n{} {}", "✗".red(), err.message);
        });

    let handle = session.close_handle();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(30)).await;
        handle.close();
    });

    session.run().await?;

    println!(
        "\n\n{} Demo complete. {} snapshots processed.",
        "✓".green(),
        updates.load(Ordering::Relaxed)
    );
    Ok(())
}
