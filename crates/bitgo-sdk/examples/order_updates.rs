//! Example: Watching order updates with observability hooks
//!
//! This example demonstrates:
//! - Subscribing to the orders channel
//! - Separating fills from other lifecycle updates
//! - Hooks for connection, disconnection and errors
//! - Raw handlers for frames without a typed handler
//!
//! Run with: cargo run --example order_updates -- <account_id>

use bitgo_sdk::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let account_id = std::env::args()
        .nth(1)
        .ok_or("usage: order_updates <account_id>")?;

    let client = BitgoClient::from_env()?;

    let hooks = Hooks::new()
        .on_connect(|info| {
            println!("[HOOK] Connected to {} ({} subscriptions)", info.endpoint, info.subscriptions);
        })
        .on_disconnect(|reason| {
            println!("[HOOK] Disconnected: {:?}", reason);
        })
        .on_error(|msg| {
            eprintln!("[HOOK] Error: {}", msg);
        });

    let mut session = client.session().with_hooks(hooks);
    session.subscribe_orders(&account_id)?;

    session
        .on_order(|update| {
            if update.is_fill() {
                println!(
                    "FILL  {} {} {} {:?} @ {:?} (cumulative {:?})",
                    update.order_id,
                    update.side,
                    update.product,
                    update.fill_quantity,
                    update.fill_price,
                    update.cumulative_quantity
                );
            } else {
                println!(
                    "ORDER {} {:?} {} {} {}",
                    update.order_id, update.order_type, update.side, update.quantity, update.status
                );
            }
        })
        .on("level2", "update", |frame| {
            println!("unexpected level2 update: {}", frame);
        });

    session.run().await?;
    Ok(())
}
