use binance_guard::core::config::ExchangeConfig;
use binance_guard::exchanges::binance::MarketType;
use binance_guard::{build_client, ExchangeError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    // Credentials come from BINANCE_* variables; fall back to public access on testnet
    let config = ExchangeConfig::from_env("BINANCE")
        .unwrap_or_else(|_| ExchangeConfig::read_only().testnet(true));

    // Signed calls need a Signer; this demo only exercises the degrading paths
    let client = build_client(&config, None)?;

    println!("Endpoints: api={} sapi={}", client.base(), client.sapi());

    let time = client.time(&[]).await;
    println!("Server time: {}", time.server_time);

    let orders = client.open_orders(Some("BTCUSDT"), &[]).await;
    println!("Open orders: {}", orders.len());

    match client.balances(MarketType::Spot, &[], None).await {
        Ok(balances) => println!("Balances: {} assets", balances.len()),
        Err(ExchangeError::AuthError(e)) => println!("Balances need a signer: {}", e),
        Err(e) => println!("Error fetching balances: {}", e),
    }

    Ok(())
}
