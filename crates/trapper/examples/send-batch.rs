//! Send a small batch to a collector.
//!
//! Usage: cargo run -p trapper --example send-batch -- <collector-host> [port]

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use trapper::transport::ConnectOptions;
use trapper::{BatchClock, Sample, SenderClient, SenderConfig, Target};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let port = match args.next() {
        Some(port) => port.parse()?,
        None => trapper::transport::DEFAULT_PORT,
    };

    let config = SenderConfig {
        connect: ConnectOptions::with_timeout(Duration::from_secs(5)),
        ..SenderConfig::default()
    };
    let client = SenderClient::with_config(Target::new(host, port)?, config);

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?;
    let batch = [
        Sample::new("web01", "app.requests", "42")?,
        Sample::builder("web01", "app.latency", "0.031")
            .clock(now.as_secs() as i64)
            .ns(i64::from(now.subsec_nanos()))
            .build()?,
    ];

    let clock = BatchClock::with_ns(now.as_secs() as i64, i64::from(now.subsec_nanos()));
    let ack = client.send_with_clock(&batch, clock)?;
    println!("{}", ack.info.as_deref().unwrap_or("accepted"));

    if let Some(summary) = ack.summary() {
        println!(
            "processed={:?} failed={:?} total={:?}",
            summary.processed, summary.failed, summary.total
        );
    }
    Ok(())
}
