use std::time::Duration;

use clap::Parser;
use reqwest::header::HeaderMap;
use serde_json::Value;

use meta_relay::config::MetadataConfig;
use meta_relay::{MetadataCodec, OutgoingMetadata};

#[derive(Parser)]
#[command(name = "meta-cli")]
#[command(about = "Send a request carrying propagation metadata", long_about = None)]
struct Cli {
    /// Target URL.
    #[arg(short, long, default_value = "http://localhost:8080/inspect")]
    url: String,

    /// Identity to send as the caller.
    #[arg(long, default_value = "meta-cli")]
    caller: String,

    /// Color to send.
    #[arg(long)]
    color: Option<String>,

    /// Timeout budget in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Generic metadata as key=value, repeatable.
    #[arg(short, long = "meta", value_parser = parse_key_value)]
    metadata: Vec<(String, String)>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let codec = MetadataCodec::new(MetadataConfig {
        app_id: cli.caller,
        default_color: String::new(),
    });

    let mut outgoing = OutgoingMetadata::new();
    if let Some(color) = cli.color {
        outgoing = outgoing.with_color(color);
    }
    if let Some(ms) = cli.timeout_ms {
        outgoing = outgoing.with_timeout(Duration::from_millis(ms));
    }
    for (key, value) in cli.metadata {
        outgoing = outgoing.with_extension(key, value);
    }

    let mut headers = HeaderMap::new();
    let written = codec.encode(&mut headers, &outgoing);
    if written < outgoing.extensions.len() {
        eprintln!(
            "Warning: {} metadata entries could not be encoded",
            outgoing.extensions.len() - written
        );
    }

    let client = reqwest::Client::new();
    let res = client.get(&cli.url).headers(headers).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
