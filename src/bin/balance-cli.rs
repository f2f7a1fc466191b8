use clap::Parser;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "balance-cli")]
#[command(about = "Query a running quick-balance service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    /// Print only the human-readable amount
    #[arg(short, long)]
    short: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/balance", cli.url.trim_end_matches('/')))
        .send()
        .await?;

    let status = res.status();
    let json: Value = res.json().await?;

    if !status.is_success() {
        let kind = json.get("error").and_then(Value::as_str).unwrap_or("unknown");
        eprintln!("Error: balance service returned {} ({})", status, kind);
        std::process::exit(1);
    }

    if cli.short {
        match json.get("display").and_then(Value::as_str) {
            Some(display) => println!("{}", display),
            None => println!("{}", json),
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&json)?);
    }
    Ok(())
}
