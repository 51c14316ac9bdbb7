use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "resilience-cli")]
#[command(about = "Management CLI for the clinic resilience gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080", env = "CLINIC_ADMIN_URL")]
    url: String,

    #[arg(short, long, default_value = "change-me", env = "CLINIC_ADMIN_KEY")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show gateway status and retry policy
    Status,
    /// List per-service health records
    Services,
    /// Clear a service's failure count (e.g. EMAIL_SERVICE)
    Reset { strategy: String },
    /// Record one failure against a service
    MarkUnhealthy { strategy: String },
    /// Drop every cached CMS entry
    ClearCache,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let request = match &cli.command {
        Commands::Status => client.get(format!("{base}/admin/status")),
        Commands::Services => client.get(format!("{base}/admin/services")),
        Commands::Reset { strategy } => {
            client.post(format!("{base}/admin/services/{strategy}/reset"))
        }
        Commands::MarkUnhealthy { strategy } => {
            client.post(format!("{base}/admin/services/{strategy}/unhealthy"))
        }
        Commands::ClearCache => client.delete(format!("{base}/admin/cache")),
    };

    let res = request.headers(headers).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let body: Value = res.json().await.unwrap_or(Value::Null);

    if !status.is_success() {
        eprintln!("Error: admin API returned status {status}");
        if let Some(message) = body.pointer("/error/message").and_then(Value::as_str) {
            eprintln!("{message}");
        }
        std::process::exit(1);
    }

    println!("{}", serde_json::to_string_pretty(body.get("data").unwrap_or(&body))?);
    Ok(())
}
