use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "failover-cli")]
#[command(about = "Management CLI for the domain failover daemon", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    #[arg(short, long, default_value = "admin-secret-key")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check daemon status
    Status,
    /// List every primary domain with its aliases
    Domains,
    /// Show one primary domain
    Show { primary: String },
    /// Print the name to use right now for a primary domain
    Resolve { primary: String },
    /// Report a failed request against a domain
    Offline { primary: String, name: String },
    /// Replace the alias list of a primary domain
    Aliases {
        primary: String,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Run a health sweep now
    Sweep,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let base = cli.url.trim_end_matches('/');
    let request = match cli.command {
        Commands::Status => client.get(format!("{}/admin/status", base)),
        Commands::Domains => client.get(format!("{}/admin/domains", base)),
        Commands::Show { primary } => client.get(format!("{}/admin/domains/{}", base, primary)),
        Commands::Resolve { primary } => {
            client.get(format!("{}/admin/domains/{}/resolve", base, primary))
        }
        Commands::Offline { primary, name } => client
            .post(format!("{}/admin/domains/{}/offline", base, primary))
            .json(&json!({ "name": name })),
        Commands::Aliases { primary, names } => client
            .put(format!("{}/admin/domains/{}/aliases", base, primary))
            .json(&json!({ "aliases": names })),
        Commands::Sweep => client.post(format!("{}/admin/sweep", base)),
    };

    let res = request.headers(headers).send().await?;
    print_response(res).await?;

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            if !text.is_empty() {
                eprintln!("Response: {}", text);
            }
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
