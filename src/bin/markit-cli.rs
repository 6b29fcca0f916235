use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "markit-cli")]
#[command(about = "Client for a running MarkIt service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Health,
    /// Convert a web page or remote document
    Url {
        /// Address to convert; `https://` is assumed when no scheme is given
        target: String,
    },
    /// Upload and convert a local file
    File {
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{base}/health")).send().await?;
            let status = res.status();
            let json: Value = res.json().await?;
            println!("{}", serde_json::to_string_pretty(&json)?);
            if !status.is_success() {
                return Err(format!("service returned status {status}").into());
            }
        }
        Commands::Url { target } => {
            let res = client
                .get(format!("{base}/convert"))
                .query(&[("url", target.as_str())])
                .send()
                .await?;
            print_markdown(res).await?;
        }
        Commands::File { path } => {
            let bytes = tokio::fs::read(&path).await?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or("path has no file name")?;

            let form = Form::new().part("file", Part::bytes(bytes).file_name(filename));
            let res = client
                .post(format!("{base}/convert"))
                .multipart(form)
                .send()
                .await?;
            print_markdown(res).await?;
        }
    }

    Ok(())
}

async fn print_markdown(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if status.is_success() {
        println!("{text}");
        return Ok(());
    }

    let detail = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(text);
    Err(format!("conversion failed ({status}): {detail}").into())
}
