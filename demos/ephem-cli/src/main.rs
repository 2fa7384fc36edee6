use std::path::PathBuf;

use bytes::Bytes;
use clap::{Parser, Subcommand};
use ephem_config::EphemConfig;
use ephem_core::{AccessOutcome, UploadInput};

#[derive(Parser)]
#[command(name = "ephem-cli", about = "Upload and fetch blobs through the ephemeral image hosting core")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a file and print its token and `/image/{token}` path.
    Upload {
        path: PathBuf,
        #[arg(long)]
        content_type: String,
    },
    /// Resolve a token, writing the bytes to stdout on success.
    Fetch { token: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    ephem_config::init_tracing();

    let cli = Cli::parse();
    let config = EphemConfig::from_env()?;
    let (coordinator, arbiter) = config.build_core().await?;

    match cli.command {
        Command::Upload { path, content_type } => {
            let bytes = Bytes::from(tokio::fs::read(&path).await?);
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string);

            let mut input = UploadInput::new(bytes, content_type);
            if let Some(filename) = filename {
                input = input.with_filename(filename);
            }

            let receipt = coordinator.upload(input).await?;
            println!("token: {}", receipt.token);
            println!("expires_at_epoch_ms: {}", receipt.expires_at_epoch_ms);
            println!("path: /image/{}", receipt.token);
        }
        Command::Fetch { token } => {
            let token = ephem_types::Token::from_string(token);
            match arbiter.access(&token).await? {
                AccessOutcome::Allowed(bytes, record) => {
                    use std::io::Write;
                    std::io::stdout().write_all(&bytes)?;
                    eprintln!(
                        "content_type: {}",
                        record.content_type.as_deref().unwrap_or("application/octet-stream")
                    );
                }
                AccessOutcome::Denied(_) => {
                    eprintln!("denied: the URL may be invalid or expired");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
