use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use iris_client::config::{DEFAULT_SERVER, DEFAULT_TIMEOUT_SECS};
use iris_client::{BackendClient, Config, FileBoundary, Session};

/// Iris - voice-driven visual Q&A client
#[derive(Parser)]
#[command(name = "iris", version, about)]
struct Cli {
    /// Base URL of the inference backend
    #[arg(long, env = "IRIS_SERVER", default_value = DEFAULT_SERVER)]
    server: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "IRIS_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Directory for synthesized replies
    #[arg(long, default_value = "replies")]
    out_dir: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check backend connectivity
    Ping,
    /// Describe a photo and speak the description
    Describe {
        /// JPEG photo to describe
        image: PathBuf,
    },
    /// Describe a photo, then answer recorded questions about it
    Ask {
        /// JPEG photo to hold for the conversation
        image: PathBuf,
        /// Recorded questions (WAV, mono, 16 kHz, 16-bit PCM)
        #[arg(required = true)]
        questions: Vec<PathBuf>,
    },
    /// Synthesize speech for a line of text
    Tts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the speech synthesis backend.")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,iris_client=info",
        1 => "info,iris_client=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::new(&cli.server, Duration::from_secs(cli.timeout_secs))?;
    let client = BackendClient::new(&config)?;

    match cli.command {
        Command::Ping => {
            let reply = client.health().await?;
            println!("{} -> {reply}", config.server);
        }
        Command::Describe { image } => {
            std::fs::create_dir_all(&cli.out_dir)?;
            let mut boundary = FileBoundary::new(image, Vec::new(), cli.out_dir);
            let mut session = Session::new(client);
            session.run_describe(&mut boundary).await?;
        }
        Command::Ask { image, questions } => {
            std::fs::create_dir_all(&cli.out_dir)?;
            let mut boundary = FileBoundary::new(image, questions.clone(), cli.out_dir);
            let mut session = Session::new(client);

            session.run_describe(&mut boundary).await?;
            for _ in &questions {
                session.run_ask(&mut boundary).await?;
            }
        }
        Command::Tts { text } => {
            std::fs::create_dir_all(&cli.out_dir)?;
            let audio = client.synthesize(&text).await?;
            let path = cli.out_dir.join("speech.wav");
            std::fs::write(&path, &audio)?;
            println!("wrote {} bytes to {}", audio.len(), path.display());
        }
    }

    Ok(())
}
