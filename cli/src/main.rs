mod error;
mod server;
mod settings;
mod wav;

use aelwave_core::{AelConfig, Decoder, Encoder, Vocabulary};
use clap::{Parser, Subcommand};
use error::{CliError, Result};
use settings::{ConfigFile, Overrides};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "aelwave")]
#[command(about = "Acoustic symbol protocol: text commands and free text as audio tones")]
struct Cli {
    /// JSON file overriding protocol defaults
    #[arg(long, global = true, value_name = "FILE.json")]
    config: Option<PathBuf>,

    /// Seconds per tone (silence after each tone is 1/100 of this)
    #[arg(long, global = true)]
    tone_duration: Option<f32>,

    /// Samples per analysis window (default: half the token period)
    #[arg(long, global = true)]
    window_size: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a message such as 'REQ|CONTENT"hi"' to a WAV file
    Encode {
        /// Message text, tokens separated by '|'
        #[arg(value_name = "MESSAGE")]
        message: String,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,
    },

    /// Decode a WAV file and print the message
    Decode {
        /// Input WAV file
        #[arg(value_name = "INPUT.WAV")]
        input: PathBuf,

        /// Omit tokens whose frequency matched nothing
        #[arg(long)]
        drop_unknown: bool,
    },

    /// Print the symbol table
    Vocab,

    /// Run the HTTP service
    Serve {
        /// Listen address
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aelwave=info,aelwave_core=warn,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Encode { message, output } => encode_command(config, &message, &output),
        Commands::Decode {
            input,
            drop_unknown,
        } => decode_command(config, &input, drop_unknown),
        Commands::Vocab => {
            vocab_command();
            Ok(())
        }
        Commands::Serve { addr } => serve_command(config, addr),
    }
}

fn load_config(cli: &Cli) -> Result<AelConfig> {
    let file = match &cli.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let config = file.resolve(Overrides {
        tone_duration: cli.tone_duration,
        window_size: cli.window_size,
    });
    tracing::debug!("Effective config: {:?}", config);
    Ok(config)
}

fn encode_command(config: AelConfig, message: &str, output_path: &Path) -> Result<()> {
    let encoder = Encoder::with_config(config)?;
    let waveform = encoder.encode_str(message)?;
    tracing::info!(
        "Encoded to {} samples ({:.3} s)",
        waveform.len(),
        waveform.duration_secs()
    );

    wav::write_wav_file(&waveform, output_path)?;
    println!(
        "Wrote {} samples at {} Hz to {}",
        waveform.len(),
        waveform.sample_rate,
        output_path.display()
    );
    Ok(())
}

fn decode_command(config: AelConfig, input_path: &Path, drop_unknown: bool) -> Result<()> {
    let decoder = Decoder::with_config(config)?;
    let waveform = wav::read_wav_file(input_path, decoder.config().sample_rate)?;
    tracing::info!(
        "Read {} samples from {}",
        waveform.len(),
        input_path.display()
    );

    let mut message = decoder.decode(&waveform)?;
    if drop_unknown {
        message = message.without_unknown();
    } else if message.has_unknown() {
        tracing::warn!("Message contains unmatched frequencies; use --drop-unknown to omit them");
    }

    println!("{}", message);
    Ok(())
}

fn vocab_command() {
    for (symbol, frequency) in Vocabulary::canonical().entries() {
        println!("{:<8} {} Hz", symbol, frequency);
    }
}

fn serve_command(config: AelConfig, addr: SocketAddr) -> Result<()> {
    let state = Arc::new(server::AppState {
        encoder: Encoder::with_config(config.clone())?,
        decoder: Decoder::with_config(config)?,
    });

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Io)?;
    runtime.block_on(server::serve(addr, state))
}
