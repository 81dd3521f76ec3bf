use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use voxfolio::api::ApiServer;
use voxfolio::audio::{self, AudioCapture};
use voxfolio::present::speech_script;
use voxfolio::stt::TranscriptionChain;
use voxfolio::{ChatClient, Config, Persona};

/// Voxfolio - Voice-driven portfolio chatbot gateway
#[derive(Parser)]
#[command(name = "voxfolio", version, about)]
struct Cli {
    /// Persona to use (e.g. "personality" or "resume")
    #[arg(short, long, env = "VOXFOLIO_PERSONA")]
    persona: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the gateway server (also the default when no subcommand is given)
    Serve,
    /// Ask a one-shot question from the terminal
    Ask {
        /// Question text; omit when using --audio or --record
        question: Option<String>,

        /// Transcribe a recorded audio file (WAV or MP3) instead
        #[arg(long, conflicts_with = "question")]
        audio: Option<PathBuf>,

        /// Record from the microphone for this many seconds instead
        #[arg(long, conflicts_with_all = ["question", "audio"])]
        record: Option<u64>,

        /// Print the client-side speech snippet alongside the answer
        #[arg(long)]
        speech: bool,
    },
    /// List embedded personas
    Personas,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,voxfolio=info",
        1 => "info,voxfolio=debug",
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
    let persona_ref = cli.persona.as_deref();

    match cli.command {
        Some(Command::Ask {
            question,
            audio,
            record,
            speech,
        }) => return cmd_ask(persona_ref, question, audio, record, speech).await,
        Some(Command::Personas) => return cmd_personas(),
        Some(Command::Serve) | None => {}
    }

    let config = Config::load(persona_ref)?;
    tracing::info!(
        persona = %config.persona.id,
        model = %config.chat.model,
        port = config.server.port,
        local_stt = config.stt.local_available,
        "starting voxfolio gateway"
    );

    ApiServer::new(&config).run().await?;
    Ok(())
}

/// One-shot question from the terminal
async fn cmd_ask(
    persona: Option<&str>,
    question: Option<String>,
    audio_path: Option<PathBuf>,
    record_secs: Option<u64>,
    speech: bool,
) -> anyhow::Result<()> {
    let config = Config::load(persona)?;

    let question = match (question, audio_path, record_secs) {
        (Some(q), None, None) => q,
        (None, Some(path), None) => {
            let bytes = std::fs::read(&path)?;
            let clip = audio::normalize(&bytes)?;
            let chain = TranscriptionChain::from_config(&config);
            let text = chain.transcribe(&clip).await?;
            println!("Transcribed: {text}");
            text
        }
        (None, None, Some(secs)) => {
            println!("Recording for {secs} seconds... speak now!");
            let mut capture = AudioCapture::new()?;
            let samples = capture.record_for(secs).await?;
            let clip = audio::from_samples(samples);
            let chain = TranscriptionChain::from_config(&config);
            let text = chain.transcribe(&clip).await?;
            println!("Transcribed: {text}");
            text
        }
        _ => anyhow::bail!("please type or speak your question"),
    };

    let question = question.trim().to_string();
    if question.is_empty() {
        anyhow::bail!("please type or speak your question");
    }

    let client = ChatClient::from_config(&config);
    let answer = client.ask(&question).await?;

    println!("\nI say:\n{}", answer.text);
    println!(
        "\nToken usage - Prompt: {}, Completion: {}",
        answer.usage.prompt_tokens, answer.usage.completion_tokens
    );

    if speech {
        println!("\n{}", speech_script(&answer.text));
    }

    Ok(())
}

/// List embedded personas
fn cmd_personas() -> anyhow::Result<()> {
    for (id, _) in Persona::embedded() {
        let persona = Persona::load_embedded(id)?;
        match &persona.tagline {
            Some(tagline) => println!("{id:<12} {} - {tagline}", persona.name),
            None => println!("{id:<12} {}", persona.name),
        }
    }
    Ok(())
}
