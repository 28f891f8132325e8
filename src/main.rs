use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use jarvis_assistant::services::{ConsolePlayer, ConsoleSink, SpeechSource, StdinSource};
use jarvis_assistant::voice::{
    AudioCapture, CpalPlayer, MicrophoneSource, SpeechToText, TextToSpeech,
};
use jarvis_assistant::{Assistant, Config, Router, Services, SpeechSequencer};

/// Jarvis - voice command assistant
#[derive(Parser)]
#[command(name = "jarvis", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Type commands on stdin and print replies instead of using audio
    #[arg(long, env = "JARVIS_TEXT_MODE")]
    text: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Speak one sentence and exit
    Say {
        /// Text to speak
        #[arg(default_value = "This is a voice test. Can you hear me, sir?")]
        text: String,
    },
    /// Route one command as if the conversation were active and print the reply
    Route {
        /// Command text
        text: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,jarvis_assistant=info",
        1 => "info,jarvis_assistant=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("fatal: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(run(cli));
    // A pending stdin read cannot be cancelled, don't wait for it
    runtime.shutdown_background();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load()?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Say { text } => say(&config, cli.text, &text).await,
            Command::Route { text } => route(&config, &text).await,
        };
    }

    let router = Router::new(config.apps.clone(), Services::from_config(&config)?);
    let sequencer = build_sequencer(&config, cli.text)?;
    let mut assistant = Assistant::new(&config, router, sequencer)?;

    // Set up shutdown signal
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(()).await;
        }
    });

    let mut source: Box<dyn SpeechSource> = if cli.text {
        tracing::info!("text mode: type commands, Ctrl-D to quit");
        Box::new(StdinSource::new())
    } else {
        let capture = AudioCapture::open(config.voice.input_device.as_deref())?;
        Box::new(MicrophoneSource::new(capture, SpeechToText::from_config(&config)?))
    };

    assistant.run(source.as_mut(), &mut shutdown_rx).await?;
    Ok(())
}

/// Speech output for the selected mode
fn build_sequencer(config: &Config, text_mode: bool) -> anyhow::Result<SpeechSequencer> {
    let voice = config.assistant.voice.clone();

    if text_mode {
        return Ok(SpeechSequencer::new(
            Box::new(ConsoleSink),
            Box::new(ConsolePlayer),
            voice,
        ));
    }

    Ok(SpeechSequencer::new(
        Box::new(TextToSpeech::from_config(config)?),
        Box::new(CpalPlayer::new()?),
        voice,
    ))
}

/// Speak a single sentence
#[allow(clippy::future_not_send)]
async fn say(config: &Config, text_mode: bool, text: &str) -> anyhow::Result<()> {
    let mut sequencer = build_sequencer(config, text_mode)?;
    let outcome = sequencer.say(text).await;
    tracing::info!(?outcome, "done");
    Ok(())
}

/// Normalize and route one command without speaking it
async fn route(config: &Config, text: &str) -> anyhow::Result<()> {
    let normalized = config.replacements.normalize(text);
    let router = Router::new(config.apps.clone(), Services::from_config(config)?);

    let routed = router.route(&normalized).await;
    println!("{:?}: {}", routed.route, routed.reply);
    Ok(())
}
