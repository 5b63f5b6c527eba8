//! AroVeda terminal client - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Install tracing (stderr, so logs stay out of the transcript)
//! 3. Build the service clients and check that the service is reachable
//! 4. Build the speech bridge from the configured commands
//! 5. Run the input loop over stdin

mod cli;
mod input;

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use aroveda_chat::{ChatError, Outcome, SessionController};
use aroveda_client::ServiceClient;
use aroveda_core::config::{AroConfig, SpeechConfig};
use aroveda_core::FileBlob;
use aroveda_speech::{CommandRecognizer, CommandSynthesizer, SpeechBridge};

use cli::CliArgs;
use input::{Command, HELP};

/// Build the speech bridge. An empty command leaves that capability unsupported.
fn speech_bridge(config: &SpeechConfig) -> SpeechBridge {
    let synthesizer = CommandSynthesizer::from_command(&config.synthesis_command);
    let recognizer = CommandRecognizer::from_command(
        &config.recognition_command,
        Duration::from_secs(config.max_capture_secs),
    );
    tracing::info!(
        synthesis = synthesizer.as_ref().map(|s| s.program()).unwrap_or("unsupported"),
        recognition = recognizer.as_ref().map(|r| r.program()).unwrap_or("unsupported"),
        "Speech backends"
    );
    SpeechBridge::with_backends(synthesizer, recognizer)
}

/// Print log entries appended since `*shown`.
fn render_new(controller: &SessionController, shown: &mut usize) {
    for message in controller.messages().since(*shown) {
        println!("{}", message);
    }
    *shown = controller.messages().len();
}

fn prompt(controller: &SessionController) {
    print!("{} > ", controller.input_hint());
    let _ = std::io::stdout().flush();
}

fn notice(text: impl std::fmt::Display) {
    println!("! {}", text);
}

/// Show a session error. Input mistakes are only shown; anything else is
/// also logged.
fn chat_notice(e: ChatError) {
    if !e.is_validation() {
        tracing::warn!(error = %e, "Session action failed");
    }
    notice(e);
}

fn report(result: Result<Outcome, ChatError>) {
    match result {
        Ok(Outcome::Skipped) => tracing::debug!("Nothing to do"),
        Ok(_) => {}
        Err(e) => chat_notice(e),
    }
}

async fn select(controller: &mut SessionController, path: &Path) -> bool {
    match FileBlob::from_path(path).await {
        Ok(blob) => match controller.select_file(blob) {
            Ok(()) => {
                notice(format!("Selected {}", path.display()));
                true
            }
            Err(e) => {
                chat_notice(e);
                false
            }
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read file");
            notice(format!("Could not read {}: {}", path.display(), e));
            false
        }
    }
}

async fn ask(controller: &mut SessionController) {
    if controller.can_submit() {
        println!("Typing...");
    }
    report(controller.submit_input().await);
}

/// Handle one command. Returns `false` when the session should end.
async fn dispatch(controller: &mut SessionController, command: Command) -> bool {
    match command {
        Command::Empty => {}
        Command::Ask(text) => {
            controller.set_input(text);
            ask(controller).await;
        }
        Command::Send => ask(controller).await,
        Command::File(path) => {
            select(controller, &path).await;
        }
        Command::Upload(path) => {
            if let Some(path) = path {
                if !select(controller, &path).await {
                    return true;
                }
            }
            if controller.can_upload() {
                println!("Typing...");
            }
            report(controller.submit_upload().await);
        }
        Command::Mute => {
            let muted = controller.toggle_mute().await;
            notice(if muted { "Muted" } else { "Unmuted" });
        }
        Command::Listen => {
            notice("Listening...");
            match controller.toggle_listening().await {
                Ok(Some(transcript)) => notice(format!("Heard: {} (/send to ask)", transcript)),
                Ok(None) => notice("Nothing heard"),
                Err(e) => chat_notice(e),
            }
        }
        Command::Replay(n) => {
            if let Err(e) = controller.replay(n - 1).await {
                chat_notice(e);
            }
        }
        Command::History => {
            for (i, message) in controller.messages().iter().enumerate() {
                println!("{:>3}  {}", i + 1, message);
            }
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
    }
    true
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = AroConfig::load_or_default(&config_file);
    config.service.base_url = args.resolve_base_url(&config.service.base_url);
    let log_level = args.resolve_log_level(&config.general.log_level);

    // Tracing.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Starting AroVeda v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Service.
    let service = ServiceClient::new(&config.service)?;
    match service.ping().await {
        Ok(welcome) => tracing::info!(url = %service.base_url(), welcome = %welcome, "Service reachable"),
        Err(e) => tracing::warn!(url = %service.base_url(), error = %e, "Service not reachable yet"),
    }

    // Session.
    let mut controller = SessionController::with_services(
        service.query_client(),
        service.upload_client(),
        speech_bridge(&config.speech),
    )
    .muted(args.resolve_muted(config.general.start_muted));

    println!("AroVeda - chat with your PDF. Type /help for commands.");
    let mut shown = 0;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt(&controller);

    while let Some(line) = lines.next_line().await? {
        let keep_going = match Command::parse(&line) {
            Ok(command) => dispatch(&mut controller, command).await,
            Err(usage) => {
                notice(usage);
                true
            }
        };
        render_new(&controller, &mut shown);
        if !keep_going {
            break;
        }
        prompt(&controller);
    }

    controller.speech().cancel_speech().await;
    tracing::info!(messages = controller.messages().len(), "Session ended");
    Ok(())
}
