use anyhow::Context;
use clap::Parser;
use mindmate_cli::render::{self, TITLE};
use mindmate_cli::repl::{parse_line, Command, HELP};
use mindmate_cli::ConversationController;
use mindmate_core::{MindMateConfig, ReplySelector, ReplyTable};
use mindmate_voice::{
    CommandRecognizer, EspeakSynthesizer, RecognitionEvent, RecognizerSettings, SpeechOutput,
    SpeechRecognizer, SpeechSynthesizer,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config file (defaults to the user config dir)
    #[arg(short, long, env = "MINDMATE_CONFIG")]
    config: Option<PathBuf>,

    /// Never speak replies aloud
    #[arg(long)]
    mute: bool,

    /// Seed for reply selection, for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(MindMateConfig::default_path);
    info!("Loading config from {}...", config_path.display());
    let config = MindMateConfig::load_or_default(&config_path);

    let table = ReplyTable::from_config(&config.replies).context("Invalid [replies] config")?;
    let replies = match args.seed {
        Some(seed) => ReplySelector::seeded(table, seed),
        None => ReplySelector::new(table),
    };

    let synthesizer = if args.mute || !config.speech.synthesizer.enabled {
        None
    } else {
        EspeakSynthesizer::probe(&config.speech.synthesizer.command)
            .map(|s| Box::new(s) as Box<dyn SpeechSynthesizer>)
    };
    let output = SpeechOutput::new(synthesizer, config.speech.synthesizer.voice_hints.clone());

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<RecognitionEvent>();
    let settings = RecognizerSettings::single_utterance(config.speech.locale.clone());
    let recognizer = CommandRecognizer::probe(&config.speech.recognizer, settings, event_tx)
        .map(|r| Box::new(r) as Box<dyn SpeechRecognizer>);

    let mut controller: ConversationController =
        ConversationController::new(replies, output, recognizer);

    println!("{}", TITLE);
    if let Some(notice) = controller.take_setup_notice() {
        println!("{}", notice);
    }
    println!("Type a message, /help for commands, 'quit' to exit.\n");
    print_view(&controller);

    // Line editing blocks, so it gets its own thread. Each line waits for an
    // ack so the prompt is redrawn after the reply has been printed.
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    let (ack_tx, ack_rx) = std_mpsc::channel::<()>();
    std::thread::spawn(move || read_lines(line_tx, ack_rx));

    loop {
        tokio::select! {
            // Recognition events queued before a mic toggle are drained first,
            // so they meet the session they belong to.
            biased;

            Some(event) = event_rx.recv() => {
                // Outcomes of a stopped session are ignored by the controller.
                let live = controller.state().is_listening;
                match &event {
                    RecognitionEvent::Result(transcript) if live => {
                        println!("\nYou (voice): {}", transcript);
                    }
                    _ => {}
                }
                controller.handle_recognition_event(event).await;
                if live {
                    println!();
                    print_view(&controller);
                }
            }
            line = line_rx.recv() => {
                let Some(line) = line else { break };
                let keep_going = handle_command(&mut controller, parse_line(&line)).await?;
                if !keep_going {
                    break;
                }
                let _ = ack_tx.send(());
            }
        }
    }

    controller.teardown();
    info!("Session closed");
    Ok(())
}

fn print_view(controller: &ConversationController) {
    println!(
        "{}\n",
        render::view(controller.state(), controller.voice_input_available())
    );
}

/// Returns `false` when the session should end.
async fn handle_command(
    controller: &mut ConversationController,
    command: Command,
) -> anyhow::Result<bool> {
    match command {
        Command::Quit => return Ok(false),
        Command::Help => println!("{}", HELP),
        Command::ShowState => println!("{}", serde_json::to_string_pretty(controller.state())?),
        Command::ToggleMic => {
            if controller.voice_input_available() {
                controller.toggle_listening();
                println!("{}", render::controls(controller.state(), true));
            } else {
                println!("Voice input is not available.");
            }
        }
        Command::Send(text) => {
            controller.set_input(text);
            if controller.send().await.is_some() {
                println!();
                print_view(controller);
            }
        }
    }
    Ok(true)
}

fn read_lines(lines: mpsc::UnboundedSender<String>, ack: std_mpsc::Receiver<()>) {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            error!("Failed to open line editor: {}", e);
            return;
        }
    };

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                if lines.send(line).is_err() || ack.recv().is_err() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        }
    }
}
