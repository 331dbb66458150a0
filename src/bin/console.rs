//! Terminal front end for the companion client.
//!
//! Renders the conversation to stdout, with the progressive reveal
//! printed character batches at a time. Host audio capabilities are
//! absent in a plain terminal, so the no-op variants are wired in and
//! speech degrades silently.

use solace::api::RemoteApi;
use solace::config::ClientConfig;
use solace::dispatcher::MessageDispatcher;
use solace::emotion::Emotion;
use solace::guided::GuidedExercises;
use solace::stt::{NullRecognizer, VoiceInputCapture};
use solace::surface::{ChatSurface, RevealTarget};
use solace::tts::{NullAudioSink, NullSynthesizer, VoiceOutputResolver};
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Prints the conversation to stdout.
struct ConsoleSurface {
    /// True while a reveal is writing an unterminated line.
    line_open: Arc<Mutex<bool>>,
}

impl ConsoleSurface {
    fn new() -> Self {
        Self {
            line_open: Arc::new(Mutex::new(false)),
        }
    }

    fn close_open_line(&self) {
        if let Ok(mut open) = self.line_open.lock()
            && *open
        {
            println!();
            *open = false;
        }
    }
}

struct ConsoleTarget {
    line_open: Arc<Mutex<bool>>,
}

impl RevealTarget for ConsoleTarget {
    fn clear(&self) {
        print!("solace> ");
        let _ = std::io::stdout().flush();
        if let Ok(mut open) = self.line_open.lock() {
            *open = true;
        }
    }

    fn append(&self, chunk: &str) {
        print!("{chunk}");
        let _ = std::io::stdout().flush();
    }
}

impl ChatSurface for ConsoleSurface {
    fn append_user(&self, text: &str) {
        self.close_open_line();
        println!("you> {text}");
    }

    fn append_bot(&self, text: &str) {
        self.close_open_line();
        println!("solace> {text}");
    }

    fn open_bot_slot(&self) -> Arc<dyn RevealTarget> {
        self.close_open_line();
        Arc::new(ConsoleTarget {
            line_open: Arc::clone(&self.line_open),
        })
    }

    fn set_typing(&self, active: bool) {
        if active {
            self.close_open_line();
            println!("(thinking...)");
        }
    }

    fn set_emotion(&self, emotion: Emotion) {
        self.close_open_line();
        println!("[mood: {} {}]", emotion, emotion.indicator());
    }

    fn set_listening(&self, active: bool) {
        self.close_open_line();
        println!("[mic {}]", if active { "on" } else { "off" });
    }

    fn set_crisis_visible(&self, visible: bool) {
        self.close_open_line();
        if visible {
            println!("!! If you are in immediate danger, please contact local emergency services.");
        }
    }

    fn show_memory_preview(&self, lines: &[String]) {
        self.close_open_line();
        if lines.is_empty() {
            println!("[memory empty]");
            return;
        }
        println!("[recent memory]");
        for line in lines {
            println!("  {line}");
        }
    }

    fn set_input(&self, _text: &str) {}

    fn clear_input(&self) {}
}

fn print_help() {
    println!("commands: /breathe /journal /sleep /checkin /clear /voice on|off /quit");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("solace=info")),
        )
        .init();

    // First argument is an optional TOML config path; SOLACE_URL
    // overrides the configured base URL either way.
    let mut config = match std::env::args().nth(1) {
        Some(path) => ClientConfig::from_file(&PathBuf::from(path))?,
        None => ClientConfig::default(),
    };
    if let Ok(url) = std::env::var("SOLACE_URL") {
        config.api.base_url = url;
    }

    let api = Arc::new(RemoteApi::new(&config.api));
    let surface: Arc<dyn ChatSurface> = Arc::new(ConsoleSurface::new());
    let voice = Arc::new(VoiceOutputResolver::new(
        Arc::clone(&api),
        Arc::new(NullAudioSink),
        Arc::new(NullSynthesizer),
        &config.voice,
    ));
    let dispatcher = Arc::new(MessageDispatcher::new(
        Arc::clone(&api),
        Arc::clone(&surface),
        Arc::clone(&voice),
        &config,
    ));
    let guided = GuidedExercises::new(Arc::clone(&surface), Arc::clone(&voice), &config.guided);

    // No terminal speech recognition; the capture stays permanently idle
    // but keeps the wiring identical to a voice-capable host.
    let (_tx, rx) = tokio::sync::mpsc::channel(16);
    let _capture = VoiceInputCapture::spawn(
        Arc::new(NullRecognizer),
        rx,
        Arc::clone(&dispatcher),
        Arc::clone(&surface),
    );

    println!("Solace v{} ({})", env!("CARGO_PKG_VERSION"), config.api.base_url);
    print_help();

    dispatcher.hydrate_memory().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" => break,
            "/help" => print_help(),
            "/breathe" => guided.breathing().await,
            "/journal" => guided.journal(),
            "/sleep" => guided.sleep_wind_down().await,
            "/checkin" => guided.check_in(),
            "/clear" => dispatcher.clear_memory(),
            "/voice on" => dispatcher.set_voice_enabled(true),
            "/voice off" => dispatcher.set_voice_enabled(false),
            text => dispatcher.send_user_message(text).await,
        }
    }

    Ok(())
}
