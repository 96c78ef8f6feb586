// FitPace - Terminal front end for breathing, workout and meditation sessions

use clap::{Parser, Subcommand};
use fitpace::config::{AppConfig, ConfigError};
use fitpace::cue::{Cue, CueDispatcher, CueError, CuePlayer};
use fitpace::logging::{TryInitError, init_logging};
use fitpace::messaging::{
    ChannelView, Command, CommandProducer, SequencerEvent, create_command_channel,
    create_event_channel, drain_events,
};
use fitpace::sequencer::{Sequence, SequencerError, StepSequencer, format_clock};
use fitpace::session::Session;
use fitpace::source::{
    FallbackSource, FileSource, PresetSource, Presets, RecordKind, SourceError, StepSource,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

// Upper bound on how long the main loop sleeps between polls
const MAX_IDLE_SLEEP: Duration = Duration::from_millis(20);

// Speed-up applied by --fast
const FAST_FACTOR: u32 = 10;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    Sequencer(#[from] SequencerError),

    #[error("Logging setup failed: {0}")]
    Logging(#[from] TryInitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser)]
#[command(name = "fitpace")]
#[command(about = "Breathing pacer, workout player and guided meditation timer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Mode,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run the clock ten times faster
    #[arg(long)]
    fast: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Write the session summary as JSON to this file
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Mode {
    /// Paced breathing, loops until stopped
    Breathe {
        /// Pattern name (see `presets`)
        pattern: Option<String>,

        /// Stop after this many seconds
        #[arg(short, long)]
        duration: Option<u64>,
    },

    /// Guided meditation script
    Meditate {
        /// Script name (see `presets`)
        script: Option<String>,
    },

    /// Custom workout from a workout builder JSON file
    Workout { file: PathBuf },

    /// List built-in patterns and scripts
    Presets,
}

/// Cue player writing cues to the terminal
struct TerminalCuePlayer;

impl CuePlayer for TerminalCuePlayer {
    fn play(&mut self, cue: &Cue, _volume: f32) -> Result<(), CueError> {
        match cue {
            Cue::Sound(id) => println!("  ♪ {}", id),
            Cue::Speak(text) => println!("  » {}", text),
        }
        Ok(())
    }

    fn silence(&mut self) {}
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::resolve(cli.config.as_deref())?;
    init_logging(&config.log_filter, cli.verbose)?;

    let presets = Presets::builtin()?;

    let (sequence, time_limit) = match &cli.command {
        Mode::Presets => {
            print_presets(&presets);
            return Ok(());
        }
        Mode::Breathe { pattern, duration } => {
            let name = pattern
                .clone()
                .unwrap_or_else(|| config.default_breathing_pattern.clone());
            let source = FallbackSource::new(
                PresetSource::breathing(&presets, name),
                presets.default_breathing()?,
            );
            (source.fetch()?, *duration)
        }
        Mode::Meditate { script } => {
            let name = script
                .clone()
                .unwrap_or_else(|| config.default_meditation_script.clone());
            (PresetSource::meditation(&presets, name).fetch()?, None)
        }
        Mode::Workout { file } => {
            let source = FileSource::new(file.clone(), RecordKind::Workout);
            (source.fetch()?, None)
        }
    };

    let mut interval = config.tick_interval();
    if cli.fast {
        interval /= FAST_FACTOR;
    }

    let summary = run_session(&config, sequence, interval, time_limit)?;

    println!("\n{}", summary.to_json()?);
    if let Some(path) = &cli.summary {
        summary.write_json(path)?;
        tracing::info!(path = %path.display(), "Summary written");
    }
    Ok(())
}

fn run_session(
    config: &AppConfig,
    sequence: Sequence,
    interval: Duration,
    time_limit: Option<u64>,
) -> Result<fitpace::SessionSummary, AppError> {
    let (event_tx, mut event_rx) = create_event_channel(config.event_capacity);
    let (command_tx, mut command_rx) = create_command_channel(config.command_capacity);

    let sequencer = StepSequencer::new(
        Box::new(ChannelView::new(event_tx)),
        CueDispatcher::new(Box::new(TerminalCuePlayer), config.cues),
    );
    let mut session = Session::new(sequencer, interval);

    println!("=== {} ({} steps) ===", sequence.name, sequence.len());
    println!("Keys: [Enter] pause/resume  n next  b back  c set done  q stop\n");

    session.load(sequence)?;
    drain_events(&mut event_rx);
    session.apply(Command::Start)?;

    spawn_input_thread(command_tx);

    loop {
        session.drain_commands(&mut command_rx);

        let now = Instant::now();
        session.pump(now)?;

        for event in drain_events(&mut event_rx) {
            render(&event);
        }

        if let Some(limit) = time_limit
            && session.sequencer().session_elapsed() >= limit
            && session.status().is_active()
        {
            tracing::info!(limit, "Time limit reached");
            session.apply(Command::Stop)?;
            for event in drain_events(&mut event_rx) {
                render(&event);
            }
        }

        // Completed, or stopped from the keyboard
        if !session.status().is_active() {
            break;
        }

        let sleep = session
            .time_until_tick(Instant::now())
            .unwrap_or(MAX_IDLE_SLEEP)
            .min(MAX_IDLE_SLEEP);
        std::thread::sleep(sleep);
    }

    Ok(session.summary())
}

/// Read key commands from stdin and queue them for the session
fn spawn_input_thread(mut tx: CommandProducer) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            match Command::from_key(&line) {
                Some(command) => {
                    if ringbuf::traits::Producer::try_push(&mut tx, command).is_err() {
                        tracing::warn!(?command, "Command queue full, dropping input");
                    }
                }
                None => eprintln!("Unknown key: {:?}", line.trim()),
            }
        }
        tracing::debug!("Input closed");
    });
}

fn render(event: &SequencerEvent) {
    match event {
        SequencerEvent::StepChanged(display) => {
            let step = &display.step;
            let position = format!("{}/{}", display.displayed_step, display.total_steps);
            print!("\n[{}] {} ({})", position, step.label, step.detail());
            if display.sub_iterations > 1 {
                print!("  set {}/{}", display.sub_iteration, display.sub_iterations);
            }
            println!();
            if let Some(next) = display.upcoming.first() {
                println!("  next: {}", next);
            }
        }
        SequencerEvent::Tick {
            counter,
            session_elapsed,
        } => {
            print!("\r  {}   total {}", counter, format_clock(*session_elapsed));
            flush_stdout();
        }
        SequencerEvent::Completed { session_elapsed } => {
            println!("\n\nSession complete in {}", format_clock(*session_elapsed));
        }
        SequencerEvent::Reset => {
            println!("\n\nStopped");
        }
    }
}

/// Push a partial line to the terminal
fn flush_stdout() {
    if let Err(e) = std::io::stdout().flush() {
        tracing::trace!(error = %e, "Terminal flush failed");
    }
}

fn print_presets(presets: &Presets) {
    println!("Breathing patterns:");
    for name in presets.breathing_names() {
        if let Ok(sequence) = presets.breathing(name) {
            let phases: Vec<_> = sequence
                .steps()
                .iter()
                .map(|s| format!("{} {}", s.label, s.detail()))
                .collect();
            println!("  {:<10} {}", name, phases.join(" / "));
        }
    }

    println!("\nMeditation scripts:");
    for name in presets.meditation_names() {
        if let Ok(sequence) = presets.meditation(name) {
            println!(
                "  {:<10} {} lines, about {}",
                name,
                sequence.len(),
                format_clock(sequence.timed_duration_seconds())
            );
        }
    }
}
