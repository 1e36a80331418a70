/// polyview terminal demo - animated world transforms
///
/// Loads the demonstration scene, queues the start-up operations and
/// renders every frame to the terminal.
/// Controls:
///   - Arrows / WASD: Rotate about X and Y
///   - Keypad 7 9 1 3 (Home PageUp End PageDown): Rotate diagonally
///   - Q/ESC: Quit
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};
use polyview_core::{demo, script, Engine, KeyMap, Operation, Timing};
use polyview_terminal::TerminalApp;

#[derive(Parser, Debug)]
#[command(name = "polyview-terminal", about = "Animated 3D transforms in the terminal")]
struct Args {
    /// Duration of each operation in milliseconds
    #[arg(long, default_value_t = 1000)]
    duration_ms: u64,

    /// Animation steps per operation
    #[arg(long, default_value_t = 60)]
    steps: u32,

    /// Degrees turned by each rotation key
    #[arg(long, default_value_t = 30.0)]
    key_step: f64,

    /// Frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Operations the queue holds before submitters block
    #[arg(long, default_value_t = polyview_core::engine::DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Operation script run at start-up instead of the built-in one
    #[arg(long, conflicts_with = "no_script")]
    script: Option<PathBuf>,

    /// Start with an empty queue
    #[arg(long)]
    no_script: bool,

    /// Key map file replacing the standard bindings
    #[arg(long)]
    keymap: Option<PathBuf>,

    /// Write logs to this file; the terminal is busy with the scene
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            env_logger::Builder::from_env(Env::default().default_filter_or("info"))
                .target(Target::Pipe(Box::new(file)))
                .init();
        }
        None => {
            env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();
        }
    }
    Ok(())
}

fn startup_operations(args: &Args, timing: Timing) -> Result<Vec<Operation>> {
    if args.no_script {
        return Ok(Vec::new());
    }
    match &args.script {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading script {}", path.display()))?;
            script::parse_script(&text, timing)
                .with_context(|| format!("parsing script {}", path.display()))
        }
        None => Ok(demo::startup(timing)),
    }
}

fn load_keymap(args: &Args, timing: Timing) -> Result<KeyMap> {
    match &args.keymap {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading key map {}", path.display()))?;
            KeyMap::parse(&text, timing).with_context(|| format!("parsing key map {}", path.display()))
        }
        None => Ok(KeyMap::standard(args.key_step, timing)),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    println!("polyview terminal renderer - loading...");

    let timing = Timing::new(Duration::from_millis(args.duration_ms), args.steps)?;
    let startup = startup_operations(&args, timing)?;
    let keymap = load_keymap(&args, timing)?;
    if keymap.is_empty() {
        log::warn!("key map has no bindings, only Q and Esc will respond");
    }

    let mut engine = Engine::new(demo::world()?).with_queue_capacity(args.queue_capacity);
    log::info!(
        "starting with {} queued operations and {} key bindings",
        startup.len(),
        keymap.len()
    );

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(Duration::from_millis(500));

    // Fed from a background thread so long scripts animate on screen.
    engine.start_in_background(startup)?;
    let mut app = TerminalApp::new(engine, keymap, args.fps)?;
    app.run()?;

    log::info!("stopped");
    println!("Thank you for using polyview!");
    Ok(())
}
