// kbf: lazily recomputed Brainfuck machine

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kbf::config::{EofPolicy, MachineConfig, WritePolicy};
use kbf::session::resource::DEFAULT_DIR;
use kbf::session::shared::SharedSession;
use kbf::session::ResourceDir;
use kbf::ui::App;

#[derive(Parser, Debug)]
#[command(name = "kbf")]
#[command(about = "Run a Brainfuck program behind code/input/output resources")]
struct Cli {
    /// Program file to load into the code resource
    file: Option<PathBuf>,

    /// Program text, used instead of FILE
    #[arg(short = 'e', long, conflicts_with = "file")]
    eval: Option<String>,

    /// Input text for the input resource
    #[arg(short, long, conflicts_with = "input_file")]
    input: Option<String>,

    /// File to copy into the input resource
    #[arg(long)]
    input_file: Option<PathBuf>,

    /// Instructions per run before it is cut off
    #[arg(long)]
    budget: Option<usize>,

    /// Number of tape cells
    #[arg(long)]
    tape_size: Option<usize>,

    /// Maximum loop nesting depth
    #[arg(long)]
    loop_depth: Option<usize>,

    #[arg(long)]
    code_capacity: Option<usize>,

    #[arg(long)]
    input_capacity: Option<usize>,

    #[arg(long)]
    output_capacity: Option<usize>,

    /// Store 0 when `,` reads past the end of the input
    #[arg(long)]
    eof_zero: bool,

    /// Reject over-length writes instead of truncating them
    #[arg(long)]
    reject_oversize: bool,

    /// Open the interactive terminal UI
    #[arg(long)]
    tui: bool,
}

impl Cli {
    fn machine_config(&self) -> MachineConfig {
        let defaults = MachineConfig::default();
        MachineConfig {
            code_capacity: self.code_capacity.unwrap_or(defaults.code_capacity),
            input_capacity: self.input_capacity.unwrap_or(defaults.input_capacity),
            output_capacity: self.output_capacity.unwrap_or(defaults.output_capacity),
            tape_size: self.tape_size.unwrap_or(defaults.tape_size),
            loop_depth: self.loop_depth.unwrap_or(defaults.loop_depth),
            budget: self.budget.unwrap_or(defaults.budget),
            eof: if self.eof_zero {
                EofPolicy::Zero
            } else {
                EofPolicy::Unchanged
            },
            oversize_writes: if self.reject_oversize {
                WritePolicy::Reject
            } else {
                WritePolicy::Truncate
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Log lines on stderr would draw over the TUI, so it stays quiet by default
    let default_filter = if cli.tui { "off" } else { "kbf=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let session = SharedSession::new(cli.machine_config())?;
    let dir = ResourceDir::mount(DEFAULT_DIR, session);

    // Load the program
    if let Some(code) = &cli.eval {
        dir.write("code", code.as_bytes())?;
    } else if let Some(path) = &cli.file {
        info!("Loading program from {}", path.display());
        let stored = dir.write("code", &fs::read(path)?)?;
        info!("Loaded {} program bytes", stored);
    } else if !cli.tui {
        eprintln!("Error: No program provided");
        eprintln!();
        eprintln!("Usage: kbf <file.bf> [--input TEXT]");
        eprintln!("       kbf -e '<program>' [--input TEXT]");
        eprintln!("       kbf --tui");
        return Ok(ExitCode::FAILURE);
    }

    // Load the input
    if let Some(text) = &cli.input {
        dir.write("input", text.as_bytes())?;
    } else if let Some(path) = &cli.input_file {
        dir.write_from("input", File::open(path)?)?;
    }

    if cli.tui {
        return run_tui(dir).map(|()| ExitCode::SUCCESS);
    }

    let report = dir.session().read_output();
    let mut stdout = io::stdout().lock();
    stdout.write_all(&report.bytes)?;
    stdout.flush()?;

    if report.outcome.is_complete() {
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!();
        eprintln!("kbf: {} after {} operations", report.outcome, report.ops_used);
        Ok(if report.outcome.is_failure() {
            ExitCode::from(2)
        } else {
            ExitCode::SUCCESS
        })
    }
}

fn run_tui(dir: ResourceDir) -> Result<(), Box<dyn std::error::Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(dir);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
