//! Purpose: `autosmooth` CLI entry point: replay and inspect event scripts.
//! Role: Binary crate root; parses args, runs commands, emits JSONL on stdout.
//! Invariants: `replay` prints one JSON object per resulting action.
//! Invariants: Script and host errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::aot::Shell;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use autosmooth::api::{Error, ErrorKind, to_exit_code};
use autosmooth::sim::{Replay, ScriptEvent, read_script};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }
}

#[derive(Parser)]
#[command(
    name = "autosmooth",
    version,
    about = "Replay host tool and transaction events through the auto-smoothing core",
    after_help = r#"EXAMPLES
  $ autosmooth check gesture.jsonl
  $ autosmooth replay gesture.jsonl
  {"action":"enabled"}
  {"action":"smooth","operation":"Move","transparent":true,"edges":[3]}

SCRIPTS
  One JSON event per line, e.g.
    {"event":"enable"}
    {"event":"tool_changed","tool":"move"}
    {"event":"tool_state","tool":"move","state":1}
    {"event":"add_edge","id":3,"faces":2}
    {"event":"transaction","tag":"undo"}"#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Replay a JSONL event script and print resulting actions")]
    Replay {
        #[arg(help = "Script path, or - for stdin")]
        script: PathBuf,
    },
    #[command(about = "Validate a JSONL event script without running it")]
    Check {
        #[arg(help = "Script path, or - for stdin")]
        script: PathBuf,
    },
    #[command(about = "Generate shell completions")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = Cli::parse();
    match cli.command {
        Command::Replay { script } => {
            let events = load_script(&script)?;
            let mut replay = Replay::new();
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for event in &events {
                for action in replay.apply(event)? {
                    emit_line(&mut out, &serde_json::to_value(&action).map_err(internal)?)?;
                }
            }
            Ok(RunOutcome::ok())
        }
        Command::Check { script } => {
            let events = load_script(&script)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            emit_line(&mut out, &json!({ "ok": true, "events": events.len() }))?;
            Ok(RunOutcome::ok())
        }
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "autosmooth", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
    }
}

fn load_script(path: &Path) -> Result<Vec<ScriptEvent>, Error> {
    let reader: Box<dyn BufRead> = if path.as_os_str() == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(path).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to open script")
                .with_path(path)
                .with_source(err)
        })?;
        Box::new(BufReader::new(file))
    };
    read_script(reader).map_err(|err| {
        if path.as_os_str() == "-" {
            err
        } else {
            err.with_path(path)
        }
    })
}

fn emit_line(out: &mut impl Write, value: &serde_json::Value) -> Result<(), Error> {
    writeln!(out, "{value}").map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to write output")
            .with_source(err)
    })
}

fn emit_error(err: &Error) {
    let mut body = serde_json::Map::new();
    body.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    body.insert(
        "message".to_string(),
        json!(err.message().unwrap_or("unknown error")),
    );
    if let Some(hint) = err.hint() {
        body.insert("hint".to_string(), json!(hint));
    }
    eprintln!("{}", json!({ "error": body }));
}

fn internal(err: serde_json::Error) -> Error {
    Error::new(ErrorKind::Internal)
        .with_message("failed to encode action")
        .with_source(err)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}
