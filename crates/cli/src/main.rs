use std::env;
use std::io::{self, IsTerminal, Read};
use std::process::ExitCode;

use lemonade_cli::handlers::Preview;
use lemonade_cli::usage::usage;
use lemonade_core::dispatch::{dispatch, Dispatched};
use lemonade_core::error::Result;
use lemonade_core::invocation::classify;
use lemonade_core::operation::Operation;
use lemonade_core::options::OptionResolver;
use log::{debug, info, LevelFilter};

/// Sets up `env_logger`. Returns whether `RUST_LOG` controls the level; if
/// not, the level follows the resolved `log-level` option.
fn init_logging() -> bool {
    let from_env = env::var_os("RUST_LOG").is_some();
    let mut builder = env_logger::Builder::from_default_env();
    if !from_env {
        builder.filter_level(LevelFilter::Trace);
    }
    builder.init();
    if !from_env {
        log::set_max_level(LevelFilter::Error);
    }
    from_env
}

/// Standard input for option resolution. An unrecognised invocation on an
/// interactive terminal gets an empty stream so it reaches usage instead of
/// waiting for input.
fn payload_input(operation: Operation) -> Box<dyn Read> {
    let stdin = io::stdin();
    if operation == Operation::Unknown && stdin.is_terminal() {
        debug!("No command and standard input is a terminal, not reading it");
        Box::new(io::empty())
    } else {
        Box::new(stdin.lock())
    }
}

fn execute(level_from_env: bool) -> Result<ExitCode> {
    let args = env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    let invocation = classify(args);
    debug!("Invocation: {:?} {:?}", invocation.style, invocation.operation);

    let input = payload_input(invocation.operation);
    let config = OptionResolver::default().resolve(invocation, input)?;
    if !level_from_env {
        log::set_max_level(config.log_filter());
    }
    debug!("Resolved configuration: {config:?}");

    let dispatched = dispatch(&config, &mut Preview::new(io::stdout().lock()))?;
    match dispatched {
        Dispatched::Ran(operation) => {
            info!("Finished `{operation}`");
            Ok(ExitCode::SUCCESS)
        }
        Dispatched::Help => {
            print!("{}", usage());
            Ok(ExitCode::SUCCESS)
        }
        Dispatched::Usage => {
            eprint!("{}", usage());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    let level_from_env = init_logging();

    match execute(level_from_env) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
