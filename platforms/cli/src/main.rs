use clap::Parser;
use std::io;
use std::process::{self, ExitCode};
use tmt::{CancelToken, Interpreter, SourceStack};

/// An interactive Turing machine simulator driven by a line-oriented command language.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
  tmt                              read commands from standard input
  tmt binary-counter.tm -            run a script, then continue interactively
  tmt machine.tm '-tapestring 0110' -run -tape")]
struct Cli {
    /// Command sources, read in order. `-` is standard input; an argument starting
    /// with `-` followed by more text is a single literal command line.
    /// Defaults to standard input. A bare `--` ends option parsing and is not a
    /// source itself.
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    sources: Vec<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    // An interrupt stops a running machine; outside a run it ends the process.
    let cancel = CancelToken::new();
    let handler = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        if handler.interrupt() {
            process::exit(1);
        }
    }) {
        log::warn!("failed to install the interrupt handler: {}", e);
    }

    let sources = open_sources(&cli.sources);
    let mut interpreter = Interpreter::new(sources, cancel, io::stdout(), io::stderr());

    match interpreter.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Builds the source queue from the command-line arguments.
///
/// Sources that cannot be opened are reported and skipped.
fn open_sources(args: &[String]) -> SourceStack {
    let mut sources = SourceStack::new();
    if args.is_empty() {
        sources.queue(tmt::loader::STDIN_NAME, tmt::SourceLoader::stdin());
        return sources;
    }

    for arg in args {
        match arg.strip_prefix('-') {
            Some(line) if !line.is_empty() => sources.queue_literal(line),
            _ => {
                if let Err(e) = sources.queue_named(arg) {
                    eprintln!("{}", e);
                }
            }
        }
    }
    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyphen_arguments_are_sources() {
        let cli = Cli::try_parse_from(["tmt", "script.tm", "-tape a b", "-"]).unwrap();
        assert_eq!(cli.sources, vec!["script.tm", "-tape a b", "-"]);
    }

    #[test]
    fn test_bare_double_dash_is_separator() {
        let cli = Cli::try_parse_from(["tmt", "--"]).unwrap();
        assert!(cli.sources.is_empty());

        let cli = Cli::try_parse_from(["tmt", "--", "-read"]).unwrap();
        assert_eq!(cli.sources, vec!["-read"]);
    }

    #[test]
    fn test_literal_arguments_are_queued() {
        let sources = open_sources(&["-state".to_string(), "-tape x".to_string()]);
        assert!(!sources.is_empty());
    }
}
