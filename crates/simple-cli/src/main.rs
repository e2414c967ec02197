mod diagnostic;

use clap::Parser;
use diagnostic::CliError;
use simple_eval::{Evaluator, EvaluatorOptions, DEFAULT_MAX_DEPTH};
use simple_types::SourceFile;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Simple - a tiny scripting language
#[derive(Parser, Debug)]
#[command(name = "simple")]
#[command(about = "Run Simple scripts", long_about = None)]
struct Args {
    /// Print the parsed AST before running (for debugging)
    #[arg(long)]
    debug_parse: bool,

    /// Report errors as JSON on stderr
    #[arg(long)]
    json: bool,

    /// Abort after visiting this many statements and expressions
    #[arg(long, value_name = "N")]
    max_steps: Option<u64>,

    /// Abort when statements and expressions nest deeper than this
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Script to run, or `-` to read it from stdin
    file: PathBuf,
}

fn read_script(path: &Path) -> Result<SourceFile, CliError> {
    let io_error = |source: io::Error| CliError::Io {
        path: path.display().to_string(),
        source,
    };
    if path.as_os_str() == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source).map_err(io_error)?;
        Ok(SourceFile::new("<stdin>", source))
    } else {
        let source = std::fs::read_to_string(path).map_err(io_error)?;
        Ok(SourceFile::new(path.display().to_string(), source))
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let source = read_script(&args.file)?;
    tracing::info!(file = %source.name, lines = source.line_count(), "loaded script");

    let program = simple_parser::parse(&source)?;
    if args.debug_parse {
        eprintln!("{program:#?}");
    }

    let options = EvaluatorOptions {
        max_steps: args.max_steps,
        max_depth: args.max_depth,
    };
    let mut evaluator = Evaluator::with_options(io::stdout().lock(), options);
    evaluator.eval_program(&program).map_err(|error| {
        let span = evaluator.error_span();
        CliError::Eval {
            file: source.name.clone(),
            error,
            span,
            source_line: span.and_then(|s| source.line(s.start_line)).map(str::to_string),
        }
    })
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{fmt, EnvFilter};

    // RUST_LOG controls the level, WARN when unset or invalid
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let diagnostic = err.diagnostic();
            if args.json {
                eprintln!("{}", diagnostic.to_json());
            } else {
                eprintln!("{}", diagnostic.render());
            }
            ExitCode::from(err.exit_code())
        }
    }
}
