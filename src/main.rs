use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use voltconsole::error::{
    ClassifiedError, ClassifyOptions, Connectivity, ErrorClassifier, ErrorReason, Failure,
    RecoveryHint, TransportError,
};
use voltconsole::logging::{init_logging, LoggingConfig};
use voltconsole::rules::RulesConfig;

/// Output format for classification results
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned key/value lines
    #[default]
    Text,
    /// A single JSON object
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "voltconsole")]
#[command(version)]
#[command(about = "Classify console failures into reasons and message keys")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colors (also respects NO_COLOR environment variable)
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a single failure
    Classify(ClassifyArgs),
    /// List every reason with its default message key and recovery hint
    Reasons,
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    /// HTTP status of the failed response
    #[arg(long, value_name = "STATUS")]
    status: Option<u16>,

    /// Machine error code, e.g. ECONNRESET
    #[arg(long, value_name = "CODE")]
    code: Option<String>,

    /// Error message text
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Raw error value as JSON (null, a string, or an object)
    #[arg(long, value_name = "JSON")]
    #[arg(conflicts_with_all = ["status", "code", "message"])]
    json_input: Option<String>,

    /// Treat the host as offline
    #[arg(long)]
    offline: bool,

    /// Rules file with overrides and extra matchers
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let logging = LoggingConfig::from_verbosity(cli.verbose);
    init_logging(logging.with_timestamps(false));

    let color = !cli.no_color
        && std::env::var_os("NO_COLOR").is_none()
        && std::io::stdout().is_terminal();

    match cli.command {
        Commands::Classify(args) => run_classify(args, color),
        Commands::Reasons => {
            run_reasons(color);
            ExitCode::SUCCESS
        }
    }
}

fn run_classify(args: ClassifyArgs, color: bool) -> ExitCode {
    let options = match args.rules.as_deref() {
        Some(path) => match RulesConfig::load(path).and_then(RulesConfig::into_options) {
            Ok(options) => options,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(2);
            }
        },
        None => ClassifyOptions::default(),
    };

    let failure = match failure_from_args(&args) {
        Ok(failure) => failure,
        Err(e) => {
            eprintln!("Error: invalid --json-input: {}", e);
            return ExitCode::from(2);
        }
    };

    let connectivity = if args.offline {
        Connectivity::Offline
    } else {
        Connectivity::Unknown
    };
    let classified = ErrorClassifier::with_options(options)
        .with_connectivity(connectivity)
        .classify(failure);

    match args.format {
        OutputFormat::Text => print_text(&classified, color),
        OutputFormat::Json => println!("{}", to_json(&classified)),
    }
    ExitCode::SUCCESS
}

fn failure_from_args(args: &ClassifyArgs) -> Result<Failure, serde_json::Error> {
    if let Some(raw) = &args.json_input {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        return Ok(Failure::from_json(&value));
    }

    if args.status.is_some() || args.code.is_some() {
        return Ok(Failure::Transport(TransportError {
            status: args.status,
            code: args.code.clone(),
            message: args.message.clone().unwrap_or_default(),
        }));
    }

    let message = args.message.clone();
    Ok(message.map_or(Failure::Absent, Failure::exception))
}

fn to_json(classified: &ClassifiedError) -> serde_json::Value {
    serde_json::json!({
        "reason": classified.reason(),
        "message_key": classified.message_key(),
        "http_status": classified.http_status(),
        "hint": classified.recovery_hint(),
    })
}

fn paint_reason(reason: ErrorReason, color: bool) -> String {
    if !color {
        return reason.to_string();
    }
    match reason.recovery_hint() {
        RecoveryHint::Retry => reason.yellow().to_string(),
        RecoveryHint::Reauthenticate => reason.magenta().to_string(),
        RecoveryHint::ShowFieldErrors | RecoveryHint::ShowMessage => reason.cyan().to_string(),
        RecoveryHint::Apologize => reason.red().to_string(),
    }
}

fn print_text(classified: &ClassifiedError, color: bool) {
    let reason = paint_reason(classified.reason(), color);
    println!("reason:      {}", reason);
    println!("message_key: {}", classified.message_key());
    match classified.http_status() {
        Some(status) => println!("status:      {}", status),
        None => println!("status:      -"),
    }
    println!("hint:        {}", classified.recovery_hint());
}

fn run_reasons(color: bool) {
    for reason in ErrorReason::ALL {
        let mut name = format!("{:<20}", reason.as_str());
        if color {
            name = name.bold().to_string();
        }
        let key = reason.default_message_key();
        println!("{} {:<28} {}", name, key, reason.recovery_hint());
    }
}
