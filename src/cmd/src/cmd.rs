use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};

use kreg_trace::init::{prepare_tracing, TraceConfig};

use crate::{add::AddCmd, contexts::ContextsCmd};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cmd {
    #[arg(
        short,
        long,
        global = true,
        required = false,
        default_value = "info",
        value_parser = parse_level,
        help = "Log level(trace, debug, info, warn, error)"
    )]
    pub level: String,

    #[arg(
        value_enum,
        short = 'd',
        long,
        global = true,
        required = false,
        default_value = "plain",
        help = "Log display format"
    )]
    pub format: Format,

    #[arg(long = "log-file", global = true, help = "Log output file path")]
    pub log_file: Option<String>,

    #[clap(subcommand)]
    pub sub: SubCmd,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Format {
    Plain,
    Json,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Plain => write!(f, "plain"),
            Format::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum SubCmd {
    /// Print the contexts of the kubeconfig
    Contexts(ContextsCmd),
    /// Build the cluster descriptor of a kubeconfig context
    Add(AddCmd),
    Version,
}

fn parse_level(s: &str) -> Result<String, String> {
    tracing::level_filters::LevelFilter::from_str(s)
        .map(|_| s.to_string())
        .map_err(|e| e.to_string())
}

pub fn run() {
    let command = Cmd::parse();

    let trace_conf = TraceConfig {
        level: command.level,
        format: command.format.to_string(),
        file: command.log_file,
    };
    // No subscriber is installed yet, so report on stderr directly.
    if let Err(e) = prepare_tracing(trace_conf) {
        eprintln!("failed to prepare tracing: {e}");
        std::process::exit(1);
    }

    match command.sub {
        SubCmd::Version => println!("{}", env!("CARGO_PKG_VERSION")),
        SubCmd::Contexts(c) => crate::contexts::run(c),
        SubCmd::Add(a) => crate::add::run(a),
    }
}
