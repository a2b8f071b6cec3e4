use clap::Parser;
use std::fs;
use std::io::{self, Read};
use tracing::Level;

use crate::bulk::algorithm::Algorithm;
use crate::error::AppError;
use crate::models::{FluxConfig, FluxResult, MeteoBatch};

#[derive(Parser, Debug)]
#[command(author, version, about = "Bulk air-sea flux calculator with optional JSON output", long_about = None)]
pub struct Args {
    #[arg(long)]
    json: bool,
    #[arg(
        long,
        value_name = "FILE",
        help = "JSON file with a batch and optional config; '-' reads from stdin"
    )]
    input: Option<String>,
    #[arg(
        long,
        value_name = "JSON",
        help = "Inline JSON for the meteorological batch (overrides --input)"
    )]
    batch_json: Option<String>,
    #[arg(
        long,
        value_name = "JSON",
        help = "Inline JSON for the flux config (optional, supplements --batch-json)"
    )]
    config_json: Option<String>,
    #[arg(
        long,
        value_name = "NAME",
        help = "Algorithm override: coare, coare35, ncar, ecmwf (other is rejected, it needs a closure supplied from Rust)"
    )]
    algorithm: Option<String>,
    #[arg(long, value_name = "N", help = "Iteration count override")]
    n_iter: Option<usize>,
    #[arg(
        long,
        default_value = "warn",
        help = "Log level on stderr (trace, debug, info, warn, error)"
    )]
    log_level: String,
}

pub fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn parse_inline_inputs(
    batch_json: &str,
    config_json: Option<&String>,
) -> Result<(MeteoBatch, FluxConfig), AppError> {
    let batch: MeteoBatch =
        serde_json::from_str(batch_json).map_err(|source| AppError::ParseBatchJson { source })?;

    let config = match config_json {
        Some(s) => serde_json::from_str::<FluxConfig>(s)
            .map_err(|source| AppError::ParseConfigJson { source })?,
        None => FluxConfig::default(),
    };

    Ok((batch, config))
}

fn parse_cmd_input_doc(doc: &str) -> Result<(MeteoBatch, FluxConfig), AppError> {
    let parsed: CmdInput =
        serde_json::from_str(doc).map_err(|source| AppError::ParseCmdInputJson { source })?;
    Ok((parsed.batch, parsed.config.unwrap_or_default()))
}

fn apply_overrides(mut config: FluxConfig, args: &Args) -> Result<FluxConfig, AppError> {
    if let Some(name) = &args.algorithm {
        config.algorithm = name.parse::<Algorithm>()?;
    }
    if let Some(n_iter) = args.n_iter {
        config.n_iter = n_iter;
    }
    Ok(config)
}

pub fn parse_inputs(args: &Args) -> Result<(MeteoBatch, FluxConfig), AppError> {
    let (batch, config) = match (&args.batch_json, &args.input) {
        (Some(batch_json), _) => parse_inline_inputs(batch_json, args.config_json.as_ref())?,
        (None, Some(path)) if path == "-" => {
            let mut s = String::new();
            io::stdin()
                .read_to_string(&mut s)
                .map_err(|source| AppError::ReadStdin { source })?;
            parse_cmd_input_doc(&s)?
        }
        (None, Some(path)) => {
            let s = fs::read_to_string(path).map_err(|source| AppError::ReadFile {
                path: path.clone(),
                source,
            })?;
            parse_cmd_input_doc(&s)?
        }
        (None, None) => return Err(AppError::MissingInputData),
    };
    Ok((batch, apply_overrides(config, args)?))
}

#[derive(serde::Deserialize)]
struct CmdInput {
    batch: MeteoBatch,
    #[serde(default)]
    config: Option<FluxConfig>,
}

pub fn print_output(out: &FluxResult, args: &Args) -> Result<(), AppError> {
    if args.json {
        let s = serde_json::to_string_pretty(&out)
            .map_err(|source| AppError::SerializeOutput { source })?;
        println!("{}", s);
    } else {
        for i in 0..out.len() {
            print!(
                "#{i}: QL {:.2} W/m^2  QH {:.2} W/m^2  Tau ({:.4}, {:.4}) N/m^2",
                out.ql[i], out.qh[i], out.tau_x[i], out.tau_y[i]
            );
            match &out.t_s {
                Some(t_s) => println!("  T_s {:.3} K", t_s[i]),
                None => println!(),
            }
        }
    }

    Ok(())
}
