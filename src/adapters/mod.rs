#[cfg(feature = "cli")]
pub mod cli;
pub mod teos10;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
pub fn run() -> Result<(), crate::error::AppError> {
    use crate::adapters::cli::{Args, init_logging, parse_inputs};
    use crate::bulk::solver::compute_fluxes;

    let args = Args::parse();
    init_logging(&args);
    let (batch, config) = parse_inputs(&args)?;

    tracing::info!(
        samples = batch.len(),
        algorithm = %config.algorithm,
        n_iter = config.n_iter,
        radiation = batch.has_radiation(),
        "computing bulk fluxes"
    );
    let out = compute_fluxes(&batch, &config).inspect_err(|e| tracing::error!("{e}"))?;
    tracing::debug!(samples = out.len(), "fluxes computed");

    crate::adapters::cli::print_output(&out, &args)?;

    Ok(())
}
