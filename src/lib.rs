pub mod adapters;
pub mod bulk;
pub mod error;
pub mod models;
pub mod thermo;
pub mod validate;

pub use crate::bulk::algorithm::{Algorithm, BulkClosure, algorithm_name, closure_for};
pub use crate::bulk::solver::{
    compute_fluxes, compute_fluxes_with, model, model_with, model_with_radiation,
    model_with_radiation_with, solve_sample,
};
pub use crate::error::AppError;
pub use crate::models::{DEFAULT_N_ITER, FluxConfig, FluxResult, Heights, MeteoBatch};
pub use crate::thermo::lvap;
pub use crate::validate::{check_sizes, size_status};
