use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(
        "Shape mismatch: sequence #{position} has length {found}, expected {expected} ({mismatches} sequence(s) disagree)"
    )]
    ShapeMismatch {
        expected: usize,
        position: usize,
        found: usize,
        mismatches: usize,
    },

    #[error("Incomplete radiation input: rad_sw and rad_lw must be given together")]
    IncompleteRadiation,

    #[error("Unknown algorithm: {0}")]
    UnknownVariant(String),

    #[error("Algorithm 'Other' requires a caller-supplied closure")]
    MissingCustomClosure,

    #[cfg(feature = "cli")]
    #[error("Error reading from stdin: {source}")]
    ReadStdin {
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "cli")]
    #[error("Error reading file '{path}': {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "cli")]
    #[error("Invalid JSON for --batch-json: {source}")]
    ParseBatchJson {
        #[source]
        source: serde_json::Error,
    },

    #[cfg(feature = "cli")]
    #[error("Invalid JSON for --config-json: {source}")]
    ParseConfigJson {
        #[source]
        source: serde_json::Error,
    },

    #[cfg(feature = "cli")]
    #[error("Invalid JSON in input document: {source}")]
    ParseCmdInputJson {
        #[source]
        source: serde_json::Error,
    },

    #[cfg(feature = "cli")]
    #[error("Could not serialize output to JSON: {source}")]
    SerializeOutput {
        #[source]
        source: serde_json::Error,
    },

    #[cfg(feature = "cli")]
    #[error("Missing input data: provide --input or --batch-json")]
    MissingInputData,
}
