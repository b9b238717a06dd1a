use thiserror::Error;

/// Top-level error type for the skyline footprint engine.
#[derive(Debug, Error)]
pub enum SkylineError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Footprint(#[from] FootprintError),
}

/// Errors raised while building or validating spherical geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors raised by set operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("{operation} needs at least one operand")]
    EmptyInputSet { operation: &'static str },

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Errors raised while turning image extensions into footprints.
#[derive(Debug, Error)]
pub enum FootprintError {
    #[error("image {image_id} has no extension matching {extname:?}")]
    NoMatchingExtensions { image_id: String, extname: String },

    #[error("footprint source failed for image {image_id}")]
    Source {
        image_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Convenience type alias for results using [`SkylineError`].
pub type Result<T> = std::result::Result<T, SkylineError>;
