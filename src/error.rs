use thiserror::Error;

/// Top-level error type for the solidus mesh builders.
#[derive(Debug, Error)]
pub enum SolidusError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

/// Input rejected before any geometry is computed.
#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("empty interval: start {start} must be below end {end}")]
    EmptyInterval { start: f64, end: f64 },

    #[error("interval bound {0} is not finite")]
    NonFiniteBound(f64),

    #[error("slice count must be at least 1")]
    NoSlices,

    #[error("profile needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    #[error("profile point {0} has a non-finite coordinate")]
    NonFinitePoint(usize),

    #[error("profile points {first} and {second} coincide")]
    CoincidentPoints { first: usize, second: usize },

    #[error("profile encloses no area")]
    DegenerateProfile,

    #[error("cap fanned from profile point 0 is flat or folds back at point {0}")]
    FoldedCap(usize),

    #[error("radial interval starts at negative radius {0}")]
    NegativeRadius(f64),

    #[error("{what} must be positive, got {value}")]
    NonPositiveSize { what: &'static str, value: f64 },

    #[error("clearance {clearance} must be finite, non-negative and below the step {step}")]
    InvalidClearance { clearance: f64, step: f64 },

    #[error("need at least {min} angular segments, got {got}")]
    TooFewSegments { min: usize, got: usize },

    #[error("split point {0} is not strictly inside the interval or not increasing")]
    InvalidSplit(f64),

    #[error("mesh would need {0} vertices, more than a u32 index can address")]
    TooManyVertices(usize),

    #[error("index {index} does not name one of {vertex_count} vertices")]
    DanglingIndex { index: u32, vertex_count: usize },
}

/// A caller-supplied function produced an unusable value.
#[derive(Debug, Error, PartialEq)]
pub enum EvaluationError {
    #[error("{function}({parameter}) evaluated to non-finite {value}")]
    NonFinite {
        function: &'static str,
        parameter: f64,
        value: f64,
    },
}

/// Errors raised while staging meshes for the host.
#[derive(Debug, Error, PartialEq)]
pub enum AssemblyError {
    #[error("scene object '{0}' has no geometry")]
    EmptyMesh(String),

    #[error("scene object '{name}' references vertex {index} but has only {vertex_count}")]
    IndexOutOfRange {
        name: String,
        index: u32,
        vertex_count: usize,
    },

    #[error("magnet pockets are not supported on split revolutions")]
    SplitMagnetUnsupported,

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("host rejected '{name}': {reason}")]
    Host { name: String, reason: String },
}

/// Convenience type alias for results using [`SolidusError`].
pub type Result<T> = std::result::Result<T, SolidusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_is_transparent() {
        let err: SolidusError = DomainError::NoSlices.into();
        assert_eq!(err.to_string(), "slice count must be at least 1");
    }

    #[test]
    fn evaluation_error_names_parameter() {
        let err = EvaluationError::NonFinite {
            function: "radius",
            parameter: 2.5,
            value: f64::NAN,
        };
        let text = err.to_string();
        assert!(text.contains("radius(2.5)"));
        assert!(text.contains("NaN"));
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SolidusError>();
    }
}
