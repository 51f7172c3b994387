use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// The curve's derivative vanishes (or could not be shown to stay away
    /// from zero) near `parameter`.
    #[error("Degenerate curve near t={parameter}: {reason}")]
    DegenerateCurve { parameter: f64, reason: String },

    #[error("Invalid knot vector: {0}")]
    InvalidKnotVector(String),

    #[error("Arc length {value} is outside [0, {length}]")]
    OutOfRangeArcLength { value: f64, length: f64 },

    #[error("Curve parameter {value} is outside [0, 1]")]
    ParameterOutOfRange { value: f64 },

    #[error("Tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    #[error("Geometry error: {0}")]
    Geometry(String),
}

impl CurveError {
    pub fn degenerate(parameter: f64, reason: impl Into<String>) -> Self {
        Self::DegenerateCurve {
            parameter,
            reason: reason.into(),
        }
    }

    /// Whether a caller can sensibly fall back (e.g. treat the curve as a point)
    /// instead of fixing its input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DegenerateCurve { .. } | Self::OutOfRangeArcLength { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CurveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = CurveError::OutOfRangeArcLength {
            value: 5.0,
            length: 2.0,
        };
        assert_eq!(err.to_string(), "Arc length 5 is outside [0, 2]");

        let err = CurveError::InvalidKnotVector("knots decrease at index 3".into());
        assert_eq!(
            err.to_string(),
            "Invalid knot vector: knots decrease at index 3"
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(CurveError::degenerate(0.5, "zero speed").is_recoverable());
        assert!(!CurveError::InvalidKnotVector(String::new()).is_recoverable());
        assert!(!CurveError::InvalidTolerance(-1.0).is_recoverable());
    }
}
