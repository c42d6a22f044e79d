//! Error types for the simulation core and its configuration layer

use std::fmt;

use crate::sim::BodyId;

/// Precondition violations detected by the simulation core
#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    /// A polygon needs at least three vertices
    TooFewPoints { count: usize },
    /// Collinear or coincident vertices (area is zero or not finite)
    DegeneratePolygon { area: f64 },
    /// Mass must be positive (infinity allowed for immovable bodies)
    InvalidMass { mass: f64 },
    /// Rotational inertia must be positive (infinity allowed for unrotatable bodies)
    InvalidInertia { inertia: f64 },
    /// The id does not name a body in this scene
    UnknownBody { id: BodyId },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPoints { count } => {
                write!(f, "polygon needs at least 3 points, got {count}")
            }
            Self::DegeneratePolygon { area } => {
                write!(f, "degenerate polygon: area {area}")
            }
            Self::InvalidMass { mass } => {
                write!(f, "invalid mass {mass} (must be > 0 or +inf)")
            }
            Self::InvalidInertia { inertia } => {
                write!(f, "invalid rotational inertia {inertia} (must be > 0 or +inf)")
            }
            Self::UnknownBody { id } => write!(f, "no body with id {id} in scene"),
        }
    }
}

impl std::error::Error for SimError {}

/// Failures while loading or saving a config file
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "config io error: {e}"),
            Self::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimError::TooFewPoints { count: 2 };
        assert_eq!(err.to_string(), "polygon needs at least 3 points, got 2");

        let err = SimError::UnknownBody { id: BodyId(7) };
        assert_eq!(err.to_string(), "no body with id 7 in scene");
    }

    #[test]
    fn test_config_error_from_parse() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ConfigError = parse.into();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
