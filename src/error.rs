//! Error types for spawn placement, session setup and configuration

use core::fmt;

/// Spawn placement could not find a point far enough from the excluded one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementError {
    pub attempts: u32,
    pub min_distance: f32,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no spawn point at distance >= {:.1} after {} attempts",
            self.min_distance, self.attempts
        )
    }
}

impl std::error::Error for PlacementError {}

/// Direction requested between two coincident points.
///
/// Never leaves the simulation: callers skip movement for the tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DegenerateVector;

impl fmt::Display for DegenerateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "direction between coincident points is undefined")
    }
}

impl std::error::Error for DegenerateVector {}

#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    Placement(PlacementError),
    InvalidBounds {
        width: f32,
        height: f32,
        box_size: f32,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placement(err) => write!(f, "spawn placement failed: {err}"),
            Self::InvalidBounds {
                width,
                height,
                box_size,
            } => write!(
                f,
                "canvas {width}x{height} cannot hold a {box_size}px box"
            ),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Placement(err) => Some(err),
            Self::InvalidBounds { .. } => None,
        }
    }
}

impl From<PlacementError> for SimError {
    fn from(err: PlacementError) -> Self {
        Self::Placement(err)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "cannot read config: {err}"),
            Self::Parse(err) => write!(f, "malformed config: {err}"),
            Self::Invalid(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn placement_error_is_the_source_of_sim_error() {
        let err: SimError = PlacementError {
            attempts: 10,
            min_distance: 200.0,
        }
        .into();
        assert!(err.source().is_some());
        assert!(err.to_string().contains("10 attempts"));
    }

    #[test]
    fn invalid_bounds_message_names_the_canvas() {
        let err = SimError::InvalidBounds {
            width: 40.0,
            height: 300.0,
            box_size: 50.0,
        };
        assert_eq!(err.to_string(), "canvas 40x300 cannot hold a 50px box");
    }
}
