use crate::error::ReassignError;
use std::str::FromStr;

/// Unified outcome of a reassignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StatusCode {
    Success = 0,
    /// Not observed to completion because no polling was requested
    Running = 1,
    Error = 2,
    /// Still running after the retry budget was spent
    Timeout = 3,
}

impl StatusCode {
    /// Numeric value, used as the process exit code
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Success => "success",
            StatusCode::Running => "running",
            StatusCode::Error => "error",
            StatusCode::Timeout => "timeout",
        }
    }

    /// Ordering used to pick the worst outcome of a run
    pub fn severity(&self) -> u8 {
        match self {
            StatusCode::Success => 0,
            StatusCode::Running => 1,
            StatusCode::Timeout => 2,
            StatusCode::Error => 3,
        }
    }

    pub fn worst(self, other: StatusCode) -> StatusCode {
        if other.severity() > self.severity() {
            other
        } else {
            self
        }
    }

    pub fn is_success(&self) -> bool {
        *self == StatusCode::Success
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two configured servers receives the resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    ToDestination,
    ToSource,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::ToDestination => "dest",
            Direction::ToSource => "src",
        }
    }

    /// Pick the server name this direction points at
    pub fn target<'a>(&self, source: &'a str, destination: &'a str) -> &'a str {
        match self {
            Direction::ToDestination => destination,
            Direction::ToSource => source,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ReassignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dest" => Ok(Direction::ToDestination),
            "src" => Ok(Direction::ToSource),
            other => Err(ReassignError::InvalidDirection(other.to_string())),
        }
    }
}
