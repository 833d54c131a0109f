use std::fmt;
use std::str::FromStr;

use crate::conversion::error::ConversionError;

/// Converter priority. Higher values run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(i32);

impl Priority {
    pub const HIGHEST: Priority = Priority(100_000);
    pub const HIGH: Priority = Priority(1_000);
    pub const NORMAL: Priority = Priority(0);
    pub const LOW: Priority = Priority(-1_000);
    pub const LOWEST: Priority = Priority(-100_000);

    pub const fn new(value: i32) -> Self {
        Priority(value)
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::NORMAL
    }
}

impl FromStr for Priority {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "highest" => Ok(Priority::HIGHEST),
            "high" => Ok(Priority::HIGH),
            "normal" => Ok(Priority::NORMAL),
            "low" => Ok(Priority::LOW),
            "lowest" => Ok(Priority::LOWEST),
            other => other
                .parse::<i32>()
                .map(Priority)
                .map_err(|_| ConversionError::UnknownPriority { name: s.to_string() }),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Priority::HIGHEST => write!(f, "highest"),
            Priority::HIGH => write!(f, "high"),
            Priority::NORMAL => write!(f, "normal"),
            Priority::LOW => write!(f, "low"),
            Priority::LOWEST => write!(f, "lowest"),
            Priority(value) => write!(f, "{}", value),
        }
    }
}
