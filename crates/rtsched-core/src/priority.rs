use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SchedulerError;

/// Scheduling priority of a task.
/// Higher numerical values are scheduled sooner. Any integer is valid,
/// including zero and negative values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(i64);

impl Priority {
    /// Create a new priority value
    pub fn new(value: i64) -> Self {
        Priority(value)
    }

    /// Get the raw priority value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Priority {
    fn from(value: i64) -> Self {
        Priority(value)
    }
}

impl From<Priority> for i64 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

/// Ordering applied among tasks of equal priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Newest task of an equal-priority group runs first.
    #[default]
    Lifo,
    /// Oldest task of an equal-priority group runs first.
    Fifo,
}

impl TieBreak {
    pub fn as_str(&self) -> &'static str {
        match self {
            TieBreak::Lifo => "lifo",
            TieBreak::Fifo => "fifo",
        }
    }
}

impl fmt::Display for TieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TieBreak {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lifo" => Ok(TieBreak::Lifo),
            "fifo" => Ok(TieBreak::Fifo),
            _ => Err(SchedulerError::InvalidTieBreak(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::new(2) > Priority::new(1));
        assert!(Priority::new(0) > Priority::new(-5));
        assert!(Priority::new(i64::MAX) > Priority::new(i64::MIN));
        assert_eq!(Priority::default(), Priority::new(0));
    }

    #[test]
    fn test_priority_conversions() {
        let p: Priority = (-7).into();
        assert_eq!(p.value(), -7);
        assert_eq!(i64::from(p), -7);
        assert_eq!(p.to_string(), "-7");
    }

    #[test]
    fn test_tie_break_parse() {
        assert_eq!("lifo".parse::<TieBreak>().unwrap(), TieBreak::Lifo);
        assert_eq!(" FIFO ".parse::<TieBreak>().unwrap(), TieBreak::Fifo);
        assert!(matches!(
            "random".parse::<TieBreak>(),
            Err(SchedulerError::InvalidTieBreak(s)) if s == "random"
        ));
    }

    #[test]
    fn test_tie_break_default_is_lifo() {
        assert_eq!(TieBreak::default(), TieBreak::Lifo);
        assert_eq!(TieBreak::Fifo.to_string(), "fifo");
    }
}
