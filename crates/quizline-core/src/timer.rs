//! Countdown display: clock text and severity band.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How urgent the remaining time is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

impl Severity {
    /// `Normal` from two minutes up, `Warning` from one minute, `Critical` below.
    pub fn from_remaining(seconds: u32) -> Self {
        if seconds < 60 {
            Severity::Critical
        } else if seconds < 120 {
            Severity::Warning
        } else {
            Severity::Normal
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Normal => write!(f, "normal"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Everything needed to render the countdown for a given second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerDisplay {
    pub text: String,
    pub severity: Severity,
}

impl TimerDisplay {
    pub fn new(seconds: u32) -> Self {
        Self {
            text: format_clock(seconds),
            severity: Severity::from_remaining(seconds),
        }
    }
}

/// Format seconds as `M:SS`.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Format elapsed seconds as `Xm Ys`.
pub fn format_time_spent(seconds: u32) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}
