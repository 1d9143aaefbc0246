//! Time sources used to stamp notes at save time.
use std::cell::RefCell;
use std::collections::VecDeque;

use chrono::format::{Item, StrftimeItems};
use chrono::Local;

use crate::{JotError, Result};

/// Default strftime pattern: local time of day.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// Produces the human-readable timestamp written into a note on save.
pub trait Clock {
    fn timestamp(&self) -> String;
}

/// Wall clock in the local time zone.
#[derive(Debug, Clone)]
pub struct SystemClock {
    format: String,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }

    /// Uses a custom strftime pattern, e.g. `"%Y-%m-%d %H:%M:%S"`.
    ///
    /// Patterns chrono cannot render are rejected here rather than at save
    /// time.
    pub fn with_format(format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        validate_timestamp_format(&format)?;
        Ok(Self { format })
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn timestamp(&self) -> String {
        Local::now().format(&self.format).to_string()
    }
}

/// Checks that every item of a strftime pattern is one chrono understands.
pub fn validate_timestamp_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(JotError::InvalidTimestampFormat {
            format: format.to_string(),
        });
    }
    Ok(())
}

/// Deterministic clock for tests.
///
/// Hands out the queued timestamps in order, then keeps repeating the last
/// one.
#[derive(Debug)]
pub struct FixedClock {
    queue: RefCell<VecDeque<String>>,
    last: RefCell<String>,
}

impl FixedClock {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self::sequence([timestamp.into()])
    }

    pub fn sequence<I, T>(timestamps: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let queue: VecDeque<String> = timestamps.into_iter().map(Into::into).collect();
        Self {
            queue: RefCell::new(queue),
            last: RefCell::new(String::new()),
        }
    }
}

impl Clock for FixedClock {
    fn timestamp(&self) -> String {
        if let Some(next) = self.queue.borrow_mut().pop_front() {
            *self.last.borrow_mut() = next;
        }
        self.last.borrow().clone()
    }
}
