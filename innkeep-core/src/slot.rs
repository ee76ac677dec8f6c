use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DomainError, DomainResult};

/// Half-open reservation interval `[start, end)`. Two slots touching exactly
/// at a boundary do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeSlot {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<Self> {
        if start >= end {
            return Err(DomainError::InvalidInterval(
                "start date must be before end date".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Parse a slot from RFC 3339 date strings, as received on the wire.
    pub fn parse(start: &str, end: &str) -> DomainResult<Self> {
        let start = parse_datetime(start)?;
        let end = parse_datetime(end)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Strict-inequality overlap test. Both slots are already validated, so
    /// no re-check of `start < end` happens here.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

fn parse_datetime(value: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DomainError::InvalidInterval(format!("unparsable date: {}", value)))
}
