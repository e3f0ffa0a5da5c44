//! Injectable time and UETR sources.
//!
//! The pacs.008 assembler stamps the generation instant and a fresh UETR
//! into each document. Both come through these traits so that identical
//! inputs plus identical injected sources yield byte-identical output.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant, for reproducible output.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Source of unique end-to-end transaction references.
pub trait UetrSource {
    fn next_uetr(&self) -> String;
}

/// Random RFC 4122 v4 UETRs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUetr;

impl UetrSource for RandomUetr {
    fn next_uetr(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// A fixed UETR value, for reproducible output.
#[derive(Debug, Clone)]
pub struct FixedUetr(pub String);

impl UetrSource for FixedUetr {
    fn next_uetr(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_returns_pinned_instant() {
        let instant = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(FixedClock(instant).now(), instant);
    }

    #[test]
    fn test_random_uetr_is_unique() {
        let source = RandomUetr;
        assert_ne!(source.next_uetr(), source.next_uetr());
    }

    #[test]
    fn test_fixed_uetr_repeats() {
        let source = FixedUetr("97ed4827-7b6f-4491-a06f-b548d5a7512d".to_string());
        assert_eq!(source.next_uetr(), source.next_uetr());
    }
}
