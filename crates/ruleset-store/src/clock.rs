use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.6f";

/// A backup timestamp: wall-clock microseconds plus a logical counter that
/// separates stamps taken within the same microsecond.
///
/// Rendered as `YYYYMMDDTHHMMSS.ffffffZ`, with `-N` appended when the logical
/// counter is non-zero. Ordering is `micros` then `logical`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BackupStamp {
    /// Microseconds since the UNIX epoch.
    pub micros: u64,
    /// Tie-breaker for stamps within the same microsecond.
    pub logical: u32,
}

impl BackupStamp {
    pub fn new(micros: u64, logical: u32) -> Self {
        Self { micros, logical }
    }

    /// Parse the rendered form back into a stamp.
    pub fn parse(s: &str) -> Option<Self> {
        let (base, logical) = match s.split_once('-') {
            Some((base, logical)) => (base, logical.parse().ok()?),
            None => (s, 0),
        };
        let base = base.strip_suffix('Z')?;
        let time = NaiveDateTime::parse_from_str(base, STAMP_FORMAT).ok()?;
        let micros = u64::try_from(time.and_utc().timestamp_micros()).ok()?;
        Some(Self { micros, logical })
    }
}

impl fmt::Display for BackupStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = (self.micros / 1_000_000) as i64;
        let nanos = (self.micros % 1_000_000) as u32 * 1_000;
        match DateTime::<Utc>::from_timestamp(secs, nanos) {
            Some(time) => write!(f, "{}Z", time.format(STAMP_FORMAT))?,
            None => write!(f, "{}", self.micros)?,
        }
        if self.logical > 0 {
            write!(f, "-{}", self.logical)?;
        }
        Ok(())
    }
}

struct ClockState {
    micros: u64,
    logical: u32,
}

/// Monotonic source of [`BackupStamp`]s.
///
/// Follows the local-event rule of a hybrid logical clock: the physical part
/// is `max(wall_clock, last)`; if it did not advance, the logical counter is
/// incremented. Every stamp returned is strictly greater than the previous
/// one, even if the wall clock stalls or steps backwards.
pub struct BackupClock {
    state: Mutex<ClockState>,
}

static PROCESS_CLOCK: BackupClock = BackupClock::new();

impl BackupClock {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(ClockState {
                micros: 0,
                logical: 0,
            }),
        }
    }

    /// The clock shared by every writer in this process.
    pub fn process() -> &'static BackupClock {
        &PROCESS_CLOCK
    }

    /// Produce the next stamp.
    pub fn now(&self) -> BackupStamp {
        self.tick(Self::wall_clock_micros())
    }

    fn tick(&self, wall: u64) -> BackupStamp {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let micros = wall.max(state.micros);
        // Wall clock advanced; reset the logical counter.
        let logical = if micros > state.micros {
            0
        } else {
            state.logical + 1
        };

        state.micros = micros;
        state.logical = logical;
        BackupStamp::new(micros, logical)
    }

    fn wall_clock_micros() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros() as u64
    }
}

impl Default for BackupClock {
    fn default() -> Self {
        Self::new()
    }
}
