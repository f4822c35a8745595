//! Wall-clock timing captured around a dispatched request

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timing information attached to every response envelope
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Timing {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,

    /// Elapsed milliseconds between `start` and `end`
    pub total: f64,
}

/// Captures the dispatch instant and produces a [`Timing`] when stopped
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: DateTime<Utc>,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Utc::now(),
        }
    }

    pub fn stop(self) -> Timing {
        let end = Utc::now();
        let elapsed = end - self.started;
        let total = match elapsed.num_microseconds() {
            Some(us) => us as f64 / 1_000.0,
            // i64 microseconds overflow, fall back to millisecond precision
            None => elapsed.num_milliseconds() as f64,
        };
        Timing {
            start: self.started,
            end,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopwatch_produces_consistent_timing() {
        let watch = Stopwatch::start();
        let timing = watch.stop();

        assert!(timing.end >= timing.start);
        assert!(timing.total >= 0.0);
    }

    #[test]
    fn test_timing_serializes_to_rfc3339_and_millis() {
        let start = "2024-03-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let end = "2024-03-01T10:00:01Z".parse::<DateTime<Utc>>().unwrap();
        let timing = Timing {
            start,
            end,
            total: 1000.0,
        };

        let json = serde_json::to_value(&timing).unwrap();
        assert_eq!(json["total"], 1000.0);
        assert!(json["start"].as_str().unwrap().starts_with("2024-03-01T10:00:00"));
    }
}
