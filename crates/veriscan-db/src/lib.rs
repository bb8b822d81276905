//! Postgres persistence for detection records.

mod detections;

pub use detections::{DailyCount, DetectionRepository};
