// src/gps/mod.rs
//! GPS data handling and parsing

pub mod coordinate;
pub mod data;
pub mod nmea;

pub use data::{Bounds, ParseStats, TrackPoint, TrackResult, TrackSummary};
