// src/lib.rs
//! NMEA Mapper Library
//!
//! Turns GPS logs recorded as NMEA 0183 sentences into ordered track points
//! with a bounding box, ready to be drawn as a path on a map.

pub mod config;
pub mod error;
pub mod export;
pub mod gps;
pub mod track;
pub mod view;

// Re-export main types for convenience
pub use config::MapperConfig;
pub use error::{GpsError, Result};
pub use export::{TrackExporter, TrackFormat};
pub use gps::{Bounds, ParseStats, TrackPoint, TrackResult, TrackSummary};
pub use track::{parse_track, TrackParser};
pub use view::MapView;
