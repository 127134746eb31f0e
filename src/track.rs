// src/track.rs
//! Track extraction from raw NMEA logs

use crate::{
    error::{GpsError, Result},
    gps::{
        data::{Bounds, ParseStats, TrackPoint, TrackResult},
        nmea::{self, SentenceRegistry},
    },
};
use tracing::{debug, info, warn};

/// Parse a raw NMEA log with the default sentence handlers and no size cap.
///
/// Lines that are not recognized sentences, sentences with missing or
/// malformed fields and `(0, 0)` positions are skipped. Never fails.
pub fn parse_track(raw: &[u8]) -> TrackResult {
    TrackParser::new().scan(raw).0
}

/// Single-pass NMEA log parser
#[derive(Debug, Default)]
pub struct TrackParser {
    registry: SentenceRegistry,
    max_input_bytes: Option<usize>,
}

impl TrackParser {
    /// Create a parser accepting `$GPRMC` sentences without a size cap
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: SentenceRegistry) -> Self {
        Self {
            registry,
            max_input_bytes: None,
        }
    }

    /// Reject inputs larger than `limit` bytes before scanning them
    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = Some(limit);
        self
    }

    pub fn max_input_bytes(&self) -> Option<usize> {
        self.max_input_bytes
    }

    pub fn registry(&self) -> &SentenceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SentenceRegistry {
        &mut self.registry
    }

    /// Parse a raw log into a track
    pub fn parse(&self, raw: &[u8]) -> Result<TrackResult> {
        self.parse_with_stats(raw).map(|(track, _)| track)
    }

    /// Parse a raw log and report what was skipped along the way
    pub fn parse_with_stats(&self, raw: &[u8]) -> Result<(TrackResult, ParseStats)> {
        if let Some(limit) = self.max_input_bytes {
            if raw.len() > limit {
                warn!(size = raw.len(), limit, "Input exceeds size limit, not parsing");
                return Err(GpsError::InputTooLarge {
                    size: raw.len(),
                    limit,
                });
            }
        }
        Ok(self.scan(raw))
    }

    fn scan(&self, raw: &[u8]) -> (TrackResult, ParseStats) {
        let text = String::from_utf8_lossy(raw);
        let mut stats = ParseStats::default();
        let mut points = Vec::new();
        let mut bounds: Option<Bounds> = None;

        for (index, line) in nmea::split_lines(&text).enumerate() {
            stats.lines += 1;

            let Some(handler) = self.registry.handler_for(line) else {
                continue;
            };
            stats.sentences += 1;

            let Some(fix) = handler.handle(&nmea::fields(line)) else {
                stats.malformed += 1;
                debug!(line = index + 1, "Skipping malformed {} sentence", handler.prefix());
                continue;
            };

            let Some(point) = TrackPoint::new(fix.time, fix.latitude, fix.longitude) else {
                stats.degenerate += 1;
                debug!(line = index + 1, "Skipping position at the origin");
                continue;
            };

            match bounds.as_mut() {
                Some(bounds) => bounds.extend(&point),
                None => bounds = Some(Bounds::from_point(&point)),
            }
            points.push(point);
        }

        stats.accepted = points.len();
        info!(
            lines = stats.lines,
            sentences = stats.sentences,
            malformed = stats.malformed,
            degenerate = stats.degenerate,
            accepted = stats.accepted,
            "Parsed NMEA log"
        );
        if points.is_empty() {
            warn!("No track points found in input");
        }

        (TrackResult::new(points, bounds), stats)
    }
}
