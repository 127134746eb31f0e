// src/gps/nmea.rs
//! NMEA sentence tokenizing and per-sentence handlers

use super::coordinate::{self, Axis};

/// Position fix extracted from a single sentence
#[derive(Debug, Clone, PartialEq)]
pub struct Fix {
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Split raw log text into sentences.
///
/// Any mix of `\r` and `\n` separates lines; empty lines are dropped.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\r', '\n']).filter(|line| !line.is_empty())
}

/// Split a sentence into its comma-separated fields.
///
/// A trailing `*hh` checksum is cut off before splitting; it is not verified.
pub fn fields(sentence: &str) -> Vec<&str> {
    let body = sentence.split('*').next().unwrap_or(sentence);
    body.split(',').collect()
}

/// Extracts a position fix from one sentence type
pub trait SentenceHandler: Send + Sync {
    /// Line prefix this handler accepts, including the leading `$`
    fn prefix(&self) -> &str;

    /// Extract a fix from the sentence fields, or `None` if the sentence is malformed
    fn handle(&self, fields: &[&str]) -> Option<Fix>;
}

/// Recommended Minimum (RMC) sentence handler
#[derive(Debug, Clone)]
pub struct RmcHandler {
    prefix: String,
}

impl RmcHandler {
    /// Fields up to and including the longitude hemisphere
    pub const MIN_FIELDS: usize = 7;

    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }
}

impl Default for RmcHandler {
    fn default() -> Self {
        Self::new("$GPRMC")
    }
}

impl SentenceHandler for RmcHandler {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn handle(&self, fields: &[&str]) -> Option<Fix> {
        if fields.len() < Self::MIN_FIELDS {
            return None;
        }

        // Time (field 1), latitude (3, 4), longitude (5, 6)
        let latitude = coordinate::signed_degrees(fields[3], fields[4], Axis::Latitude)?;
        let longitude = coordinate::signed_degrees(fields[5], fields[6], Axis::Longitude)?;

        Some(Fix {
            time: fields[1].to_string(),
            latitude,
            longitude,
        })
    }
}

/// Set of sentence handlers keyed by prefix
pub struct SentenceRegistry {
    handlers: Vec<Box<dyn SentenceHandler>>,
}

impl SentenceRegistry {
    /// Create a registry without any handler
    pub fn empty() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register a handler, replacing any handler with the same prefix
    pub fn register<H: SentenceHandler + 'static>(&mut self, handler: H) {
        self.handlers.retain(|h| h.prefix() != handler.prefix());
        self.handlers.push(Box::new(handler));
    }

    pub fn with_handler<H: SentenceHandler + 'static>(mut self, handler: H) -> Self {
        self.register(handler);
        self
    }

    /// Find the handler for a line. The longest matching prefix wins.
    pub fn handler_for(&self, line: &str) -> Option<&dyn SentenceHandler> {
        self.handlers
            .iter()
            .filter(|h| line.starts_with(h.prefix()))
            .max_by_key(|h| h.prefix().len())
            .map(|h| &**h)
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(|h| h.prefix())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for SentenceRegistry {
    fn default() -> Self {
        Self::empty().with_handler(RmcHandler::default())
    }
}

impl std::fmt::Debug for SentenceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.prefixes()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GPRMC: &str = "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A";

    #[test]
    fn test_split_mixed_line_endings() {
        let text = "a\r\nb\rc\n\n\r\nd";
        let lines: Vec<&str> = split_lines(text).collect();
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_split_empty_text() {
        assert_eq!(split_lines("").count(), 0);
        assert_eq!(split_lines("\r\n\r\n").count(), 0);
    }

    #[test]
    fn test_fields_strip_checksum() {
        let parts = fields(GPRMC);
        assert_eq!(parts.len(), 12);
        assert_eq!(parts[0], "$GPRMC");
        assert_eq!(parts[11], "W");
    }

    #[test]
    fn test_gprmc_parsing() {
        let fix = RmcHandler::default().handle(&fields(GPRMC)).unwrap();

        assert_eq!(fix.time, "123519");
        assert!((fix.latitude - (48.0 + 7.038 / 60.0)).abs() < 1e-9);
        assert!((fix.longitude - (11.0 + 31.0 / 60.0)).abs() < 1e-9);
    }

    #[test]
    fn test_gprmc_southern_western() {
        let line = "$GPRMC,201530.000,A,3408.4500,S,11809.0000,W,0.0,0.0,010108,,*1C";
        let fix = RmcHandler::default().handle(&fields(line)).unwrap();

        assert_eq!(fix.time, "201530.000");
        assert!((fix.latitude + 34.140833333333).abs() < 1e-9);
        assert!((fix.longitude + 118.15).abs() < 1e-9);
    }

    #[test]
    fn test_gprmc_checksum_on_hemisphere_field() {
        // Truncated sentence whose checksum directly follows the longitude hemisphere
        let line = "$GPRMC,123519,A,4807.038,N,01131.000,E*3F";
        assert!(RmcHandler::default().handle(&fields(line)).is_some());
    }

    #[test]
    fn test_gprmc_too_few_fields() {
        let line = "$GPRMC,123519,A,4807.038,N,01131.000";
        assert_eq!(fields(line).len(), 6);
        assert!(RmcHandler::default().handle(&fields(line)).is_none());
    }

    #[test]
    fn test_gprmc_void_fix() {
        // Receiver without a fix leaves the position fields empty
        let line = "$GPRMC,000017.036,V,,,,,0.00,0.00,060180,,,N*4C";
        assert!(RmcHandler::default().handle(&fields(line)).is_none());
    }

    #[test]
    fn test_default_registry() {
        let registry = SentenceRegistry::default();
        assert_eq!(registry.len(), 1);
        assert!(registry.handler_for(GPRMC).is_some());
        assert!(registry.handler_for("$GNRMC,123519,A").is_none());
        assert!(registry
            .handler_for("$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47")
            .is_none());
        assert!(registry.handler_for("").is_none());
    }

    #[test]
    fn test_register_replaces_same_prefix() {
        let mut registry = SentenceRegistry::default();
        registry.register(RmcHandler::new("$GPRMC"));
        registry.register(RmcHandler::new("$GNRMC"));

        assert_eq!(registry.len(), 2);
        let prefix = registry.handler_for("$GNRMC,1").map(|h| h.prefix().to_string());
        assert_eq!(prefix.as_deref(), Some("$GNRMC"));
    }

    #[test]
    fn test_longest_prefix_wins() {
        let registry = SentenceRegistry::empty()
            .with_handler(RmcHandler::new("$GP"))
            .with_handler(RmcHandler::new("$GPRMC"));

        let handler = registry.handler_for(GPRMC).unwrap();
        assert_eq!(handler.prefix(), "$GPRMC");
        assert_eq!(registry.handler_for("$GPGGA").unwrap().prefix(), "$GP");
        assert!(SentenceRegistry::empty().is_empty());
    }
}
