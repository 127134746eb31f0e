// src/export.rs
//! Track document and interchange format export

use crate::error::{GpsError, Result};
use crate::gps::data::TrackResult;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackFormat {
    /// Map document consumed by the map page, safe to embed in a `<script>` element
    Json,
    GeoJson,
    Gpx,
    Kml,
    Csv,
}

impl TrackFormat {
    pub fn extension(&self) -> &str {
        match self {
            TrackFormat::Json => "json",
            TrackFormat::GeoJson => "geojson",
            TrackFormat::Gpx => "gpx",
            TrackFormat::Kml => "kml",
            TrackFormat::Csv => "csv",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            TrackFormat::Json => "JSON (map document)",
            TrackFormat::GeoJson => "GeoJSON",
            TrackFormat::Gpx => "GPX (GPS Exchange)",
            TrackFormat::Kml => "KML (Keyhole)",
            TrackFormat::Csv => "CSV",
        }
    }
}

impl fmt::Display for TrackFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TrackFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(TrackFormat::Json),
            "geojson" => Ok(TrackFormat::GeoJson),
            "gpx" => Ok(TrackFormat::Gpx),
            "kml" => Ok(TrackFormat::Kml),
            "csv" => Ok(TrackFormat::Csv),
            other => Err(format!(
                "unknown format '{}', expected one of json, geojson, gpx, kml, csv",
                other
            )),
        }
    }
}

pub struct TrackExporter<'a> {
    track: &'a TrackResult,
}

impl<'a> TrackExporter<'a> {
    pub fn new(track: &'a TrackResult) -> Self {
        Self { track }
    }

    /// Render the track in `format`.
    ///
    /// The JSON map document is produced for empty tracks too, so the page can
    /// fall back to its default view. Every other format needs at least one point.
    pub fn export(&self, format: TrackFormat) -> Result<String> {
        if format != TrackFormat::Json {
            self.track.require_points()?;
        }

        match format {
            TrackFormat::Json => self.to_json(),
            TrackFormat::GeoJson => self.to_geojson(),
            TrackFormat::Gpx => Ok(self.to_gpx()),
            TrackFormat::Kml => Ok(self.to_kml()),
            TrackFormat::Csv => Ok(self.to_csv()),
        }
    }

    pub fn export_to_file(&self, path: &Path, format: TrackFormat) -> Result<()> {
        let content = self.export(format)?;

        let mut file = File::create(path).map_err(GpsError::Io)?;
        file.write_all(content.as_bytes()).map_err(GpsError::Io)?;

        Ok(())
    }

    fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string(self.track)?;
        Ok(Self::escape_script(&json))
    }

    fn to_geojson(&self) -> Result<String> {
        let points = self.track.points();
        let coordinates: Vec<[f64; 2]> = points
            .iter()
            .map(|p| [p.longitude(), p.latitude()])
            .collect();
        let times: Vec<&str> = points.iter().map(|p| p.time()).collect();

        // A LineString needs two positions
        let geometry = if coordinates.len() == 1 {
            serde_json::json!({ "type": "Point", "coordinates": coordinates[0] })
        } else {
            serde_json::json!({ "type": "LineString", "coordinates": coordinates })
        };

        let mut feature = serde_json::json!({
            "type": "Feature",
            "geometry": geometry,
            "properties": { "times": times }
        });
        if let Some(bounds) = self.track.bounds() {
            feature["bbox"] = serde_json::json!([
                bounds.min_lon,
                bounds.min_lat,
                bounds.max_lon,
                bounds.max_lat
            ]);
        }

        let feature_collection = serde_json::json!({
            "type": "FeatureCollection",
            "features": [feature]
        });

        serde_json::to_string_pretty(&feature_collection).map_err(GpsError::Json)
    }

    fn to_gpx(&self) -> String {
        let mut gpx = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="nmea-mapper" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <trkseg>
"#);

        for point in self.track.points() {
            gpx.push_str(&format!(
                "      <trkpt lat=\"{}\" lon=\"{}\"><name>{}</name></trkpt>\n",
                point.latitude(),
                point.longitude(),
                Self::escape_xml(point.time())
            ));
        }

        gpx.push_str("    </trkseg>\n  </trk>\n</gpx>\n");
        gpx
    }

    fn to_kml(&self) -> String {
        let mut kml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>NMEA Track</name>
    <Placemark>
      <LineString>
        <tessellate>1</tessellate>
        <coordinates>
"#);

        for point in self.track.points() {
            kml.push_str(&format!(
                "          {},{},0\n",
                point.longitude(),
                point.latitude()
            ));
        }

        kml.push_str("        </coordinates>\n      </LineString>\n    </Placemark>\n  </Document>\n</kml>\n");
        kml
    }

    fn to_csv(&self) -> String {
        let mut csv = String::from("time,latitude,longitude\n");

        for point in self.track.points() {
            csv.push_str(&format!(
                "{},{},{}\n",
                Self::escape_csv(point.time()),
                point.latitude(),
                point.longitude()
            ));
        }

        csv
    }

    /// Escape characters that could end a `<script>` element or confuse a JS parser.
    /// They can only occur inside JSON strings, where the `\u` form is equivalent.
    fn escape_script(json: &str) -> String {
        let mut escaped = String::with_capacity(json.len());
        for c in json.chars() {
            match c {
                '<' => escaped.push_str("\\u003c"),
                '>' => escaped.push_str("\\u003e"),
                '&' => escaped.push_str("\\u0026"),
                '\u{2028}' => escaped.push_str("\\u2028"),
                '\u{2029}' => escaped.push_str("\\u2029"),
                c => escaped.push(c),
            }
        }
        escaped
    }

    fn escape_xml(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;")
    }

    fn escape_csv(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gps::data::TrackPoint;

    fn sample_track() -> TrackResult {
        TrackResult::from_points(vec![
            TrackPoint::new("201530.000", 34.14, -118.15).unwrap(),
            TrackPoint::new("201531.000", 34.2, -118.1).unwrap(),
        ])
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("GeoJSON".parse::<TrackFormat>(), Ok(TrackFormat::GeoJson));
        assert_eq!("gpx".parse::<TrackFormat>(), Ok(TrackFormat::Gpx));
        assert!("shp".parse::<TrackFormat>().is_err());
        assert_eq!(TrackFormat::Kml.to_string(), "kml");
    }

    #[test]
    fn test_json_document() {
        let track = sample_track();
        let json = TrackExporter::new(&track).export(TrackFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["points"][0]["time"], "201530.000");
        assert_eq!(value["points"][0]["lat"], 34.14);
        assert_eq!(value["points"][1]["lon"], -118.1);
        assert_eq!(value["bounds"]["minLat"], 34.14);
        assert_eq!(value["bounds"]["maxLon"], -118.1);
    }

    #[test]
    fn test_json_empty_track() {
        let track = TrackResult::default();
        let json = TrackExporter::new(&track).export(TrackFormat::Json).unwrap();
        assert_eq!(json, r#"{"points":[]}"#);
    }

    #[test]
    fn test_json_is_script_safe() {
        let track = TrackResult::from_points(vec![
            TrackPoint::new("</script><b>&", 1.0, 1.0).unwrap(),
        ]);
        let json = TrackExporter::new(&track).export(TrackFormat::Json).unwrap();

        assert!(!json.contains('<'));
        assert!(!json.contains('>'));
        assert!(!json.contains('&'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["points"][0]["time"], "</script><b>&");
    }

    #[test]
    fn test_empty_track_rejected_for_files() {
        let track = TrackResult::default();
        let exporter = TrackExporter::new(&track);
        for format in [TrackFormat::GeoJson, TrackFormat::Gpx, TrackFormat::Kml, TrackFormat::Csv] {
            assert!(matches!(exporter.export(format), Err(GpsError::EmptyInput)));
        }
    }

    #[test]
    fn test_geojson_export() {
        let track = sample_track();
        let geojson = TrackExporter::new(&track).export(TrackFormat::GeoJson).unwrap();
        let value: serde_json::Value = serde_json::from_str(&geojson).unwrap();

        let feature = &value["features"][0];
        assert_eq!(feature["geometry"]["type"], "LineString");
        assert_eq!(feature["geometry"]["coordinates"][0][0], -118.15);
        assert_eq!(feature["geometry"]["coordinates"][0][1], 34.14);
        assert_eq!(feature["properties"]["times"][1], "201531.000");
        assert_eq!(feature["bbox"][0], -118.15);
    }

    #[test]
    fn test_geojson_single_point() {
        let track = TrackResult::from_points(vec![TrackPoint::new("1", 10.0, 20.0).unwrap()]);
        let geojson = TrackExporter::new(&track).export(TrackFormat::GeoJson).unwrap();
        let value: serde_json::Value = serde_json::from_str(&geojson).unwrap();
        assert_eq!(value["features"][0]["geometry"]["type"], "Point");
    }

    #[test]
    fn test_gpx_export() {
        let track = sample_track();
        let gpx = TrackExporter::new(&track).export(TrackFormat::Gpx).unwrap();

        assert!(gpx.contains("<gpx"));
        assert!(gpx.contains("<trkseg>"));
        assert!(gpx.contains(r#"<trkpt lat="34.14" lon="-118.15"><name>201530.000</name></trkpt>"#));
        assert_eq!(gpx.matches("<trkpt").count(), 2);
    }

    #[test]
    fn test_kml_export() {
        let track = sample_track();
        let kml = TrackExporter::new(&track).export(TrackFormat::Kml).unwrap();

        assert!(kml.contains("<LineString>"));
        assert!(kml.contains("-118.15,34.14,0"));
        assert!(kml.contains("-118.1,34.2,0"));
    }

    #[test]
    fn test_csv_export() {
        let track = sample_track();
        let csv = TrackExporter::new(&track).export(TrackFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "time,latitude,longitude");
        assert_eq!(lines[1], "201530.000,34.14,-118.15");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_export_to_file() {
        let track = sample_track();
        let path = std::env::temp_dir().join(format!("nmea-mapper-export-{}.csv", std::process::id()));

        TrackExporter::new(&track).export_to_file(&path, TrackFormat::Csv).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("time,latitude,longitude\n"));

        let _ = std::fs::remove_file(&path);
    }
}
