// src/view.rs
//! Map view (center and zoom) for a parsed track

use crate::{config::MapperConfig, gps::data::{Bounds, TrackResult}};
use serde::Serialize;
use std::f64::consts::PI;

const TILE_SIZE: f64 = 256.0;
/// Latitude limit of the Web Mercator projection
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

impl MapView {
    /// Configured fallback view for logs without a track
    pub fn default_view(config: &MapperConfig) -> Self {
        Self {
            latitude: config.default_latitude,
            longitude: config.default_longitude,
            zoom: config.default_zoom,
        }
    }

    pub fn for_track(track: &TrackResult, config: &MapperConfig) -> Self {
        match track.bounds() {
            Some(bounds) => Self::fit(&bounds, config),
            None => Self::default_view(config),
        }
    }

    /// Center on `bounds` at the highest zoom where it fits the viewport
    pub fn fit(bounds: &Bounds, config: &MapperConfig) -> Self {
        let (latitude, longitude) = bounds.center();
        let zoom = (0..=config.max_zoom)
            .rev()
            .find(|&zoom| {
                fits(
                    bounds,
                    zoom,
                    config.viewport_width as f64,
                    config.viewport_height as f64,
                )
            })
            .unwrap_or(0);

        Self {
            latitude,
            longitude,
            zoom,
        }
    }
}

/// Position in global pixel coordinates at the given zoom
fn world_pixel(lat: f64, lon: f64, zoom: u8) -> (f64, f64) {
    let scale = TILE_SIZE * 2_f64.powi(zoom as i32);
    let x = (lon + 180.0) / 360.0 * scale;
    let lat_rad = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * scale;
    (x, y)
}

fn fits(bounds: &Bounds, zoom: u8, width: f64, height: f64) -> bool {
    let (west, north) = world_pixel(bounds.max_lat, bounds.min_lon, zoom);
    let (east, south) = world_pixel(bounds.min_lat, bounds.max_lon, zoom);
    east - west <= width && south - north <= height
}
