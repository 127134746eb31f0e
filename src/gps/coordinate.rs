// src/gps/coordinate.rs
//! Degrees/decimal-minutes (DMM) conversion and hemisphere handling

/// Which coordinate a DMM token encodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    /// Number of degree digits in a full-width token (`DDMM.MMMM` / `DDDMM.MMMM`)
    pub fn degree_digits(self) -> usize {
        match self {
            Axis::Latitude => 2,
            Axis::Longitude => 3,
        }
    }

    pub fn max_degrees(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Parse a hemisphere indicator valid for the given axis
    pub fn parse(token: &str, axis: Axis) -> Option<Self> {
        match (axis, token) {
            (Axis::Latitude, "N") => Some(Hemisphere::North),
            (Axis::Latitude, "S") => Some(Hemisphere::South),
            (Axis::Longitude, "E") => Some(Hemisphere::East),
            (Axis::Longitude, "W") => Some(Hemisphere::West),
            _ => None,
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            Hemisphere::North | Hemisphere::East => 1.0,
            Hemisphere::South | Hemisphere::West => -1.0,
        }
    }
}

/// Convert an unsigned DMM token into decimal degrees.
///
/// The last two whole digits are minutes, everything before them is degrees,
/// and any fractional part belongs to the minutes: `"3408.4500"` is
/// `34 + 8.45 / 60`. Returns `None` when the token is not `digits[.digits]`,
/// has more degree digits than the axis allows, carries minutes of 60 or
/// more, or lands outside the axis range.
pub fn dmm_to_decimal(token: &str, axis: Axis) -> Option<f64> {
    let (whole, fraction) = match token.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (token, None),
    };

    if whole.len() < 3 || whole.len() > axis.degree_digits() + 2 || !is_digits(whole) {
        return None;
    }
    if let Some(fraction) = fraction {
        if fraction.is_empty() || !is_digits(fraction) {
            return None;
        }
    }

    let minutes_start = whole.len() - 2;
    let degrees: f64 = whole[..minutes_start].parse().ok()?;
    let minutes: f64 = token[minutes_start..].parse().ok()?;
    if minutes >= 60.0 {
        return None;
    }

    let decimal = degrees + minutes / 60.0;
    if decimal > axis.max_degrees() {
        return None;
    }
    Some(decimal)
}

/// Convert a DMM token plus its hemisphere field into signed decimal degrees
pub fn signed_degrees(token: &str, hemisphere: &str, axis: Axis) -> Option<f64> {
    let hemisphere = Hemisphere::parse(hemisphere, axis)?;
    let decimal = dmm_to_decimal(token, axis)?;
    Some(hemisphere.sign() * decimal)
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}
