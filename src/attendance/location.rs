use crate::attendance::record::Location;
use crate::error::LocationError;
use serde::Deserialize;

const ERROR_MARKER: &str = "error";

/// A location result as delivered by the browser. Either the structured
/// geolocation payload or the legacy single-string channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LocationReading {
    Coordinates {
        latitude: Option<f64>,
        longitude: Option<f64>,
    },
    Text(String),
}

impl LocationReading {
    #[cfg(test)]
    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        LocationReading::Coordinates {
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }
}

pub fn is_ready(reading: Option<&LocationReading>) -> bool {
    resolve(reading).is_ok()
}

/// Turns a reading into the typed location stored on a record.
pub fn resolve(reading: Option<&LocationReading>) -> Result<Location, LocationError> {
    match reading {
        None => Err(LocationError::NotResolved),
        Some(LocationReading::Coordinates {
            latitude,
            longitude,
        }) => match (latitude, longitude) {
            (Some(lat), Some(lon)) => coordinates(*lat, *lon),
            (None, None) => Err(LocationError::NotResolved),
            _ => Err(LocationError::Incomplete),
        },
        Some(LocationReading::Text(text)) => resolve_text(text),
    }
}

/// Text readings are stored exactly as delivered once they pass the checks.
fn resolve_text(raw: &str) -> Result<Location, LocationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(LocationError::NotResolved);
    }

    if let Some(message) = provider_error(text) {
        return Err(LocationError::Provider(message.to_string()));
    }

    if let Some((lat, lon)) = text.split_once(',') {
        if let (Ok(lat), Ok(lon)) = (lat.trim().parse::<f64>(), lon.trim().parse::<f64>()) {
            coordinates(lat, lon)?;
        }
    }

    Ok(Location::FreeText(raw.to_string()))
}

/// `Error` on its own or `Error: <message>`, any case.
fn provider_error(text: &str) -> Option<&str> {
    let marker_len = ERROR_MARKER.len();
    let prefix = text.get(..marker_len)?;
    if !prefix.eq_ignore_ascii_case(ERROR_MARKER) {
        return None;
    }

    let rest = text[marker_len..].trim_start();
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix(':').map(str::trim)
    }
}

fn coordinates(latitude: f64, longitude: f64) -> Result<Location, LocationError> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(LocationError::NonFinite);
    }
    Ok(Location::Coordinates {
        latitude,
        longitude,
    })
}
