//! Sensor observation model
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One timestamped reception of the tracked signal by a ground sensor
/// at a known WGS84 location. All timestamps feeding a single solve must
/// share one clock; synchronization quality bounds solve accuracy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorObservation {
    /// Identity of the emitting sensor
    pub sensor_id: String,
    /// Identity of the tracked object (ICAO style aircraft address)
    pub target_id: String,
    /// Sensor latitude (degrees, WGS84)
    pub latitude_deg: f64,
    /// Sensor longitude (degrees, WGS84)
    pub longitude_deg: f64,
    /// Sensor altitude (meters), when the site survey provides one
    pub altitude_m: Option<f64>,
    /// Reception timestamp (nanoseconds)
    pub timestamp_ns: i64,
    /// Undecoded payload as received, carried through untouched
    pub raw_message: Option<String>,
}

impl SensorObservation {
    /// Builds a new [SensorObservation], validating the coordinates.
    pub fn new(
        sensor_id: &str,
        target_id: &str,
        latitude_deg: f64,
        longitude_deg: f64,
        timestamp_ns: i64,
    ) -> Result<Self, Error> {
        let obs = Self {
            sensor_id: sensor_id.to_string(),
            target_id: target_id.to_string(),
            latitude_deg,
            longitude_deg,
            altitude_m: None,
            timestamp_ns,
            raw_message: None,
        };
        obs.validate()?;
        Ok(obs)
    }

    /// Copies and returns [SensorObservation] with given altitude (meters)
    pub fn with_altitude_m(mut self, altitude_m: f64) -> Self {
        self.altitude_m = Some(altitude_m);
        self
    }

    /// Copies and returns [SensorObservation] with the raw payload attached
    pub fn with_raw_message(mut self, raw: &str) -> Self {
        self.raw_message = Some(raw.to_string());
        self
    }

    /// Verifies the coordinate invariant. Deserialized observations
    /// re-enter through this check at ingestion.
    pub fn validate(&self) -> Result<(), Error> {
        if !(-90.0..=90.0).contains(&self.latitude_deg)
            || !(-180.0..=180.0).contains(&self.longitude_deg)
            || !self.latitude_deg.is_finite()
            || !self.longitude_deg.is_finite()
        {
            return Err(Error::InvalidCoordinates {
                latitude_deg: self.latitude_deg,
                longitude_deg: self.longitude_deg,
            });
        }
        Ok(())
    }

    /// (latitude, longitude) in degrees
    pub(crate) fn coordinates_deg(&self) -> (f64, f64) {
        (self.latitude_deg, self.longitude_deg)
    }
}
