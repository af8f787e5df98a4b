use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Coordinates outside the valid WGS84 ranges abort the single
    /// request that carried them. Latitudes are bound to ±90°,
    /// longitudes to ±180°.
    #[error("invalid coordinates: latitude {latitude_deg}°, longitude {longitude_deg}°")]
    InvalidCoordinates { latitude_deg: f64, longitude_deg: f64 },

    /// Every solve request must name the tracked target.
    #[error("empty target identity")]
    EmptyTargetId,

    /// Time windows are expressed in milliseconds and cannot be negative.
    #[error("invalid time window: {window_ms} ms")]
    InvalidWindow { window_ms: i64 },
}
