/// Speed of light in vacuum, in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// WGS84 ellipsoid semi-major axis (meters)
pub const WGS84_SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0_f64;

/// WGS84 ellipsoid flattening
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// WGS84 mean Earth radius (meters)
pub const WGS84_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// Nanoseconds per millisecond
pub const NANOS_PER_MS: i64 = 1_000_000;

/// Nanoseconds per second
pub const NANOS_PER_S: f64 = 1.0E9;
