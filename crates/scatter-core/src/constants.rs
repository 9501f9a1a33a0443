//! Physical and numerical constants used by the collision criteria.

/// Numerical-noise threshold for volumes, velocities and energy comparisons.
pub const REALLY_SMALL: f64 = 1.0e-6;

/// Conversion factor from millibarn to fm² (1 mb = 0.1 fm²).
pub const FM2_MB: f64 = 0.1;

/// Largest cross section (mb) any channel model is expected to return.
///
/// Bounds the geometric distance pre-filter.
pub const MAXIMUM_CROSS_SECTION: f64 = 200.0;

/// Widths (GeV) below this value mark a particle type as stable.
pub const WIDTH_CUTOFF: f64 = 1.0e-5;
