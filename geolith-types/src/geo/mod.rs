//! Geodesy: reference ellipsoids and distances between geographic positions.
//!
//! All functions in this module expect coordinates in degrees, with `x` being longitude and `y` latitude.

mod datum;
mod distance;

pub use datum::{
    Datum, WGS84_FLATTENING, WGS84_INVERSE_FLATTENING, WGS84_SEMI_MAJOR_AXIS,
    WGS84_SEMI_MINOR_AXIS,
};
pub use distance::{
    great_circle_distance, haversine_distance, vincenty_distance, VINCENTY_MAX_ITERATIONS,
    VINCENTY_TOLERANCE,
};
