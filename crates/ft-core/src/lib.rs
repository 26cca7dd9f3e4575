//! ft-core: stable foundation for flowtime.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - geometry (circular restriction area <-> diameter)
//! - error (shared error types)

pub mod error;
pub mod geometry;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use geometry::{RestrictionGeometry, area_from_diameter, diameter_from_area};
pub use numeric::*;
pub use units::*;
