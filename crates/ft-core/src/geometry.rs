//! Circular restriction geometry.

use std::f64::consts::PI;

use crate::error::CoreResult;
use crate::numeric::ensure_positive;
use crate::units::{Area, Length};

/// Area of a circle with diameter `d`: πD²/4.
#[inline]
pub fn area_from_diameter(d: f64) -> f64 {
    0.25 * PI * d * d
}

/// Equivalent diameter of a circle with area `a`: √(4A/π).
#[inline]
pub fn diameter_from_area(a: f64) -> f64 {
    (4.0 * a / PI).sqrt()
}

/// Restriction cross-section, stored as the (area, diameter) pair of a circle.
///
/// Always built from exactly one source value so that `A = πD²/4` holds.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RestrictionGeometry {
    area_m2: f64,
    diameter_m: f64,
}

impl RestrictionGeometry {
    /// Build from a flow area [m²]; must be finite and positive.
    pub fn from_area(area_m2: f64) -> CoreResult<Self> {
        let area_m2 = ensure_positive(area_m2, "restriction area")?;
        Ok(Self {
            area_m2,
            diameter_m: diameter_from_area(area_m2),
        })
    }

    /// Build from a diameter [m]; must be finite and positive.
    pub fn from_diameter(diameter_m: f64) -> CoreResult<Self> {
        let diameter_m = ensure_positive(diameter_m, "restriction diameter")?;
        Ok(Self {
            area_m2: area_from_diameter(diameter_m),
            diameter_m,
        })
    }

    pub fn from_length(diameter: Length) -> CoreResult<Self> {
        Self::from_diameter(diameter.value)
    }

    #[inline]
    pub fn area_m2(&self) -> f64 {
        self.area_m2
    }

    #[inline]
    pub fn diameter_m(&self) -> f64 {
        self.diameter_m
    }

    pub fn area(&self) -> Area {
        crate::units::m2(self.area_m2)
    }

    pub fn diameter(&self) -> Length {
        crate::units::m(self.diameter_m)
    }

    /// Length-to-diameter ratio for a channel of length `length_m`.
    pub fn l_over_d(&self, length_m: f64) -> f64 {
        length_m / self.diameter_m
    }
}
