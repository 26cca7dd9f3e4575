// ft-core/src/units.rs

use uom::si::f64::{Area as UomArea, Length as UomLength, Pressure as UomPressure, Time as UomTime};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type Length = UomLength;
pub type Pressure = UomPressure;
pub type Time = UomTime;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

/// Diameters are usually quoted in micrometres.
#[inline]
pub fn um(v: f64) -> Length {
    use uom::si::length::micrometer;
    Length::new::<micrometer>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

/// Display helpers for quantities the CLI reports in engineering units.
pub mod display {
    use super::*;

    #[inline]
    pub fn in_micrometers(l: Length) -> f64 {
        l.get::<uom::si::length::micrometer>()
    }

    #[inline]
    pub fn in_minutes(t: Time) -> f64 {
        t.get::<uom::si::time::minute>()
    }

    #[inline]
    pub fn in_bar(p: Pressure) -> f64 {
        p.get::<uom::si::pressure::bar>()
    }
}
