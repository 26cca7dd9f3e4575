//! Common utilities for restriction flow calculations.

use crate::error::{FlowError, FlowResult};
use ft_core::ensure_finite;
use std::f64::consts::PI;

/// Upper Reynolds number for laminar (capillary-valid) flow
pub const LAMINAR_REYNOLDS_LIMIT: f64 = 2000.0;

/// Minimum L/D for the capillary (fully developed viscous) model
pub const CAPILLARY_MIN_L_OVER_D: f64 = 10.0;

/// Ensure a value is finite, returning FlowError if not.
pub fn check_finite(value: f64, what: &'static str) -> FlowResult<()> {
    ensure_finite(value, what).map_err(|e| FlowError::invalid(what, e.to_string()))?;
    Ok(())
}

/// Reynolds number 4ṁ/(πDμ) for a circular restriction.
pub fn reynolds_number(mdot: f64, diameter_m: f64, viscosity: f64) -> f64 {
    4.0 * mdot / (PI * diameter_m * viscosity)
}

/// Isentropic subsonic flow function √(r^(2/γ) − r^((γ+1)/γ)).
pub fn subsonic_flow_function(r: f64, gamma: f64) -> f64 {
    let term = r.powf(2.0 / gamma) - r.powf((gamma + 1.0) / gamma);
    term.max(0.0).sqrt()
}

/// Throat Mach number for an isentropic expansion to pressure ratio `r`.
///
/// Returns 1 at or below the critical ratio.
pub fn throat_mach(r: f64, gamma: f64, critical_ratio: f64) -> f64 {
    if r <= critical_ratio {
        1.0
    } else {
        let x = r.powf(-(gamma - 1.0) / gamma) - 1.0;
        (2.0 / (gamma - 1.0) * x.max(0.0)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_finite() {
        assert!(check_finite(1.0, "test").is_ok());
        assert!(check_finite(f64::INFINITY, "test").is_err());
        assert!(check_finite(f64::NAN, "test").is_err());
    }

    #[test]
    fn flow_function_vanishes_at_unity() {
        assert_eq!(subsonic_flow_function(1.0, 1.4), 0.0);
        assert!(subsonic_flow_function(0.9, 1.4) > 0.0);
    }

    #[test]
    fn mach_is_continuous_at_critical_ratio() {
        let gamma = 1.4;
        let r_star = (2.0_f64 / 2.4).powf(3.5);
        assert_eq!(throat_mach(r_star * 0.5, gamma, r_star), 1.0);
        let just_above = throat_mach(r_star * (1.0 + 1e-9), gamma, r_star);
        assert!((just_above - 1.0).abs() < 1e-6, "M = {just_above}");
        assert!(throat_mach(0.99, gamma, r_star) < 0.2);
    }

    #[test]
    fn reynolds_scales_with_flow() {
        let re1 = reynolds_number(1e-7, 9e-6, 1.81e-5);
        let re2 = reynolds_number(2e-7, 9e-6, 1.81e-5);
        assert!((re2 / re1 - 2.0).abs() < 1e-12);
    }
}
