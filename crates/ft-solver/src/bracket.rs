//! Log-space area bracket and the pure bisection step.
//!
//! Elapsed time is strictly decreasing in area, so a valid bracket has the
//! longer time at the smaller area: t(A_lo) ≥ t_target ≥ t(A_hi).

use crate::config::SolverConfig;
use crate::diagnostic::BracketSnapshot;
use ft_components::FlowState;
use ft_core::{area_from_diameter, geometric_mean};

/// An area with its forward time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoint {
    pub area_m2: f64,
    pub time_s: f64,
}

/// Immutable area bracket; every step returns a new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    lo: Endpoint,
    hi: Endpoint,
}

impl Bracket {
    pub fn new(lo: Endpoint, hi: Endpoint) -> Self {
        Self { lo, hi }
    }

    pub fn lo(&self) -> Endpoint {
        self.lo
    }

    pub fn hi(&self) -> Endpoint {
        self.hi
    }

    /// t_hi ≤ target ≤ t_lo with a finite t_hi.
    ///
    /// An infinite t_lo reads as "too long" and brackets any finite target;
    /// NaN at either end never brackets.
    pub fn contains(&self, target_s: f64) -> bool {
        !self.lo.time_s.is_nan()
            && self.hi.time_s.is_finite()
            && self.hi.time_s <= target_s
            && target_s <= self.lo.time_s
    }

    /// Geometric midpoint √(A_lo·A_hi).
    pub fn midpoint(&self) -> f64 {
        geometric_mean(self.lo.area_m2, self.hi.area_m2)
    }

    /// Width in ln(A).
    pub fn log_width(&self) -> f64 {
        (self.hi.area_m2 / self.lo.area_m2).ln()
    }

    /// Replace one endpoint with `mid`.
    ///
    /// A midpoint slower than the target becomes the new lower end; an
    /// infinite time counts as slower.
    #[must_use]
    pub fn step(&self, mid: Endpoint, target_s: f64) -> Bracket {
        if mid.time_s > target_s {
            Bracket { lo: mid, ..*self }
        } else {
            Bracket { hi: mid, ..*self }
        }
    }

    pub fn snapshot(&self) -> BracketSnapshot {
        BracketSnapshot {
            area_lo_m2: self.lo.area_m2,
            area_hi_m2: self.hi.area_m2,
            time_lo_s: self.lo.time_s,
            time_hi_s: self.hi.time_s,
        }
    }
}

/// Ceiling on the upper area after `expansions` expansions.
///
/// Grows with the vessel's equivalent diameter: area(k·D_eq·(1+n))·factor.
pub fn upper_area_cap(
    state: &FlowState,
    config: &SolverConfig,
    expansion_factor: f64,
    expansions: usize,
) -> f64 {
    let d_eq = state.equivalent_vessel_diameter();
    area_from_diameter(config.safety_factor * d_eq * (1.0 + expansions as f64)) * expansion_factor
}

/// Starting areas (A_lo, A_hi), widened on both sides by `expansion_factor`.
pub fn initial_areas(state: &FlowState, config: &SolverConfig, expansion_factor: f64) -> (f64, f64) {
    (
        config.area_floor_m2 / expansion_factor,
        upper_area_cap(state, config, expansion_factor, 0),
    )
}

/// Areas after one more expansion: A_lo ÷ step, A_hi × step capped.
pub fn expanded_areas(
    lo_m2: f64,
    hi_m2: f64,
    cap_m2: f64,
    config: &SolverConfig,
) -> (f64, f64) {
    (
        lo_m2 / config.expansion_step,
        (hi_m2 * config.expansion_step).min(cap_m2),
    )
}
