//! Inverse solver configuration.

use ft_components::Process;
use serde::{Deserialize, Serialize};

/// Configuration for the area-from-time root-finder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Bisection iteration cap
    pub max_iters: usize,
    /// Bracket expansion cap
    pub max_expansions: usize,
    /// Relative time residual at which bisection stops
    pub residual_tol: f64,
    /// Bracket width in ln(A) at which bisection stops
    pub log_width_tol: f64,
    /// Relative distance to a searched endpoint counted as a boundary hit
    pub bound_rel_tol: f64,
    /// Post-solve residual acceptance for blowdown
    pub accept_tol_blowdown: f64,
    /// Post-solve residual acceptance for filling.
    ///
    /// Looser than blowdown; kept separate so the asymmetry can be revisited.
    pub accept_tol_filling: f64,
    /// k in A_hi = area(k·D_eq)
    pub safety_factor: f64,
    /// Initial lower area (m²)
    pub area_floor_m2: f64,
    /// Per-expansion area multiplier
    pub expansion_step: f64,
    /// Floor on the target time in the relative residual (s)
    pub time_floor_s: f64,
    /// Relative time difference under which the forward verdict is "both"
    pub both_rel_tol: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iters: 100,
            max_expansions: 4,
            residual_tol: 1e-6,
            log_width_tol: 1e-12,
            bound_rel_tol: 1e-9,
            accept_tol_blowdown: 0.05,
            accept_tol_filling: 0.10,
            safety_factor: 2.0,
            area_floor_m2: 1e-12,
            expansion_step: 10.0,
            time_floor_s: 1e-12,
            both_rel_tol: 0.05,
        }
    }
}

impl SolverConfig {
    /// Residual acceptance threshold for the process direction.
    pub fn accept_tol(&self, process: &Process) -> f64 {
        match process {
            Process::Blowdown { .. } => self.accept_tol_blowdown,
            Process::Filling { .. } => self.accept_tol_filling,
        }
    }

    /// Validates that every tolerance and factor is usable.
    ///
    /// # Errors
    ///
    /// Returns a description of the first offending field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.max_iters == 0 {
            return Err("max_iters must be at least 1");
        }
        let positive = [
            (self.residual_tol, "residual_tol must be finite and positive"),
            (self.log_width_tol, "log_width_tol must be finite and positive"),
            (self.bound_rel_tol, "bound_rel_tol must be finite and positive"),
            (self.accept_tol_blowdown, "accept_tol_blowdown must be finite and positive"),
            (self.accept_tol_filling, "accept_tol_filling must be finite and positive"),
            (self.safety_factor, "safety_factor must be finite and positive"),
            (self.area_floor_m2, "area_floor_m2 must be finite and positive"),
            (self.time_floor_s, "time_floor_s must be finite and positive"),
            (self.both_rel_tol, "both_rel_tol must be finite and positive"),
        ];
        for (value, msg) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(msg);
            }
        }
        if !self.expansion_step.is_finite() || self.expansion_step <= 1.0 {
            return Err("expansion_step must be finite and greater than 1");
        }
        if self.residual_tol > self.accept_tol_blowdown.min(self.accept_tol_filling) {
            return Err("residual_tol must not exceed the acceptance tolerances");
        }
        Ok(())
    }
}
