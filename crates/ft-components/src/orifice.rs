//! Sharp-edged compressible orifice: split-phase blowdown and filling times.
//!
//! Vessel pressure obeys dP/dt = ∓(κ R T / V)·ṁ, with κ = 1 (isothermal) or
//! κ = γ (adiabatic). While the pressure ratio across the orifice is at or
//! below r* the flow is choked and the phase integrates in closed form; the
//! remaining subsonic phase is integrated by quadrature in u = √(1 − r).

use crate::common::{
    CAPILLARY_MIN_L_OVER_D, LAMINAR_REYNOLDS_LIMIT, check_finite, reynolds_number,
    subsonic_flow_function, throat_mach,
};
use crate::error::FlowResult;
use crate::quadrature::adaptive_simpson;
use crate::result::{ForwardResult, RegimeDiagnostics};
use crate::state::{FlowState, Process};
use crate::traits::{FlowModel, ModelKind};
use ft_core::RestrictionGeometry;
use ft_fluids::GasProperties;

/// Absolute tolerance of the subsonic quadrature (integral is O(1))
const QUADRATURE_TOL: f64 = 1e-11;

/// Recursion cap for the subsonic quadrature
const QUADRATURE_DEPTH: u32 = 48;

/// Below this exponent the vessel process is treated as isothermal.
const ISOTHERMAL_EPS: f64 = 1e-12;

/// Compressible orifice flow model with choking.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrificeModel;

/// Time split between the two flow regimes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseTimes {
    pub choked_s: f64,
    pub subsonic_s: f64,
    /// Vessel pressure at the choked/subsonic switch (Pa)
    pub transition_pa: f64,
}

impl PhaseTimes {
    pub fn total(&self) -> f64 {
        self.choked_s + self.subsonic_s
    }
}

impl OrificeModel {
    /// Orifice mass flow [kg/s] for effective area `cda`, upstream stagnation
    /// state (`p_up`, `t_up`) and downstream/upstream ratio `r`.
    pub fn mass_flow(gas: &GasProperties, cda: f64, p_up: f64, t_up: f64, r: f64) -> f64 {
        let g = gas.gamma;
        let rt = gas.r_specific * t_up;
        if r <= gas.critical_pressure_ratio() {
            cda * p_up * (g / rt).sqrt() * gas.choke_factor()
        } else {
            cda * p_up * (2.0 * g / ((g - 1.0) * rt)).sqrt() * subsonic_flow_function(r, g)
        }
    }

    /// Mass flow at the initial state of a validated `state` for `cda` = Cd·A.
    pub fn initial_mass_flow(state: &FlowState, cda: f64) -> f64 {
        let p_up = match state.process {
            Process::Blowdown { .. } => state.p_initial_pa,
            Process::Filling { p_supply_pa, .. } => p_supply_pa,
        };
        Self::mass_flow(
            &state.gas,
            cda,
            p_up,
            state.temperature_k,
            state.initial_pressure_ratio(),
        )
    }

    /// Split-phase elapsed time for effective area `cda` = Cd·A.
    ///
    /// The state must already be validated.
    pub fn phase_times(state: &FlowState, cda: f64) -> PhaseTimes {
        match state.process {
            Process::Blowdown { .. } => blowdown_phases(state, cda),
            Process::Filling { .. } => filling_phases(state, cda),
        }
    }
}

/// 2u / f(1 − u²), written so it stays accurate as u → 0.
///
/// f(r) = r^(1/γ)·√(1 − r^((γ−1)/γ)) and 1 − r^a = −expm1(a·ln(1 − u²)).
fn inverse_flow_function_du(u: f64, gamma: f64) -> f64 {
    let a = (gamma - 1.0) / gamma;
    if u < 1e-8 {
        return 2.0 / a.sqrt();
    }
    let r = 1.0 - u * u;
    let one_minus = -(a * (-u * u).ln_1p()).exp_m1();
    2.0 * u / (r.powf(1.0 / gamma) * one_minus.sqrt())
}

fn blowdown_phases(state: &FlowState, cda: f64) -> PhaseTimes {
    let gas = &state.gas;
    let g = gas.gamma;
    let kappa = state.kappa();
    let ends = state.endpoints();
    let (p0, p_stop, pb) = (ends.p_start, ends.p_stop, ends.p_ref);
    let t0 = state.temperature_k;
    let p_tr = pb / gas.critical_pressure_ratio();
    // T(P) = T0 (P/P0)^(2m), so √T scales as (P/P0)^m
    let m = (kappa - 1.0) / (2.0 * kappa);

    let choked_s = if p0 > p_tr {
        let p_end = p_tr.max(p_stop);
        let k0 = kappa * cda * gas.choke_factor() * gas.speed_of_sound(t0) / state.volume_m3;
        if m.abs() < ISOTHERMAL_EPS {
            (p0 / p_end).ln() / k0
        } else {
            ((p0 / p_end).powf(m) - 1.0) / (k0 * m)
        }
    } else {
        0.0
    };

    let p_sub = p0.min(p_tr);
    let subsonic_s = if p_sub > p_stop {
        let coeff =
            state.volume_m3 / (kappa * cda * (2.0 * g * gas.r_specific / (g - 1.0)).sqrt());
        let u_start = (1.0 - pb / p_sub).sqrt();
        let u_stop = (1.0 - pb / p_stop).sqrt();
        let integrand = |u: f64| {
            let r = 1.0 - u * u;
            let t = t0 * (pb / (r * p0)).powf(2.0 * m);
            inverse_flow_function_du(u, g) / (r * t.sqrt())
        };
        coeff * adaptive_simpson(integrand, u_stop, u_start, QUADRATURE_TOL, QUADRATURE_DEPTH)
    } else {
        0.0
    };

    PhaseTimes {
        choked_s,
        subsonic_s,
        transition_pa: p_tr,
    }
}

fn filling_phases(state: &FlowState, cda: f64) -> PhaseTimes {
    let gas = &state.gas;
    let g = gas.gamma;
    let kappa = state.kappa();
    let ends = state.endpoints();
    let (p1, p_stop, ps) = (ends.p_start, ends.p_stop, ends.p_ref);
    let t = state.temperature_k;
    let p_tr = gas.critical_pressure_ratio() * ps;

    // Choked inflow is constant, so pressure rises linearly.
    let choked_s = if p1 < p_tr {
        let p_end = p_tr.min(p_stop);
        let rate = kappa * cda * ps * gas.choke_factor() * gas.speed_of_sound(t) / state.volume_m3;
        (p_end - p1) / rate
    } else {
        0.0
    };

    let p_sub = p1.max(p_tr);
    let subsonic_s = if p_sub < p_stop {
        let coeff = state.volume_m3
            / (kappa * cda * (2.0 * g * gas.r_specific * t / (g - 1.0)).sqrt());
        let u_start = (1.0 - p_sub / ps).sqrt();
        let u_stop = (1.0 - p_stop / ps).sqrt();
        let integrand = |u: f64| inverse_flow_function_du(u, g);
        coeff * adaptive_simpson(integrand, u_stop, u_start, QUADRATURE_TOL, QUADRATURE_DEPTH)
    } else {
        0.0
    };

    PhaseTimes {
        choked_s,
        subsonic_s,
        transition_pa: p_tr,
    }
}

impl FlowModel for OrificeModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Orifice
    }

    fn forward_time(
        &self,
        state: &FlowState,
        geometry: &RestrictionGeometry,
    ) -> FlowResult<ForwardResult> {
        state.validate()?;

        let gas = &state.gas;
        let cda = state.cd * geometry.area_m2();
        check_finite(cda, "effective area")?;

        let phases = Self::phase_times(state, cda);

        let critical_ratio = gas.critical_pressure_ratio();
        let initial_ratio = state.initial_pressure_ratio();
        let mdot0 = Self::initial_mass_flow(state, cda);
        let reynolds = reynolds_number(mdot0, geometry.diameter_m(), gas.viscosity);
        let l_over_d = geometry.l_over_d(state.length_m);

        let mut warnings = Vec::new();
        if l_over_d >= CAPILLARY_MIN_L_OVER_D && reynolds <= LAMINAR_REYNOLDS_LIMIT {
            warnings.push(format!(
                "L/D = {l_over_d:.1} and Re = {reynolds:.0} favour the capillary model"
            ));
        }

        Ok(ForwardResult {
            model: ModelKind::Orifice,
            time_s: phases.total(),
            area_m2: geometry.area_m2(),
            diameter_m: geometry.diameter_m(),
            regime: RegimeDiagnostics {
                reynolds,
                l_over_d,
                critical_ratio,
                initial_ratio,
                choked: initial_ratio <= critical_ratio,
                mach: Some(throat_mach(initial_ratio, gas.gamma, critical_ratio)),
                transition_pressure_pa: Some(phases.transition_pa),
                stop_pressure_pa: state.stop_pressure(),
                initial_mass_flow_kgps: mdot0,
                choked_time_s: phases.choked_s,
                subsonic_time_s: phases.subsonic_s,
            },
            warnings,
        })
    }
}
