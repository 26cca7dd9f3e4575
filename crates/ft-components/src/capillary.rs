//! Laminar capillary (Poiseuille) flow between a vessel and its surroundings.
//!
//! Isothermal compressible Hagen-Poiseuille flow gives
//! ṁ = πD⁴(P_up² − P_down²)/(256 μ L R T), so the vessel pressure obeys
//! dP/dt = ∓(πD⁴/(256 μ L V))·(P² − P_ref²), which integrates in closed form.

use crate::common::{CAPILLARY_MIN_L_OVER_D, LAMINAR_REYNOLDS_LIMIT, reynolds_number};
use crate::error::{FlowError, FlowResult};
use crate::result::{ForwardResult, RegimeDiagnostics};
use crate::state::{FlowState, Process, ThermoRegime};
use crate::traits::{FlowModel, ModelKind};
use ft_core::RestrictionGeometry;
use std::f64::consts::PI;

/// Laminar viscous flow through a long circular channel.
#[derive(Clone, Copy, Debug, Default)]
pub struct CapillaryModel;

impl CapillaryModel {
    /// Poiseuille mass flow [kg/s] for a compressible isothermal gas.
    pub fn mass_flow(state: &FlowState, diameter_m: f64, p_up: f64, p_down: f64) -> f64 {
        let gas = &state.gas;
        PI * diameter_m.powi(4) * (p_up * p_up - p_down * p_down)
            / (256.0 * gas.viscosity * state.length_m * gas.r_specific * state.temperature_k)
    }

    /// Closed-form elapsed time for a validated state.
    pub fn elapsed_time(state: &FlowState, diameter_m: f64) -> f64 {
        let ends = state.endpoints();
        let (p1, pe, p_ref) = (ends.p_start, ends.p_stop, ends.p_ref);
        let tau = 128.0 * state.gas.viscosity * state.length_m * state.volume_m3
            / (PI * diameter_m.powi(4) * p_ref);
        let log_ratio = match state.process {
            Process::Blowdown { .. } => {
                ((p1 - p_ref) * (pe + p_ref) / ((p1 + p_ref) * (pe - p_ref))).ln()
            }
            Process::Filling { .. } => {
                ((p_ref + pe) * (p_ref - p1) / ((p_ref - pe) * (p_ref + p1))).ln()
            }
        };
        tau * log_ratio
    }
}

impl FlowModel for CapillaryModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Capillary
    }

    fn forward_time(
        &self,
        state: &FlowState,
        geometry: &RestrictionGeometry,
    ) -> FlowResult<ForwardResult> {
        if !state.length_m.is_finite() || state.length_m <= 0.0 {
            return Err(FlowError::invalid(
                "restriction length",
                format!("invalid capillary length: {} m", state.length_m),
            ));
        }
        state.validate()?;

        let d = geometry.diameter_m();
        let time_s = Self::elapsed_time(state, d);

        let (p_up, p_down) = match state.process {
            Process::Blowdown { .. } => (state.p_initial_pa, state.reference_pressure()),
            Process::Filling { p_supply_pa, .. } => (p_supply_pa, state.p_initial_pa),
        };
        let mdot0 = Self::mass_flow(state, d, p_up, p_down);
        let reynolds = reynolds_number(mdot0, d, state.gas.viscosity);
        let l_over_d = geometry.l_over_d(state.length_m);

        let mut warnings = Vec::new();
        if reynolds > LAMINAR_REYNOLDS_LIMIT {
            warnings.push(format!(
                "Re = {reynolds:.0} exceeds the laminar limit {LAMINAR_REYNOLDS_LIMIT:.0}"
            ));
        }
        if l_over_d < CAPILLARY_MIN_L_OVER_D {
            warnings.push(format!(
                "L/D = {l_over_d:.2} is below {CAPILLARY_MIN_L_OVER_D:.0}; flow is not fully developed"
            ));
        }
        if state.regime == ThermoRegime::Adiabatic {
            warnings.push("capillary model assumes isothermal flow".to_string());
        }

        let critical_ratio = state.gas.critical_pressure_ratio();
        let initial_ratio = state.initial_pressure_ratio();
        Ok(ForwardResult {
            model: ModelKind::Capillary,
            time_s,
            area_m2: geometry.area_m2(),
            diameter_m: d,
            regime: RegimeDiagnostics {
                reynolds,
                l_over_d,
                critical_ratio,
                initial_ratio,
                choked: false,
                mach: None,
                transition_pressure_pa: None,
                stop_pressure_pa: state.stop_pressure(),
                initial_mass_flow_kgps: mdot0,
                choked_time_s: 0.0,
                subsonic_time_s: time_s,
            },
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{reference_blowdown, reference_filling};
    use proptest::prelude::*;

    fn capillary_time(state: &FlowState, d: f64) -> ForwardResult {
        let g = RestrictionGeometry::from_diameter(d).unwrap();
        CapillaryModel.forward_time(state, &g).unwrap()
    }

    #[test]
    fn blowdown_closed_form() {
        let state = reference_blowdown();
        let d = 9e-6;
        let res = capillary_time(&state, d);

        let (p1, pb, pe) = (1.2e6, 1e3, 1010.0);
        let tau = 128.0 * 1.81e-5 * 0.002 * 2e-7 / (PI * d.powi(4) * pb);
        let expected = tau * ((p1 - pb) * (pe + pb) / ((p1 + pb) * (pe - pb))).ln();
        assert!((res.time_s - expected).abs() <= 1e-9 * expected);
        assert_eq!(res.regime.subsonic_time_s, res.time_s);
        assert!(!res.regime.choked);
        assert!(res.regime.mach.is_none());
    }

    #[test]
    fn filling_closed_form() {
        let state = reference_filling();
        let d = 20e-6;
        let res = capillary_time(&state, d);

        let (p1, ps, pe) = (101_325.0, 1e6, 5e5);
        let tau = 128.0 * 1.81e-5 * 0.002 * 2e-7 / (PI * d.powi(4) * ps);
        let expected = tau * ((ps + pe) * (ps - p1) / ((ps - pe) * (ps + p1))).ln();
        assert!((res.time_s - expected).abs() <= 1e-9 * expected);
    }

    #[test]
    fn time_scales_with_inverse_fourth_power() {
        let state = reference_blowdown();
        let t1 = capillary_time(&state, 10e-6).time_s;
        let t2 = capillary_time(&state, 5e-6).time_s;
        assert!((t2 / t1 - 16.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_length_is_hard_error() {
        for length in [0.0, -1e-3, f64::NAN, f64::INFINITY] {
            let state = FlowState {
                length_m: length,
                ..reference_blowdown()
            };
            let g = RestrictionGeometry::from_diameter(9e-6).unwrap();
            let err = CapillaryModel.forward_time(&state, &g).unwrap_err();
            assert_eq!(err.field(), "restriction length");
            assert!(err.to_string().contains("invalid capillary length"));
        }
    }

    #[test]
    fn validity_limits_are_warnings() {
        // Short channel: L/D = 2
        let state = FlowState {
            length_m: 2e-3,
            ..reference_blowdown()
        };
        let res = capillary_time(&state, 1e-3);
        assert!(res.time_s.is_finite());
        assert!(res.regime.reynolds > LAMINAR_REYNOLDS_LIMIT);
        assert!(res.warnings.iter().any(|w| w.contains("laminar limit")));
        assert!(res.warnings.iter().any(|w| w.contains("L/D")));
    }

    #[test]
    fn adiabatic_request_warns_and_keeps_isothermal_time() {
        let iso = reference_blowdown();
        let adi = FlowState {
            regime: ThermoRegime::Adiabatic,
            ..reference_blowdown()
        };
        let a = capillary_time(&iso, 9e-6);
        let b = capillary_time(&adi, 9e-6);
        assert_eq!(a.time_s, b.time_s);
        assert!(
            b.warnings
                .iter()
                .any(|w| w == "capillary model assumes isothermal flow")
        );
    }

    #[test]
    fn clean_geometry_has_no_warnings() {
        let res = capillary_time(&reference_blowdown(), 9e-6);
        assert!(res.warnings.is_empty(), "{:?}", res.warnings);
    }

    proptest! {
        #[test]
        fn strictly_decreasing_in_area(exp in -13.0_f64..-8.0_f64, filling in any::<bool>()) {
            let state = if filling { reference_filling() } else { reference_blowdown() };
            let a = 10f64.powf(exp);
            let t_small = CapillaryModel.forward_time_for_area(&state, a).unwrap().time_s;
            let t_large = CapillaryModel.forward_time_for_area(&state, a * 1.5).unwrap().time_s;
            prop_assert!(t_small > t_large);
        }
    }
}
