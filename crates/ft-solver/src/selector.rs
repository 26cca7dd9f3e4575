//! Orifice vs. capillary model selection.

use ft_components::common::{CAPILLARY_MIN_L_OVER_D, LAMINAR_REYNOLDS_LIMIT, reynolds_number};
use ft_components::{FlowResult, FlowState, ModelKind, OrificeModel};
use ft_core::{RestrictionGeometry, display};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Caller's model request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelChoice {
    #[default]
    Auto,
    Orifice,
    Capillary,
}

impl ModelChoice {
    /// The forced model, if any.
    pub fn forced(&self) -> Option<ModelKind> {
        match self {
            ModelChoice::Auto => None,
            ModelChoice::Orifice => Some(ModelKind::Orifice),
            ModelChoice::Capillary => Some(ModelKind::Capillary),
        }
    }
}

impl From<ModelKind> for ModelChoice {
    fn from(kind: ModelKind) -> Self {
        match kind {
            ModelKind::Orifice => ModelChoice::Orifice,
            ModelKind::Capillary => ModelChoice::Capillary,
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelChoice::Auto => f.write_str("auto"),
            ModelChoice::Orifice => f.write_str("orifice"),
            ModelChoice::Capillary => f.write_str("capillary"),
        }
    }
}

impl std::str::FromStr for ModelChoice {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ModelChoice::Auto),
            other => other
                .parse::<ModelKind>()
                .map(ModelChoice::from)
                .map_err(|_| "unknown model (expected 'auto', 'orifice' or 'capillary')"),
        }
    }
}

/// Which model(s) describe a forward evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Orifice,
    Capillary,
    /// Both models agree within tolerance (forward mode only)
    Both,
}

impl From<ModelKind> for Verdict {
    fn from(kind: ModelKind) -> Self {
        match kind {
            ModelKind::Orifice => Verdict::Orifice,
            ModelKind::Capillary => Verdict::Capillary,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Orifice => f.write_str("orifice"),
            Verdict::Capillary => f.write_str("capillary"),
            Verdict::Both => f.write_str("both"),
        }
    }
}

/// Selected model with the reasoning behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub model: ModelKind,
    pub rationale: String,
    /// Reynolds number used for the decision (auto mode with a diameter)
    pub reynolds: Option<f64>,
    /// L/D used for the decision (auto mode with a diameter)
    pub l_over_d: Option<f64>,
}

pub const FORCED_RATIONALE: &str = "forced by user selection";

/// Pick the flow model for `state`.
///
/// A forced choice is returned as is. In auto mode L/D ≥ 10 with Re ≤ 2000
/// selects the capillary; anything else, including a missing diameter,
/// selects the orifice. Re is taken from the orifice mass flow at the
/// initial state.
pub fn select_model(
    state: &FlowState,
    candidate_diameter_m: Option<f64>,
    forced: Option<ModelKind>,
) -> FlowResult<Selection> {
    if let Some(model) = forced {
        debug!(%model, "model forced");
        return Ok(Selection {
            model,
            rationale: FORCED_RATIONALE.to_string(),
            reynolds: None,
            l_over_d: None,
        });
    }

    state.validate()?;
    let Some(d) = candidate_diameter_m else {
        debug!("no candidate diameter, defaulting to orifice");
        return Ok(Selection {
            model: ModelKind::Orifice,
            rationale: "auto: no candidate diameter, defaulting to orifice".to_string(),
            reynolds: None,
            l_over_d: None,
        });
    };

    let geometry = RestrictionGeometry::from_diameter(d)?;
    let mdot = OrificeModel::initial_mass_flow(state, state.cd * geometry.area_m2());
    let re = reynolds_number(mdot, d, state.gas.viscosity);
    let l_over_d = geometry.l_over_d(state.length_m);
    let d_um = display::in_micrometers(geometry.diameter());

    let long = l_over_d >= CAPILLARY_MIN_L_OVER_D;
    let laminar = re <= LAMINAR_REYNOLDS_LIMIT;
    let (model, rationale) = if long && laminar {
        (
            ModelKind::Capillary,
            format!(
                "auto at D = {d_um:.3} µm: L/D = {l_over_d:.1} ≥ {CAPILLARY_MIN_L_OVER_D:.0} and Re = {re:.0} ≤ {LAMINAR_REYNOLDS_LIMIT:.0}, capillary"
            ),
        )
    } else if !long {
        (
            ModelKind::Orifice,
            format!(
                "auto at D = {d_um:.3} µm: L/D = {l_over_d:.2} < {CAPILLARY_MIN_L_OVER_D:.0}, orifice"
            ),
        )
    } else {
        (
            ModelKind::Orifice,
            format!(
                "auto at D = {d_um:.3} µm: Re = {re:.0} > {LAMINAR_REYNOLDS_LIMIT:.0}, orifice"
            ),
        )
    };
    debug!(%model, reynolds = re, l_over_d, "model selected");

    Ok(Selection {
        model,
        rationale,
        reynolds: Some(re),
        l_over_d: Some(l_over_d),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ft_components::{Process, ThermoRegime};
    use ft_fluids::Gas;

    fn state(length_m: f64) -> FlowState {
        FlowState {
            volume_m3: 2e-7,
            p_initial_pa: 1.2e6,
            process: Process::Blowdown {
                p_final_pa: 1e3,
                p_back_pa: None,
            },
            temperature_k: 288.15,
            length_m,
            gas: Gas::Air.properties(),
            cd: 0.62,
            epsilon: 0.01,
            regime: ThermoRegime::Isothermal,
        }
    }

    #[test]
    fn long_laminar_channel_selects_capillary() {
        let sel = select_model(&state(0.002), Some(9e-6), None).unwrap();
        assert_eq!(sel.model, ModelKind::Capillary);
        assert!(sel.reynolds.unwrap() < 2000.0);
        assert!(sel.rationale.contains("capillary"));
    }

    #[test]
    fn short_restriction_selects_orifice() {
        // L/D = 5
        let sel = select_model(&state(4.5e-5), Some(9e-6), None).unwrap();
        assert_eq!(sel.model, ModelKind::Orifice);
        assert!(sel.rationale.contains("L/D"));
    }

    #[test]
    fn turbulent_flow_selects_orifice() {
        // L/D = 20 but Re in the tens of thousands
        let sel = select_model(&state(0.02), Some(1e-3), None).unwrap();
        assert_eq!(sel.model, ModelKind::Orifice);
        assert!(sel.reynolds.unwrap() > 2000.0);
        assert!(sel.rationale.contains("Re"));
    }

    #[test]
    fn forced_choice_is_never_overridden() {
        let sel = select_model(&state(0.002), Some(9e-6), Some(ModelKind::Orifice)).unwrap();
        assert_eq!(sel.model, ModelKind::Orifice);
        assert_eq!(sel.rationale, FORCED_RATIONALE);
    }

    #[test]
    fn missing_diameter_defaults_to_orifice() {
        let sel = select_model(&state(0.002), None, None).unwrap();
        assert_eq!(sel.model, ModelKind::Orifice);
        assert!(sel.reynolds.is_none());
    }

    #[test]
    fn invalid_diameter_is_an_error() {
        assert!(select_model(&state(0.002), Some(0.0), None).is_err());
    }

    #[test]
    fn choice_parsing() {
        assert_eq!("AUTO".parse::<ModelChoice>().unwrap(), ModelChoice::Auto);
        assert_eq!(
            "capillary".parse::<ModelChoice>().unwrap(),
            ModelChoice::Capillary
        );
        assert!("venturi".parse::<ModelChoice>().is_err());
        assert_eq!(ModelChoice::Orifice.forced(), Some(ModelKind::Orifice));
        assert_eq!(ModelChoice::Auto.forced(), None);
    }
}
