//! Model-agnostic forward evaluation: time from diameter.

use crate::config::SolverConfig;
use crate::selector::{ModelChoice, Selection, Verdict, select_model};
use ft_components::{FlowResult, FlowState, ForwardResult, ModelKind};
use ft_core::{RestrictionGeometry, relative_difference};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Forward result with the selection that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardEvaluation {
    pub verdict: Verdict,
    pub selection: Selection,
    /// Result of the selected model (the orifice when the verdict is `Both`)
    pub primary: ForwardResult,
    /// Result of the other model, evaluated in auto mode only
    pub secondary: Option<ForwardResult>,
    /// |t_orifice − t_capillary| / t_orifice, auto mode only
    pub relative_difference: Option<f64>,
}

/// Elapsed time through `geometry` with the requested model.
///
/// In auto mode both models are evaluated. If their times agree within
/// `config.both_rel_tol` the verdict is `Both`; otherwise the selector decides.
pub fn forward_time(
    state: &FlowState,
    geometry: &RestrictionGeometry,
    choice: ModelChoice,
    config: &SolverConfig,
) -> FlowResult<ForwardEvaluation> {
    let selection = select_model(state, Some(geometry.diameter_m()), choice.forced())?;

    if choice.forced().is_some() {
        let primary = selection.model.model().forward_time(state, geometry)?;
        return Ok(ForwardEvaluation {
            verdict: Verdict::from(selection.model),
            selection,
            primary,
            secondary: None,
            relative_difference: None,
        });
    }

    let orifice = ModelKind::Orifice.model().forward_time(state, geometry)?;
    let capillary = ModelKind::Capillary.model().forward_time(state, geometry)?;
    let diff = relative_difference(orifice.time_s, capillary.time_s, orifice.time_s, config.time_floor_s);
    let both = diff <= config.both_rel_tol;
    debug!(
        t_orifice = orifice.time_s,
        t_capillary = capillary.time_s,
        diff,
        both,
        "forward evaluation"
    );

    let (verdict, primary, secondary) = match (both, selection.model) {
        (true, _) => (Verdict::Both, orifice, capillary),
        (false, ModelKind::Orifice) => (Verdict::Orifice, orifice, capillary),
        (false, ModelKind::Capillary) => (Verdict::Capillary, capillary, orifice),
    };

    Ok(ForwardEvaluation {
        verdict,
        selection,
        primary,
        secondary: Some(secondary),
        relative_difference: Some(diff),
    })
}
