//! Forward evaluation output.

use crate::traits::ModelKind;
use serde::{Deserialize, Serialize};

/// Flow-regime information reported alongside an elapsed time.
///
/// Quantities marked "initial" are evaluated at the start of the process,
/// where the mass flow is largest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegimeDiagnostics {
    /// Reynolds number 4ṁ/(πDμ) at the initial state
    pub reynolds: f64,
    /// Restriction length over diameter
    pub l_over_d: f64,
    /// Critical pressure ratio r* of the gas
    pub critical_ratio: f64,
    /// Downstream/upstream pressure ratio at the initial state
    pub initial_ratio: f64,
    /// Whether the restriction starts out choked
    pub choked: bool,
    /// Throat Mach number at the initial state (orifice only)
    pub mach: Option<f64>,
    /// Vessel pressure at which the flow switches between choked and subsonic (orifice only)
    pub transition_pressure_pa: Option<f64>,
    /// Pressure at which integration stopped (Pa)
    pub stop_pressure_pa: f64,
    /// Mass flow rate at the initial state (kg/s)
    pub initial_mass_flow_kgps: f64,
    /// Time spent with choked flow (s)
    pub choked_time_s: f64,
    /// Time spent with subsonic or viscous flow (s)
    pub subsonic_time_s: f64,
}

/// Elapsed time for one state + geometry, plus regime information.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForwardResult {
    pub model: ModelKind,
    /// Elapsed time (s); may be non-finite for vanishing areas
    pub time_s: f64,
    pub area_m2: f64,
    pub diameter_m: f64,
    pub regime: RegimeDiagnostics,
    /// Validity warnings (not errors)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ForwardResult {
    pub fn is_finite(&self) -> bool {
        self.time_s.is_finite()
    }
}
