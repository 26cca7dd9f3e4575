//! Scenario file schema.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    pub vessel: VesselDef,
    pub process: ProcessDef,
    pub restriction: RestrictionDef,
    pub gas: GasDef,
    #[serde(default)]
    pub regime: RegimeDef,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default)]
    pub model: ModelDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverOverridesDef>,
    #[serde(default)]
    pub analyses: Vec<AnalysisDef>,
}

fn default_epsilon() -> f64 {
    0.01
}

fn default_cd() -> f64 {
    0.62
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VesselDef {
    pub volume_m3: f64,
    pub p_initial_pa: f64,
    pub temperature_k: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcessDef {
    Blowdown {
        p_final_pa: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        p_back_pa: Option<f64>,
    },
    Filling {
        p_supply_pa: f64,
        p_target_pa: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestrictionDef {
    pub length_m: f64,
    #[serde(default = "default_cd")]
    pub cd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GasDef {
    Preset {
        key: String,
    },
    Custom {
        r_specific: f64,
        gamma: f64,
        viscosity: f64,
    },
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RegimeDef {
    #[default]
    Isothermal,
    Adiabatic,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModelDef {
    #[default]
    Auto,
    Orifice,
    Capillary,
}

/// Optional solver overrides; unset fields keep the solver defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SolverOverridesDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iters: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_expansions: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residual_tol: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept_tol_blowdown: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept_tol_filling: Option<f64>,
    /// Caller-driven retries after a retryable failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisDef {
    pub id: String,
    #[serde(flatten)]
    pub kind: AnalysisKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisKind {
    /// Time for a given restriction diameter
    Forward { diameter_m: f64 },
    /// Restriction diameter for a given time
    Inverse { target_time_s: f64 },
    /// Forward times over a log-spaced diameter range
    Sweep {
        d_min_m: f64,
        d_max_m: f64,
        points: usize,
    },
}

impl AnalysisKind {
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisKind::Forward { .. } => "forward",
            AnalysisKind::Inverse { .. } => "inverse",
            AnalysisKind::Sweep { .. } => "sweep",
        }
    }
}
