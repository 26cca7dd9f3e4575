//! Scenario validation logic.

use crate::LATEST_VERSION;
use crate::schema::{AnalysisKind, GasDef, ProcessDef, Scenario, SolverOverridesDef};
use ft_fluids::{Gas, GasProperties};
use std::collections::HashSet;

/// Largest sweep the scenario format accepts.
pub const MAX_SWEEP_POINTS: usize = 10_000;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown gas: {key}")]
    UnknownGas { key: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be finite and positive"))
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    let vessel = &scenario.vessel;
    positive("vessel.volume_m3", vessel.volume_m3)?;
    positive("vessel.p_initial_pa", vessel.p_initial_pa)?;
    positive("vessel.temperature_k", vessel.temperature_k)?;
    validate_process(&scenario.process, vessel.p_initial_pa)?;

    positive("restriction.length_m", scenario.restriction.length_m)?;
    let cd = scenario.restriction.cd;
    positive("restriction.cd", cd)?;
    if cd > 1.0 {
        return Err(invalid("restriction.cd", cd, "must not exceed 1"));
    }
    positive("epsilon", scenario.epsilon)?;
    if scenario.epsilon >= 1.0 {
        return Err(invalid("epsilon", scenario.epsilon, "must be below 1"));
    }

    resolve_gas(&scenario.gas)?;

    if let Some(solver) = &scenario.solver {
        validate_solver(solver)?;
    }

    let mut ids = HashSet::new();
    for analysis in &scenario.analyses {
        if !ids.insert(&analysis.id) {
            return Err(ValidationError::DuplicateId {
                id: analysis.id.clone(),
                context: "analyses".to_string(),
            });
        }
        match analysis.kind {
            AnalysisKind::Forward { diameter_m } => {
                positive(&format!("{}.diameter_m", analysis.id), diameter_m)?;
            }
            AnalysisKind::Inverse { target_time_s } => {
                positive(&format!("{}.target_time_s", analysis.id), target_time_s)?;
            }
            AnalysisKind::Sweep {
                d_min_m,
                d_max_m,
                points,
            } => {
                positive(&format!("{}.d_min_m", analysis.id), d_min_m)?;
                positive(&format!("{}.d_max_m", analysis.id), d_max_m)?;
                if d_max_m <= d_min_m {
                    return Err(invalid(
                        &format!("{}.d_max_m", analysis.id),
                        d_max_m,
                        "must exceed d_min_m",
                    ));
                }
                if !(2..=MAX_SWEEP_POINTS).contains(&points) {
                    return Err(invalid(
                        &format!("{}.points", analysis.id),
                        points,
                        "must be between 2 and 10000",
                    ));
                }
            }
        }
    }

    Ok(())
}

fn validate_process(process: &ProcessDef, p_initial_pa: f64) -> Result<(), ValidationError> {
    match *process {
        ProcessDef::Blowdown {
            p_final_pa,
            p_back_pa,
        } => {
            positive("process.p_final_pa", p_final_pa)?;
            if p_initial_pa <= p_final_pa {
                return Err(invalid(
                    "process.p_final_pa",
                    p_final_pa,
                    "blowdown requires p_initial_pa > p_final_pa",
                ));
            }
            if let Some(pb) = p_back_pa {
                positive("process.p_back_pa", pb)?;
                if pb > p_final_pa {
                    return Err(invalid(
                        "process.p_back_pa",
                        pb,
                        "must not exceed p_final_pa",
                    ));
                }
            }
        }
        ProcessDef::Filling {
            p_supply_pa,
            p_target_pa,
        } => {
            positive("process.p_supply_pa", p_supply_pa)?;
            positive("process.p_target_pa", p_target_pa)?;
            if p_supply_pa <= p_target_pa {
                return Err(invalid(
                    "process.p_supply_pa",
                    p_supply_pa,
                    "filling requires p_supply_pa > p_target_pa",
                ));
            }
            if p_target_pa <= p_initial_pa {
                return Err(invalid(
                    "process.p_target_pa",
                    p_target_pa,
                    "filling requires p_target_pa > p_initial_pa",
                ));
            }
        }
    }
    Ok(())
}

fn validate_solver(solver: &SolverOverridesDef) -> Result<(), ValidationError> {
    if solver.max_iters == Some(0) {
        return Err(invalid("solver.max_iters", 0, "must be at least 1"));
    }
    for (field, value) in [
        ("solver.residual_tol", solver.residual_tol),
        ("solver.accept_tol_blowdown", solver.accept_tol_blowdown),
        ("solver.accept_tol_filling", solver.accept_tol_filling),
    ] {
        if let Some(v) = value {
            positive(field, v)?;
        }
    }
    Ok(())
}

/// Gas properties for a preset key or a custom definition.
pub fn resolve_gas(gas: &GasDef) -> Result<GasProperties, ValidationError> {
    match gas {
        GasDef::Preset { key } => key
            .parse::<Gas>()
            .map(|g| g.properties())
            .map_err(|_| ValidationError::UnknownGas { key: key.clone() }),
        GasDef::Custom {
            r_specific,
            gamma,
            viscosity,
        } => GasProperties::new(*r_specific, *gamma, *viscosity)
            .map_err(|e| invalid("gas", e.to_string(), "non-physical custom gas")),
    }
}
