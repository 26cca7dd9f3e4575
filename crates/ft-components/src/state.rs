//! Immutable SI input bundle for a vessel flow-time evaluation.

use crate::error::{FlowError, FlowResult};
use ft_core::ensure_positive;
use ft_fluids::GasProperties;
use serde::{Deserialize, Serialize};

/// Thermodynamic treatment of the gas left in (or entering) the vessel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermoRegime {
    /// Vessel gas stays at the initial temperature.
    #[default]
    Isothermal,
    /// No heat exchange with the vessel walls.
    Adiabatic,
}

impl ThermoRegime {
    /// Polytropic exponent κ of the vessel process: 1 or γ.
    pub fn polytropic_index(&self, gamma: f64) -> f64 {
        match self {
            ThermoRegime::Isothermal => 1.0,
            ThermoRegime::Adiabatic => gamma,
        }
    }
}

/// Direction of the vessel process and its boundary pressures (absolute, Pa).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Process {
    /// Vessel discharges from `p_initial_pa` down to `p_final_pa`.
    ///
    /// The gas exhausts into `p_back_pa`; when absent the back pressure is the
    /// final pressure itself.
    Blowdown {
        p_final_pa: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        p_back_pa: Option<f64>,
    },
    /// Vessel charges from a constant supply at `p_supply_pa` up to `p_target_pa`.
    Filling { p_supply_pa: f64, p_target_pa: f64 },
}

impl Process {
    pub fn label(&self) -> &'static str {
        match self {
            Process::Blowdown { .. } => "blowdown",
            Process::Filling { .. } => "filling",
        }
    }
}

/// SI state for one vessel + restriction configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowState {
    /// Vessel volume (m³)
    pub volume_m3: f64,
    /// Initial absolute vessel pressure (Pa)
    pub p_initial_pa: f64,
    /// Blowdown or filling, with its boundary pressures
    pub process: Process,
    /// Initial vessel temperature for blowdown, supply temperature for filling (K)
    pub temperature_k: f64,
    /// Restriction length (m)
    pub length_m: f64,
    /// Ideal-gas properties
    pub gas: GasProperties,
    /// Discharge coefficient (dimensionless, 0 < Cd ≤ 1)
    pub cd: f64,
    /// Relative offset from the asymptotic endpoint pressure (0 < ε < 1)
    pub epsilon: f64,
    /// Vessel thermodynamic regime
    pub regime: ThermoRegime,
}

/// Pressures bounding one integration, resolved from a validated `FlowState`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Endpoints {
    /// Pressure the vessel starts from (Pa)
    pub p_start: f64,
    /// Pressure at which integration stops (Pa)
    pub p_stop: f64,
    /// Back pressure for blowdown, supply pressure for filling (Pa)
    pub p_ref: f64,
}

impl FlowState {
    /// Check every SI field and the process inequalities.
    ///
    /// Fails fast on the first offending field.
    pub fn validate(&self) -> FlowResult<()> {
        ensure_positive(self.volume_m3, "vessel volume")?;
        ensure_positive(self.p_initial_pa, "initial pressure")?;
        ensure_positive(self.temperature_k, "temperature")?;
        ensure_positive(self.length_m, "restriction length")?;
        self.gas.validate()?;

        let cd = ensure_positive(self.cd, "discharge coefficient")?;
        if cd > 1.0 {
            return Err(FlowError::invalid(
                "discharge coefficient",
                format!("must not exceed 1, got {cd}"),
            ));
        }
        let eps = ensure_positive(self.epsilon, "tolerance")?;
        if eps >= 1.0 {
            return Err(FlowError::invalid(
                "tolerance",
                format!("must be below 1, got {eps}"),
            ));
        }

        match self.process {
            Process::Blowdown {
                p_final_pa,
                p_back_pa,
            } => {
                let p2 = ensure_positive(p_final_pa, "final pressure")?;
                if self.p_initial_pa <= p2 {
                    return Err(FlowError::invalid(
                        "final pressure",
                        format!(
                            "blowdown requires initial pressure {} Pa > final pressure {} Pa",
                            self.p_initial_pa, p2
                        ),
                    ));
                }
                if let Some(pb) = p_back_pa {
                    let pb = ensure_positive(pb, "back pressure")?;
                    if pb > p2 {
                        return Err(FlowError::invalid(
                            "back pressure",
                            format!("back pressure {pb} Pa exceeds final pressure {p2} Pa"),
                        ));
                    }
                }
            }
            Process::Filling {
                p_supply_pa,
                p_target_pa,
            } => {
                let ps = ensure_positive(p_supply_pa, "supply pressure")?;
                let pf = ensure_positive(p_target_pa, "target pressure")?;
                if ps <= pf {
                    return Err(FlowError::invalid(
                        "supply pressure",
                        format!("filling requires supply {ps} Pa > target {pf} Pa"),
                    ));
                }
                if pf <= self.p_initial_pa {
                    return Err(FlowError::invalid(
                        "target pressure",
                        format!(
                            "filling requires target {pf} Pa > initial pressure {} Pa",
                            self.p_initial_pa
                        ),
                    ));
                }
            }
        }

        let ends = self.endpoints();
        let moves = match self.process {
            Process::Blowdown { .. } => ends.p_start > ends.p_stop,
            Process::Filling { .. } => ends.p_start < ends.p_stop,
        };
        if !moves {
            return Err(FlowError::invalid(
                "initial pressure",
                format!(
                    "initial pressure {} Pa lies inside the tolerance band of the stop pressure {} Pa",
                    ends.p_start, ends.p_stop
                ),
            ));
        }

        Ok(())
    }

    /// Polytropic exponent κ of the vessel process.
    pub fn kappa(&self) -> f64 {
        self.regime.polytropic_index(self.gas.gamma)
    }

    /// Back pressure for blowdown, supply pressure for filling.
    pub fn reference_pressure(&self) -> f64 {
        match self.process {
            Process::Blowdown {
                p_final_pa,
                p_back_pa,
            } => p_back_pa.unwrap_or(p_final_pa),
            Process::Filling { p_supply_pa, .. } => p_supply_pa,
        }
    }

    /// Pressure at which integration stops.
    ///
    /// Blowdown: `max(P2, P_b·(1+ε))`. Filling: `min(Pf, Ps·(1−ε))`.
    pub fn stop_pressure(&self) -> f64 {
        match self.process {
            Process::Blowdown { p_final_pa, .. } => {
                let pb = self.reference_pressure();
                p_final_pa.max(pb * (1.0 + self.epsilon))
            }
            Process::Filling {
                p_supply_pa,
                p_target_pa,
            } => p_target_pa.min(p_supply_pa * (1.0 - self.epsilon)),
        }
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            p_start: self.p_initial_pa,
            p_stop: self.stop_pressure(),
            p_ref: self.reference_pressure(),
        }
    }

    /// Upstream/downstream pressure ratio at the initial state.
    pub fn initial_pressure_ratio(&self) -> f64 {
        match self.process {
            Process::Blowdown { .. } => self.reference_pressure() / self.p_initial_pa,
            Process::Filling { p_supply_pa, .. } => self.p_initial_pa / p_supply_pa,
        }
    }

    /// Equivalent spherical vessel diameter (6V/π)^(1/3) (m).
    pub fn equivalent_vessel_diameter(&self) -> f64 {
        (6.0 * self.volume_m3 / std::f64::consts::PI).cbrt()
    }
}
