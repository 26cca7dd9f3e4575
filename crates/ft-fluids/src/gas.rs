//! Ideal-gas property bundle and derived quantities.

use crate::error::{FluidError, FluidResult};
use ft_core::ensure_positive;
use serde::{Deserialize, Serialize};

/// Properties of an ideal gas needed by the restriction flow models.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GasProperties {
    /// Specific gas constant R [J/(kg·K)]
    pub r_specific: f64,
    /// Heat capacity ratio γ = cp/cv (dimensionless)
    pub gamma: f64,
    /// Dynamic viscosity μ [Pa·s]
    pub viscosity: f64,
}

impl GasProperties {
    /// Create a validated property bundle.
    pub fn new(r_specific: f64, gamma: f64, viscosity: f64) -> FluidResult<Self> {
        let props = Self {
            r_specific,
            gamma,
            viscosity,
        };
        props.validate()?;
        Ok(props)
    }

    /// Check that every field is finite, positive, and that γ > 1.
    pub fn validate(&self) -> FluidResult<()> {
        ensure_positive(self.r_specific, "gas constant R")?;
        ensure_positive(self.viscosity, "dynamic viscosity")?;
        let gamma = ensure_positive(self.gamma, "heat capacity ratio")?;
        if gamma <= 1.0 {
            return Err(FluidError::NonPhysical {
                what: "heat capacity ratio",
                value: gamma,
            });
        }
        Ok(())
    }

    /// Critical (choking) pressure ratio r* = (2/(γ+1))^(γ/(γ−1)).
    pub fn critical_pressure_ratio(&self) -> f64 {
        let g = self.gamma;
        (2.0 / (g + 1.0)).powf(g / (g - 1.0))
    }

    /// Choked mass-flux factor (2/(γ+1))^((γ+1)/(2(γ−1))).
    pub fn choke_factor(&self) -> f64 {
        let g = self.gamma;
        (2.0 / (g + 1.0)).powf((g + 1.0) / (2.0 * (g - 1.0)))
    }

    /// Speed of sound √(γRT) [m/s].
    pub fn speed_of_sound(&self, t_k: f64) -> f64 {
        (self.gamma * self.r_specific * t_k).sqrt()
    }
}
