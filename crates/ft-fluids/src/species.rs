//! Preset gas catalog.

use crate::error::FluidError;
use crate::gas::GasProperties;
use serde::{Deserialize, Serialize};

/// Common gases with property values near 15-25 °C and 1 atm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gas {
    /// Dry air
    Air,
    /// Nitrogen (N₂)
    Nitrogen,
    /// Oxygen (O₂)
    Oxygen,
    /// Helium (He)
    Helium,
    /// Argon (Ar)
    Argon,
    /// Hydrogen (H₂)
    Hydrogen,
    /// Carbon dioxide (CO₂)
    CarbonDioxide,
    /// Methane (CH₄)
    Methane,
}

impl Gas {
    pub const ALL: [Gas; 8] = [
        Gas::Air,
        Gas::Nitrogen,
        Gas::Oxygen,
        Gas::Helium,
        Gas::Argon,
        Gas::Hydrogen,
        Gas::CarbonDioxide,
        Gas::Methane,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Gas::Air => "air",
            Gas::Nitrogen => "N2",
            Gas::Oxygen => "O2",
            Gas::Helium => "He",
            Gas::Argon => "Ar",
            Gas::Hydrogen => "H2",
            Gas::CarbonDioxide => "CO2",
            Gas::Methane => "CH4",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Gas::Air => "Air",
            Gas::Nitrogen => "Nitrogen",
            Gas::Oxygen => "Oxygen",
            Gas::Helium => "Helium",
            Gas::Argon => "Argon",
            Gas::Hydrogen => "Hydrogen",
            Gas::CarbonDioxide => "Carbon Dioxide",
            Gas::Methane => "Methane",
        }
    }

    /// Ideal-gas properties for this preset.
    pub fn properties(&self) -> GasProperties {
        let (r_specific, gamma, viscosity) = match self {
            Gas::Air => (287.05, 1.4, 1.81e-5),
            Gas::Nitrogen => (296.8, 1.4, 1.76e-5),
            Gas::Oxygen => (259.8, 1.395, 2.04e-5),
            Gas::Helium => (2077.1, 1.667, 1.96e-5),
            Gas::Argon => (208.1, 1.667, 2.23e-5),
            Gas::Hydrogen => (4124.2, 1.405, 8.8e-6),
            Gas::CarbonDioxide => (188.9, 1.289, 1.47e-5),
            Gas::Methane => (518.3, 1.304, 1.10e-5),
        };
        GasProperties {
            r_specific,
            gamma,
            viscosity,
        }
    }
}

impl std::str::FromStr for Gas {
    type Err = FluidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AIR" => Ok(Gas::Air),
            "N2" | "NITROGEN" => Ok(Gas::Nitrogen),
            "O2" | "OXYGEN" => Ok(Gas::Oxygen),
            "HE" | "HELIUM" => Ok(Gas::Helium),
            "AR" | "ARGON" => Ok(Gas::Argon),
            "H2" | "HYDROGEN" => Ok(Gas::Hydrogen),
            "CO2" | "CARBONDIOXIDE" | "CARBON DIOXIDE" | "CARBON_DIOXIDE" => {
                Ok(Gas::CarbonDioxide)
            }
            "CH4" | "METHANE" => Ok(Gas::Methane),
            _ => Err(FluidError::UnknownGas {
                name: s.trim().to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Gas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
