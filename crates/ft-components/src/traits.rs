//! Flow model trait and model identifiers.

use crate::capillary::CapillaryModel;
use crate::error::FlowResult;
use crate::orifice::OrificeModel;
use crate::result::ForwardResult;
use crate::state::FlowState;
use ft_core::RestrictionGeometry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which restriction flow law governs a configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Orifice,
    Capillary,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::Orifice, ModelKind::Capillary];

    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::Orifice => "orifice",
            ModelKind::Capillary => "capillary",
        }
    }

    /// The stateless model implementing this law.
    pub fn model(&self) -> &'static dyn FlowModel {
        match self {
            ModelKind::Orifice => &OrificeModel,
            ModelKind::Capillary => &CapillaryModel,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ModelKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "orifice" => Ok(ModelKind::Orifice),
            "capillary" => Ok(ModelKind::Capillary),
            _ => Err("unknown model (expected 'orifice' or 'capillary')"),
        }
    }
}

/// Forward flow-time model for a restriction between a vessel and its surroundings.
///
/// Implementations must be pure and deterministic, and the returned time must
/// be strictly decreasing in restriction area for a fixed state.
pub trait FlowModel: Send + Sync {
    fn kind(&self) -> ModelKind;

    /// Elapsed time for the configured process through `geometry`.
    ///
    /// Invalid state fields produce `FlowError::InvalidInput`. A time that
    /// overflows is returned as a non-finite value, not an error.
    fn forward_time(
        &self,
        state: &FlowState,
        geometry: &RestrictionGeometry,
    ) -> FlowResult<ForwardResult>;

    /// Same as [`FlowModel::forward_time`] for a raw area (m²).
    fn forward_time_for_area(&self, state: &FlowState, area_m2: f64) -> FlowResult<ForwardResult> {
        let geometry = RestrictionGeometry::from_area(area_m2)?;
        self.forward_time(state, &geometry)
    }
}
