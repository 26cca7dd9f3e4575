//! ft-components: restriction flow models for vessel blowdown and filling.
//!
//! Provides:
//! - `FlowState`: immutable SI description of a vessel, its process and its gas
//! - `OrificeModel`: compressible sharp-edged orifice with choked/subsonic phases
//! - `CapillaryModel`: laminar (Poiseuille) flow through a long thin channel
//!
//! Both models implement `FlowModel` and are pure functions of state and
//! geometry. Elapsed time is strictly decreasing in restriction area, which is
//! what the inverse solver relies on.
//!
//! # Example
//!
//! ```
//! use ft_components::{FlowModel, FlowState, OrificeModel, Process, ThermoRegime};
//! use ft_core::RestrictionGeometry;
//! use ft_fluids::Gas;
//!
//! let state = FlowState {
//!     volume_m3: 2e-7,
//!     p_initial_pa: 1.2e6,
//!     process: Process::Blowdown { p_final_pa: 1e3, p_back_pa: None },
//!     temperature_k: 288.15,
//!     length_m: 0.002,
//!     gas: Gas::Air.properties(),
//!     cd: 0.62,
//!     epsilon: 0.01,
//!     regime: ThermoRegime::Isothermal,
//! };
//!
//! let geometry = RestrictionGeometry::from_diameter(9e-6).unwrap();
//! let result = OrificeModel.forward_time(&state, &geometry).unwrap();
//! assert!(result.time_s > 150.0 && result.time_s < 200.0);
//! ```

pub mod capillary;
pub mod common;
pub mod error;
pub mod orifice;
pub mod quadrature;
pub mod result;
pub mod state;
pub mod traits;

// Re-exports
pub use capillary::CapillaryModel;
pub use error::{FlowError, FlowResult};
pub use orifice::OrificeModel;
pub use result::{ForwardResult, RegimeDiagnostics};
pub use state::{FlowState, Process, ThermoRegime};
pub use traits::{FlowModel, ModelKind};
