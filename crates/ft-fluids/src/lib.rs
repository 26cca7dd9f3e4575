//! ft-fluids: ideal-gas property provider for flowtime.
//!
//! Provides:
//! - `GasProperties`: specific gas constant, heat-capacity ratio, dynamic viscosity
//! - `Gas`: preset catalog of common gases near room temperature
//! - derived ideal-gas quantities (critical pressure ratio, choking factor, speed of sound)
//!
//! # Example
//!
//! ```
//! use ft_fluids::Gas;
//!
//! let air = Gas::Air.properties();
//! assert!((air.critical_pressure_ratio() - 0.528).abs() < 1e-3);
//! ```

pub mod error;
pub mod gas;
pub mod species;

pub use error::{FluidError, FluidResult};
pub use gas::GasProperties;
pub use species::Gas;
