//! Sparse overlap integrals of gaussian basis functions, and orthogonalisation of the
//! functions they describe.
pub mod basis;
pub mod config;
pub mod integrals;
pub mod orthog;
pub mod report;

pub use basis::{BasisFunction, BasisSet};
pub use orthog::{orthogonalize, orthogonalize_tagged, Orthogonalization, OrthogonalizationMethod};
