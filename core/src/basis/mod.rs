mod functions;
mod set;
mod sparse;

pub use functions::{BasisFunction, BasisFunctionType, Gaussian};
pub use set::BasisSet;
pub use sparse::{n_unique, packed_index, unpack_index, InvalidSparseOverlap, SparseOverlap};
