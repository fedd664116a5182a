//! Orthogonalisation of a leading subset of the functions in a [`BasisSet`].
mod methods;
mod utils;

use std::{fmt, str::FromStr};

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use methods::{canonical, gram_schmidt, symmetric_lowdin};

use crate::basis::BasisSet;

/// Number of functions orthogonalised when a non-positive count is requested.
pub const DEFAULT_COUNT: usize = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrthogonalizationMethod {
    GramSchmidt,
    Canonical,
    SymmetricLowdin,
}

impl OrthogonalizationMethod {
    pub fn name(&self) -> &'static str {
        match self {
            OrthogonalizationMethod::GramSchmidt => "gram schmidt",
            OrthogonalizationMethod::Canonical => "canonical",
            OrthogonalizationMethod::SymmetricLowdin => "symmetric lowdin",
        }
    }
}

impl fmt::Display for OrthogonalizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown orthogonalisation method `{0}`")]
pub struct UnknownMethod(pub String);

impl FromStr for OrthogonalizationMethod {
    type Err = UnknownMethod;

    /// Case, whitespace, '-' and '_' insensitive: "gramschmidt", "Gram-Schmidt",
    /// "canonical", "symlowdin", "symmetric_lowdin", "lowdin", ...
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let normalized = tag
            .chars()
            .filter(|c| !(c.is_whitespace() || *c == '-' || *c == '_'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "gramschmidt" | "gs" => Ok(OrthogonalizationMethod::GramSchmidt),
            "canonical" => Ok(OrthogonalizationMethod::Canonical),
            "symlowdin" | "symmetriclowdin" | "lowdin" | "symmetric" => {
                Ok(OrthogonalizationMethod::SymmetricLowdin)
            }
            _ => Err(UnknownMethod(tag.to_owned())),
        }
    }
}

/// Conditions that were corrected while orthogonalising. The result is still usable.
#[derive(Debug, Clone, PartialEq)]
pub enum OrthogonalizationWarning {
    /// A count <= 0 was requested
    NonPositiveCount { requested: i64, used: usize },
    /// More functions were requested than the basis set contains
    CountTooLarge { requested: i64, used: usize },
    /// The method tag was not recognised, canonical orthogonalisation was used
    UnknownMethod(String),
    /// An eigenvalue of the overlap matrix was not positive, its D^-1/2 entry was set to zero
    NonPositiveEigenvalue {
        method: OrthogonalizationMethod,
        eigenvalue: f64,
    },
}

impl fmt::Display for OrthogonalizationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrthogonalizationWarning::NonPositiveCount { requested, used } => write!(
                f,
                "invalid number of functions to orthogonalise ({requested}), doing {used} instead"
            ),
            OrthogonalizationWarning::CountTooLarge { requested, used } => write!(
                f,
                "too many functions to orthogonalise ({requested}), doing all {used} instead"
            ),
            OrthogonalizationWarning::UnknownMethod(tag) => {
                write!(f, "unknown method `{tag}` requested, defaulting to canonical")
            }
            OrthogonalizationWarning::NonPositiveEigenvalue { method, eigenvalue } => write!(
                f,
                "non-positive eigenvalue {eigenvalue:e} found in {method} procedure, setting to zero"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrthogonalizationError {
    #[error("overlap integrals have not been computed for the current basis functions")]
    OverlapNotComputed,
    #[error("overlap matrix of the first {n} basis functions is not positive definite")]
    NotPositiveDefinite { n: usize },
}

/// The outcome of an orthogonalisation.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Orthogonalization {
    /// The method that was actually used
    pub method: OrthogonalizationMethod,
    /// Column i holds the coefficients of the i-th orthonormal function in terms of the
    /// first n basis functions
    pub coefficients: DMatrix<f64>,
    /// Everything that was corrected along the way
    pub warnings: Vec<OrthogonalizationWarning>,
}

impl Orthogonalization {
    /// The number of functions that were orthogonalised
    pub fn n(&self) -> usize {
        self.coefficients.ncols()
    }
}

/// Orthogonalise the first `n` functions of the basis set.
///
/// A count <= 0 is replaced by min(5, N), a count above N by N; both are reported as
/// warnings. Fails only if the overlap integrals have not been computed, or if Gram-Schmidt
/// is requested for an overlap matrix that is not positive definite.
pub fn orthogonalize(
    basis_set: &BasisSet,
    n: i64,
    method: OrthogonalizationMethod,
) -> Result<Orthogonalization, OrthogonalizationError> {
    orthogonalize_with_warnings(basis_set, n, method, Vec::new())
}

/// Like [`orthogonalize`], with the method given as a tag. Unknown tags fall back to
/// canonical orthogonalisation.
pub fn orthogonalize_tagged(
    basis_set: &BasisSet,
    n: i64,
    method: &str,
) -> Result<Orthogonalization, OrthogonalizationError> {
    match method.parse() {
        Ok(method) => orthogonalize(basis_set, n, method),
        Err(UnknownMethod(tag)) => {
            let warning = OrthogonalizationWarning::UnknownMethod(tag);
            log::warn!("{warning}");
            orthogonalize_with_warnings(
                basis_set,
                n,
                OrthogonalizationMethod::Canonical,
                vec![warning],
            )
        }
    }
}

fn orthogonalize_with_warnings(
    basis_set: &BasisSet,
    n: i64,
    method: OrthogonalizationMethod,
    mut warnings: Vec<OrthogonalizationWarning>,
) -> Result<Orthogonalization, OrthogonalizationError> {
    let sparse = basis_set
        .sparse_overlap()
        .ok_or(OrthogonalizationError::OverlapNotComputed)?;

    let n_basis = basis_set.len();
    let n = clamp_count(n, n_basis, &mut warnings);

    if n == 0 {
        return Ok(Orthogonalization {
            method,
            coefficients: DMatrix::zeros(0, 0),
            warnings,
        });
    }

    // only the diagonal survived the threshold: the functions are already orthonormal
    let overlap = if sparse.len() == n_basis {
        DMatrix::identity(n, n)
    } else {
        sparse.to_dense(n)
    };
    log::debug!("overlap matrix of the first {n} functions: {overlap:0.4}");

    // the functions to orthogonalise are the basis functions themselves
    let functions = DMatrix::identity(n, n);

    let coefficients = match method {
        OrthogonalizationMethod::GramSchmidt => gram_schmidt(&overlap, &functions)
            .ok_or(OrthogonalizationError::NotPositiveDefinite { n })?,
        OrthogonalizationMethod::Canonical => canonical(&overlap, &functions, &mut warnings),
        OrthogonalizationMethod::SymmetricLowdin => {
            symmetric_lowdin(&overlap, &functions, &mut warnings)
        }
    };

    Ok(Orthogonalization {
        method,
        coefficients,
        warnings,
    })
}

fn clamp_count(requested: i64, n_basis: usize, warnings: &mut Vec<OrthogonalizationWarning>) -> usize {
    let (used, warning) = match usize::try_from(requested) {
        Ok(n) if (1..=n_basis).contains(&n) => return n,
        Ok(n) if n > n_basis => (
            n_basis,
            OrthogonalizationWarning::CountTooLarge {
                requested,
                used: n_basis,
            },
        ),
        _ => {
            let used = DEFAULT_COUNT.min(n_basis);
            (
                used,
                OrthogonalizationWarning::NonPositiveCount { requested, used },
            )
        }
    };

    log::warn!("{warning}");
    warnings.push(warning);
    used
}
