//! The orthogonalisation procedures. Each takes the overlap matrix S of a set of functions
//! and the matrix P whose columns expand those functions in the original basis, and returns
//! the coefficients of the orthonormalised functions in the original basis.
use nalgebra::{Cholesky, DMatrix};

use super::{utils, OrthogonalizationMethod, OrthogonalizationWarning};

/// f = P L^-T, where S = L L^T is the Cholesky decomposition of S. The coefficient matrix
/// is upper triangular: the i-th function only has contributions from functions 0..=i.
///
/// Returns `None` if S is not positive definite.
pub fn gram_schmidt(overlap: &DMatrix<f64>, functions: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let n = overlap.nrows();

    let cholesky = Cholesky::new(overlap.clone())?;
    let l_inverse = cholesky
        .l()
        .solve_lower_triangular(&DMatrix::identity(n, n))?;

    Some(functions * l_inverse.transpose())
}

/// f = P W D^-1/2, with W the eigenvectors and D the eigenvalues of S.
pub fn canonical(
    overlap: &DMatrix<f64>,
    functions: &DMatrix<f64>,
    warnings: &mut Vec<OrthogonalizationWarning>,
) -> DMatrix<f64> {
    let (eigenvectors, inverse_sqrt) =
        decompose(overlap, OrthogonalizationMethod::Canonical, warnings);

    functions * eigenvectors * inverse_sqrt
}

/// f = P S^-1/2 = P W D^-1/2 W^T
pub fn symmetric_lowdin(
    overlap: &DMatrix<f64>,
    functions: &DMatrix<f64>,
    warnings: &mut Vec<OrthogonalizationWarning>,
) -> DMatrix<f64> {
    let (eigenvectors, inverse_sqrt) =
        decompose(overlap, OrthogonalizationMethod::SymmetricLowdin, warnings);

    functions * &eigenvectors * inverse_sqrt * eigenvectors.transpose()
}

/// (W, D^-1/2) of the overlap matrix
fn decompose(
    overlap: &DMatrix<f64>,
    method: OrthogonalizationMethod,
    warnings: &mut Vec<OrthogonalizationWarning>,
) -> (DMatrix<f64>, DMatrix<f64>) {
    let (eigenvectors, eigenvalues) = utils::sorted_eigs(overlap.clone());
    log::debug!("overlap eigenvalues: {eigenvalues:0.6}");

    let (inverse_sqrt, non_positive) = utils::inverse_sqrt_diagonal(&eigenvalues);
    for eigenvalue in non_positive {
        let warning = OrthogonalizationWarning::NonPositiveEigenvalue { method, eigenvalue };
        log::warn!("{warning}");
        warnings.push(warning);
    }

    (eigenvectors, inverse_sqrt)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    use crate::orthog::OrthogonalizationWarning;

    use super::{canonical, gram_schmidt, symmetric_lowdin};

    fn overlap() -> DMatrix<f64> {
        DMatrix::from_row_slice(3, 3, &[1.0, 0.4, 0.1, 0.4, 1.0, 0.3, 0.1, 0.3, 1.0])
    }

    #[test]
    fn gram_schmidt_is_upper_triangular() {
        let s = overlap();
        let f = gram_schmidt(&s, &DMatrix::identity(3, 3)).unwrap();

        // function i only has contributions from functions 0..=i
        for row in 0..3 {
            for col in 0..row {
                assert_eq!(f[(row, col)], 0.0);
            }
        }
        assert_relative_eq!(f.transpose() * &s * &f, DMatrix::identity(3, 3), epsilon = 1e-12);
        // the first function is only rescaled
        assert_relative_eq!(f[(0, 0)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn gram_schmidt_fails_for_singular_overlap() {
        let s = DMatrix::from_element(2, 2, 1.0);
        assert!(gram_schmidt(&s, &DMatrix::identity(2, 2)).is_none());
    }

    #[test]
    fn lowdin_is_symmetric() {
        let s = overlap();
        let mut warnings = Vec::new();
        let f = symmetric_lowdin(&s, &DMatrix::identity(3, 3), &mut warnings);

        assert!(warnings.is_empty());
        assert_relative_eq!(f, f.transpose(), epsilon = 1e-12);
        assert_relative_eq!(&f * &f * &s, DMatrix::identity(3, 3), epsilon = 1e-12);
    }

    #[test]
    fn canonical_orthonormalises() {
        let s = overlap();
        let mut warnings = Vec::new();
        let f = canonical(&s, &DMatrix::identity(3, 3), &mut warnings);

        assert!(warnings.is_empty());
        assert_relative_eq!(f.transpose() * &s * &f, DMatrix::identity(3, 3), epsilon = 1e-12);
    }

    #[test]
    fn canonical_zeroes_dependent_combinations() {
        // two identical functions: one eigenvalue is (numerically) zero
        let s = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let mut warnings = Vec::new();
        let f = canonical(&s, &DMatrix::identity(2, 2), &mut warnings);

        let zeroed = warnings
            .iter()
            .filter(|warning| matches!(warning, OrthogonalizationWarning::NonPositiveEigenvalue { .. }))
            .count();
        let columns_zero = f
            .column_iter()
            .filter(|column| column.iter().all(|&c| c == 0.0))
            .count();
        assert_eq!(zeroed, columns_zero);
        assert_eq!(f.ncols(), 2);
    }
}
