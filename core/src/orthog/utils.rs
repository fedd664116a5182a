use itertools::Itertools;
use nalgebra::{DMatrix, DVector, SymmetricEigen};

/// Eigenvectors (as columns) and eigenvalues of a symmetric matrix, in ascending order of
/// the eigenvalues.
pub(super) fn sorted_eigs(matrix: DMatrix<f64>) -> (DMatrix<f64>, DVector<f64>) {
    if matrix.is_empty() {
        return (DMatrix::zeros(0, 0), DVector::zeros(0));
    }

    let SymmetricEigen {
        eigenvectors,
        eigenvalues,
    } = SymmetricEigen::new(matrix);

    let order = (0..eigenvalues.len())
        .sorted_by(|&a, &b| eigenvalues[a].total_cmp(&eigenvalues[b]))
        .collect::<Vec<_>>();

    (
        eigenvectors.select_columns(&order),
        eigenvalues.select_rows(&order),
    )
}

/// D^-1/2 for the eigenvalues D. Non-positive eigenvalues map to zero; they are returned
/// alongside so the caller can report them.
pub(super) fn inverse_sqrt_diagonal(eigenvalues: &DVector<f64>) -> (DMatrix<f64>, Vec<f64>) {
    let mut non_positive = Vec::new();

    let diagonal = eigenvalues.map(|value| {
        if value > 0.0 {
            value.sqrt().recip()
        } else {
            non_positive.push(value);
            0.0
        }
    });

    (DMatrix::from_diagonal(&diagonal), non_positive)
}
