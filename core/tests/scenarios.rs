use approx::assert_relative_eq;
use nalgebra::DMatrix;
use overlap_core::{
    basis::BasisFunction,
    config::{Command, ConfigSystem},
    orthog::OrthogonalizationWarning,
    orthogonalize, orthogonalize_tagged, report, BasisSet, OrthogonalizationMethod,
};

fn four_functions() -> BasisSet {
    let mut basis_set = BasisSet::new(1e-4);
    basis_set.add(BasisFunction::gaussian(1.0, 0.0, 0.0, 0.0));
    basis_set.add(BasisFunction::gaussian(0.7, 1.1, 0.0, 0.0));
    basis_set.add(BasisFunction::gaussian(1.3, 0.0, 1.4, 0.0));
    basis_set.add(BasisFunction::gaussian(0.9, 0.3, 0.2, 1.2));
    basis_set.compute_overlap();
    basis_set
}

fn assert_orthonormal(basis_set: &BasisSet, coefficients: &DMatrix<f64>) {
    let n = coefficients.ncols();
    let overlap = basis_set.sparse_overlap().unwrap().to_dense(n);
    assert_relative_eq!(
        coefficients.transpose() * overlap * coefficients,
        DMatrix::identity(n, n),
        epsilon = 1e-10
    );
}

#[test]
fn identical_functions_overlap_completely() {
    let a = BasisFunction::gaussian(1.7, 0.2, 0.4, -3.0);
    let b = BasisFunction::gaussian(1.7, 0.2, 0.4, -3.0);

    assert_eq!(a.squared_distance(&b), 0.0);
    assert_relative_eq!(a.overlap(&b), 1.0, epsilon = 1e-12);
}

#[test]
fn separated_functions_keep_only_the_diagonal() {
    let mut basis_set = BasisSet::new(1e-4);
    for i in 0..3 {
        basis_set.add(BasisFunction::gaussian(1.0, 1000.0 * i as f64, 0.0, 0.0));
    }
    basis_set.compute_overlap();

    assert_eq!(basis_set.zeros(), 3);
    let sparse = basis_set.sparse_overlap().unwrap();
    assert_eq!(sparse.len(), 3);
    for (row, col, value) in sparse.entries() {
        assert_eq!(row, col);
        assert_relative_eq!(value, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn non_positive_prefix_is_clamped() {
    let basis_set = four_functions();

    for requested in [0, -5] {
        let result = orthogonalize(&basis_set, requested, OrthogonalizationMethod::GramSchmidt)
            .unwrap();
        assert_eq!(result.coefficients.shape(), (4, 4));
        assert!(matches!(
            result.warnings[..],
            [OrthogonalizationWarning::NonPositiveCount { used: 4, .. }]
        ));
        assert_orthonormal(&basis_set, &result.coefficients);
    }
}

#[test]
fn oversized_prefix_is_clamped() {
    let basis_set = four_functions();
    let result = orthogonalize(&basis_set, 10, OrthogonalizationMethod::Canonical).unwrap();

    assert_eq!(result.n(), 4);
    assert!(matches!(
        result.warnings[..],
        [OrthogonalizationWarning::CountTooLarge {
            requested: 10,
            used: 4
        }]
    ));
}

#[test]
fn unknown_method_tag_uses_canonical() {
    let basis_set = four_functions();
    let result = orthogonalize_tagged(&basis_set, 4, "jacobi").unwrap();

    assert_eq!(result.method, OrthogonalizationMethod::Canonical);
    assert!(matches!(
        &result.warnings[..],
        [OrthogonalizationWarning::UnknownMethod(tag)] if tag == "jacobi"
    ));
    assert_orthonormal(&basis_set, &result.coefficients);
}

#[test]
fn input_to_reports() {
    let input = "\
basis,
A, 1.0
B, 0.5
basisend
geom,
A, 0.0, 0.0, 0.0
B, 1.0, 0.0, 0.0
A, 0.0, 0.0, 30.0
geomend
threshold, 1e-5
print, integrals
print, sparsegraph, 3
orthog, gramschmidt, 3
";
    let config: ConfigSystem = input.parse().unwrap();
    let mut basis_set = BasisSet::try_from(&config).unwrap();
    basis_set.compute_overlap();

    // A, A, B: the two A functions are far apart, B overlaps with the first A only
    assert_eq!(basis_set.len(), 3);
    assert_eq!(basis_set.zeros(), 2);

    let mut out = Vec::new();
    for command in &config.commands {
        match command {
            Command::PrintIntegrals => report::write_integrals(&mut out, &basis_set).unwrap(),
            Command::SparseGraph { fineness } => {
                let densities = report::sparse_graph(&basis_set, *fineness).unwrap();
                report::write_sparse_graph(&mut out, &densities).unwrap()
            }
            Command::Orthogonalize { method, n } => {
                let result = orthogonalize_tagged(&basis_set, *n, method).unwrap();
                assert_orthonormal(&basis_set, &result.coefficients);
                report::write_orthogonalization(&mut out, &basis_set, &result).unwrap()
            }
        }
    }

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("NON-ZERO INTEGRALS: 4"));
    assert!(out.contains("GRAM SCHMIDT ORTHOGONALISATION RESULTS"));
}
