use overlap_core::{basis::BasisFunction, orthogonalize, BasisSet, OrthogonalizationMethod};

use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// `n` gaussians with random exponents scattered through a cube with the given edge length
fn random_basis_set(n: usize, edge: f64) -> BasisSet {
    let mut rng = StdRng::seed_from_u64(n as u64);
    let mut basis_set = BasisSet::default();

    for _ in 0..n {
        basis_set.add(BasisFunction::gaussian(
            rng.gen_range(0.3..3.0),
            rng.gen_range(0.0..edge),
            rng.gen_range(0.0..edge),
            rng.gen_range(0.0..edge),
        ));
    }

    basis_set
}

fn bench_overlap(c: &mut Criterion) {
    for (n, edge) in [(100, 10.0), (500, 25.0), (2000, 40.0)] {
        let basis_set = random_basis_set(n, edge);

        c.bench_function(&format!("Overlap {n} functions"), move |b| {
            b.iter_batched(
                || basis_set.clone(),
                |mut basis_set| basis_set.compute_overlap(),
                criterion::BatchSize::LargeInput,
            )
        });
    }
}

fn bench_orthogonalize(c: &mut Criterion) {
    let mut basis_set = random_basis_set(200, 15.0);
    basis_set.compute_overlap();

    for method in [
        OrthogonalizationMethod::GramSchmidt,
        OrthogonalizationMethod::Canonical,
        OrthogonalizationMethod::SymmetricLowdin,
    ] {
        let basis_set = &basis_set;
        c.bench_function(&format!("Orthogonalize 200 functions, {method}"), move |b| {
            b.iter(|| orthogonalize(basis_set, 200, method))
        });
    }
}

criterion_group!(benches, bench_overlap, bench_orthogonalize);
criterion_main!(benches);
