use crate::integrals::{DefaultIntegrator, Integrator};

use super::{
    sparse::{n_unique, SparseOverlap},
    BasisFunction,
};

/// An ordered set of basis functions, together with the thresholded overlap integrals
/// between them.
#[derive(Clone, Debug)]
pub struct BasisSet {
    functions: Vec<BasisFunction>,
    /// overlap integrals smaller than this are treated as zero
    threshold: f64,
    /// `None` until the overlap integrals have been computed for the current functions
    overlap: Option<ComputedOverlap>,
}

#[derive(Clone, Debug)]
struct ComputedOverlap {
    sparse: SparseOverlap,
    zeros: usize,
}

impl BasisSet {
    /// Threshold used when none is given.
    pub const DEFAULT_THRESHOLD: f64 = 1e-4;

    /// Create an empty basis set.
    pub fn new(threshold: f64) -> Self {
        Self {
            functions: Vec::new(),
            threshold,
            overlap: None,
        }
    }

    /// Append a basis function. Any previously computed overlap integrals are discarded.
    pub fn add(&mut self, function: BasisFunction) {
        if self.overlap.take().is_some() {
            log::debug!("basis function added, discarding computed overlap integrals");
        }
        self.functions.push(function);
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn basis_functions(&self) -> &[BasisFunction] {
        &self.functions
    }

    /// Returns the basis function with the (0-based) index, if it exists.
    pub fn basis_function(&self, index: usize) -> Option<&BasisFunction> {
        self.functions.get(index)
    }

    /// Compute the overlap integrals of all pairs using the default integrator.
    pub fn compute_overlap(&mut self) {
        self.compute_overlap_with(&DefaultIntegrator::default())
    }

    /// Compute the overlap integrals of all unique pairs (row, col), col <= row, and keep
    /// those that are not smaller than the threshold. Diagonal entries are thresholded
    /// like every other entry. Always performs a full pass from scratch.
    pub fn compute_overlap_with(&mut self, integrator: &impl Integrator<Function = BasisFunction>) {
        let n_basis = self.functions.len();

        let mut sparse = SparseOverlap::with_capacity(n_basis);
        let mut zeros = 0;

        for row in 0..n_basis {
            for col in 0..=row {
                let overlap = integrator.overlap((&self.functions[row], &self.functions[col]));
                log::trace!("overlap ({row}, {col}) = {overlap}");

                if overlap < self.threshold {
                    zeros += 1;
                } else {
                    sparse.push(row, col, overlap);
                }
            }
        }

        log::debug!(
            "computed {} overlap integrals: {} kept, {zeros} below threshold {:e}",
            n_unique(n_basis),
            sparse.len(),
            self.threshold
        );

        self.overlap = Some(ComputedOverlap { sparse, zeros });
    }

    /// Whether the overlap integrals are up to date with the basis functions
    pub fn is_computed(&self) -> bool {
        self.overlap.is_some()
    }

    /// The non-negligible overlap integrals, if they have been computed
    pub fn sparse_overlap(&self) -> Option<&SparseOverlap> {
        self.overlap.as_ref().map(|overlap| &overlap.sparse)
    }

    /// Number of unique integrals that were below the threshold. Zero before computation.
    pub fn zeros(&self) -> usize {
        self.overlap.as_ref().map_or(0, |overlap| overlap.zeros)
    }

    /// Number of unique integrals (the lower triangle including the diagonal)
    pub fn n_unique(&self) -> usize {
        n_unique(self.functions.len())
    }

    /// Percentage of unique overlap integrals treated as zero.
    pub fn sparsity(&self) -> f64 {
        match self.n_unique() {
            0 => 0.0,
            n_unique => 100.0 * self.zeros() as f64 / n_unique as f64,
        }
    }
}

impl Default for BasisSet {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}
