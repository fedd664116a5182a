//! Plain text reports of a basis set, its overlap integrals and orthogonalisation results.
use std::io::{self, Write};

use nalgebra::DMatrix;
use thiserror::Error;

use crate::{
    basis::{BasisFunction, BasisSet, SparseOverlap},
    orthog::Orthogonalization,
};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("overlap integrals have not been computed")]
    OverlapNotComputed,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Summary of the basis set and the sparsity of its overlap matrix, optionally followed by
/// a table of the basis functions.
pub fn write_system(out: &mut impl Write, basis_set: &BasisSet, print_basis: bool) -> io::Result<()> {
    writeln!(out, "\nThis system has {} basis functions", basis_set.len())?;
    writeln!(out, "Its sparsity is: {:.4} percent", basis_set.sparsity())?;
    writeln!(out, "with a threshold of {:e}\n", basis_set.threshold())?;
    writeln!(
        out,
        "That is equivalent to {} zeroes out of {} possible unique integrals.\n",
        basis_set.zeros(),
        basis_set.n_unique()
    )?;

    if print_basis {
        writeln!(out, "LIST OF BASIS FUNCTIONS\n")?;
        write_basis_functions(out, basis_set.basis_functions())?;
    }

    Ok(())
}

fn write_basis_functions(out: &mut impl Write, functions: &[BasisFunction]) -> io::Result<()> {
    writeln!(
        out,
        "{:>12}{:>12}{:>12}{:>12}{:>12}",
        "Zeta", "Norm", "x", "y", "z"
    )?;
    writeln!(out, "{}", ".".repeat(60))?;

    for function in functions {
        let position = function.position();
        writeln!(
            out,
            "{:>12.6}{:>12.6}{:>12.6}{:>12.6}{:>12.6}",
            function.exponent(),
            function.normalization(),
            position.x,
            position.y,
            position.z
        )?;
    }

    Ok(())
}

/// Every stored overlap integral with its 1-based row and column. The column index is the
/// larger of the two.
pub fn write_integrals(out: &mut impl Write, basis_set: &BasisSet) -> Result<(), ReportError> {
    let sparse = computed(basis_set)?;

    writeln!(out, "NON-ZERO INTEGRALS: {}\n", sparse.len())?;
    writeln!(out, "{:>8}{:>8}{:>20}", "Row", "Column", "Integral")?;
    writeln!(out, "{}", ".".repeat(36))?;

    for (row, col, value) in sparse.entries() {
        writeln!(out, "{:>8}{:>8}{:>20.8}", col + 1, row + 1, value)?;
    }

    Ok(())
}

/// Block averaged overlap matrix. The matrix is split into blocks of `N / fineness`
/// functions (at least one); each entry is the mean of the unique overlap integrals within
/// a block, integrals below the threshold counting as zero.
pub fn sparse_graph(basis_set: &BasisSet, fineness: i64) -> Result<DMatrix<f64>, ReportError> {
    let sparse = computed(basis_set)?;
    let n_basis = basis_set.len();

    let fineness = if fineness < 1 {
        log::warn!("invalid fineness {fineness}, must be at least 1. Using 1 instead");
        1
    } else {
        fineness as usize
    };
    let block_size = (n_basis / fineness).max(1);
    let n_blocks = n_basis.div_ceil(block_size);

    let mut sums = DMatrix::<f64>::zeros(n_blocks, n_blocks);
    for (row, col, value) in sparse.entries() {
        sums[(col / block_size, row / block_size)] += value;
    }

    let block_len = |block: usize| block_size.min(n_basis - block * block_size);
    let densities = DMatrix::from_fn(n_blocks, n_blocks, |i, j| {
        let (i, j) = (i.min(j), i.max(j));
        let pairs = if i == j {
            block_len(i) * (block_len(i) + 1) / 2
        } else {
            block_len(i) * block_len(j)
        };
        sums[(i, j)] / pairs as f64
    });

    Ok(densities)
}

/// `row col density` lines of a block matrix from [`sparse_graph`]
pub fn write_sparse_graph(out: &mut impl Write, densities: &DMatrix<f64>) -> io::Result<()> {
    for (i, j) in itertools::iproduct!(0..densities.nrows(), 0..densities.ncols()) {
        writeln!(out, "{:>15}{:>15}{:>15.6}", i, j, densities[(i, j)])?;
    }

    Ok(())
}

/// The functions that took part in an orthogonalisation, followed by the coefficients of
/// each orthonormalised function.
pub fn write_orthogonalization(
    out: &mut impl Write,
    basis_set: &BasisSet,
    result: &Orthogonalization,
) -> io::Result<()> {
    let n = result.n();

    writeln!(
        out,
        "{} ORTHOGONALISATION RESULTS\n",
        result.method.name().to_uppercase()
    )?;
    for warning in &result.warnings {
        writeln!(out, "warning: {warning}")?;
    }

    writeln!(out, "BASIS FUNCTIONS")?;
    write_basis_functions(out, &basis_set.basis_functions()[..n])?;

    write!(out, "\n\nFUNCTION SPECIFICATION")?;
    for (i, column) in result.coefficients.column_iter().enumerate() {
        writeln!(out, "\nFUNCTION {} COEFFICIENTS:", i + 1)?;
        for coefficient in column.iter() {
            writeln!(out, "{coefficient:.4}")?;
        }
    }

    Ok(())
}

fn computed(basis_set: &BasisSet) -> Result<&SparseOverlap, ReportError> {
    basis_set
        .sparse_overlap()
        .ok_or(ReportError::OverlapNotComputed)
}
