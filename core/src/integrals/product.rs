//! Overlap integrals of isotropic gaussians via the gaussian product rule.
//! Reference:
//!
//! [1] Helgaker, T., Jørgensen, P., Olsen, J. Molecular Electronic-Structure Theory, 9.2.
use crate::basis::{BasisFunction, BasisFunctionType, Gaussian};

use super::Integrator;

#[derive(Default)]
pub struct GaussianProduct;

impl Integrator for GaussianProduct {
    type Function = BasisFunction;

    fn overlap(&self, functions: (&Self::Function, &Self::Function)) -> f64 {
        let (basis_a, basis_b) = functions;
        let distance_squared = basis_a.squared_distance(basis_b);

        match (&basis_a.function_type, &basis_b.function_type) {
            (BasisFunctionType::Gaussian(gaussian_a), BasisFunctionType::Gaussian(gaussian_b)) => {
                primitive_overlap(*gaussian_a, *gaussian_b, distance_squared)
            }
        }
    }
}

fn primitive_overlap(gaussian_a: Gaussian, gaussian_b: Gaussian, distance_squared: f64) -> f64 {
    let (a, b) = (gaussian_a.exponent(), gaussian_b.exponent());

    let p = a + b;
    let mu = a * b / p;
    let pre_exponential = (-mu * distance_squared).exp();

    // multiplied first so the result is exactly symmetric in (a, b)
    let norm = gaussian_a.normalization() * gaussian_b.normalization();

    pre_exponential * norm * (std::f64::consts::PI / p).powi(3).sqrt()
}
