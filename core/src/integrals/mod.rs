pub mod product;

pub type DefaultIntegrator = product::GaussianProduct;

pub trait Integrator {
    type Function;

    /// Calculate the overlap integral between two basis functions.
    fn overlap(&self, functions: (&Self::Function, &Self::Function)) -> f64;
}
