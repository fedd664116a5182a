use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::integrals::{DefaultIntegrator, Integrator};

/// Isotropic (s-type) gaussian of the form N*exp(-alpha*r^2)
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGaussian")]
pub struct Gaussian {
    exponent: f64,
    /// Normalization constant, always derived from the exponent
    norm: f64,
}

impl Gaussian {
    /// Exponent used in place of a non-positive one.
    pub const FALLBACK_EXPONENT: f64 = 1.0;

    /// Create a normalized gaussian. Exponents that are not strictly positive are replaced
    /// by [`Gaussian::FALLBACK_EXPONENT`].
    pub fn new(exponent: f64) -> Self {
        let exponent = if exponent > 0.0 {
            exponent
        } else {
            log::warn!(
                "non-positive exponent {exponent} replaced by {}",
                Self::FALLBACK_EXPONENT
            );
            Self::FALLBACK_EXPONENT
        };

        Self {
            exponent,
            norm: Self::norm(exponent),
        }
    }

    /// The normalization constant (2*alpha/pi)^(3/4)
    pub fn norm(exponent: f64) -> f64 {
        (std::f64::consts::FRAC_2_PI * exponent).powf(0.75)
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    pub fn normalization(&self) -> f64 {
        self.norm
    }
}

/// Only the exponent is read back; the normalization is always recomputed.
#[derive(Deserialize)]
struct RawGaussian {
    exponent: f64,
}

impl From<RawGaussian> for Gaussian {
    fn from(raw: RawGaussian) -> Self {
        Gaussian::new(raw.exponent)
    }
}

/// The kinds of functions a [`BasisFunction`] can be centered with.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BasisFunctionType {
    Gaussian(Gaussian),
}

impl BasisFunctionType {
    /// Exponent of the radial part of this function.
    pub fn exponent(&self) -> f64 {
        match self {
            BasisFunctionType::Gaussian(gaussian) => gaussian.exponent(),
        }
    }

    pub fn normalization(&self) -> f64 {
        match self {
            BasisFunctionType::Gaussian(gaussian) => gaussian.normalization(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BasisFunction {
    /// The type of basis function this basis function has
    pub function_type: BasisFunctionType,
    /// The position of this basis function, in natural units
    pub position: Vector3<f64>,
}

impl BasisFunction {
    /// Create a normalized gaussian basis function centered at (x, y, z)
    pub fn gaussian(exponent: f64, x: f64, y: f64, z: f64) -> Self {
        Self {
            function_type: BasisFunctionType::Gaussian(Gaussian::new(exponent)),
            position: Vector3::new(x, y, z),
        }
    }

    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    pub fn exponent(&self) -> f64 {
        self.function_type.exponent()
    }

    pub fn normalization(&self) -> f64 {
        self.function_type.normalization()
    }

    /// Squared distance between the centers of two basis functions
    pub fn squared_distance(&self, other: &BasisFunction) -> f64 {
        (other.position - self.position).norm_squared()
    }

    /// Overlap integral <self|other>, using the default integrator
    pub fn overlap(&self, other: &BasisFunction) -> f64 {
        DefaultIntegrator::default().overlap((self, other))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{BasisFunction, Gaussian};

    #[test]
    fn norm_matches_closed_form() {
        for exponent in [0.1, 0.5, 1.0, 3.7, 120.0] {
            let expected = (2.0 * exponent / std::f64::consts::PI).powf(0.75);
            assert_relative_eq!(Gaussian::norm(exponent), expected, max_relative = 1e-14);
            assert_relative_eq!(
                Gaussian::new(exponent).normalization(),
                expected,
                max_relative = 1e-14
            );
        }
    }

    #[test]
    fn non_positive_exponent_is_replaced() {
        for exponent in [0.0, -2.5, f64::NAN] {
            let gaussian = Gaussian::new(exponent);
            assert_eq!(gaussian.exponent(), Gaussian::FALLBACK_EXPONENT);
            assert_eq!(gaussian.normalization(), Gaussian::norm(1.0));
        }
    }

    #[test]
    fn deserialized_gaussians_are_normalized() {
        let function: BasisFunction = serde_json::from_str(
            r#"{"function_type": {"Gaussian": {"exponent": -3.0, "norm": 5.0}},
                "position": [0.0, 0.0, 0.0]}"#,
        )
        .unwrap();

        assert_eq!(function.exponent(), Gaussian::FALLBACK_EXPONENT);
        assert_eq!(function.normalization(), Gaussian::norm(1.0));
        assert_relative_eq!(function.overlap(&function), 1.0, epsilon = 1e-12);

        let a = BasisFunction::gaussian(2.5, 1.0, 0.0, -1.0);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(serde_json::from_str::<BasisFunction>(&json).unwrap(), a);
    }

    #[test]
    fn identical_functions() {
        let a = BasisFunction::gaussian(0.8, 1.0, -2.0, 0.5);
        let b = BasisFunction::gaussian(0.8, 1.0, -2.0, 0.5);

        assert_eq!(a.squared_distance(&b), 0.0);
        assert_relative_eq!(a.overlap(&b), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn squared_distance_is_symmetric() {
        let a = BasisFunction::gaussian(1.0, 0.0, 0.0, 0.0);
        let b = BasisFunction::gaussian(2.0, 1.0, 2.0, 2.0);

        assert_eq!(a.squared_distance(&b), 9.0);
        assert_eq!(b.squared_distance(&a), 9.0);
    }
}
