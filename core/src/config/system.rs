use serde::{Deserialize, Serialize};

use crate::basis::{BasisFunction, BasisSet};

use super::ConfigError;

/// A full calculation in a config file: the basis, the geometry it is placed on, and
/// the commands to run afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSystem {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    pub basis: Vec<ConfigBasis>,
    pub geometry: ConfigMolecule,
    #[serde(default)]
    pub commands: Vec<Command>,
}

fn default_threshold() -> f64 {
    BasisSet::DEFAULT_THRESHOLD
}

/// The exponent of the gaussian placed on every atom with this label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigBasis {
    pub label: String,
    pub exponent: f64,
}

/// A molecule is just a list of labelled, positioned atoms.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigMolecule(pub Vec<ConfigAtom>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigAtom {
    pub label: String,
    pub position: Vec<f64>,
}

/// Something to do with the basis set once its overlap integrals are known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// List the non-zero overlap integrals
    PrintIntegrals,
    /// Block densities of the overlap matrix, for plotting
    SparseGraph { fineness: i64 },
    /// Orthogonalise the first `n` functions. The method is kept as written, unknown
    /// methods are resolved by the orthogonaliser.
    Orthogonalize { method: String, n: i64 },
}

impl TryFrom<&ConfigSystem> for BasisSet {
    type Error = ConfigError;

    /// Basis functions are added basis entry by basis entry; within an entry, in the
    /// order the matching atoms appear in the geometry.
    fn try_from(value: &ConfigSystem) -> Result<Self, Self::Error> {
        let ConfigMolecule(atoms) = &value.geometry;
        if value.basis.is_empty() {
            return Err(ConfigError::MissingBasis);
        }
        if atoms.is_empty() {
            return Err(ConfigError::MissingGeometry);
        }

        let mut basis_set = BasisSet::new(value.threshold);

        for ConfigBasis { label, exponent } in &value.basis {
            for atom in atoms.iter().filter(|atom| &atom.label == label) {
                let &[x, y, z] = atom.position.as_slice() else {
                    return Err(ConfigError::Coordinates {
                        label: atom.label.clone(),
                        found: atom.position.len(),
                    });
                };

                basis_set.add(BasisFunction::gaussian(*exponent, x, y, z));
            }
        }

        for atom in atoms {
            if !value.basis.iter().any(|basis| basis.label == atom.label) {
                log::warn!("no basis given for atom `{}`, skipping it", atom.label);
            }
        }

        Ok(basis_set)
    }
}
