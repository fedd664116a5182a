mod input;
mod system;

use thiserror::Error;

pub use system::{Command, ConfigAtom, ConfigBasis, ConfigMolecule, ConfigSystem};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no basis specification was given")]
    MissingBasis,
    #[error("no geometry specification was given")]
    MissingGeometry,
    #[error("atom `{label}` has {found} coordinates, expected 3")]
    Coordinates { label: String, found: usize },
    #[error("line {line}: {kind}")]
    Syntax { line: usize, kind: SyntaxError },
}

/// A malformed line in the line based input format
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("unknown print command `{0}`")]
    UnknownPrint(String),
    #[error("no orthogonalisation method specified")]
    MissingMethod,
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("invalid number `{0}`")]
    Number(String),
    #[error("`{0}` block is never closed")]
    Unterminated(&'static str),
}
