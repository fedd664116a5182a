//! The line based input format:
//!
//! ```text
//! ! comments start with an exclamation mark
//! threshold, 1e-4
//! basis,
//! H, 0.5
//! O, 2.0
//! basisend
//! geom,
//! O, 0.0, 0.0, 0.0
//! H, 0.0, 0.75, 0.585
//! geomend
//! print, integrals
//! print, sparsegraph, 100
//! orthog, symlowdin, 10
//! ```
//!
//! Keywords are case insensitive and may contain spaces.
use std::str::FromStr;

use crate::basis::BasisSet;

use super::{
    Command, ConfigAtom, ConfigBasis, ConfigError, ConfigMolecule, ConfigSystem, SyntaxError,
};

enum Block {
    Top,
    Basis { opened: usize },
    Geometry { opened: usize },
}

impl FromStr for ConfigSystem {
    type Err = ConfigError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut threshold = BasisSet::DEFAULT_THRESHOLD;
        let mut basis = Vec::new();
        let mut atoms = Vec::new();
        let mut commands = Vec::new();

        let mut block = Block::Top;

        for (index, line) in input.lines().enumerate() {
            let line_number = index + 1;
            let syntax = |kind: SyntaxError| ConfigError::Syntax {
                line: line_number,
                kind,
            };

            let line = line.split('!').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            let fields = line.split(',').map(str::trim).collect::<Vec<_>>();
            let keyword = keyword(fields[0]);

            match block {
                Block::Basis { .. } if keyword == "basisend" => block = Block::Top,
                Block::Basis { .. } => {
                    let [label, exponent] = exact_fields::<2>(&fields).map_err(syntax)?;
                    basis.push(ConfigBasis {
                        label: label.to_owned(),
                        exponent: number(exponent).map_err(syntax)?,
                    });
                }
                Block::Geometry { .. } if keyword == "geomend" => block = Block::Top,
                Block::Geometry { .. } => {
                    let [label, x, y, z] = exact_fields::<4>(&fields).map_err(syntax)?;
                    atoms.push(ConfigAtom {
                        label: label.to_owned(),
                        position: vec![
                            number(x).map_err(syntax)?,
                            number(y).map_err(syntax)?,
                            number(z).map_err(syntax)?,
                        ],
                    });
                }
                Block::Top => match keyword.as_str() {
                    "basis" => {
                        block = Block::Basis {
                            opened: line_number,
                        }
                    }
                    "geom" => {
                        block = Block::Geometry {
                            opened: line_number,
                        }
                    }
                    "threshold" => {
                        let [_, value] = exact_fields::<2>(&fields).map_err(syntax)?;
                        threshold = number(value).map_err(syntax)?;
                    }
                    "print" => commands.push(print_command(&fields).map_err(syntax)?),
                    "orthog" => commands.push(orthog_command(&fields).map_err(syntax)?),
                    _ => return Err(syntax(SyntaxError::UnknownCommand(fields[0].to_owned()))),
                },
            }
        }

        let (opened, name) = match block {
            Block::Top => {
                return Ok(ConfigSystem {
                    threshold,
                    basis,
                    geometry: ConfigMolecule(atoms),
                    commands,
                })
            }
            Block::Basis { opened } => (opened, "basis"),
            Block::Geometry { opened } => (opened, "geom"),
        };

        Err(ConfigError::Syntax {
            line: opened,
            kind: SyntaxError::Unterminated(name),
        })
    }
}

/// `print, integrals` or `print, sparsegraph, fineness`
fn print_command(fields: &[&str]) -> Result<Command, SyntaxError> {
    let target = fields.get(1).copied().unwrap_or_default();

    match keyword(target).as_str() {
        "integrals" => {
            exact_fields::<2>(fields)?;
            Ok(Command::PrintIntegrals)
        }
        "sparsegraph" => {
            let [_, _, fineness] = exact_fields::<3>(fields)?;
            Ok(Command::SparseGraph {
                fineness: integer(fineness)?,
            })
        }
        _ => Err(SyntaxError::UnknownPrint(target.to_owned())),
    }
}

/// `orthog, method, n`
fn orthog_command(fields: &[&str]) -> Result<Command, SyntaxError> {
    match exact_fields::<3>(fields) {
        Ok([_, method, n]) => Ok(Command::Orthogonalize {
            method: method.to_owned(),
            n: integer(n)?,
        }),
        Err(SyntaxError::FieldCount { found, .. }) if found < 3 => {
            Err(SyntaxError::MissingMethod)
        }
        Err(error) => Err(error),
    }
}

fn keyword(field: &str) -> String {
    field
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// The fields of a line, which must have exactly `N` of them. A single trailing empty
/// field (from a trailing comma) is ignored.
fn exact_fields<'a, const N: usize>(fields: &[&'a str]) -> Result<[&'a str; N], SyntaxError> {
    let fields = match fields {
        [rest @ .., ""] if fields.len() == N + 1 => rest,
        fields => fields,
    };

    fields.try_into().map_err(|_| SyntaxError::FieldCount {
        expected: N,
        found: fields.len(),
    })
}

fn number(field: &str) -> Result<f64, SyntaxError> {
    field
        .parse()
        .map_err(|_| SyntaxError::Number(field.to_owned()))
}

fn integer(field: &str) -> Result<i64, SyntaxError> {
    field
        .parse()
        .map_err(|_| SyntaxError::Number(field.to_owned()))
}
