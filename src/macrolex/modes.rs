//! Mode table
//!
//! Maps every mode to its ordered list of candidate kinds. Order is priority: the engine tries
//! candidates in listed order and the first match wins.
//!
//! Push targets are resolved here as well, once per kind, so the engine never looks a mode up
//! by name while scanning.

use std::collections::HashMap;
use std::fmt;

use crate::macrolex::catalog::{Catalog, KindId};
use crate::macrolex::error::DefinitionError;

/// Index of a mode inside its table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModeId(pub(crate) usize);

impl ModeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A named lexical context
#[derive(Debug, Clone)]
pub struct Mode {
    id: ModeId,
    name: String,
    candidates: Vec<KindId>,
}

impl Mode {
    pub fn id(&self) -> ModeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Candidate kinds in priority order
    pub fn candidates(&self) -> &[KindId] {
        &self.candidates
    }
}

/// Read-only association of modes to candidates
#[derive(Debug, Clone)]
pub struct ModeTable {
    modes: Vec<Mode>,
    by_name: HashMap<String, ModeId>,
    default_mode: ModeId,
    /// Resolved push target per kind, indexed by `KindId`
    push_targets: Vec<Option<ModeId>>,
    /// Stamp of the catalog the kind names were resolved against
    catalog_stamp: u64,
}

impl ModeTable {
    pub fn get(&self, id: ModeId) -> &Mode {
        &self.modes[id.0]
    }

    pub fn lookup(&self, name: &str) -> Option<ModeId> {
        self.by_name.get(name).copied()
    }

    pub fn default_mode(&self) -> ModeId {
        self.default_mode
    }

    pub fn push_target(&self, kind: KindId) -> Option<ModeId> {
        self.push_targets.get(kind.0).copied().flatten()
    }

    pub fn modes(&self) -> impl Iterator<Item = &Mode> {
        self.modes.iter()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Whether this table's kind ids refer to `catalog`
    pub fn resolved_against(&self, catalog: &Catalog) -> bool {
        self.catalog_stamp == catalog.stamp()
    }
}

/// Builder for a [`ModeTable`]
///
/// Modes reference kinds by name; names are resolved against a catalog in [`Self::build`].
#[derive(Debug, Clone)]
pub struct ModeTableBuilder {
    default_mode: String,
    modes: Vec<(String, Vec<String>)>,
}

impl ModeTableBuilder {
    pub fn new(default_mode: &str) -> Self {
        Self {
            default_mode: default_mode.to_string(),
            modes: Vec::new(),
        }
    }

    /// Declare a mode with its candidates in priority order
    pub fn mode(mut self, name: &str, kinds: &[&str]) -> Self {
        self.modes.push((
            name.to_string(),
            kinds.iter().map(|k| k.to_string()).collect(),
        ));
        self
    }

    pub fn build(self, catalog: &Catalog) -> Result<ModeTable, DefinitionError> {
        let mut by_name = HashMap::new();
        for (index, (name, _)) in self.modes.iter().enumerate() {
            if by_name.insert(name.clone(), ModeId(index)).is_some() {
                return Err(DefinitionError::DuplicateMode(name.clone()));
            }
        }

        let mut modes = Vec::with_capacity(self.modes.len());
        for (index, (name, kind_names)) in self.modes.into_iter().enumerate() {
            let candidates = kind_names
                .iter()
                .map(|kind| {
                    catalog
                        .lookup(kind)
                        .ok_or_else(|| DefinitionError::UndefinedKind {
                            mode: name.clone(),
                            kind: kind.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            modes.push(Mode {
                id: ModeId(index),
                name,
                candidates,
            });
        }

        let default_mode = *by_name
            .get(&self.default_mode)
            .ok_or_else(|| DefinitionError::UnknownDefaultMode(self.default_mode.clone()))?;

        let push_targets = catalog
            .kinds()
            .map(|kind| match kind.push_mode() {
                None => Ok(None),
                Some(target) => by_name.get(target).copied().map(Some).ok_or_else(|| {
                    DefinitionError::UndefinedMode {
                        kind: kind.name().to_string(),
                        mode: target.to_string(),
                    }
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ModeTable {
            modes,
            by_name,
            default_mode,
            push_targets,
            catalog_stamp: catalog.stamp(),
        })
    }
}

/// Lists modes with their candidates, one per line, for introspection output
pub struct ModeTableDisplay<'a> {
    pub table: &'a ModeTable,
    pub catalog: &'a Catalog,
}

impl fmt::Display for ModeTableDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for mode in self.table.modes() {
            let marker = if mode.id() == self.table.default_mode() {
                " (default)"
            } else {
                ""
            };
            writeln!(f, "{}{}", mode.name(), marker)?;
            for (rank, id) in mode.candidates().iter().enumerate() {
                writeln!(f, "  {}. {}", rank + 1, self.catalog.get(*id))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macrolex::catalog::{KindOptions, Pattern};

    fn sample_catalog() -> Catalog {
        let mut builder = Catalog::builder();
        builder
            .define(
                "Open",
                Pattern::literal("("),
                KindOptions::new().push_mode("inner"),
            )
            .unwrap();
        builder
            .define("Close", Pattern::literal(")"), KindOptions::new().pop_mode())
            .unwrap();
        builder
            .define("Word", Pattern::regex("[a-z]+"), KindOptions::new())
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_build_resolves_names() {
        let catalog = sample_catalog();
        let table = ModeTableBuilder::new("outer")
            .mode("outer", &["Open", "Word"])
            .mode("inner", &["Close", "Open", "Word"])
            .build(&catalog)
            .unwrap();

        let outer = table.lookup("outer").unwrap();
        let inner = table.lookup("inner").unwrap();
        assert_eq!(table.default_mode(), outer);
        assert_eq!(table.get(inner).candidates().len(), 3);

        let open = catalog.lookup("Open").unwrap();
        let close = catalog.lookup("Close").unwrap();
        assert_eq!(table.push_target(open), Some(inner));
        assert_eq!(table.push_target(close), None);
    }

    #[test]
    fn test_undefined_kind() {
        let catalog = sample_catalog();
        let err = ModeTableBuilder::new("outer")
            .mode("outer", &["Open", "Missing"])
            .build(&catalog)
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::UndefinedKind {
                mode: "outer".into(),
                kind: "Missing".into()
            }
        );
    }

    #[test]
    fn test_undefined_push_target() {
        let catalog = sample_catalog();
        let err = ModeTableBuilder::new("outer")
            .mode("outer", &["Open", "Word"])
            .build(&catalog)
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::UndefinedMode {
                kind: "Open".into(),
                mode: "inner".into()
            }
        );
    }

    #[test]
    fn test_duplicate_and_default_modes() {
        let catalog = sample_catalog();
        let err = ModeTableBuilder::new("outer")
            .mode("outer", &["Word"])
            .mode("outer", &["Word"])
            .build(&catalog)
            .unwrap_err();
        assert_eq!(err, DefinitionError::DuplicateMode("outer".into()));

        let err = ModeTableBuilder::new("nowhere")
            .mode("outer", &["Word"])
            .mode("inner", &["Close"])
            .build(&catalog)
            .unwrap_err();
        assert_eq!(err, DefinitionError::UnknownDefaultMode("nowhere".into()));
    }

    #[test]
    fn test_display_lists_candidates_in_order() {
        let catalog = sample_catalog();
        let table = ModeTableBuilder::new("outer")
            .mode("outer", &["Open", "Word"])
            .mode("inner", &["Close"])
            .build(&catalog)
            .unwrap();
        let text = ModeTableDisplay {
            table: &table,
            catalog: &catalog,
        }
        .to_string();
        assert_eq!(
            text,
            "outer (default)\n  1. Open \"(\" push(inner)\n  2. Word /[a-z]+/\ninner\n  1. Close \")\" pop\n"
        );
    }
}
