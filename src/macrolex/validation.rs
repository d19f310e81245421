//! Definition-time validation
//!
//! Runs once per grammar, before the first `tokenize` call. Checks:
//! 1. The mode table was resolved against this catalog (kind ids are indices into it).
//! 2. Every mode has at least one candidate.
//! 3. Nothing is listed after an unconditional candidate (it could never be tried).
//! 4. No kind is listed twice in the same mode (the second listing could never be tried).
//! 5. A kind that can match without consuming input must change the mode stack, otherwise the
//!    engine would spin in place.
//!
//! Name resolution (undefined kinds and modes) already happened when the mode table was built.

use std::collections::HashSet;

use crate::macrolex::catalog::Catalog;
use crate::macrolex::error::DefinitionError;
use crate::macrolex::modes::ModeTable;

/// Validate a catalog against a mode table, failing on the first problem found
pub fn validate(catalog: &Catalog, table: &ModeTable) -> Result<(), DefinitionError> {
    if !table.resolved_against(catalog) {
        return Err(DefinitionError::ForeignModeTable);
    }

    for mode in table.modes() {
        if mode.candidates().is_empty() {
            return Err(DefinitionError::EmptyMode(mode.name().to_string()));
        }

        let mut seen = HashSet::new();
        let mut fallback = None;
        for &id in mode.candidates() {
            let kind = catalog.get(id);
            if let Some(shadowing) = fallback {
                return Err(DefinitionError::UnreachableKind {
                    mode: mode.name().to_string(),
                    kind: kind.name().to_string(),
                    shadowed_by: catalog.get(shadowing).name().to_string(),
                });
            }
            if !seen.insert(id) {
                return Err(DefinitionError::UnreachableKind {
                    mode: mode.name().to_string(),
                    kind: kind.name().to_string(),
                    shadowed_by: kind.name().to_string(),
                });
            }
            if kind.pattern().is_unconditional() {
                fallback = Some(id);
            }
        }
    }

    for kind in catalog.kinds() {
        if kind.matcher.can_match_empty() && !kind.transitions() {
            return Err(DefinitionError::StallingKind {
                kind: kind.name().to_string(),
            });
        }
    }

    Ok(())
}
