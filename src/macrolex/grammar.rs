//! Validated grammar
//!
//! A [`Grammar`] bundles a catalog with its mode table. The only way to get one is
//! [`Grammar::new`], which runs the validator, so the engine can assume a consistent
//! definition. Grammars are immutable and `Send + Sync`; share one across threads freely.

use crate::macrolex::catalog::{Catalog, KindId, TokenKind};
use crate::macrolex::error::DefinitionError;
use crate::macrolex::modes::{Mode, ModeId, ModeTable, ModeTableDisplay};
use crate::macrolex::validation::validate;

#[derive(Debug, Clone)]
pub struct Grammar {
    catalog: Catalog,
    modes: ModeTable,
}

impl Grammar {
    pub fn new(catalog: Catalog, modes: ModeTable) -> Result<Self, DefinitionError> {
        validate(&catalog, &modes)?;
        Ok(Self { catalog, modes })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn modes(&self) -> &ModeTable {
        &self.modes
    }

    pub fn kind(&self, id: KindId) -> &TokenKind {
        self.catalog.get(id)
    }

    pub fn mode(&self, id: ModeId) -> &Mode {
        self.modes.get(id)
    }

    pub fn default_mode(&self) -> ModeId {
        self.modes.default_mode()
    }

    pub fn push_target(&self, kind: KindId) -> Option<ModeId> {
        self.modes.push_target(kind)
    }

    /// Printable listing of every mode and its candidates
    pub fn describe(&self) -> String {
        ModeTableDisplay {
            table: &self.modes,
            catalog: &self.catalog,
        }
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macrolex::catalog::{KindOptions, Pattern};
    use crate::macrolex::modes::ModeTableBuilder;

    #[test]
    fn test_new_runs_validation() {
        let mut builder = Catalog::builder();
        builder
            .define("Any", Pattern::always(), KindOptions::new().skipped().pop_mode())
            .unwrap();
        builder
            .define("Word", Pattern::regex("[a-z]+"), KindOptions::new())
            .unwrap();
        let catalog = builder.build();
        let table = ModeTableBuilder::new("main")
            .mode("main", &["Any", "Word"])
            .build(&catalog)
            .unwrap();

        assert!(matches!(
            Grammar::new(catalog, table),
            Err(DefinitionError::UnreachableKind { .. })
        ));
    }

    #[test]
    fn test_grammar_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Grammar>();
    }

    #[test]
    fn test_new_rejects_table_from_smaller_catalog() {
        let mut wide = Catalog::builder();
        wide.define("A", Pattern::literal("a"), KindOptions::new())
            .unwrap();
        wide.define("B", Pattern::literal("b"), KindOptions::new())
            .unwrap();
        let wide = wide.build();
        let table = ModeTableBuilder::new("main")
            .mode("main", &["A", "B"])
            .build(&wide)
            .unwrap();

        let mut narrow = Catalog::builder();
        narrow
            .define("A", Pattern::literal("a"), KindOptions::new())
            .unwrap();

        assert_eq!(
            Grammar::new(narrow.build(), table).map(|_| ()),
            Err(DefinitionError::ForeignModeTable)
        );
    }
}
