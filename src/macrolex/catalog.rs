//! Token catalog
//!
//! The catalog is the single source of truth for every token kind: its pattern, whether it is
//! emitted, and which mode (if any) it pushes or pops. It is assembled once through a
//! [`CatalogBuilder`] and is immutable afterwards.
//!
//! Re-defining a name is allowed only when the definition is identical, in which case the
//! existing [`KindId`] is returned. A different push target is reported as
//! [`DefinitionError::ConflictingPushMode`] at definition time, never at lex time.

pub mod kind;
pub mod pattern;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub use kind::{KindId, KindOptions, TokenKind};
pub use pattern::Pattern;

use crate::macrolex::error::DefinitionError;

/// Source of catalog identities, so a mode table can be matched to the catalog it resolved against
static NEXT_STAMP: AtomicU64 = AtomicU64::new(0);

/// Immutable set of token kinds
#[derive(Debug, Clone)]
pub struct Catalog {
    kinds: Vec<TokenKind>,
    by_name: HashMap<String, KindId>,
    stamp: u64,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    pub fn get(&self, id: KindId) -> &TokenKind {
        &self.kinds[id.0]
    }

    pub fn lookup(&self, name: &str) -> Option<KindId> {
        self.by_name.get(name).copied()
    }

    pub fn kinds(&self) -> impl Iterator<Item = &TokenKind> {
        self.kinds.iter()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Identity shared by this catalog and its clones
    pub(crate) fn stamp(&self) -> u64 {
        self.stamp
    }
}

/// Construction-time registry for token kinds
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    kinds: Vec<TokenKind>,
    by_name: HashMap<String, KindId>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a token kind
    ///
    /// Returns the id of the kind. Defining the same name twice with an identical pattern and
    /// options returns the first id.
    pub fn define(
        &mut self,
        name: &str,
        pattern: Pattern,
        options: KindOptions,
    ) -> Result<KindId, DefinitionError> {
        if let Some(&id) = self.by_name.get(name) {
            let existing = &self.kinds[id.0];
            if existing.options.push_mode != options.push_mode {
                return Err(DefinitionError::ConflictingPushMode {
                    kind: name.to_string(),
                    existing: existing.options.push_mode.clone(),
                    requested: options.push_mode,
                });
            }
            if existing.pattern != pattern || existing.options != options {
                return Err(DefinitionError::ConflictingDefinition {
                    kind: name.to_string(),
                });
            }
            return Ok(id);
        }

        let matcher = pattern
            .compile()
            .map_err(|e| DefinitionError::InvalidPattern {
                kind: name.to_string(),
                message: e.to_string(),
            })?;

        let id = KindId(self.kinds.len());
        self.kinds.push(TokenKind {
            id,
            name: name.to_string(),
            pattern,
            matcher,
            options,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn build(self) -> Catalog {
        Catalog {
            kinds: self.kinds,
            by_name: self.by_name,
            stamp: NEXT_STAMP.fetch_add(1, Ordering::Relaxed),
        }
    }
}
