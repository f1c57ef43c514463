//! Symbol definitions and the fixed symbol catalog

use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};

/// Stable symbol identifier
pub type SymbolId = u32;

/// A symbol definition
///
/// Identity is the `id` alone; two symbols with the same id are the same
/// symbol regardless of name or glyph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol ID
    pub id: SymbolId,
    /// Symbol key (e.g., "piano", "drums")
    pub name: String,
    /// Display glyph handed to the renderer
    pub glyph: String,
}

impl Symbol {
    pub fn new(id: SymbolId, name: impl Into<String>, glyph: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            glyph: glyph.into(),
        }
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Ordered, non-empty set of distinct symbols, fixed for the machine's lifetime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Symbol>", into = "Vec<Symbol>")]
pub struct SymbolCatalog {
    symbols: Vec<Symbol>,
}

impl SymbolCatalog {
    /// Build a catalog, rejecting empty sets and duplicate ids
    pub fn new(symbols: Vec<Symbol>) -> SlotResult<Self> {
        if symbols.is_empty() {
            return Err(SlotError::EmptyCatalog);
        }
        let mut seen = HashSet::with_capacity(symbols.len());
        for symbol in &symbols {
            if !seen.insert(symbol.id) {
                return Err(SlotError::DuplicateSymbol(symbol.id));
            }
        }
        Ok(Self { symbols })
    }

    /// The seven instrument symbols
    pub fn piano() -> Self {
        Self {
            symbols: vec![
                Symbol::new(1, "piano", "🎹"),
                Symbol::new(2, "violin", "🎻"),
                Symbol::new(3, "saxophone", "🎷"),
                Symbol::new(4, "electric-guitar", "🎸"),
                Symbol::new(5, "drums", "🥁"),
                Symbol::new(6, "trumpet", "🎺"),
                Symbol::new(7, "microphone", "🎤"),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Get symbol by ID
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        self.get(id).is_some()
    }

    /// First symbol in catalog order (the machine's resting face)
    pub fn first(&self) -> SymbolId {
        self.symbols[0].id
    }

    /// All ids in catalog order
    pub fn ids(&self) -> Vec<SymbolId> {
        self.symbols.iter().map(|s| s.id).collect()
    }

    /// Glyph for an id, `"?"` when unknown
    pub fn glyph(&self, id: SymbolId) -> &str {
        self.get(id).map(|s| s.glyph.as_str()).unwrap_or("?")
    }

    /// Uniform draw over the catalog
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> SymbolId {
        self.symbols[rng.random_range(0..self.symbols.len())].id
    }

    /// Uniform draw over every symbol except `exclude`.
    ///
    /// A single-symbol catalog has nothing else to offer and returns `exclude`.
    pub fn pick_other<R: Rng + ?Sized>(&self, rng: &mut R, exclude: SymbolId) -> SymbolId {
        let others: Vec<SymbolId> = self
            .symbols
            .iter()
            .map(|s| s.id)
            .filter(|&id| id != exclude)
            .collect();
        if others.is_empty() {
            return exclude;
        }
        others[rng.random_range(0..others.len())]
    }
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        Self::piano()
    }
}

impl TryFrom<Vec<Symbol>> for SymbolCatalog {
    type Error = SlotError;

    fn try_from(symbols: Vec<Symbol>) -> SlotResult<Self> {
        Self::new(symbols)
    }
}

impl From<SymbolCatalog> for Vec<Symbol> {
    fn from(catalog: SymbolCatalog) -> Self {
        catalog.symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_piano_catalog() {
        let catalog = SymbolCatalog::piano();
        assert_eq!(catalog.len(), 7);
        assert!(!catalog.is_empty());
        assert_eq!(catalog.first(), 1);
        assert_eq!(catalog.get(5).map(|s| s.name.as_str()), Some("drums"));
        assert_eq!(catalog.glyph(1), "🎹");
        assert_eq!(catalog.glyph(99), "?");
    }

    #[test]
    fn test_identity_is_id_only() {
        let a = Symbol::new(3, "saxophone", "🎷");
        let b = Symbol::new(3, "sax", "S");
        assert_eq!(a, b);
        assert_ne!(a, Symbol::new(4, "saxophone", "🎷"));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(
            SymbolCatalog::new(Vec::new()),
            Err(SlotError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = SymbolCatalog::new(vec![Symbol::new(1, "a", "A"), Symbol::new(1, "b", "B")]);
        assert!(matches!(result, Err(SlotError::DuplicateSymbol(1))));
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<SymbolCatalog>("[]").is_err());

        let json = r#"[{"id": 9, "name": "harp", "glyph": "H"}]"#;
        let catalog: SymbolCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.ids(), vec![9]);
    }

    #[test]
    fn test_pick_stays_in_catalog() {
        let catalog = SymbolCatalog::piano();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..500 {
            assert!(catalog.contains(catalog.pick(&mut rng)));
        }
    }

    #[test]
    fn test_pick_other_excludes() {
        let catalog = SymbolCatalog::piano();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..500 {
            assert_ne!(catalog.pick_other(&mut rng, 4), 4);
        }

        let single = SymbolCatalog::new(vec![Symbol::new(1, "piano", "🎹")]).unwrap();
        assert_eq!(single.pick_other(&mut rng, 1), 1);
    }
}
