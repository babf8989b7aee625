use blockpage_document::BlockType;
use std::collections::BTreeMap;

/// Per-format table from block kind to generator
///
/// Every exporter owns one registry. A kind with no entry is rendered as the
/// exporter's fallback stub instead of failing the whole export.
#[derive(Debug, Clone)]
pub struct GeneratorRegistry<G> {
    format: &'static str,
    generators: BTreeMap<BlockType, G>,
}

impl<G> GeneratorRegistry<G> {
    pub fn new(format: &'static str) -> Self {
        Self {
            format,
            generators: BTreeMap::new(),
        }
    }

    pub fn with(mut self, kind: BlockType, generator: G) -> Self {
        self.register(kind, generator);
        self
    }

    /// Add or replace the generator for `kind`.
    pub fn register(&mut self, kind: BlockType, generator: G) {
        self.generators.insert(kind, generator);
    }

    pub fn get(&self, kind: &BlockType) -> Option<&G> {
        self.generators.get(kind)
    }

    pub fn contains(&self, kind: &BlockType) -> bool {
        self.generators.contains_key(kind)
    }

    pub fn format(&self) -> &'static str {
        self.format
    }

    pub fn kinds(&self) -> impl Iterator<Item = &BlockType> {
        self.generators.keys()
    }

    /// Kinds from `expected` that have no generator here.
    pub fn missing<'a>(&self, expected: impl IntoIterator<Item = &'a BlockType>) -> Vec<BlockType> {
        expected
            .into_iter()
            .filter(|kind| !self.contains(kind))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let registry = GeneratorRegistry::new("test")
            .with(BlockType::Hero, "hero-gen")
            .with(BlockType::Cta, "cta-gen");

        assert_eq!(registry.format(), "test");
        assert_eq!(registry.get(&BlockType::Hero), Some(&"hero-gen"));
        assert!(registry.get(&BlockType::Footer).is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_missing_kinds() {
        let registry = GeneratorRegistry::new("test").with(BlockType::Hero, ());
        let missing = registry.missing(BlockType::BUILTIN.iter());
        assert_eq!(missing.len(), BlockType::BUILTIN.len() - 1);
        assert!(!missing.contains(&BlockType::Hero));
    }
}
