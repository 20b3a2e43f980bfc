//! Strategy registry
//!
//! Maps a [`GeneratorKind`] to a constructor. Strategies are resolved once
//! when a tool is loaded, not per invocation.

use super::{ContainerGenerator, ParamFileGenerator, PlainCliGenerator};
use std::collections::HashMap;
use std::sync::Arc;
use toolbridge_application::{CommandGenerator, GeneratorKind};

pub type GeneratorConstructor = fn() -> Arc<dyn CommandGenerator>;

pub struct GeneratorRegistry {
    constructors: HashMap<GeneratorKind, GeneratorConstructor>,
}

impl GeneratorRegistry {
    /// Registry without any strategy.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    pub fn register(&mut self, kind: GeneratorKind, constructor: GeneratorConstructor) {
        self.constructors.insert(kind, constructor);
    }

    pub fn create(&self, kind: GeneratorKind) -> Option<Arc<dyn CommandGenerator>> {
        self.constructors.get(&kind).map(|constructor| constructor())
    }

    pub fn kinds(&self) -> Vec<GeneratorKind> {
        GeneratorKind::ALL
            .into_iter()
            .filter(|kind| self.constructors.contains_key(kind))
            .collect()
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(GeneratorKind::Cli, plain_cli);
        registry.register(GeneratorKind::ParamFile, param_file);
        registry.register(GeneratorKind::Container, container);
        registry
    }
}

fn plain_cli() -> Arc<dyn CommandGenerator> {
    Arc::new(PlainCliGenerator)
}

fn param_file() -> Arc<dyn CommandGenerator> {
    Arc::new(ParamFileGenerator::default())
}

fn container() -> Arc<dyn CommandGenerator> {
    Arc::new(ContainerGenerator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_covers_all_kinds() {
        let registry = GeneratorRegistry::default();
        for kind in GeneratorKind::ALL {
            assert_eq!(registry.create(kind).unwrap().kind(), kind);
        }
        assert_eq!(registry.kinds(), GeneratorKind::ALL.to_vec());
    }

    #[test]
    fn test_empty_registry() {
        let mut registry = GeneratorRegistry::empty();
        assert!(registry.create(GeneratorKind::Cli).is_none());
        registry.register(GeneratorKind::Cli, plain_cli);
        assert!(registry.create(GeneratorKind::Cli).is_some());
        assert_eq!(registry.kinds(), vec![GeneratorKind::Cli]);
    }
}
