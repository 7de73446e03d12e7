//! Chunk registry: keyed module factories for one site build.
//!
//! A registry is created per build and handed to whatever loads pages, so two
//! builds (or two tests) never observe each other's modules. Modules are
//! defined once and instantiated lazily on first `require`, after their
//! dependencies; the instance is cached for the lifetime of the registry.

use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Key of a chunk or module: a bundler-assigned number or a name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModuleId {
    /// Numeric id, as emitted by bundlers.
    Numeric(u64),
    /// Named id.
    Named(String),
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleId::Numeric(id) => write!(f, "{}", id),
            ModuleId::Named(name) => f.write_str(name),
        }
    }
}

impl From<u64> for ModuleId {
    fn from(id: u64) -> Self {
        ModuleId::Numeric(id)
    }
}

impl From<&str> for ModuleId {
    fn from(name: &str) -> Self {
        ModuleId::Named(name.to_string())
    }
}

impl From<String> for ModuleId {
    fn from(name: String) -> Self {
        ModuleId::Named(name)
    }
}

/// Failures while defining or loading modules. All of them indicate a
/// packaging defect and are not retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The key was never registered; usually a chunk is missing from the build.
    #[error("module {key} is not registered (missing chunk?)")]
    Lookup {
        /// Requested key
        key: ModuleId,
    },
    /// A module with this key is already registered.
    #[error("module {key} is already registered")]
    DuplicateKey {
        /// Conflicting key
        key: ModuleId,
    },
    /// A chunk with this id was already installed.
    #[error("chunk {id} is already installed")]
    DuplicateChunk {
        /// Conflicting chunk id
        id: ModuleId,
    },
    /// The module depends on itself, directly or transitively.
    #[error("module {key} depends on itself")]
    CyclicDependency {
        /// Module whose instantiation re-entered
        key: ModuleId,
    },
}

/// Module factory: receives resolved dependencies in declaration order.
pub type Factory<T> = Box<dyn Fn(&[Rc<T>]) -> T>;

struct Entry<T> {
    deps: Vec<ModuleId>,
    factory: Factory<T>,
    instance: OnceCell<Rc<T>>,
    loading: Cell<bool>,
}

/// A module definition waiting to be installed.
pub struct ModuleDefinition<T> {
    /// Module key
    pub key: ModuleId,
    /// Keys this module requires before it can be built
    pub deps: Vec<ModuleId>,
    /// Builds the module's exports
    pub factory: Factory<T>,
}

/// A unit of independently loadable modules.
pub struct Chunk<T> {
    /// Chunk ids this unit provides
    pub ids: Vec<ModuleId>,
    /// Modules defined by the chunk
    pub modules: Vec<ModuleDefinition<T>>,
}

impl<T> Chunk<T> {
    /// Creates an empty chunk with a single id.
    pub fn new(id: impl Into<ModuleId>) -> Self {
        Self {
            ids: vec![id.into()],
            modules: Vec::new(),
        }
    }

    /// Adds a module definition.
    pub fn module<F>(
        mut self,
        key: impl Into<ModuleId>,
        deps: impl IntoIterator<Item = ModuleId>,
        factory: F,
    ) -> Self
    where
        F: Fn(&[Rc<T>]) -> T + 'static,
    {
        self.modules.push(ModuleDefinition {
            key: key.into(),
            deps: deps.into_iter().collect(),
            factory: Box::new(factory),
        });
        self
    }
}

/// Registry of module factories for one build.
pub struct ChunkRegistry<T> {
    modules: HashMap<ModuleId, Entry<T>>,
    chunks: BTreeSet<ModuleId>,
}

impl<T> Default for ChunkRegistry<T> {
    fn default() -> Self {
        Self {
            modules: HashMap::new(),
            chunks: BTreeSet::new(),
        }
    }
}

impl<T> fmt::Debug for ChunkRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkRegistry")
            .field("modules", &self.module_ids())
            .field("chunks", &self.chunks)
            .finish()
    }
}

impl<T> ChunkRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module factory under `key`.
    ///
    /// Registering a key twice is an error; the first definition is kept.
    pub fn define<F>(
        &mut self,
        key: impl Into<ModuleId>,
        deps: impl IntoIterator<Item = ModuleId>,
        factory: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&[Rc<T>]) -> T + 'static,
    {
        self.insert(ModuleDefinition {
            key: key.into(),
            deps: deps.into_iter().collect(),
            factory: Box::new(factory),
        })
    }

    fn insert(&mut self, definition: ModuleDefinition<T>) -> Result<(), RegistryError> {
        if self.modules.contains_key(&definition.key) {
            return Err(RegistryError::DuplicateKey {
                key: definition.key,
            });
        }
        log::debug!(
            "registering module {} (deps: {:?})",
            definition.key,
            definition.deps
        );
        self.modules.insert(
            definition.key,
            Entry {
                deps: definition.deps,
                factory: definition.factory,
                instance: OnceCell::new(),
                loading: Cell::new(false),
            },
        );
        Ok(())
    }

    /// Installs every module of `chunk`.
    ///
    /// Nothing is registered when the chunk id or any module key clashes.
    pub fn install_chunk(&mut self, chunk: Chunk<T>) -> Result<(), RegistryError> {
        if let Some(id) = chunk.ids.iter().find(|id| self.chunks.contains(*id)) {
            return Err(RegistryError::DuplicateChunk { id: id.clone() });
        }
        let mut seen = BTreeSet::new();
        for module in &chunk.modules {
            if self.modules.contains_key(&module.key) || !seen.insert(&module.key) {
                return Err(RegistryError::DuplicateKey {
                    key: module.key.clone(),
                });
            }
        }

        for module in chunk.modules {
            self.insert(module)?;
        }
        self.chunks.extend(chunk.ids);
        Ok(())
    }

    /// Returns the module exports for `key`, building it (and its
    /// dependencies) on first use.
    pub fn require(&self, key: &ModuleId) -> Result<Rc<T>, RegistryError> {
        let entry = self
            .modules
            .get(key)
            .ok_or_else(|| RegistryError::Lookup { key: key.clone() })?;

        if let Some(instance) = entry.instance.get() {
            return Ok(Rc::clone(instance));
        }
        if entry.loading.replace(true) {
            return Err(RegistryError::CyclicDependency { key: key.clone() });
        }

        let deps: Result<Vec<_>, _> = entry.deps.iter().map(|dep| self.require(dep)).collect();
        entry.loading.set(false);
        let deps = deps?;

        log::debug!("instantiating module {}", key);
        let instance = entry
            .instance
            .get_or_init(|| Rc::new((entry.factory)(&deps)));
        Ok(Rc::clone(instance))
    }

    /// Returns the factory and dependency keys registered under `key`
    /// without instantiating anything.
    pub fn factory(&self, key: &ModuleId) -> Result<(&Factory<T>, &[ModuleId]), RegistryError> {
        self.modules
            .get(key)
            .map(|entry| (&entry.factory, entry.deps.as_slice()))
            .ok_or_else(|| RegistryError::Lookup { key: key.clone() })
    }

    /// Returns true if a module is registered under `key`.
    pub fn contains(&self, key: &ModuleId) -> bool {
        self.modules.contains_key(key)
    }

    /// Returns true if a module under `key` has already been built.
    pub fn is_loaded(&self, key: &ModuleId) -> bool {
        self.modules
            .get(key)
            .is_some_and(|entry| entry.instance.get().is_some())
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Registered module keys in sorted order.
    pub fn module_ids(&self) -> Vec<&ModuleId> {
        let mut ids: Vec<_> = self.modules.keys().collect();
        ids.sort();
        ids
    }

    /// Installed chunk ids in sorted order.
    pub fn chunk_ids(&self) -> impl Iterator<Item = &ModuleId> {
        self.chunks.iter()
    }
}
