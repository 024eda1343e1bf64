use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use log::info;
use thiserror::Error;

use crate::domain::settings::GameSettings;
use crate::domain::TableId;
use crate::engine::{EngineError, GameEngine};
use crate::infra::{normalize_code, IdGenerator, SystemRng};

/// Attempts at drawing a join code nobody else holds.
const CODE_ATTEMPTS: usize = 32;

/// One table, locked as a unit: all commands for a table run one at a time.
pub type SharedTable = Arc<Mutex<GameEngine<SystemRng>>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no table with code {0}")]
    TableNotFound(String),

    #[error("could not allocate a free table code")]
    CodesExhausted,

    #[error("table {0} is unavailable after a panic")]
    Poisoned(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Live tables keyed by join code.
///
/// The map lock is only held to look a table up; the per-table mutex
/// serializes commands on that table while other tables proceed in parallel.
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: RwLock<HashMap<String, SharedTable>>,
    ids: IdGenerator,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a table and return its join code.
    pub fn create_table(&self, settings: GameSettings) -> Result<(String, SharedTable), RegistryError> {
        let mut tables = self.write_map()?;

        let code = (0..CODE_ATTEMPTS)
            .map(|_| self.ids.random_code())
            .find(|code| !tables.contains_key(code))
            .ok_or(RegistryError::CodesExhausted)?;

        let id: TableId = self.ids.next_table_id();
        let engine = GameEngine::new(id, code.clone(), settings)?;
        let table = Arc::new(Mutex::new(engine));
        tables.insert(code.clone(), Arc::clone(&table));

        info!("registry: table {} opened as {}", id, code);
        Ok((code, table))
    }

    pub fn get(&self, code: &str) -> Result<SharedTable, RegistryError> {
        let code = normalize_code(code);
        self.read_map()?
            .get(&code)
            .cloned()
            .ok_or(RegistryError::TableNotFound(code))
    }

    /// Drop a table from the registry. Holders of its handle keep it alive
    /// until they let go.
    pub fn remove(&self, code: &str) -> Result<SharedTable, RegistryError> {
        let code = normalize_code(code);
        let removed = self
            .write_map()?
            .remove(&code)
            .ok_or_else(|| RegistryError::TableNotFound(code.clone()))?;
        info!("registry: table {} removed", code);
        Ok(removed)
    }

    /// Run `f` with exclusive access to one table.
    pub fn with_table<T>(
        &self,
        code: &str,
        f: impl FnOnce(&mut GameEngine<SystemRng>) -> Result<T, EngineError>,
    ) -> Result<T, RegistryError> {
        let table = self.get(code)?;
        let mut engine = lock_table(&table, code)?;
        Ok(f(&mut engine)?)
    }

    pub fn codes(&self) -> Vec<String> {
        match self.tables.read() {
            Ok(tables) => tables.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tables.read().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_map(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, SharedTable>>, RegistryError> {
        self.tables
            .read()
            .map_err(|_| RegistryError::Poisoned("registry".to_string()))
    }

    fn write_map(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, SharedTable>>, RegistryError> {
        self.tables
            .write()
            .map_err(|_| RegistryError::Poisoned("registry".to_string()))
    }
}

/// Lock one table, mapping a poisoned mutex to an error.
pub fn lock_table<'a>(
    table: &'a SharedTable,
    code: &str,
) -> Result<MutexGuard<'a, GameEngine<SystemRng>>, RegistryError> {
    table
        .lock()
        .map_err(|_| RegistryError::Poisoned(normalize_code(code)))
}
