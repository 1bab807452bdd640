//! Table manager for spawning and managing multiple table actors.

use super::{
    TableId,
    actor::{TableActor, TableHandle},
    config::TableConfig,
    messages::TableStateResponse,
};
use crate::game::RoundPhase;
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// Table metadata for discovery
#[derive(Debug, Clone, Serialize)]
pub struct TableMetadata {
    pub id: TableId,
    pub name: String,
    pub phase: RoundPhase,
    pub player_count: usize,
    pub max_players: usize,
}

impl From<TableStateResponse> for TableMetadata {
    fn from(state: TableStateResponse) -> Self {
        Self {
            id: state.table_id,
            name: state.table_name,
            phase: state.phase,
            player_count: state.player_count,
            max_players: state.max_players,
        }
    }
}

/// Table manager for managing multiple table instances
#[derive(Clone)]
pub struct TableManager {
    /// Active table handles
    tables: Arc<RwLock<HashMap<TableId, TableHandle>>>,

    /// Next table ID
    next_table_id: Arc<RwLock<TableId>>,
}

impl Default for TableManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TableManager {
    /// Create a new table manager
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            next_table_id: Arc::new(RwLock::new(1)),
        }
    }

    /// Create and spawn a new table
    ///
    /// # Arguments
    ///
    /// * `config` - Table configuration
    ///
    /// # Returns
    ///
    /// * `Result<TableId, String>` - Table ID or error
    pub async fn create_table(&self, config: TableConfig) -> Result<TableId, String> {
        config.validate()?;

        let mut next_id = self.next_table_id.write().await;
        let table_id = *next_id;
        *next_id = table_id + 1;
        drop(next_id);

        let (actor, handle) = TableActor::new(table_id, config);

        let mut tables = self.tables.write().await;
        tables.insert(table_id, handle);
        drop(tables);

        tokio::spawn(async move {
            actor.run().await;
        });

        log::info!("Created and spawned table {}", table_id);

        Ok(table_id)
    }

    /// Get a table handle
    ///
    /// # Arguments
    ///
    /// * `table_id` - Table ID
    ///
    /// # Returns
    ///
    /// * `Option<TableHandle>` - Table handle if found
    pub async fn get_table(&self, table_id: TableId) -> Option<TableHandle> {
        let tables = self.tables.read().await;
        tables.get(&table_id).cloned()
    }

    /// Get table state
    pub async fn get_table_state(&self, table_id: TableId) -> Result<TableStateResponse, String> {
        let handle = self
            .get_table(table_id)
            .await
            .ok_or_else(|| "Table not found".to_string())?;

        handle.state().await
    }

    /// List all active tables, ordered by ID
    ///
    /// Tables whose actor has already stopped are skipped.
    pub async fn list_tables(&self) -> Result<Vec<TableMetadata>, String> {
        let handles: Vec<TableHandle> = {
            let tables = self.tables.read().await;
            tables.values().cloned().collect()
        };

        let mut metadata_list = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.state().await {
                Ok(state) => metadata_list.push(TableMetadata::from(state)),
                Err(e) => log::warn!("Skipping table {}: {}", handle.table_id(), e),
            }
        }
        metadata_list.sort_by_key(|m| m.id);

        Ok(metadata_list)
    }

    /// Close a table
    ///
    /// # Arguments
    ///
    /// * `table_id` - Table ID
    ///
    /// # Returns
    ///
    /// * `Result<(), String>` - Success or error
    pub async fn close_table(&self, table_id: TableId) -> Result<(), String> {
        let handle = self
            .tables
            .write()
            .await
            .remove(&table_id)
            .ok_or_else(|| "Table not found".to_string())?;

        // An actor that already stopped has nothing left to close
        if !handle.is_closed() {
            handle.close().await?;
        }

        log::info!("Closed table {}", table_id);

        Ok(())
    }

    /// Get active table count
    pub async fn active_table_count(&self) -> usize {
        let tables = self.tables.read().await;
        tables.len()
    }
}
