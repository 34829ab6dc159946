// JSON file persistence gateway
// The whole table is rewritten after each mutation (temp file + rename)

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::store::{StoreError, TodoStore, TodoTable};
use crate::models::{Todo, TodoId, TodoRecord};

pub struct JsonFileStore {
    path: PathBuf,
    table: RwLock<TodoTable>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading existing records. A missing file is an empty store.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let table = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let records: Vec<TodoRecord> = serde_json::from_slice(&bytes)?;
                TodoTable::from_records(records)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No data file at {}, starting empty", path.display());
                TodoTable::new()
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!("Loaded {} todos from {}", table.len(), path.display());

        Ok(Self {
            path,
            table: RwLock::new(table),
        })
    }

    /// Write the table to disk. Called with the write lock held so saves are ordered;
    /// mutations go to a copy that only replaces the live table once it is on disk.
    async fn persist(&self, table: &TodoTable) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&table.records())?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl TodoStore for JsonFileStore {
    async fn create(&self, todo: Todo) -> Result<TodoRecord, StoreError> {
        let mut table = self.table.write().await;
        let mut candidate = table.clone();
        let record = candidate.insert_new(todo);
        self.persist(&candidate).await?;
        *table = candidate;
        Ok(record)
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<TodoRecord>, StoreError> {
        Ok(self.table.read().await.get(id))
    }

    async fn find_all(&self) -> Result<Vec<TodoRecord>, StoreError> {
        Ok(self.table.read().await.records())
    }

    async fn update(&self, record: TodoRecord) -> Result<TodoRecord, StoreError> {
        let mut table = self.table.write().await;
        let mut candidate = table.clone();
        let record = candidate.upsert(record);
        self.persist(&candidate).await?;
        *table = candidate;
        Ok(record)
    }

    async fn delete_by_id(&self, id: TodoId) -> Result<bool, StoreError> {
        let mut table = self.table.write().await;
        let mut candidate = table.clone();
        if !candidate.remove(id) {
            return Ok(false);
        }
        self.persist(&candidate).await?;
        *table = candidate;
        Ok(true)
    }
}
