// Persistence gateway - storage contract for todo records

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::models::{Todo, TodoId, TodoRecord};

/// Failures raised by a storage backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to (de)serialize todos: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable storage of todo records keyed by a gateway-assigned id.
/// A missing record is `None` / `false`, never an error.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Store a new todo under a freshly allocated id
    async fn create(&self, todo: Todo) -> Result<TodoRecord, StoreError>;

    async fn find_by_id(&self, id: TodoId) -> Result<Option<TodoRecord>, StoreError>;

    /// All records in ascending id order
    async fn find_all(&self) -> Result<Vec<TodoRecord>, StoreError>;

    /// Overwrite the record with the same id, inserting it if absent
    async fn update(&self, record: TodoRecord) -> Result<TodoRecord, StoreError>;

    /// Returns true if a record was removed
    async fn delete_by_id(&self, id: TodoId) -> Result<bool, StoreError>;
}

/// Ordered id -> todo table with its id sequence, shared by the store backends
#[derive(Debug, Clone, Default)]
pub struct TodoTable {
    next_id: u64,
    todos: BTreeMap<TodoId, Todo>,
}

impl TodoTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a table from persisted records, resuming the sequence after the highest id
    pub fn from_records(records: Vec<TodoRecord>) -> Self {
        let todos: BTreeMap<TodoId, Todo> = records
            .into_iter()
            .map(|record| (record.id, record.todo))
            .collect();
        let next_id = todos.keys().next_back().map_or(0, |id| id.get());
        Self { next_id, todos }
    }

    pub fn records(&self) -> Vec<TodoRecord> {
        self.todos
            .iter()
            .map(|(id, todo)| TodoRecord::new(*id, todo.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn insert_new(&mut self, todo: Todo) -> TodoRecord {
        self.next_id += 1;
        let id = TodoId::new(self.next_id);
        self.todos.insert(id, todo.clone());
        TodoRecord::new(id, todo)
    }

    pub fn get(&self, id: TodoId) -> Option<TodoRecord> {
        self.todos
            .get(&id)
            .map(|todo| TodoRecord::new(id, todo.clone()))
    }

    pub fn upsert(&mut self, record: TodoRecord) -> TodoRecord {
        // Keep the sequence ahead of ids inserted by upsert
        self.next_id = self.next_id.max(record.id.get());
        self.todos.insert(record.id, record.todo.clone());
        record
    }

    pub fn remove(&mut self, id: TodoId) -> bool {
        self.todos.remove(&id).is_some()
    }
}
