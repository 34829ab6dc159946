// Todo service - delegates to the configured persistence gateway

use std::sync::Arc;

use super::store::{StoreError, TodoStore};
use crate::models::{Todo, TodoId, TodoRecord};

pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> Result<Vec<TodoRecord>, StoreError> {
        self.store.find_all().await
    }

    /// `None` when no record has this id
    pub async fn find_by_id(&self, id: TodoId) -> Result<Option<TodoRecord>, StoreError> {
        self.store.find_by_id(id).await
    }

    pub async fn create(&self, todo: Todo) -> Result<TodoRecord, StoreError> {
        let record = self.store.create(todo).await?;
        tracing::debug!("Stored new todo {}", record.id);
        Ok(record)
    }

    pub async fn save(&self, record: TodoRecord) -> Result<TodoRecord, StoreError> {
        self.store.update(record).await
    }

    /// Returns false when there was nothing to delete
    pub async fn delete(&self, id: TodoId) -> Result<bool, StoreError> {
        self.store.delete_by_id(id).await
    }
}
