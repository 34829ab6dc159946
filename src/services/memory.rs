// In-memory persistence gateway - records live for the process lifetime

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{StoreError, TodoStore, TodoTable};
use crate::models::{Todo, TodoId, TodoRecord};

#[derive(Default)]
pub struct MemoryStore {
    table: RwLock<TodoTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn create(&self, todo: Todo) -> Result<TodoRecord, StoreError> {
        Ok(self.table.write().await.insert_new(todo))
    }

    async fn find_by_id(&self, id: TodoId) -> Result<Option<TodoRecord>, StoreError> {
        Ok(self.table.read().await.get(id))
    }

    async fn find_all(&self) -> Result<Vec<TodoRecord>, StoreError> {
        Ok(self.table.read().await.records())
    }

    async fn update(&self, record: TodoRecord) -> Result<TodoRecord, StoreError> {
        Ok(self.table.write().await.upsert(record))
    }

    async fn delete_by_id(&self, id: TodoId) -> Result<bool, StoreError> {
        Ok(self.table.write().await.remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::todo::now;

    #[tokio::test]
    async fn test_crud_cycle() {
        let store = MemoryStore::new();

        let created = store.create(Todo::new("A", now())).await.unwrap();
        let found = store.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created.clone()));

        let mut changed = created.clone();
        changed.todo.title = "B".to_string();
        store.update(changed).await.unwrap();
        let found = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.todo.title, "B");

        assert!(store.delete_by_id(created.id).await.unwrap());
        assert!(!store.delete_by_id(created.id).await.unwrap());
        assert!(store.find_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_is_ordered() {
        let store = MemoryStore::new();
        for title in ["a", "b", "c"] {
            store.create(Todo::new(title, now())).await.unwrap();
        }
        let titles: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.todo.title)
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_update_unknown_id_inserts() {
        let store = MemoryStore::new();
        let record = TodoRecord::new(TodoId::new(9), Todo::new("x", now()));
        store.update(record.clone()).await.unwrap();
        assert_eq!(store.find_by_id(TodoId::new(9)).await.unwrap(), Some(record));
    }
}
