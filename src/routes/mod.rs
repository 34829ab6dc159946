// Routes module

pub mod health;
pub mod todos;
pub mod web;

pub use health::health_routes;
pub use todos::todos_routes;
pub use web::{load_templates, web_routes};

/// State backed by a fresh in-memory store
#[cfg(test)]
pub(crate) fn test_state() -> crate::AppState {
    use crate::services::{MemoryStore, TodoService};
    use std::sync::Arc;

    crate::AppState {
        todos: Arc::new(TodoService::new(Arc::new(MemoryStore::new()))),
        templates: Arc::new(load_templates().unwrap()),
    }
}
