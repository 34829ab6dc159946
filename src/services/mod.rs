// Services module

pub mod file;
pub mod memory;
pub mod store;
pub mod todos;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use store::{StoreError, TodoStore};
pub use todos::TodoService;
