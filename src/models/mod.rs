// Models module

pub mod request;
pub mod todo;

pub use request::{
    AddTodoForm, CreateTodoRequest, DeleteTodoResponse, StatusResponse, UpdateTodoRequest,
};
pub use todo::{Todo, TodoId, TodoRecord, TodoView};
