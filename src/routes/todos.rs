// Todo REST routes
// Endpoints: GET/POST /api/todos, GET/PATCH/PUT/DELETE /api/todos/:id

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::models::todo::{now, today};
use crate::models::{
    CreateTodoRequest, DeleteTodoResponse, TodoId, TodoView, UpdateTodoRequest,
};
use crate::services::StoreError;
use crate::AppState;

/// Path ids that do not parse can never match a record
fn parse_id(raw: &str) -> Result<TodoId, StatusCode> {
    raw.parse().map_err(|_| {
        tracing::info!("Invalid todo id {:?}", raw);
        StatusCode::NOT_FOUND
    })
}

fn storage_error(action: &str, e: StoreError) -> StatusCode {
    tracing::error!("Failed to {}: {}", action, e);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// GET /api/todos - All todos with derived state
async fn get_todos(State(state): State<AppState>) -> Result<Json<Vec<TodoView>>, StatusCode> {
    tracing::info!("Getting all todos");

    match state.todos.find_all().await {
        Ok(records) => {
            let today = today();
            Ok(Json(records.iter().map(|r| TodoView::at(r, today)).collect()))
        }
        Err(e) => Err(storage_error("list todos", e)),
    }
}

/// GET /api/todos/:id - Get a single todo
async fn get_todo_by_id(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<TodoView>, StatusCode> {
    tracing::info!("Getting todo {}", raw_id);
    let id = parse_id(&raw_id)?;

    match state.todos.find_by_id(id).await {
        Ok(Some(record)) => Ok(Json(TodoView::from(&record))),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(storage_error("get todo", e)),
    }
}

/// POST /api/todos - Create a new todo
async fn create_todo(
    State(state): State<AppState>,
    Json(request): Json<CreateTodoRequest>,
) -> Result<Json<TodoView>, StatusCode> {
    tracing::info!(
        "Creating todo {:?} with dueDate={:?}, priority={:?}",
        request.title,
        request.due_date,
        request.priority
    );

    let todo = request.into_todo(now());
    match state.todos.create(todo).await {
        Ok(record) => {
            tracing::info!("Created todo {}", record.id);
            Ok(Json(TodoView::from(&record)))
        }
        Err(e) => Err(storage_error("create todo", e)),
    }
}

/// PATCH /api/todos/:id - Flip the completed flag
async fn toggle_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<TodoView>, StatusCode> {
    tracing::info!("Toggling todo {}", raw_id);
    let id = parse_id(&raw_id)?;

    let record = state
        .todos
        .find_by_id(id)
        .await
        .map_err(|e| storage_error("get todo", e))?
        .ok_or(StatusCode::NOT_FOUND)?;

    let record = record.map(|todo| todo.toggled(now()));
    match state.todos.save(record).await {
        Ok(saved) => Ok(Json(TodoView::from(&saved))),
        Err(e) => Err(storage_error("toggle todo", e)),
    }
}

/// PUT /api/todos/:id - Merge the supplied fields into a todo
async fn update_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(request): Json<UpdateTodoRequest>,
) -> Result<Json<TodoView>, StatusCode> {
    tracing::info!("Updating todo {}", raw_id);
    let id = parse_id(&raw_id)?;

    let record = state
        .todos
        .find_by_id(id)
        .await
        .map_err(|e| storage_error("get todo", e))?
        .ok_or(StatusCode::NOT_FOUND)?;

    let now = now();
    let record = record.map(|todo| request.apply(todo, now));
    match state.todos.save(record).await {
        Ok(saved) => Ok(Json(TodoView::from(&saved))),
        Err(e) => Err(storage_error("update todo", e)),
    }
}

/// DELETE /api/todos/:id - Delete a todo
async fn delete_todo(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteTodoResponse>, StatusCode> {
    tracing::info!("Deleting todo {}", raw_id);
    let id = parse_id(&raw_id)?;

    match state.todos.delete(id).await {
        Ok(true) => Ok(Json(DeleteTodoResponse {
            message: "Todo deleted successfully".to_string(),
        })),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(storage_error("delete todo", e)),
    }
}

pub fn todos_routes() -> Router<AppState> {
    Router::new()
        .route("/api/todos", get(get_todos).post(create_todo))
        .route(
            "/api/todos/:id",
            get(get_todo_by_id)
                .patch(toggle_todo)
                .put(update_todo)
                .delete(delete_todo),
        )
}
