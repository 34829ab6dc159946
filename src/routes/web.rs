// Server-rendered page routes
// Endpoints: GET /, POST /add, GET /toggle/:id, GET /delete/:id

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use tera::{Context, Tera};

use crate::models::todo::{now, today};
use crate::models::{AddTodoForm, CreateTodoRequest, TodoId, TodoView};
use crate::AppState;

const INDEX_TEMPLATE: &str = "index.html";

/// Build the template set. The page template is compiled into the binary.
pub fn load_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template(INDEX_TEMPLATE, include_str!("../../templates/index.html"))?;
    Ok(tera)
}

/// GET / - List all todos
async fn index(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let records = state.todos.find_all().await.map_err(|e| {
        tracing::error!("Failed to list todos for page: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let today = today();
    let todos: Vec<TodoView> = records.iter().map(|r| TodoView::at(r, today)).collect();

    let mut context = Context::new();
    context.insert("todos", &todos);
    context.insert("today", &today.format("%Y-%m-%d").to_string());

    state
        .templates
        .render(INDEX_TEMPLATE, &context)
        .map(Html)
        .map_err(|e| {
            tracing::error!("Failed to render {}: {}", INDEX_TEMPLATE, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// POST /add - Create a todo from the page form
async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddTodoForm>,
) -> Result<Redirect, StatusCode> {
    tracing::info!("Adding todo {:?} from page", form.title);

    let todo = CreateTodoRequest::from(form).into_todo(now());
    match state.todos.create(todo).await {
        Ok(_) => Ok(Redirect::to("/")),
        Err(e) => {
            tracing::error!("Failed to create todo: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /toggle/:id - Flip completion, ignoring unknown ids
async fn toggle(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Redirect, StatusCode> {
    let Ok(id) = raw_id.parse::<TodoId>() else {
        return Ok(Redirect::to("/"));
    };

    let found = state.todos.find_by_id(id).await.map_err(|e| {
        tracing::error!("Failed to get todo {}: {}", id, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if let Some(record) = found {
        let record = record.map(|todo| todo.toggled(now()));
        if let Err(e) = state.todos.save(record).await {
            tracing::error!("Failed to toggle todo {}: {}", id, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    Ok(Redirect::to("/"))
}

/// GET /delete/:id - Delete, ignoring unknown ids
async fn delete(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Redirect, StatusCode> {
    if let Ok(id) = raw_id.parse::<TodoId>() {
        if let Err(e) = state.todos.delete(id).await {
            tracing::error!("Failed to delete todo {}: {}", id, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
    Ok(Redirect::to("/"))
}

pub fn web_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/add", post(add))
        .route("/toggle/:id", get(toggle))
        .route("/delete/:id", get(delete))
}
