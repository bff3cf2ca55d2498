//! Todo Handlers

use super::{parse_id, AppState};
use crate::error::AppError;
use crate::extractors::{AuthUser, JsonBody};
use crate::models::*;

use axum::{
    extract::{Path, State},
    Json,
};

/// POST /todos - Create todo
pub async fn create_todo(
    State(services): State<AppState>,
    AuthUser(current): AuthUser,
    JsonBody(req): JsonBody<CreateTodoRequest>,
) -> Result<Json<Todo>, AppError> {
    let todo = services.todos.create(current.user.id, &req.text).await?;
    Ok(Json(todo))
}

/// GET /todos - List the caller's todos
pub async fn list_todos(
    State(services): State<AppState>,
    AuthUser(current): AuthUser,
) -> Result<Json<TodoListResponse>, AppError> {
    let todos = services.todos.list_by_owner(current.user.id).await?;
    Ok(Json(TodoListResponse { todos }))
}

/// GET /todos/:id - Get single todo
pub async fn get_todo(
    State(services): State<AppState>,
    AuthUser(current): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TodoResponse>, AppError> {
    let id = parse_id(&id)?;

    let todo = services
        .todos
        .find_one(id, current.user.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(TodoResponse { todo }))
}

/// DELETE /todos/:id - Delete todo, echoing the removed record
pub async fn delete_todo(
    State(services): State<AppState>,
    AuthUser(current): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<TodoResponse>, AppError> {
    let id = parse_id(&id)?;

    let todo = services
        .todos
        .remove(id, current.user.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(TodoResponse { todo }))
}

/// PATCH /todos/:id - Update text and completion state
pub async fn update_todo(
    State(services): State<AppState>,
    AuthUser(current): AuthUser,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateTodoRequest>,
) -> Result<Json<TodoResponse>, AppError> {
    let id = parse_id(&id)?;

    let todo = services
        .todos
        .update(id, current.user.id, req)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(TodoResponse { todo }))
}
