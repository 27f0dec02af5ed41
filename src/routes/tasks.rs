use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{TaskInput, TaskQuery, TaskUpdate},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

/// Retrieves the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `status` (optional): exact status, e.g. "Pending", "In Progress", "Completed".
/// - `priority` (optional): exact priority, e.g. "Low", "Medium", "High".
/// - `dueBefore` / `dueAfter` (optional): inclusive bounds on the due date
///   (RFC 3339 or `YYYY-MM-DD`).
/// - `search` (optional): case-insensitive substring of the title. `query` is
///   read instead when `search` is absent.
/// - `searchDescription` (optional): also search descriptions.
/// - `sort` (optional): `dueDate` or `createdAt`.
///
/// Blank parameters are ignored.
///
/// ## Responses:
/// - `200 OK`: `{tasks: [...]}`.
/// - `400 Bad Request`: unparseable filter value.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    query_params: web::Query<TaskQuery>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let filter = query_params
        .into_inner()
        .into_filter()
        .map_err(AppError::ValidationError)?;

    let tasks = state.tasks.list(user.id(), &filter).await?;

    Ok(HttpResponse::Ok().json(json!({ "tasks": tasks })))
}

/// Creates a new task owned by the authenticated user.
///
/// Missing `description`, `status` and `priority` default to `""`, "Pending" and
/// "Medium". Any `owner` field in the body is ignored.
///
/// ## Responses:
/// - `201 Created`: `{task}`.
/// - `400 Bad Request`: missing or blank title, or invalid field values.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = state.tasks.create(user.id(), task_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({ "task": task })))
}

/// Retrieves one of the authenticated user's tasks.
///
/// ## Responses:
/// - `200 OK`: `{task}`.
/// - `404 Not Found`: no such task, or it belongs to another user.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = state.tasks.get(user.id(), task_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({ "task": task })))
}

/// Applies a partial update to one of the authenticated user's tasks.
///
/// Only fields present in the body change; ownership never does.
///
/// ## Responses:
/// - `200 OK`: `{task}` with the updated record.
/// - `400 Bad Request`: blank title or invalid field values.
/// - `404 Not Found`: no such task, or it belongs to another user.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .update(user.id(), task_id.into_inner(), task_data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "task": task })))
}

/// Deletes one of the authenticated user's tasks and returns it.
///
/// ## Responses:
/// - `200 OK`: `{message, task}`.
/// - `404 Not Found`: no such task, or it belongs to another user.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = state.tasks.delete(user.id(), task_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Deleted successfully",
        "task": task
    })))
}
