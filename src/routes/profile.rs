use crate::{auth::AuthenticatedUser, error::AppError, state::AppState};
use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

/// Returns the authenticated user together with statistics over their tasks.
///
/// `stats.upcoming` counts tasks falling due within the next seven days.
#[get("")]
pub async fn get_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let stats = state.tasks.stats(user.id()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "user": user.0,
        "stats": stats
    })))
}
