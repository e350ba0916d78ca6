use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{AddPhotoRequest, UpdateProfileRequest, UserResponse};
use crate::routes::AppState;

/// Configure profile/photo routes. These are thin collaborators around the
/// discovery core: the core only ever reads the fields they maintain.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/me", web::get().to(get_me))
        .route("/users/me", web::patch().to(update_me))
        .route("/users/me/photos", web::post().to(add_photo))
        .route("/users/me/photos/{photo_id}", web::delete().to(delete_photo));
}

/// GET /api/v1/users/me
async fn get_me(state: web::Data<AppState>, user: AuthUser) -> Result<HttpResponse, AppError> {
    let account = state.store.get_user(user.id).await?;
    let photos = state.store.list_photos(user.id).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from_parts(account, photos)))
}

/// PATCH /api/v1/users/me
async fn update_me(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let account = state
        .store
        .update_profile(
            user.id,
            req.location.as_deref(),
            req.bio.as_deref(),
            req.tags.as_deref(),
        )
        .await?;

    let photos = state.store.list_photos(user.id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from_parts(account, photos)))
}

/// POST /api/v1/users/me/photos
///
/// Photos are URL references; binary upload/storage is handled by an
/// external collaborator.
async fn add_photo(
    state: web::Data<AppState>,
    user: AuthUser,
    req: web::Json<AddPhotoRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let photo = state.store.add_photo(user.id, &req.url).await?;

    Ok(HttpResponse::Created().json(photo))
}

/// DELETE /api/v1/users/me/photos/{photo_id}
async fn delete_photo(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    state.store.delete_photo(user.id, path.into_inner()).await?;

    let account = state.store.get_user(user.id).await?;
    let photos = state.store.list_photos(user.id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from_parts(account, photos)))
}
