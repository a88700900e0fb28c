//! HTTP request handlers - thin layer that delegates to domain services

use super::{
    auth::CurrentUser,
    dto::*,
    error::{map_domain_error, Problem},
    extract::{ApiForm, ApiJson, ApiPath, ApiQuery, BaseUrl},
    rate_limit::RateLimited,
    state::AppState,
};
use axum::{
    extract::{multipart::MultipartRejection, Multipart},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;

type Shared = Extension<Arc<AppState>>;

// ===== Auth Handlers =====

/// Register a new account and send the confirmation email
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserDto),
        (status = 409, description = "Email or username already taken", body = Problem),
        (status = 422, description = "Invalid input", body = Problem)
    )
)]
pub async fn register(
    Extension(state): Shared,
    BaseUrl(base_url): BaseUrl,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserDto>), Problem> {
    let user = state
        .users
        .register(req.into(), &base_url)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchange username and password for an access token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Access token", body = TokenResponse),
        (status = 401, description = "Invalid credentials or unconfirmed email", body = Problem)
    )
)]
pub async fn login(
    Extension(state): Shared,
    ApiForm(form): ApiForm<LoginForm>,
) -> Result<Json<TokenResponse>, Problem> {
    let access_token = state
        .users
        .login(&form.username, &form.password)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/confirmed_email/{token}",
    tag = "auth",
    params(("token" = String, Path, description = "Email confirmation token")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Unknown user", body = Problem),
        (status = 422, description = "Invalid token", body = Problem)
    )
)]
pub async fn confirmed_email(
    Extension(state): Shared,
    ApiPath(token): ApiPath<String>,
) -> Result<Json<MessageResponse>, Problem> {
    let message = state
        .users
        .confirm_email(&token)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(MessageResponse::new(message)))
}

/// Send the confirmation email again
#[utoipa::path(
    post,
    path = "/api/auth/request_email",
    tag = "auth",
    request_body = RequestEmail,
    responses((status = 200, body = MessageResponse))
)]
pub async fn request_email(
    Extension(state): Shared,
    BaseUrl(base_url): BaseUrl,
    ApiJson(req): ApiJson<RequestEmail>,
) -> Result<Json<MessageResponse>, Problem> {
    let message = state
        .users
        .request_email(&req.email, &base_url)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(MessageResponse::new(message)))
}

/// Email a link that applies the new password once opened
#[utoipa::path(
    post,
    path = "/api/auth/reset_password",
    tag = "auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Email not confirmed", body = Problem)
    )
)]
pub async fn reset_password(
    Extension(state): Shared,
    BaseUrl(base_url): BaseUrl,
    ApiJson(req): ApiJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, Problem> {
    let message = state
        .users
        .request_password_reset(&req.email, &req.password, &base_url)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(MessageResponse::new(message)))
}

#[utoipa::path(
    get,
    path = "/api/auth/confirm_reset_password/{token}",
    tag = "auth",
    params(("token" = String, Path, description = "Password reset token")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Invalid or expired token", body = Problem),
        (status = 404, description = "User not found", body = Problem)
    )
)]
pub async fn confirm_reset_password(
    Extension(state): Shared,
    ApiPath(token): ApiPath<String>,
) -> Result<Json<MessageResponse>, Problem> {
    let message = state
        .users
        .confirm_password_reset(&token)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(MessageResponse::new(message)))
}

// ===== User Handlers =====

/// Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = UserDto),
        (status = 401, body = Problem),
        (status = 429, description = "Too many requests", body = Problem)
    )
)]
pub async fn me(CurrentUser(user): CurrentUser, _budget: RateLimited) -> Json<UserDto> {
    Json(user.into())
}

/// Replace the avatar image (admins only)
#[utoipa::path(
    patch,
    path = "/api/users/avatar",
    tag = "users",
    security(("bearer" = [])),
    request_body(content = AvatarUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = UserDto),
        (status = 401, body = Problem),
        (status = 403, description = "Not an admin", body = Problem)
    )
)]
pub async fn update_avatar(
    Extension(state): Shared,
    CurrentUser(user): CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UserDto>, Problem> {
    state.users.require_admin(&user).map_err(map_domain_error)?;
    let mut multipart = multipart?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Problem::unprocessable(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("avatar").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| Problem::unprocessable(e.body_text()))?;
        upload = Some((file_name, bytes.to_vec()));
        break;
    }
    let Some((file_name, bytes)) = upload else {
        return Err(Problem::unprocessable("multipart field 'file' is required"));
    };

    let updated = state
        .users
        .update_avatar(&user, &file_name, bytes)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(updated.into()))
}

// ===== Contact Handlers =====

/// Contacts with a birthday in the coming days
#[utoipa::path(
    get,
    path = "/api/contacts/birthdays",
    tag = "contacts",
    security(("bearer" = [])),
    params(BirthdaysQuery),
    responses(
        (status = 200, body = Vec<ContactDto>),
        (status = 422, description = "days must be at least 1", body = Problem)
    )
)]
pub async fn upcoming_birthdays(
    Extension(state): Shared,
    CurrentUser(user): CurrentUser,
    ApiQuery(query): ApiQuery<BirthdaysQuery>,
) -> Result<Json<Vec<ContactDto>>, Problem> {
    if query.days < 1 {
        return Err(Problem::unprocessable("days must be at least 1"));
    }
    // Any window past a year already covers every birthday
    let days = u32::try_from(query.days).unwrap_or(u32::MAX);

    let contacts = state
        .contacts
        .get_upcoming_birthdays(days, &user)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(contacts.into_iter().map(Into::into).collect()))
}

/// List contacts with optional substring filters
#[utoipa::path(
    get,
    path = "/api/contacts",
    tag = "contacts",
    security(("bearer" = [])),
    params(ListContactsQuery),
    responses((status = 200, body = Vec<ContactDto>), (status = 401, body = Problem))
)]
pub async fn list_contacts(
    Extension(state): Shared,
    CurrentUser(user): CurrentUser,
    ApiQuery(query): ApiQuery<ListContactsQuery>,
) -> Result<Json<Vec<ContactDto>>, Problem> {
    let contacts = state
        .contacts
        .get_contacts(query.into(), &user)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(contacts.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/contacts/{contact_id}",
    tag = "contacts",
    security(("bearer" = [])),
    params(("contact_id" = i32, Path, description = "Contact id")),
    responses((status = 200, body = ContactDto), (status = 404, body = Problem))
)]
pub async fn get_contact(
    Extension(state): Shared,
    CurrentUser(user): CurrentUser,
    ApiPath(contact_id): ApiPath<i32>,
) -> Result<Json<ContactDto>, Problem> {
    let contact = state
        .contacts
        .get_contact(contact_id, &user)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(contact.into()))
}

#[utoipa::path(
    post,
    path = "/api/contacts",
    tag = "contacts",
    security(("bearer" = [])),
    request_body = ContactRequest,
    responses(
        (status = 201, body = ContactDto),
        (status = 400, description = "Email or phone number already used", body = Problem),
        (status = 422, body = Problem)
    )
)]
pub async fn create_contact(
    Extension(state): Shared,
    CurrentUser(user): CurrentUser,
    ApiJson(req): ApiJson<ContactRequest>,
) -> Result<(StatusCode, Json<ContactDto>), Problem> {
    let contact = state
        .contacts
        .create_contact(req.into(), &user)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(contact.into())))
}

#[utoipa::path(
    put,
    path = "/api/contacts/{contact_id}",
    tag = "contacts",
    security(("bearer" = [])),
    params(("contact_id" = i32, Path, description = "Contact id")),
    request_body = ContactRequest,
    responses((status = 200, body = ContactDto), (status = 404, body = Problem))
)]
pub async fn update_contact(
    Extension(state): Shared,
    CurrentUser(user): CurrentUser,
    ApiPath(contact_id): ApiPath<i32>,
    ApiJson(req): ApiJson<ContactRequest>,
) -> Result<Json<ContactDto>, Problem> {
    let contact = state
        .contacts
        .update_contact(contact_id, req.into(), &user)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(contact.into()))
}

/// Delete a contact and return it
#[utoipa::path(
    delete,
    path = "/api/contacts/{contact_id}",
    tag = "contacts",
    security(("bearer" = [])),
    params(("contact_id" = i32, Path, description = "Contact id")),
    responses((status = 200, body = ContactDto), (status = 404, body = Problem))
)]
pub async fn remove_contact(
    Extension(state): Shared,
    CurrentUser(user): CurrentUser,
    ApiPath(contact_id): ApiPath<i32>,
) -> Result<Json<ContactDto>, Problem> {
    let contact = state
        .contacts
        .remove_contact(contact_id, &user)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(contact.into()))
}

// ===== Service Handlers =====

#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
