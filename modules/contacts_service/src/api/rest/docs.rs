//! OpenAPI document and the Swagger UI page served at `/docs`

use super::{dto::*, error::Problem, handlers};
use axum::{response::Html, Json};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Contacts API", description = "Personal address book with user accounts"),
    paths(
        handlers::register,
        handlers::login,
        handlers::confirmed_email,
        handlers::request_email,
        handlers::reset_password,
        handlers::confirm_reset_password,
        handlers::me,
        handlers::update_avatar,
        handlers::upcoming_birthdays,
        handlers::list_contacts,
        handlers::get_contact,
        handlers::create_contact,
        handlers::update_contact,
        handlers::remove_contact,
        handlers::health,
    ),
    components(schemas(
        RoleDto,
        UserDto,
        RegisterRequest,
        LoginForm,
        TokenResponse,
        RequestEmail,
        ResetPasswordRequest,
        MessageResponse,
        AvatarUpload,
        ContactRequest,
        ContactDto,
        Problem,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Registration, login and password reset"),
        (name = "users", description = "Current user profile"),
        (name = "contacts", description = "Address book of the current user"),
        (name = "service", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_PAGE)
}

const SWAGGER_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Contacts API - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
    <style>
        body { margin: 0; background: #fafafa; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: '/openapi.json',
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
                layout: "StandaloneLayout",
                validatorUrl: null,
                tryItOutEnabled: true
            });
        };
    </script>
</body>
</html>"#;
