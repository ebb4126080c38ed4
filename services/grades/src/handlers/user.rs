use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use gradebook_auth_types::identity::IdentityHeaders;
use gradebook_domain::user::UserRole;

use crate::domain::types::User;
use crate::error::GradesServiceError;
use crate::handlers::actor;
use crate::state::AppState;
use crate::usecase::directory::{CreateUserInput, CreateUserUseCase, GetUserUseCase};

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: u8,
    #[serde(serialize_with = "gradebook_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "gradebook_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

fn user_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        name: user.name,
        email: user.email,
        role: user.role.as_u8(),
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: u8,
}

pub async fn create_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), GradesServiceError> {
    let role = UserRole::from_u8(body.role)
        .ok_or_else(|| GradesServiceError::validation(format!("unknown role {}", body.role)))?;
    let usecase = CreateUserUseCase {
        gateway: state.gateway(),
    };
    let user = usecase
        .execute(
            &actor(identity),
            CreateUserInput {
                name: body.name,
                email: body.email,
                role,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(user_response(user))))
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

pub async fn get_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, GradesServiceError> {
    let usecase = GetUserUseCase {
        gateway: state.gateway(),
    };
    let user = usecase.execute(&actor(identity)).await?;
    Ok(Json(user_response(user)))
}
