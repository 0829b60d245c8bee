use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::ApiResult,
    extract::JsonBody,
    schemas::{LoginSchema, SignupSchema},
    validation::{validate, RequestInput},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub jwt_token: String,
}

/// POST /api/v1/user/signup - Create an account
pub async fn signup(
    State(state): State<Arc<AppState>>,
    body: JsonBody,
) -> ApiResult<impl IntoResponse> {
    validate::<SignupSchema>(&RequestInput::new().body(&body.0))?;
    let payload: SignupRequest = body.parse()?;

    let user_id = state
        .auth_service
        .signup(&payload.username, &payload.email, &payload.password)
        .await?;

    let response = SignupResponse {
        message: "User created successfully.",
        user_id: user_id.to_hex(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/user/login - Exchange credentials for a token
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: JsonBody,
) -> ApiResult<impl IntoResponse> {
    validate::<LoginSchema>(&RequestInput::new().body(&body.0))?;
    let payload: LoginRequest = body.parse()?;

    let (token, _user) = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    let response = LoginResponse {
        message: "Login successful",
        jwt_token: token,
    };
    Ok((StatusCode::OK, Json(response)))
}
