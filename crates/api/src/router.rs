use axum::{middleware, routing::{get, post}, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{employee_handlers, middleware as auth_middleware, user_handlers, AppState};

pub fn router(state: Arc<AppState>) -> Router {
    // Account routes are always public
    let user_routes = Router::new()
        .route("/signup", post(user_handlers::signup))
        .route("/login", post(user_handlers::login));

    let mut employee_routes = Router::new()
        .route(
            "/employees",
            get(employee_handlers::list_employees)
                .post(employee_handlers::create_employee)
                .delete(employee_handlers::delete_employee),
        )
        .route(
            "/employees/{eid}",
            get(employee_handlers::get_employee).put(employee_handlers::update_employee),
        );

    if state.protect_employee_routes {
        employee_routes = employee_routes.route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::require_auth,
        ));
    }

    Router::new()
        .route("/", get(|| async { "HR Kit API running" }))
        .nest("/api/v1/user", user_routes)
        .nest("/api/v1/emp", employee_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
