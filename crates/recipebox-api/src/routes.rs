use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::middleware::require_session;
use crate::state::AppState;
use crate::{auth, recipes};

pub fn router(state: AppState) -> Router {
    let recipe_routes = Router::new()
        .route("/recipes", get(recipes::list_recipes).post(recipes::create_recipe))
        .layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/signup", post(auth::signup))
        .route("/check_session", get(auth::check_session))
        .route("/login", post(auth::login))
        .route("/logout", delete(auth::logout))
        .merge(recipe_routes)
        .with_state(state)
}
