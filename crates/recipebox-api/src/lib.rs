pub mod auth;
pub mod error;
pub mod middleware;
pub mod password;
pub mod recipes;
pub mod routes;
pub mod session;
pub mod state;
mod views;

pub use routes::router;
pub use state::{AppState, AppStateInner};
