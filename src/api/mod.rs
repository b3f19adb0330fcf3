pub mod handlers;
pub mod response;
mod routes;

pub use routes::{catch_panic_layer, create_router};
