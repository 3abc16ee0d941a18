mod routes;
mod server;

pub use routes::build_routes;
pub use server::{serve, Engine, EngineState};
