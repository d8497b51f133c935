pub mod errors;
pub mod metrics;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::run_with_config;
pub use state::ServerState;
