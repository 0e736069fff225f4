/// HTTP surface: webhook intake, analysis reads, health/status and the
/// captured-webhook debug view
pub mod history;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod utils;

pub use self::history::WebhookHistory;
pub use self::server::start_server;
pub use self::state::AppState;
