pub mod cors;
pub mod response;
pub mod router;
pub mod server;

pub use router::{app_router, AppState};
pub use server::Server;
