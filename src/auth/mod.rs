pub mod auth;
pub mod handlers;
pub mod login_flow;
pub mod middleware;
pub mod session;
