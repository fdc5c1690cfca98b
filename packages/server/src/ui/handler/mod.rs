pub mod http;
pub mod session;
