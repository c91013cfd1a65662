pub mod config;
pub mod connection;
pub mod handler;
pub mod http;
pub mod logger;
pub mod router;
pub mod server;
pub mod shutdown;
