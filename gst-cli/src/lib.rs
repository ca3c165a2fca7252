pub mod app;
pub mod config;
pub mod csv_loader;
pub mod logging;
pub mod render;
pub mod session;

pub use config::AppConfig;
pub use session::{Command, Session};
