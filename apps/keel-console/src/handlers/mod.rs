pub mod charts;
pub mod health;
pub mod license;
pub mod logs;
pub mod services;
pub mod users;
