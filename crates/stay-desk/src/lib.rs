pub mod config;
pub mod dates;
pub mod error;
pub mod inventory;
pub mod reservation;
pub mod settings;
pub mod telemetry;
