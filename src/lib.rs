pub mod backup_data;
pub mod config;
pub mod envelope;
pub mod filter;
pub mod http_client;
pub mod memo;
pub mod provider;
pub mod state;
pub mod transport;
pub mod types;
pub mod xbox_api;
