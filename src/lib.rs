pub mod admin_menu;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod nonce;
pub mod palette;
pub mod plugins;
pub mod search;
pub mod sources;
pub mod utils;
