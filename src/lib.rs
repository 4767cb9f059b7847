pub mod auction;
pub mod auth;
pub mod bidding;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod message_broker;
pub mod query;
pub mod store;
