pub mod access;
pub mod catalog;
pub mod config;
pub mod executor;
pub mod filter;
pub mod model;
pub mod network;
pub mod pagination;
pub mod query;
pub mod service;
pub mod store;
