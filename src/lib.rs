pub mod client;
pub mod config;
pub mod crawl;
pub mod data_models;
pub mod errors;
pub mod export;
pub mod filter;
pub mod normalizer;
pub mod pipeline;
pub mod search;
