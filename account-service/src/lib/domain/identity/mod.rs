pub mod filter;
pub mod models;
