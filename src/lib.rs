// pma-service/src/lib.rs
pub mod models;
pub mod policy;
pub mod routes;
pub mod utils;

#[cfg(test)]
mod tests;
