pub mod dtos;
pub mod services;
pub mod store;

#[cfg(test)]
mod store_test;

pub use store::{AppState, AppStore};
