pub mod cli;
pub mod core;
pub mod models;
pub mod platform;

#[cfg(test)]
mod test_support;
