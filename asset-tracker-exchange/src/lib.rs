pub mod client;
pub mod exchange;
