mod error;
mod types;

pub use error::BaseError;
pub use types::{Credential, Exchange, Market, Symbol};
