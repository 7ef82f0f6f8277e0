mod credential;
mod exchange;
mod market;
mod symbol;

pub use credential::Credential;
pub use exchange::Exchange;
pub use market::Market;
pub use symbol::Symbol;
