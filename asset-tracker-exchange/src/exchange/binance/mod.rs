mod client;
mod coin_futures;
mod futures;
mod margin;
pub mod model;
mod spot;

pub use client::{BinanceClient, Config};
pub use coin_futures::CoinFutures;
pub use futures::Futures;
pub use margin::Margin;
pub use spot::Spot;
