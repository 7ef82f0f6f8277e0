mod aggregator;
mod baseline;
mod client_service;
mod error;
mod fetcher;
mod orchestrator;
mod price_resolver;
mod registry;

pub use aggregator::{aggregate, AccountValuation, FuturesBreakdown, PriceGap};
pub use baseline::{BaselineComparison, BatchTotals};
pub use client_service::{AccountClientService, AccountClientSvc, Attempts, ClientServiceConfig};
pub use error::ValuationError;
pub use fetcher::{AccountFetcher, AccountLegs, Leg, LegResult};
pub use orchestrator::{AccountFailure, AccountReport, BatchReport, Valuator};
pub use price_resolver::{PriceMap, PriceResolver};
pub use registry::{ClientFactory, ExchangeRegistry};
