mod app_context;
mod setting;

pub use app_context::AppContext;
pub use setting::{Auth, Client, Database, Setting, Snapshot, Telemetry, Valuation};
