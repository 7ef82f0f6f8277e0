pub(crate) mod balance_snapshot;
