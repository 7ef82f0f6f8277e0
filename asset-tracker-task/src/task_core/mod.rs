pub(crate) mod status;
pub(crate) mod traits;
