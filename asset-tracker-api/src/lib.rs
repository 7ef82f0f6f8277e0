pub mod helper;
pub mod report;
pub mod session;
