pub mod account;
pub mod queue;
pub mod submission;
