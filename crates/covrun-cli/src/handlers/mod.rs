//! Command handlers

pub mod convert;
pub mod test;

pub use convert::execute_convert;
pub use test::execute_test;
