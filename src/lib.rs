pub mod calculator;
pub mod error;
pub mod loan;
