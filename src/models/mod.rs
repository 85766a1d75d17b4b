pub mod calculator;
pub mod solar;
