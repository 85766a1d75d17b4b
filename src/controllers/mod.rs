pub mod calculator_controller;
pub mod solar_controller;
