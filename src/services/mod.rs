pub mod curve_model;
pub mod dashboard;
pub mod estimator;
pub mod presets;
pub mod refresh;
pub mod weather_service;
