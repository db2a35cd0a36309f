pub mod chart;
pub mod investment;
pub mod market;
pub mod portfolio;
pub mod projection;
pub mod settings;
