pub mod chart_service;
pub mod display;
pub mod market_service;
pub mod portfolio_service;
pub mod projection_service;
