// Application layer - Edit session, drag handling and load flow
pub mod config_store;
pub mod dashboard_gateway;
pub mod dashboard_service;
pub mod drag_controller;
