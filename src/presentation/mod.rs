// Presentation layer - What a dashboard view holds for its lifetime
pub mod dashboard_view;
