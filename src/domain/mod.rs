// Domain layer - Dashboard layout model, no I/O
pub mod catalog;
pub mod dashboard;
pub mod kpi;
pub mod ordering;
pub mod widget;
