// Dashboard layout editing for the restaurant admin console
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
