//! User accounts: repository trait and login/seed service.

pub mod repository;
pub mod service;
