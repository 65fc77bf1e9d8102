pub mod alerts;
pub mod auth;
pub mod incidents;
pub mod ops;
