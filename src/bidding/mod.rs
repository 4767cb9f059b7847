pub mod commands;
pub mod model;
pub mod policy;
pub mod rules;
