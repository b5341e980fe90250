// invoice-pdf-service/src/lib.rs

pub mod calculator;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod pipeline;
pub mod renderers;
pub mod startup;
