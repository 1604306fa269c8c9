//! Infrastructure layer - concrete implementations of the pipeline stages

pub mod budget;
pub mod cache;
pub mod humanize;
pub mod observability;
pub mod parser;
pub mod quality;
pub mod services;
pub mod storage;
