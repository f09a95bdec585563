pub mod pipeline;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod images;
pub mod scanner;
pub mod source;
