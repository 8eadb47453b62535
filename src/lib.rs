pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod impute;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod stderr_buffer;
pub mod tui;
