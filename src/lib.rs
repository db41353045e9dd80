#[allow(non_snake_case)]
pub mod Concentration;
pub mod app;
pub mod cli;
pub mod export;
pub mod logging;
pub mod report;
pub mod settings;
pub mod substances;
