pub mod cli_correction;
pub mod cli_input;
pub mod cli_main;
pub mod cli_settings;
pub mod cli_stock;
