pub mod config;
pub mod data;
pub mod logging;
pub mod table_display;
pub mod ui;
pub mod view;
