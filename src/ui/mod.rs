//! Interactive terminal front end

pub mod tui_app;
