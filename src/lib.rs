rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod config;
pub mod course;
pub mod event;
pub mod keyboard;
pub mod logging;
pub mod session;
pub mod store;
pub mod ui;
