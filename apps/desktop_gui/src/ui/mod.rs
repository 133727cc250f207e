//! UI layer for the desktop GUI: app shell, screens and toast overlay.

pub mod app;

pub use app::PeopleApp;
