//! Client-side core for the people directory: REST client with its cache, toast
//! notifications, the view models shared by the CLI and desktop front-ends, and the
//! workflows that tie them together.

pub mod config;
pub mod directory;
pub mod toast;
pub mod views;
pub mod workflow;

pub use config::{load_settings, normalize_api_base_url, ClientSettings};
pub use directory::{
    DirectoryClient, DirectoryResult, HttpPeopleTransport, PeopleTransport, PersonCache,
};
pub use toast::{RemovalReason, Toast, ToastEvent, ToastHub, ToastId, ToastKind, ToastTray};
pub use workflow::SaveRequest;
