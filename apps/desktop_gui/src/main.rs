mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Result};
use clap::Parser;
use client_core::{load_settings, normalize_api_base_url, views::Route};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::{commands::BackendCommand, runtime::spawn_backend_thread};
use crate::controller::events::UiEvent;
use crate::ui::PeopleApp;

#[derive(Parser, Debug)]
#[command(name = "people_gui", about = "Desktop front-end for the people directory")]
struct Args {
    /// People collection endpoint; overrides people.toml and PEOPLE_API_URL.
    #[arg(long)]
    api_url: Option<String>,
    /// Screen to open first, e.g. /people/3/edit.
    #[arg(long, default_value = "/people")]
    route: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
    }
    settings.api_base_url = normalize_api_base_url(&settings.api_base_url)?;
    let initial_route = Route::parse(&args.route);

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    spawn_backend_thread(settings.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("People Directory")
            .with_inner_size([1024.0, 720.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "People Directory",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(PeopleApp::new(
                cmd_tx,
                ui_rx,
                &settings,
                initial_route,
            )))
        }),
    )
    .map_err(|err| anyhow!("desktop ui exited with an error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;
    use client_core::views::Route;

    #[test]
    fn route_flag_opens_deep_links() {
        let args = Args::try_parse_from(["people_gui", "--route", "/people/4/delete"])
            .expect("parse");
        assert_eq!(Route::parse(&args.route), Route::Delete("4".to_string()));
        assert!(args.api_url.is_none());
    }

    #[test]
    fn defaults_to_the_list() {
        let args = Args::try_parse_from(["people_gui"]).expect("parse");
        assert_eq!(Route::parse(&args.route), Route::List);
    }
}
