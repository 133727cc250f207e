use std::process::ExitCode;

use anyhow::{anyhow, bail, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    load_settings, normalize_api_base_url,
    views::{
        DeleteView, EditView, FormField, ListRenderState, ListView, PersonForm, SortColumn,
        SortDirection, SortState, SubmitAction,
    },
    workflow, ClientSettings, DirectoryClient, SaveRequest, ToastEvent, ToastHub, ToastKind,
    ToastTray,
};
use shared::domain::{Person, PersonId};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "people", about = "Manage the people directory from the command line")]
struct Cli {
    /// People collection endpoint; overrides people.toml and PEOPLE_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List people, optionally filtered and sorted.
    List {
        #[arg(long)]
        search: Option<String>,
        /// One of: id, name, email, phone, company.
        #[arg(long, default_value = "id")]
        sort: String,
        #[arg(long)]
        desc: bool,
        #[arg(long)]
        json: bool,
    },
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    Create(PersonArgs),
    /// Loads the person and overwrites only the given fields.
    Update {
        id: String,
        #[command(flatten)]
        fields: PersonArgs,
    },
    Delete {
        id: Option<String>,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default, Clone)]
struct PersonArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    street: Option<String>,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    zipcode: Option<String>,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    catch_phrase: Option<String>,
}

impl PersonArgs {
    fn apply_to(self, form: &mut PersonForm) {
        let targets = [
            (self.name, &mut form.name),
            (self.email, &mut form.email),
            (self.phone, &mut form.phone),
            (self.street, &mut form.address.street),
            (self.city, &mut form.address.city),
            (self.zipcode, &mut form.address.zipcode),
            (self.company, &mut form.company.name),
            (self.catch_phrase, &mut form.company.catch_phrase),
        ];
        for (value, slot) in targets {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_base_url = api_url;
    }
    settings.api_base_url = normalize_api_base_url(&settings.api_base_url)?;
    tracing::debug!(
        api = %settings.api_base_url,
        timeout_secs = settings.request_timeout.as_secs(),
        "resolved settings"
    );

    let client = DirectoryClient::over_http(settings.api_base_url.clone(), settings.request_timeout)?;
    let toasts = ToastHub::new(settings.toast_ttl);
    let mut toast_rx = toasts.subscribe();

    let outcome = run(cli.command, &client, &toasts, &settings).await;
    let reported_error = print_toasts(&mut toast_rx);

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            if !reported_error {
                eprintln!("error: {err:#}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(
    command: Command,
    client: &DirectoryClient,
    toasts: &ToastHub,
    settings: &ClientSettings,
) -> Result<()> {
    match command {
        Command::List {
            search,
            sort,
            desc,
            json,
        } => {
            let column = SortColumn::parse(&sort).ok_or_else(|| {
                anyhow!("unknown sort column '{sort}' (expected id, name, email, phone or company)")
            })?;
            let mut view = ListView::new(settings.search_debounce);
            match workflow::load_people(client, toasts).await {
                Ok(people) => view.on_loaded(people),
                Err(err) => {
                    view.on_load_failed();
                    return Err(err.into());
                }
            }
            if let Some(term) = search {
                view.apply_filter(&term);
            }
            view.set_sort(SortState {
                column,
                direction: if desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                },
            });

            match view.render_state() {
                ListRenderState::Populated(rows) if json => {
                    println!("{}", serde_json::to_string_pretty(rows)?);
                }
                ListRenderState::Populated(rows) => print!("{}", render_table(rows, view.sort())),
                ListRenderState::Empty if json => println!("[]"),
                ListRenderState::Loading | ListRenderState::Empty => {
                    println!("No people found. Try a different search term or add a new person.");
                }
            }
        }
        Command::Show { id, json } => {
            let id = parse_id(&id)?;
            let person = workflow::load_person(client, toasts, id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&person)?);
            } else {
                print!("{}", render_details(&person));
            }
        }
        Command::Create(fields) => {
            let mut view = EditView::from_route(Some("new"));
            fields.apply_to(&mut view.form);
            submit_form(&mut view, client, toasts).await?;
        }
        Command::Update { id, fields } => {
            let mut view = match update_view(&id) {
                Ok(view) => view,
                Err(err) => {
                    toasts.show_error(&err.to_string());
                    return Err(err);
                }
            };
            if let Some(person_id) = view.pending_load() {
                match workflow::load_person(client, toasts, person_id).await {
                    Ok(person) => view.on_loaded(&person),
                    Err(err) => {
                        view.on_load_failed(err.message());
                        return Err(err.into());
                    }
                }
            }
            fields.apply_to(&mut view.form);
            submit_form(&mut view, client, toasts).await?;
        }
        Command::Delete { id, yes } => {
            let mut view = DeleteView::from_route(id.as_deref());
            if let Some(message) = view.error() {
                toasts.show_error(message);
                bail!("{message}");
            }
            if let Some(person_id) = view.pending_load() {
                match workflow::load_person(client, toasts, person_id).await {
                    Ok(person) => view.on_loaded(person),
                    Err(err) => {
                        view.on_load_failed(err.message());
                        return Err(err.into());
                    }
                }
            }
            if let Some(person) = view.person() {
                print!("{}", render_details(person));
            }
            if !yes && !confirm_prompt().await? {
                println!("Cancelled.");
                return Ok(());
            }

            let Some(person_id) = view.confirm() else {
                bail!("nothing to delete");
            };
            match workflow::delete_person(client, toasts, person_id).await {
                Ok(()) => {
                    view.on_delete_succeeded();
                }
                Err(err) => {
                    view.on_delete_failed();
                    return Err(err.into());
                }
            }
        }
    }
    Ok(())
}

async fn submit_form(
    view: &mut EditView,
    client: &DirectoryClient,
    toasts: &ToastHub,
) -> Result<()> {
    let request = match view.submit() {
        SubmitAction::Rejected => {
            for field in FormField::CONTROLS {
                if let Some(message) = view.form.visible_error(field) {
                    eprintln!("{message}");
                }
            }
            bail!("person form is invalid; nothing was sent");
        }
        SubmitAction::Busy => bail!("a save is already in progress"),
        SubmitAction::Create(draft) => SaveRequest::Create(draft),
        SubmitAction::Update(id, draft) => SaveRequest::Update(id, draft),
    };

    match workflow::save_person(client, toasts, request).await {
        Ok(person) => {
            view.on_save_succeeded();
            print!("{}", render_details(&person));
            Ok(())
        }
        Err(err) => {
            view.on_save_failed();
            Err(err.into())
        }
    }
}

async fn confirm_prompt() -> Result<bool> {
    println!("Are you sure you want to delete this person? This action cannot be undone. [y/N]");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn parse_id(raw: &str) -> Result<PersonId> {
    raw.trim()
        .parse::<i64>()
        .map(PersonId)
        .map_err(|_| anyhow!("Invalid person ID: {raw}"))
}

/// `update` always targets an existing person, so "new" is rejected like any other bad id.
fn update_view(raw: &str) -> Result<EditView> {
    let id = parse_id(raw)?;
    Ok(EditView::from_route(Some(id.to_string().as_str())))
}

/// Prints every queued toast to stderr; returns whether any of them was an error.
fn print_toasts(rx: &mut broadcast::Receiver<ToastEvent>) -> bool {
    let mut tray = ToastTray::default();
    tray.drain(rx);
    let mut saw_error = false;
    for toast in tray.toasts() {
        match toast.kind {
            ToastKind::Success => eprintln!("[ok] {}", toast.message),
            ToastKind::Error => {
                saw_error = true;
                eprintln!("[error] {}", toast.message);
            }
        }
    }
    saw_error
}

fn render_details(person: &Person) -> String {
    let mut out = format!(
        "ID:       {}\nName:     {}\nEmail:    {}\nPhone:    {}\n",
        person.id, person.name, person.email, person.phone
    );
    if let Some(company) = person.company_name().filter(|name| !name.is_empty()) {
        out.push_str(&format!("Company:  {company}\n"));
    }
    if let Some(address) = &person.address {
        out.push_str(&format!(
            "Address:  {}, {} {}\n",
            address.street, address.city, address.zipcode
        ));
    }
    out
}

fn render_table(rows: &[Person], sort: SortState) -> String {
    let header: Vec<String> = SortColumn::ALL
        .iter()
        .map(|column| {
            if *column == sort.column {
                format!("{} {}", column.label(), sort.direction.arrow())
            } else {
                column.label().to_string()
            }
        })
        .collect();
    let body: Vec<[String; 5]> = rows
        .iter()
        .map(|person| {
            [
                person.id.to_string(),
                person.name.clone(),
                person.email.clone(),
                person.phone.clone(),
                person.company_name().unwrap_or_default().to_string(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}", width = *width))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = format_row(&header);
    for row in &body {
        out.push_str(&format_row(row));
    }
    out
}
