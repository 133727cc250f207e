use std::time::{Duration, Instant};

use client_core::{
    views::{
        DeleteView, EditView, FormField, ListRenderState, ListView, Navigation, PersonForm, Route,
        SortColumn, SortState, SubmitAction,
    },
    ClientSettings, SaveRequest, Toast, ToastId, ToastKind, ToastTray,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::Person;

use crate::backend_bridge::commands::{BackendCommand, LoadPurpose};
use crate::controller::events::{UiError, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

const IDLE_REPAINT: Duration = Duration::from_millis(250);
const BUSY_REPAINT: Duration = Duration::from_millis(50);
const FIELD_WIDTH: f32 = 320.0;

fn error_color() -> egui::Color32 {
    egui::Color32::from_rgb(220, 90, 90)
}

pub enum Screen {
    List(ListView),
    Edit(EditView),
    Delete(DeleteView),
}

/// Requests collected while drawing a frame and applied once drawing is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Navigate(Route),
    ReloadPeople,
    Sort(SortColumn),
    Submit,
    ConfirmDelete,
    DismissToast(ToastId),
}

/// Builds the screen for `route` along with the command that feeds it, if any.
///
/// Ids that fail to parse leave the view showing its inline error; the same text is
/// raised as an error toast.
pub fn open_route(route: &Route, search_debounce: Duration) -> (Screen, Option<BackendCommand>) {
    match route {
        Route::List => (
            Screen::List(ListView::new(search_debounce)),
            Some(BackendCommand::LoadPeople),
        ),
        Route::New => (Screen::Edit(EditView::from_route(Some("new"))), None),
        Route::Edit(raw) => {
            let view = EditView::from_route(Some(raw.as_str()));
            let cmd = match (view.pending_load(), view.error()) {
                (Some(id), _) => Some(BackendCommand::LoadPerson {
                    id,
                    purpose: LoadPurpose::Edit,
                }),
                (None, Some(message)) => Some(BackendCommand::ShowError(message.to_string())),
                (None, None) => None,
            };
            (Screen::Edit(view), cmd)
        }
        Route::Delete(raw) => {
            let view = DeleteView::from_route(Some(raw.as_str()));
            let cmd = match (view.pending_load(), view.error()) {
                (Some(id), _) => Some(BackendCommand::LoadPerson {
                    id,
                    purpose: LoadPurpose::Delete,
                }),
                (None, Some(message)) => Some(BackendCommand::ShowError(message.to_string())),
                (None, None) => None,
            };
            (Screen::Delete(view), cmd)
        }
    }
}

pub struct PeopleApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    search_debounce: Duration,

    route: Route,
    screen: Screen,
    address_bar: String,

    tray: ToastTray,
    status: String,
    banner: Option<UiError>,
}

impl PeopleApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: &ClientSettings,
        initial_route: Route,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            search_debounce: settings.search_debounce,
            route: Route::List,
            screen: Screen::List(ListView::new(settings.search_debounce)),
            address_bar: String::new(),
            tray: ToastTray::default(),
            status: format!("Connecting to {}", settings.api_base_url),
            banner: None,
        };
        app.navigate(initial_route);
        app
    }

    fn dispatch(&mut self, cmd: BackendCommand) -> bool {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.banner)
    }

    pub fn navigate(&mut self, route: Route) {
        tracing::debug!(path = %route, "navigate");
        let (screen, cmd) = open_route(&route, self.search_debounce);
        self.screen = screen;
        self.address_bar = route.path();
        self.route = route;

        if let Some(cmd) = cmd {
            if !self.dispatch(cmd) {
                self.abandon_load();
            }
        }
    }

    /// Leaves the loading state when the load request never made it to the backend.
    fn abandon_load(&mut self) {
        let message = self
            .banner
            .as_ref()
            .map(|err| err.message().to_string())
            .unwrap_or_default();
        match &mut self.screen {
            Screen::List(view) => view.on_load_failed(),
            Screen::Edit(view) if view.is_loading() => view.on_load_failed(message),
            Screen::Delete(view) if view.is_loading() => view.on_load_failed(message),
            _ => {}
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.apply_event(event);
        }
    }

    pub fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => self.status = message,
            UiEvent::Error(err) => {
                tracing::warn!(
                    context = ?err.context(),
                    category = ?err.category(),
                    "{}",
                    err.message()
                );
                self.banner = Some(err);
            }
            UiEvent::Toast(event) => self.tray.apply(event),
            UiEvent::PeopleLoaded(people) => {
                if let Screen::List(view) = &mut self.screen {
                    view.on_loaded(people);
                }
            }
            UiEvent::PeopleLoadFailed(message) => {
                tracing::debug!("list load failed: {message}");
                if let Screen::List(view) = &mut self.screen {
                    view.on_load_failed();
                }
            }
            UiEvent::PersonLoaded { purpose, person } => match (purpose, &mut self.screen) {
                (LoadPurpose::Edit, Screen::Edit(view)) if view.pending_load() == Some(person.id) => {
                    view.on_loaded(&person);
                }
                (LoadPurpose::Delete, Screen::Delete(view))
                    if view.pending_load() == Some(person.id) =>
                {
                    view.on_loaded(person);
                }
                _ => tracing::debug!(id = %person.id, "dropping stale person load"),
            },
            UiEvent::PersonLoadFailed {
                purpose,
                id,
                message,
            } => match (purpose, &mut self.screen) {
                (LoadPurpose::Edit, Screen::Edit(view)) if view.pending_load() == Some(id) => {
                    view.on_load_failed(message);
                }
                (LoadPurpose::Delete, Screen::Delete(view)) if view.pending_load() == Some(id) => {
                    view.on_load_failed(message);
                }
                _ => tracing::debug!(%id, "dropping stale person load failure"),
            },
            UiEvent::PersonSaved(person) => {
                let navigation = match &mut self.screen {
                    Screen::Edit(view) if view.is_submitting() => Some(view.on_save_succeeded()),
                    _ => None,
                };
                tracing::info!(id = %person.id, "person saved");
                self.follow(navigation);
            }
            UiEvent::SaveFailed(message) => {
                tracing::debug!("save failed: {message}");
                if let Screen::Edit(view) = &mut self.screen {
                    view.on_save_failed();
                }
            }
            UiEvent::PersonDeleted(id) => {
                let navigation = match &mut self.screen {
                    Screen::Delete(view) if view.is_deleting() => Some(view.on_delete_succeeded()),
                    _ => None,
                };
                tracing::info!(%id, "person deleted");
                self.follow(navigation);
            }
            UiEvent::DeleteFailed(message) => {
                tracing::debug!("delete failed: {message}");
                if let Screen::Delete(view) = &mut self.screen {
                    view.on_delete_failed();
                }
            }
        }
    }

    fn follow(&mut self, navigation: Option<Navigation>) {
        match navigation {
            Some(Navigation::ToList) => self.navigate(Route::List),
            None => {}
        }
    }

    pub fn handle_action(&mut self, action: UiAction) {
        match action {
            UiAction::Navigate(route) => self.navigate(route),
            UiAction::ReloadPeople => {
                if let Screen::List(view) = &mut self.screen {
                    view.begin_load();
                    if !self.dispatch(BackendCommand::ReloadPeople) {
                        self.abandon_load();
                    }
                }
            }
            UiAction::Sort(column) => {
                if let Screen::List(view) = &mut self.screen {
                    view.sort_by(column);
                }
            }
            UiAction::Submit => {
                let request = match &mut self.screen {
                    Screen::Edit(view) => match view.submit() {
                        SubmitAction::Create(draft) => SaveRequest::Create(draft),
                        SubmitAction::Update(id, draft) => SaveRequest::Update(id, draft),
                        SubmitAction::Rejected | SubmitAction::Busy => return,
                    },
                    _ => return,
                };
                if !self.dispatch(BackendCommand::SavePerson(request)) {
                    if let Screen::Edit(view) = &mut self.screen {
                        view.on_save_failed();
                    }
                }
            }
            UiAction::ConfirmDelete => {
                let Screen::Delete(view) = &mut self.screen else {
                    return;
                };
                let Some(id) = view.confirm() else {
                    return;
                };
                if !self.dispatch(BackendCommand::DeletePerson(id)) {
                    if let Screen::Delete(view) = &mut self.screen {
                        view.on_delete_failed();
                    }
                }
            }
            UiAction::DismissToast(id) => {
                self.dispatch(BackendCommand::DismissToast(id));
            }
        }
    }

    fn repaint_delay(&self, now: Instant) -> Duration {
        let busy = !self.tray.is_empty()
            || match &self.screen {
                Screen::List(view) => view.is_loading(),
                Screen::Edit(view) => view.is_loading() || view.is_submitting(),
                Screen::Delete(view) => view.is_loading() || view.is_deleting(),
            };
        let base = if busy { BUSY_REPAINT } else { IDLE_REPAINT };
        match &self.screen {
            Screen::List(view) => view.next_tick_in(now).map_or(base, |due| due.min(base)),
            _ => base,
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("People Directory");
                ui.separator();
                if ui
                    .selectable_label(self.route == Route::List, "People")
                    .clicked()
                {
                    actions.push(UiAction::Navigate(Route::List));
                }
                if ui
                    .selectable_label(self.route == Route::New, "Add Person")
                    .clicked()
                {
                    actions.push(UiAction::Navigate(Route::New));
                }
                ui.separator();

                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.address_bar)
                        .hint_text("/people/1/edit")
                        .desired_width(200.0),
                );
                let entered =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if entered || ui.button("Go").clicked() {
                    actions.push(UiAction::Navigate(Route::parse(&self.address_bar)));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(self.status.as_str());
                });
            });
        });
    }
}

impl eframe::App for PeopleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let now = Instant::now();
        if let Screen::List(view) = &mut self.screen {
            view.tick(now);
        }

        let mut actions = Vec::new();
        self.show_top_bar(ctx, &mut actions);

        egui::CentralPanel::default().show(ctx, |ui| {
            show_banner(ui, &mut self.banner);
            match &mut self.screen {
                Screen::List(view) => show_list(ui, view, now, &mut actions),
                Screen::Edit(view) => show_edit(ui, view, &mut actions),
                Screen::Delete(view) => show_delete(ui, view, &mut actions),
            }
        });
        show_toasts(ctx, self.tray.toasts(), &mut actions);

        for action in actions {
            self.handle_action(action);
        }

        ctx.request_repaint_after(self.repaint_delay(now));
    }
}

fn show_banner(ui: &mut egui::Ui, banner: &mut Option<UiError>) {
    let Some(err) = banner.as_ref() else {
        return;
    };

    let mut dismissed = false;
    egui::Frame::NONE
        .fill(egui::Color32::from_rgb(111, 53, 53))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(10, 8))
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(
                    egui::RichText::new(err.headline())
                        .strong()
                        .color(egui::Color32::WHITE),
                );
                ui.label(egui::RichText::new(err.message()).color(egui::Color32::WHITE));
                if !err.is_fatal() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            dismissed = true;
                        }
                    });
                }
            });
        });
    ui.add_space(8.0);

    if dismissed {
        *banner = None;
    }
}

fn loading_row(ui: &mut egui::Ui, text: &str) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(text);
    });
}

fn show_list(ui: &mut egui::Ui, view: &mut ListView, now: Instant, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        ui.heading("People");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Add Person").clicked() {
                actions.push(UiAction::Navigate(Route::New));
            }
            if ui
                .add_enabled(!view.is_loading(), egui::Button::new("Reload"))
                .clicked()
            {
                actions.push(UiAction::ReloadPeople);
            }
        });
    });

    let mut search = view.search_input().to_string();
    let response = ui.add(
        egui::TextEdit::singleline(&mut search)
            .hint_text("Search by name, email, or company...")
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        view.set_search_input(search, now);
    }
    ui.add_space(6.0);

    let sort = view.sort();
    match view.render_state() {
        ListRenderState::Loading => loading_row(ui, "Loading people..."),
        ListRenderState::Empty => {
            ui.weak("No people found.");
        }
        ListRenderState::Populated(people) => people_table(ui, people, sort, actions),
    }
}

fn people_table(ui: &mut egui::Ui, people: &[Person], sort: SortState, actions: &mut Vec<UiAction>) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new("people_table")
                .striped(true)
                .num_columns(SortColumn::ALL.len() + 1)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    for column in SortColumn::ALL {
                        let label = if sort.column == column {
                            format!("{} {}", column.label(), sort.direction.arrow())
                        } else {
                            column.label().to_string()
                        };
                        let header = egui::Button::new(egui::RichText::new(label).strong()).frame(false);
                        if ui.add(header).clicked() {
                            actions.push(UiAction::Sort(column));
                        }
                    }
                    ui.label(egui::RichText::new("Actions").strong());
                    ui.end_row();

                    for person in people {
                        ui.label(person.id.to_string());
                        ui.label(person.name.as_str());
                        ui.label(person.email.as_str());
                        ui.label(person.phone.as_str());
                        ui.label(person.company_name().unwrap_or("-"));
                        ui.horizontal(|ui| {
                            let id = person.id.to_string();
                            if ui.small_button("Edit").clicked() {
                                actions.push(UiAction::Navigate(Route::Edit(id.clone())));
                            }
                            if ui.small_button("Delete").clicked() {
                                actions.push(UiAction::Navigate(Route::Delete(id)));
                            }
                        });
                        ui.end_row();
                    }
                });
        });
}

fn show_edit(ui: &mut egui::Ui, view: &mut EditView, actions: &mut Vec<UiAction>) {
    ui.heading(view.title());
    ui.add_space(8.0);

    if view.is_loading() {
        loading_row(ui, "Loading person...");
        return;
    }
    if let Some(error) = view.error() {
        ui.colored_label(error_color(), error);
        if ui.button("Back to list").clicked() {
            actions.push(UiAction::Navigate(Route::List));
        }
        return;
    }

    let enabled = !view.is_submitting();
    let form = &mut view.form;
    egui::Grid::new("person_form")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            required_field(ui, form, FormField::Name, "Name *", enabled);
            required_field(ui, form, FormField::Email, "Email *", enabled);
            required_field(ui, form, FormField::Phone, "Phone *", enabled);

            section_row(ui, "Address");
            optional_field(ui, "Street", &mut form.address.street, enabled);
            optional_field(ui, "City", &mut form.address.city, enabled);
            optional_field(ui, "Zipcode", &mut form.address.zipcode, enabled);

            section_row(ui, "Company");
            optional_field(ui, "Name", &mut form.company.name, enabled);
            optional_field(ui, "Catch phrase", &mut form.company.catch_phrase, enabled);
        });

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        if ui
            .add_enabled(view.can_submit(), egui::Button::new(view.submit_label()))
            .clicked()
        {
            actions.push(UiAction::Submit);
        }
        if ui
            .add_enabled(enabled, egui::Button::new("Cancel"))
            .clicked()
        {
            actions.push(UiAction::Navigate(Route::List));
        }
    });
}

fn required_field(
    ui: &mut egui::Ui,
    form: &mut PersonForm,
    field: FormField,
    label: &str,
    enabled: bool,
) {
    ui.label(label);
    ui.vertical(|ui| {
        let value = match field {
            FormField::Name => &mut form.name,
            FormField::Email => &mut form.email,
            FormField::Phone => &mut form.phone,
            FormField::Address | FormField::Company => return,
        };
        let response = ui.add_enabled(
            enabled,
            egui::TextEdit::singleline(value).desired_width(FIELD_WIDTH),
        );
        if response.lost_focus() {
            form.touch(field);
        }
        if let Some(message) = form.visible_error(field) {
            ui.colored_label(error_color(), message);
        }
    });
    ui.end_row();
}

fn optional_field(ui: &mut egui::Ui, label: &str, value: &mut String, enabled: bool) {
    ui.label(label);
    ui.add_enabled(
        enabled,
        egui::TextEdit::singleline(value).desired_width(FIELD_WIDTH),
    );
    ui.end_row();
}

fn section_row(ui: &mut egui::Ui, title: &str) {
    ui.label(egui::RichText::new(title).strong());
    ui.label("");
    ui.end_row();
}

fn show_delete(ui: &mut egui::Ui, view: &DeleteView, actions: &mut Vec<UiAction>) {
    ui.heading("Delete Person");
    ui.add_space(8.0);

    if view.is_loading() {
        loading_row(ui, "Loading person...");
        return;
    }
    if let Some(error) = view.error() {
        ui.colored_label(error_color(), error);
        if ui.button("Back to list").clicked() {
            actions.push(UiAction::Navigate(Route::List));
        }
        return;
    }
    let Some(person) = view.person() else {
        return;
    };

    ui.label("Are you sure you want to delete this person? This action cannot be undone.");
    ui.add_space(8.0);
    person_details(ui, person);
    ui.add_space(12.0);

    let idle = !view.is_deleting();
    ui.horizontal(|ui| {
        let confirm = egui::Button::new(
            egui::RichText::new(view.confirm_label()).color(egui::Color32::WHITE),
        )
        .fill(egui::Color32::from_rgb(170, 50, 50));
        if ui.add_enabled(idle, confirm).clicked() {
            actions.push(UiAction::ConfirmDelete);
        }
        if ui.add_enabled(idle, egui::Button::new("Cancel")).clicked() {
            actions.push(UiAction::Navigate(Route::List));
        }
    });
}

fn person_details(ui: &mut egui::Ui, person: &Person) {
    egui::Grid::new("person_details")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            let row = |ui: &mut egui::Ui, label: &str, value: String| {
                ui.label(egui::RichText::new(label).strong());
                ui.label(value);
                ui.end_row();
            };
            row(ui, "ID", person.id.to_string());
            row(ui, "Name", person.name.clone());
            row(ui, "Email", person.email.clone());
            row(ui, "Phone", person.phone.clone());
            if let Some(address) = &person.address {
                row(
                    ui,
                    "Address",
                    format!("{}, {} {}", address.street, address.city, address.zipcode),
                );
            }
            if let Some(company) = &person.company {
                row(ui, "Company", company.name.clone());
                if let Some(phrase) = &company.catch_phrase {
                    row(ui, "Catch phrase", phrase.clone());
                }
            }
        });
}

fn show_toasts(ctx: &egui::Context, toasts: &[Toast], actions: &mut Vec<UiAction>) {
    if toasts.is_empty() {
        return;
    }

    egui::Area::new(egui::Id::new("toast_overlay"))
        .order(egui::Order::Foreground)
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
        .show(ctx, |ui| {
            for toast in toasts {
                let fill = match toast.kind {
                    ToastKind::Success => egui::Color32::from_rgb(46, 125, 50),
                    ToastKind::Error => egui::Color32::from_rgb(183, 28, 28),
                };
                egui::Frame::NONE
                    .fill(fill)
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::symmetric(12, 8))
                    .show(ui, |ui| {
                        ui.set_max_width(360.0);
                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new(toast.message.as_str())
                                    .color(egui::Color32::WHITE),
                            );
                            if ui.small_button("x").clicked() {
                                actions.push(UiAction::DismissToast(toast.id));
                            }
                        });
                    });
                ui.add_space(6.0);
            }
        });
}
