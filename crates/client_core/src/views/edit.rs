//! Create/edit form shared by the "new" and "edit" routes.

use once_cell::sync::Lazy;
use regex::Regex;
use shared::{
    domain::{Address, Company, Person, PersonId},
    protocol::PersonDraft,
};

use super::{parse_person_id, Navigation};

// Same shape browsers accept for `type=email`, minus the length lookaheads checked separately.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid email regex")
});

const MAX_EMAIL_LEN: usize = 254;
const MAX_EMAIL_LOCAL_LEN: usize = 64;
pub const MIN_NAME_CHARS: usize = 3;

pub fn is_valid_email(value: &str) -> bool {
    let Some((local, _)) = value.split_once('@') else {
        return false;
    };
    value.len() <= MAX_EMAIL_LEN && local.len() <= MAX_EMAIL_LOCAL_LEN && EMAIL_RE.is_match(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Email,
    Phone,
    Address,
    Company,
}

impl FormField {
    pub const CONTROLS: [FormField; 5] = [
        FormField::Name,
        FormField::Email,
        FormField::Phone,
        FormField::Address,
        FormField::Company,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    NameInvalid,
    EmailInvalid,
    PhoneRequired,
}

impl FieldError {
    pub fn message(self) -> &'static str {
        match self {
            FieldError::NameInvalid => "Name is required and must be at least 3 characters.",
            FieldError::EmailInvalid => "Please enter a valid email address.",
            FieldError::PhoneRequired => "Phone number is required.",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFields {
    pub street: String,
    pub city: String,
    pub zipcode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyFields {
    pub name: String,
    pub catch_phrase: String,
}

/// Raw form values plus which top-level controls the user has interacted with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: AddressFields,
    pub company: CompanyFields,
    touched: Vec<FormField>,
}

impl PersonForm {
    /// Name, email and phone first; nested groups only when the person has them.
    pub fn patch_from(&mut self, person: &Person) {
        self.name = person.name.clone();
        self.email = person.email.clone();
        self.phone = person.phone.clone();

        if let Some(address) = &person.address {
            self.address = AddressFields {
                street: address.street.clone(),
                city: address.city.clone(),
                zipcode: address.zipcode.clone(),
            };
        }
        if let Some(company) = &person.company {
            self.company = CompanyFields {
                name: company.name.clone(),
                catch_phrase: company.catch_phrase.clone().unwrap_or_default(),
            };
        }
    }

    pub fn field_error(&self, field: FormField) -> Option<FieldError> {
        match field {
            FormField::Name if self.name.chars().count() < MIN_NAME_CHARS => {
                Some(FieldError::NameInvalid)
            }
            FormField::Email if self.email.is_empty() || !is_valid_email(&self.email) => {
                Some(FieldError::EmailInvalid)
            }
            FormField::Phone if self.phone.is_empty() => Some(FieldError::PhoneRequired),
            _ => None,
        }
    }

    pub fn errors(&self) -> Vec<FieldError> {
        FormField::CONTROLS
            .iter()
            .filter_map(|field| self.field_error(*field))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn touch(&mut self, field: FormField) {
        if !self.touched.contains(&field) {
            self.touched.push(field);
        }
    }

    pub fn touch_all(&mut self) {
        for field in FormField::CONTROLS {
            self.touch(field);
        }
    }

    pub fn is_touched(&self, field: FormField) -> bool {
        self.touched.contains(&field)
    }

    /// The message to show under `field`, if it has been touched and is invalid.
    pub fn visible_error(&self, field: FormField) -> Option<&'static str> {
        if !self.is_touched(field) {
            return None;
        }
        self.field_error(field).map(FieldError::message)
    }

    /// Both groups are always sent, as the form always carries them.
    pub fn to_draft(&self) -> PersonDraft {
        let catch_phrase = if self.company.catch_phrase.is_empty() {
            None
        } else {
            Some(self.company.catch_phrase.clone())
        };
        PersonDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: Some(Address {
                street: self.address.street.clone(),
                city: self.address.city.clone(),
                zipcode: self.address.zipcode.clone(),
            }),
            company: Some(Company {
                name: self.company.name.clone(),
                catch_phrase,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Create,
    Edit(PersonId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAction {
    /// Validation failed locally; every control is now marked touched.
    Rejected,
    /// A save is already in flight.
    Busy,
    Create(PersonDraft),
    Update(PersonId, PersonDraft),
}

#[derive(Debug, Clone)]
pub struct EditView {
    mode: EditMode,
    pub form: PersonForm,
    loading: bool,
    submitting: bool,
    error: Option<String>,
}

impl EditView {
    /// Create mode when the route carries no id or the literal `new`.
    pub fn from_route(id_param: Option<&str>) -> Self {
        let mut view = Self {
            mode: EditMode::Create,
            form: PersonForm::default(),
            loading: false,
            submitting: false,
            error: None,
        };

        match id_param {
            None | Some("new") => {}
            Some(raw) => match parse_person_id(raw) {
                Some(id) => {
                    view.mode = EditMode::Edit(id);
                    view.loading = true;
                }
                None => view.error = Some(format!("Invalid person ID: {raw}")),
            },
        }
        view
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_new(&self) -> bool {
        self.mode == EditMode::Create
    }

    /// The id to load, if the view is waiting on one.
    pub fn pending_load(&self) -> Option<PersonId> {
        match self.mode {
            EditMode::Edit(id) if self.loading => Some(id),
            _ => None,
        }
    }

    pub fn on_loaded(&mut self, person: &Person) {
        self.form.patch_from(person);
        self.loading = false;
    }

    /// `message` is already prefixed for display.
    pub fn on_load_failed(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn title(&self) -> &'static str {
        if self.is_new() {
            "Add New Person"
        } else {
            "Edit Person"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match (self.submitting, self.is_new()) {
            (true, _) => "Saving...",
            (false, true) => "Create Person",
            (false, false) => "Update Person",
        }
    }

    pub fn can_submit(&self) -> bool {
        self.form.is_valid() && !self.submitting
    }

    pub fn submit(&mut self) -> SubmitAction {
        if self.submitting {
            return SubmitAction::Busy;
        }
        if !self.form.is_valid() {
            self.form.touch_all();
            return SubmitAction::Rejected;
        }

        self.submitting = true;
        let draft = self.form.to_draft();
        match self.mode {
            EditMode::Create => SubmitAction::Create(draft),
            EditMode::Edit(id) => SubmitAction::Update(id, draft),
        }
    }

    pub fn on_save_succeeded(&mut self) -> Navigation {
        self.submitting = false;
        Navigation::ToList
    }

    pub fn on_save_failed(&mut self) {
        self.submitting = false;
    }
}
