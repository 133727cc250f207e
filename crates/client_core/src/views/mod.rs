//! Headless view models. Front-ends own one of these per route and render from its state.

pub mod delete;
pub mod edit;
pub mod list;
pub mod route;

use shared::domain::PersonId;

pub use delete::DeleteView;
pub use edit::{EditMode, EditView, FieldError, FormField, PersonForm, SubmitAction};
pub use list::{ListRenderState, ListView, SearchDebouncer, SortColumn, SortDirection, SortState};
pub use route::Route;

/// Where a view asks to go after a completed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    ToList,
}

pub(crate) fn parse_person_id(raw: &str) -> Option<PersonId> {
    raw.trim().parse::<i64>().ok().map(PersonId)
}
