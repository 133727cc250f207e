use std::fmt;

/// Screens reachable in the app. Ids stay raw so each view applies its own parsing rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    List,
    New,
    Edit(String),
    Delete(String),
}

impl Route {
    /// Empty and unknown paths fall back to the list.
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            ["people"] => Route::List,
            ["people", "new"] => Route::New,
            ["people", id, "edit"] => Route::Edit((*id).to_string()),
            ["people", id, "delete"] => Route::Delete((*id).to_string()),
            _ => Route::List,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::List => "/people".to_string(),
            Route::New => "/people/new".to_string(),
            Route::Edit(id) => format!("/people/{id}/edit"),
            Route::Delete(id) => format!("/people/{id}/delete"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_routes() {
        assert_eq!(Route::parse("/people"), Route::List);
        assert_eq!(Route::parse("people/new"), Route::New);
        assert_eq!(Route::parse("/people/3/edit"), Route::Edit("3".to_string()));
        assert_eq!(Route::parse("/people/3/delete/"), Route::Delete("3".to_string()));
    }

    #[test]
    fn empty_and_unknown_paths_redirect_to_list() {
        assert_eq!(Route::parse(""), Route::List);
        assert_eq!(Route::parse("/"), Route::List);
        assert_eq!(Route::parse("/settings"), Route::List);
        assert_eq!(Route::parse("/people/3"), Route::List);
    }

    #[test]
    fn path_round_trips_through_parse() {
        for route in [
            Route::List,
            Route::New,
            Route::Edit("5".to_string()),
            Route::Delete("5".to_string()),
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }
}
