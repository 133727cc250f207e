//! People list: debounced search, column sorting, loading/empty/populated rendering.

use std::{
    cmp::Ordering,
    time::{Duration, Instant},
};

use shared::domain::Person;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Name,
    Email,
    Phone,
    Company,
}

impl SortColumn {
    pub const ALL: [SortColumn; 5] = [
        SortColumn::Id,
        SortColumn::Name,
        SortColumn::Email,
        SortColumn::Phone,
        SortColumn::Company,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Id => "ID",
            SortColumn::Name => "Name",
            SortColumn::Email => "Email",
            SortColumn::Phone => "Phone",
            SortColumn::Company => "Company",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "id" => Some(SortColumn::Id),
            "name" => Some(SortColumn::Name),
            "email" => Some(SortColumn::Email),
            "phone" => Some(SortColumn::Phone),
            "company" | "company.name" => Some(SortColumn::Company),
            _ => None,
        }
    }

    fn compare(self, a: &Person, b: &Person) -> Ordering {
        match self {
            SortColumn::Id => a.id.cmp(&b.id),
            SortColumn::Name => locale_compare(&a.name, &b.name),
            SortColumn::Email => locale_compare(&a.email, &b.email),
            SortColumn::Phone => locale_compare(&a.phone, &b.phone),
            // Option orders None first, which is what an absent company should do.
            SortColumn::Company => match (a.company_name(), b.company_name()) {
                (Some(x), Some(y)) => locale_compare(x, y),
                (x, y) => x.cmp(&y),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: SortColumn::Id,
            direction: SortDirection::Asc,
        }
    }
}

impl SortState {
    /// Same column flips direction; a different column starts ascending.
    pub fn select(&mut self, column: SortColumn) {
        if self.column == column {
            self.direction = self.direction.toggled();
        } else {
            self.column = column;
            self.direction = SortDirection::Asc;
        }
    }

    pub fn apply(&self, people: &mut [Person]) {
        let column = self.column;
        match self.direction {
            SortDirection::Asc => people.sort_by(|a, b| column.compare(a, b)),
            SortDirection::Desc => people.sort_by(|a, b| column.compare(b, a)),
        }
    }
}

/// Case-folded comparison; strings equal under folding put lowercase first, as ICU collation does.
fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Case-insensitive substring match over name, email and company name.
pub fn filter_people(people: &[Person], term: &str) -> Vec<Person> {
    if term.trim().is_empty() {
        return people.to_vec();
    }
    let term = term.to_lowercase();
    people
        .iter()
        .filter(|person| {
            person.name.to_lowercase().contains(&term)
                || person.email.to_lowercase().contains(&term)
                || person
                    .company_name()
                    .is_some_and(|name| name.to_lowercase().contains(&term))
        })
        .cloned()
        .collect()
}

/// Emits search text once input has been quiet for `delay`, skipping repeats of the last
/// emitted value.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
    last_emitted: String,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            last_emitted: String::new(),
        }
    }

    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now + self.delay));
    }

    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = matches!(&self.pending, Some((_, deadline)) if now >= *deadline);
        if !due {
            return None;
        }
        let (text, _) = self.pending.take()?;
        if text == self.last_emitted {
            return None;
        }
        self.last_emitted = text.clone();
        Some(text)
    }

    /// Time left until the pending input is due, for scheduling the next repaint.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, deadline)| deadline.saturating_duration_since(now))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ListRenderState<'a> {
    Loading,
    Empty,
    Populated(&'a [Person]),
}

#[derive(Debug, Clone)]
pub struct ListView {
    loading: bool,
    people: Vec<Person>,
    filtered: Vec<Person>,
    search_input: String,
    active_term: String,
    debouncer: SearchDebouncer,
    sort: SortState,
}

impl ListView {
    pub fn new(search_debounce: Duration) -> Self {
        Self {
            loading: true,
            people: Vec::new(),
            filtered: Vec::new(),
            search_input: String::new(),
            active_term: String::new(),
            debouncer: SearchDebouncer::new(search_debounce),
            sort: SortState::default(),
        }
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    pub fn on_loaded(&mut self, people: Vec<Person>) {
        self.people = people;
        self.loading = false;
        self.refresh();
    }

    /// Load failures are reported through toasts; the view just stops loading.
    pub fn on_load_failed(&mut self) {
        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn set_search_input(&mut self, text: impl Into<String>, now: Instant) {
        self.search_input = text.into();
        self.debouncer.input(self.search_input.clone(), now);
    }

    /// Advances the debounce timer; returns `true` when the filter changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(term) => {
                self.apply_filter(&term);
                true
            }
            None => false,
        }
    }

    pub fn next_tick_in(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_due(now)
    }

    pub fn apply_filter(&mut self, term: &str) {
        self.active_term = term.to_string();
        self.refresh();
    }

    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort.select(column);
        self.sort.apply(&mut self.filtered);
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
        self.sort.apply(&mut self.filtered);
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn filtered(&self) -> &[Person] {
        &self.filtered
    }

    pub fn render_state(&self) -> ListRenderState<'_> {
        if self.loading {
            ListRenderState::Loading
        } else if self.filtered.is_empty() {
            ListRenderState::Empty
        } else {
            ListRenderState::Populated(&self.filtered)
        }
    }

    fn refresh(&mut self) {
        self.filtered = filter_people(&self.people, &self.active_term);
        self.sort.apply(&mut self.filtered);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::{Company, PersonId};

    fn person(id: i64, name: &str, email: &str, company: Option<&str>) -> Person {
        Person {
            id: PersonId(id),
            name: name.to_string(),
            email: email.to_string(),
            phone: format!("555-01{id:02}"),
            address: None,
            company: company.map(|name| Company {
                name: name.to_string(),
                catch_phrase: None,
            }),
        }
    }

    fn directory() -> Vec<Person> {
        vec![
            person(1, "Leanne Graham", "Sincere@april.biz", Some("Romaguera-Crona")),
            person(2, "Ervin Howell", "Shanna@melissa.tv", Some("Deckow-Crist")),
            person(3, "Clementine Bauch", "Nathan@yesenia.net", None),
            person(4, "patricia Lebsack", "Julianne.OConner@kory.org", Some("Robel-Corkery")),
            person(5, "Chelsey Dietrich", "Lucio_Hettinger@annie.ca", Some("Keebler LLC")),
        ]
    }

    fn ids(people: &[Person]) -> Vec<i64> {
        people.iter().map(|p| p.id.0).collect()
    }

    fn loaded_view() -> ListView {
        let mut view = ListView::new(Duration::from_millis(300));
        view.on_loaded(directory());
        view
    }

    #[test]
    fn filter_matches_name_email_or_company_case_insensitively() {
        let people = directory();
        assert_eq!(ids(&filter_people(&people, "GRAHAM")), vec![1]);
        assert_eq!(ids(&filter_people(&people, "melissa.tv")), vec![2]);
        assert_eq!(ids(&filter_people(&people, "keebler")), vec![5]);
        assert_eq!(ids(&filter_people(&people, "cr")), vec![1, 2]);
        assert!(filter_people(&people, "no such person").is_empty());
    }

    #[test]
    fn filter_result_is_exactly_the_matching_subset() {
        let people = directory();
        for term in ["e", "an", "LLC", ".org", "x"] {
            let lowered = term.to_lowercase();
            let expected: Vec<i64> = people
                .iter()
                .filter(|p| {
                    p.name.to_lowercase().contains(&lowered)
                        || p.email.to_lowercase().contains(&lowered)
                        || p.company_name()
                            .map(|c| c.to_lowercase().contains(&lowered))
                            .unwrap_or(false)
                })
                .map(|p| p.id.0)
                .collect();
            assert_eq!(ids(&filter_people(&people, term)), expected, "term {term:?}");
        }
    }

    #[test]
    fn blank_term_keeps_full_collection_in_order() {
        let people = directory();
        assert_eq!(filter_people(&people, ""), people);
        assert_eq!(filter_people(&people, "   "), people);
    }

    #[test]
    fn missing_company_is_not_an_error_when_filtering() {
        let people = directory();
        assert!(!ids(&filter_people(&people, "crona")).contains(&3));
    }

    #[test]
    fn sorting_same_column_twice_reverses_order() {
        let mut view = loaded_view();
        view.sort_by(SortColumn::Name);
        let ascending = ids(view.filtered());
        assert_eq!(ascending, vec![5, 3, 2, 1, 4]);

        view.sort_by(SortColumn::Name);
        let mut reversed = ascending.clone();
        reversed.reverse();
        assert_eq!(ids(view.filtered()), reversed);
        assert_eq!(view.sort().direction, SortDirection::Desc);
    }

    #[test]
    fn case_only_differences_sort_lowercase_first() {
        assert_eq!(locale_compare("alice", "Alice"), Ordering::Less);
        assert_eq!(locale_compare("Bob", "alice"), Ordering::Greater);

        let mut names = vec!["Alice", "bob", "alice", "Bob"];
        names.sort_by(|a, b| locale_compare(a, b));
        assert_eq!(names, vec!["alice", "Alice", "bob", "Bob"]);
    }

    #[test]
    fn new_column_always_starts_ascending() {
        let mut view = loaded_view();
        view.sort_by(SortColumn::Name);
        view.sort_by(SortColumn::Name);
        view.sort_by(SortColumn::Email);
        assert_eq!(
            view.sort(),
            SortState {
                column: SortColumn::Email,
                direction: SortDirection::Asc,
            }
        );
        assert_eq!(ids(view.filtered()), vec![4, 5, 3, 2, 1]);
    }

    #[test]
    fn initial_sort_is_id_ascending_and_first_click_on_id_flips_it() {
        let mut view = ListView::new(Duration::from_millis(300));
        let mut shuffled = directory();
        shuffled.reverse();
        view.on_loaded(shuffled);
        assert_eq!(ids(view.filtered()), vec![1, 2, 3, 4, 5]);

        view.sort_by(SortColumn::Id);
        assert_eq!(ids(view.filtered()), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn missing_company_sorts_first() {
        let mut view = loaded_view();
        view.sort_by(SortColumn::Company);
        assert_eq!(ids(view.filtered()), vec![3, 2, 5, 4, 1]);
    }

    #[test]
    fn render_state_follows_loading_then_filtered_length() {
        let mut view = ListView::new(Duration::from_millis(300));
        assert_eq!(view.render_state(), ListRenderState::Loading);

        view.on_loaded(directory());
        assert!(matches!(view.render_state(), ListRenderState::Populated(rows) if rows.len() == 5));

        view.apply_filter("zzz");
        assert_eq!(view.render_state(), ListRenderState::Empty);

        let mut failed = ListView::new(Duration::from_millis(300));
        failed.on_load_failed();
        assert_eq!(failed.render_state(), ListRenderState::Empty);
    }

    #[test]
    fn filtering_reapplies_active_sort() {
        let mut view = loaded_view();
        view.sort_by(SortColumn::Name);
        view.sort_by(SortColumn::Name);
        view.apply_filter("e");
        let names: Vec<_> = view.filtered().iter().map(|p| p.name.clone()).collect();
        let mut expected = names.clone();
        expected.sort_by(|a, b| locale_compare(b, a));
        assert_eq!(names, expected);
    }

    #[test]
    fn debouncer_waits_for_quiet_period() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::new(Duration::from_millis(300));

        debouncer.input("gra", start);
        debouncer.input("graham", start + Duration::from_millis(200));

        assert_eq!(debouncer.poll(start + Duration::from_millis(400)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(500)),
            Some("graham".to_string())
        );
        assert_eq!(debouncer.poll(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn debouncer_suppresses_unchanged_text() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::new(Duration::from_millis(300));

        debouncer.input("ervin", start);
        assert!(debouncer.poll(start + Duration::from_millis(300)).is_some());

        debouncer.input("ervi", start + Duration::from_millis(400));
        debouncer.input("ervin", start + Duration::from_millis(450));
        assert_eq!(debouncer.poll(start + Duration::from_millis(800)), None);
    }

    #[test]
    fn search_input_applies_after_tick() {
        let start = Instant::now();
        let mut view = loaded_view();

        view.set_search_input("howell", start);
        assert!(!view.tick(start + Duration::from_millis(100)));
        assert_eq!(view.filtered().len(), 5);
        assert_eq!(
            view.next_tick_in(start + Duration::from_millis(100)),
            Some(Duration::from_millis(200))
        );

        assert!(view.tick(start + Duration::from_millis(300)));
        assert_eq!(ids(view.filtered()), vec![2]);
        assert_eq!(view.search_input(), "howell");
    }

    #[test]
    fn parses_column_names() {
        assert_eq!(SortColumn::parse("Name"), Some(SortColumn::Name));
        assert_eq!(SortColumn::parse("company.name"), Some(SortColumn::Company));
        assert_eq!(SortColumn::parse("website"), None);
    }
}
