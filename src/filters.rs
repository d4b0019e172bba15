//! Filter state and the query-parameter mapping for the repository list.
//!
//! The forward mapping (`to_query`) and the reverse mapping (`from_query`)
//! follow one rule: `sort`, `direction`, `page`, and `per_page` are always
//! emitted; `affiliation` and `visibility` are omitted at their defaults;
//! `search` is omitted when empty. Parsing is total — every enum field
//! coerces invalid input to its default, numeric fields clamp/snap — so
//! untrusted input can never produce an invalid [`FilterState`].

/// Page sizes the UI offers. Anything else snaps to [`DEFAULT_PER_PAGE`].
pub const PAGE_SIZES: [u32; 4] = [10, 30, 50, 100];
pub const DEFAULT_PER_PAGE: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Affiliation {
    #[default]
    Owner,
    Collaborator,
    OrganizationMember,
}

impl Affiliation {
    pub fn as_str(self) -> &'static str {
        match self {
            Affiliation::Owner => "owner",
            Affiliation::Collaborator => "collaborator",
            Affiliation::OrganizationMember => "organization_member",
        }
    }

    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(Affiliation::Owner),
            "collaborator" => Some(Affiliation::Collaborator),
            "organization_member" => Some(Affiliation::OrganizationMember),
            _ => None,
        }
    }

    pub fn cycled(self) -> Self {
        match self {
            Affiliation::Owner => Affiliation::Collaborator,
            Affiliation::Collaborator => Affiliation::OrganizationMember,
            Affiliation::OrganizationMember => Affiliation::Owner,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    All,
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::All => "all",
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }

    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Visibility::All),
            "public" => Some(Visibility::Public),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }

    pub fn cycled(self) -> Self {
        match self {
            Visibility::All => Visibility::Public,
            Visibility::Public => Visibility::Private,
            Visibility::Private => Visibility::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Created,
    #[default]
    Updated,
    Pushed,
    FullName,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Created => "created",
            SortKey::Updated => "updated",
            SortKey::Pushed => "pushed",
            SortKey::FullName => "full_name",
        }
    }

    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "created" => Some(SortKey::Created),
            "updated" => Some(SortKey::Updated),
            "pushed" => Some(SortKey::Pushed),
            "full_name" => Some(SortKey::FullName),
            _ => None,
        }
    }

    pub fn cycled(self) -> Self {
        match self {
            SortKey::Created => SortKey::Updated,
            SortKey::Updated => SortKey::Pushed,
            SortKey::Pushed => SortKey::FullName,
            SortKey::FullName => SortKey::Created,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub affiliation: Affiliation,
    pub visibility: Visibility,
    pub sort: SortKey,
    pub direction: SortDirection,
    pub per_page: u32,
    pub page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            affiliation: Affiliation::default(),
            visibility: Visibility::default(),
            sort: SortKey::default(),
            direction: SortDirection::default(),
            per_page: DEFAULT_PER_PAGE,
            page: 1,
        }
    }
}

/// Snap an arbitrary page size onto the allowed set.
fn snap_per_page(value: u32) -> u32 {
    if PAGE_SIZES.contains(&value) {
        value
    } else {
        DEFAULT_PER_PAGE
    }
}

impl FilterState {
    /// Canonical query pairs for the remote list endpoint.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(7);
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if self.affiliation != Affiliation::default() {
            pairs.push(("affiliation", self.affiliation.as_str().to_string()));
        }
        if self.visibility != Visibility::default() {
            pairs.push(("visibility", self.visibility.as_str().to_string()));
        }
        pairs.push(("sort", self.sort.as_str().to_string()));
        pairs.push(("direction", self.direction.as_str().to_string()));
        pairs.push(("per_page", self.per_page.to_string()));
        pairs.push(("page", self.page.to_string()));
        pairs
    }

    /// Rebuild a valid state from untrusted query pairs. Unknown keys are
    /// ignored, invalid values coerce to defaults. Never fails.
    pub fn from_query<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut state = FilterState::default();
        for (key, value) in pairs {
            match key {
                "search" => state.search = value.to_string(),
                "affiliation" => {
                    state.affiliation = Affiliation::from_param(value).unwrap_or_default();
                }
                "visibility" => {
                    state.visibility = Visibility::from_param(value).unwrap_or_default();
                }
                "sort" => state.sort = SortKey::from_param(value).unwrap_or_default(),
                "direction" => {
                    state.direction = SortDirection::from_param(value).unwrap_or_default();
                }
                "per_page" => {
                    state.per_page = snap_per_page(value.parse().unwrap_or(DEFAULT_PER_PAGE));
                }
                "page" => state.page = value.parse::<u32>().unwrap_or(1).max(1),
                _ => {}
            }
        }
        state
    }

    // Every setter except `set_page` resets pagination: the old page number
    // is meaningless under a different filter.

    pub fn set_search(&mut self, term: String) {
        self.search = term;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn cycle_affiliation(&mut self) {
        self.affiliation = self.affiliation.cycled();
        self.page = 1;
    }

    pub fn cycle_visibility(&mut self) {
        self.visibility = self.visibility.cycled();
        self.page = 1;
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.cycled();
        self.page = 1;
    }

    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.flipped();
        self.page = 1;
    }

    pub fn cycle_per_page(&mut self) {
        let idx = PAGE_SIZES
            .iter()
            .position(|&s| s == self.per_page)
            .unwrap_or(1);
        self.per_page = PAGE_SIZES[(idx + 1) % PAGE_SIZES.len()];
        self.page = 1;
    }

    /// One-line summary for the footer, e.g. `"updated desc · owner · 30/page"`.
    pub fn summary(&self) -> String {
        format!(
            "{} {} · {} · {} · {}/page",
            self.sort.as_str(),
            self.direction.as_str(),
            self.affiliation.as_str(),
            self.visibility.as_str(),
            self.per_page
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn roundtrip(state: &FilterState) -> FilterState {
        let pairs = state.to_query();
        FilterState::from_query(pairs.iter().map(|(k, v)| (*k, v.as_str())))
    }

    #[test]
    fn default_roundtrips() {
        let f = FilterState::default();
        assert_eq!(roundtrip(&f), f);
    }

    #[test]
    fn non_default_roundtrips() {
        let mut f = FilterState::default();
        f.search = "legacy".to_string();
        f.affiliation = Affiliation::Collaborator;
        f.visibility = Visibility::Private;
        f.sort = SortKey::Created;
        f.direction = SortDirection::Asc;
        f.per_page = 100;
        f.page = 4;
        assert_eq!(roundtrip(&f), f);
    }

    #[test]
    fn every_enum_combination_roundtrips() {
        for affiliation in [
            Affiliation::Owner,
            Affiliation::Collaborator,
            Affiliation::OrganizationMember,
        ] {
            for visibility in [Visibility::All, Visibility::Public, Visibility::Private] {
                for sort in [
                    SortKey::Created,
                    SortKey::Updated,
                    SortKey::Pushed,
                    SortKey::FullName,
                ] {
                    for direction in [SortDirection::Asc, SortDirection::Desc] {
                        for per_page in PAGE_SIZES {
                            let f = FilterState {
                                search: String::new(),
                                affiliation,
                                visibility,
                                sort,
                                direction,
                                per_page,
                                page: 2,
                            };
                            assert_eq!(roundtrip(&f), f);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn defaults_omitted_from_query() {
        let f = FilterState::default();
        let keys: Vec<&str> = f.to_query().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["sort", "direction", "per_page", "page"]);
    }

    #[test]
    fn garbage_input_yields_defaults() {
        let f = FilterState::from_query([
            ("affiliation", "root"),
            ("visibility", "hidden"),
            ("sort", "stars;DROP TABLE"),
            ("direction", "sideways"),
            ("per_page", "nine"),
            ("page", "-3"),
            ("unknown_key", "whatever"),
        ]);
        assert_eq!(f, FilterState::default());
    }

    #[test]
    fn per_page_snaps_to_allowed_set() {
        let f = FilterState::from_query([("per_page", "31")]);
        assert_eq!(f.per_page, DEFAULT_PER_PAGE);
        let f = FilterState::from_query([("per_page", "100")]);
        assert_eq!(f.per_page, 100);
    }

    #[test]
    fn page_clamps_to_one() {
        let f = FilterState::from_query([("page", "0")]);
        assert_eq!(f.page, 1);
    }

    #[test]
    fn changing_sort_resets_page() {
        let mut f = FilterState::default();
        f.set_page(7);
        f.cycle_sort();
        assert_eq!(f.page, 1);
    }

    #[test]
    fn changing_search_resets_page() {
        let mut f = FilterState::default();
        f.set_page(3);
        f.set_search("tool".to_string());
        assert_eq!(f.page, 1);
    }

    #[test]
    fn changing_page_keeps_other_fields() {
        let mut f = FilterState::default();
        f.cycle_visibility();
        let visibility = f.visibility;
        f.set_page(5);
        assert_eq!(f.page, 5);
        assert_eq!(f.visibility, visibility);
    }

    #[test]
    fn cycle_per_page_walks_allowed_set() {
        let mut f = FilterState::default();
        assert_eq!(f.per_page, 30);
        f.cycle_per_page();
        assert_eq!(f.per_page, 50);
        f.cycle_per_page();
        assert_eq!(f.per_page, 100);
        f.cycle_per_page();
        assert_eq!(f.per_page, 10);
    }
}
