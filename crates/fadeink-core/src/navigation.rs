//! Single-page routing between the portfolio sections.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Window title when no more specific one applies.
pub const DEFAULT_TITLE: &str = "Aman Sinha - Portfolio";
/// Location hash prefix of a project detail view.
pub const PROJECT_HASH_PREFIX: &str = "#project-";

/// Top-level sections reachable from the nav menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Home,
    About,
    Works,
    Resume,
    Naytv,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Home,
        Section::About,
        Section::Works,
        Section::Resume,
        Section::Naytv,
    ];

    /// Parse a `data-page` value.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::About => "about",
            Section::Works => "works",
            Section::Resume => "resume",
            Section::Naytv => "naytv",
        }
    }

    /// Id of the section's page container.
    pub fn element_id(&self) -> String {
        format!("{}Page", self.name())
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Home => DEFAULT_TITLE,
            Section::About => "About Me - Aman Sinha",
            Section::Works => "My Works - Aman Sinha",
            Section::Resume => "Resume - Aman Sinha",
            Section::Naytv => "My Calendar - Aman Sinha",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the page is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Section(Section),
    /// Full-page case study of one project.
    Project(String),
}

impl Default for Route {
    fn default() -> Self {
        Route::Section(Section::Home)
    }
}

impl Route {
    /// Route for the location hash the page was opened with.
    pub fn from_hash(hash: &str) -> Self {
        match hash.strip_prefix(PROJECT_HASH_PREFIX) {
            Some(project) if !project.is_empty() => Route::Project(project.to_string()),
            _ => Route::default(),
        }
    }

    pub fn section(&self) -> Option<Section> {
        match self {
            Route::Section(section) => Some(*section),
            Route::Project(_) => None,
        }
    }

    /// Window title for this route.
    pub fn title(&self) -> String {
        match self {
            Route::Section(section) => section.title().to_string(),
            Route::Project(id) => format!("Project - {} - Aman Sinha", project_title(id)),
        }
    }

    /// Doodling is only offered on the home section.
    pub fn shows_doodles(&self) -> bool {
        *self == Route::Section(Section::Home)
    }

    /// The nav menu is hidden on project detail views.
    pub fn shows_nav_menu(&self) -> bool {
        matches!(self, Route::Section(_))
    }
}

/// Display title of a project case study.
pub fn project_title(id: &str) -> String {
    match id {
        "syncin" => "Syncin: Innovating Event Management and Engagement".to_string(),
        "youthhub" => "Youth Hub: Designing for Scalable Youth Empowerment".to_string(),
        "raahi" => "Raahi: Designing for Safer Highways".to_string(),
        other => title_case(&other.replacen('-', " ", 1)),
    }
}

/// Upper-case the first letter of every word.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if at_word_start && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}

/// A change of route, with what the page must update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: Route,
    pub to: Route,
}

impl Transition {
    /// Whether the doodle layer must be shown or hidden.
    pub fn doodles_changed(&self) -> bool {
        self.from.shows_doodles() != self.to.shows_doodles()
    }
}

/// Tracks the current route.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    current: Route,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Move to `to`. Navigating to the current route is still a transition so
    /// the page state gets re-applied.
    pub fn navigate(&mut self, to: Route) -> Transition {
        let from = std::mem::replace(&mut self.current, to.clone());
        log::debug!("Navigate {:?} -> {:?}", from, to);
        Transition { from, to }
    }

    /// Navigate to a section by its `data-page` name. Unknown names are ignored.
    pub fn navigate_to_name(&mut self, name: &str) -> Option<Transition> {
        let Some(section) = Section::from_name(name) else {
            log::warn!("Unknown page '{}'", name);
            return None;
        };
        Some(self.navigate(Route::Section(section)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_names_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::from_name(section.name()), Some(section));
        }
        assert_eq!(Section::from_name("projectDetail"), None);
        assert_eq!(Section::Naytv.element_id(), "naytvPage");
    }

    #[test]
    fn test_titles() {
        assert_eq!(Route::Section(Section::Home).title(), "Aman Sinha - Portfolio");
        assert_eq!(Route::Section(Section::Naytv).title(), "My Calendar - Aman Sinha");
        assert_eq!(
            Route::Project("raahi".into()).title(),
            "Project - Raahi: Designing for Safer Highways - Aman Sinha"
        );
    }

    #[test]
    fn test_unknown_project_title_is_title_cased() {
        assert_eq!(project_title("case-study-two"), "Case Study-Two");
        assert_eq!(project_title("mural"), "Mural");
    }

    #[test]
    fn test_doodles_only_on_home() {
        assert!(Route::Section(Section::Home).shows_doodles());
        for section in [Section::About, Section::Works, Section::Resume, Section::Naytv] {
            assert!(!Route::Section(section).shows_doodles());
            assert!(Route::Section(section).shows_nav_menu());
        }
        let project = Route::Project("syncin".into());
        assert!(!project.shows_doodles());
        assert!(!project.shows_nav_menu());
    }

    #[test]
    fn test_from_hash() {
        assert_eq!(Route::from_hash("#project-youthhub"), Route::Project("youthhub".into()));
        assert_eq!(Route::from_hash("#project-"), Route::default());
        assert_eq!(Route::from_hash("#about"), Route::default());
        assert_eq!(Route::from_hash(""), Route::default());
    }

    #[test]
    fn test_transitions_report_doodle_changes() {
        let mut nav = Navigator::new();
        assert_eq!(nav.current(), &Route::Section(Section::Home));

        let away = nav.navigate_to_name("works").unwrap();
        assert!(away.doodles_changed());
        assert!(!away.to.shows_doodles());

        let sideways = nav.navigate(Route::Project("raahi".into()));
        assert!(!sideways.doodles_changed());

        let back = nav.navigate_to_name("home").unwrap();
        assert!(back.doodles_changed());
        assert!(back.to.shows_doodles());
    }

    #[test]
    fn test_unknown_name_keeps_route() {
        let mut nav = Navigator::new();
        nav.navigate_to_name("about");
        assert!(nav.navigate_to_name("nowhere").is_none());
        assert_eq!(nav.current().section(), Some(Section::About));
    }
}
