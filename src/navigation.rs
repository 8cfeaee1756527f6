use regex::Regex;
use std::sync::OnceLock;

/// Extracts the element id from an in-page anchor such as `#projets`.
/// Anything else (external URLs, bare `#`, `page.html#x`) yields `None`.
pub fn fragment_id(href: &str) -> Option<&str> {
    static RE_FRAGMENT: OnceLock<Regex> = OnceLock::new();
    let re = RE_FRAGMENT.get_or_init(|| {
        Regex::new(r"^#([^\s#]+)$").expect("valid fragment regex")
    });
    re.captures(href.trim())
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

/// Every nav anchor in document order with the section id it resolved to,
/// plus the active index. Anchors without a target are kept so their
/// marker is cleared along with the others. At most one link is active.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavState {
    targets: Vec<Option<String>>,
    active: Option<usize>,
}

impl NavState {
    pub fn new(targets: Vec<Option<String>>) -> Self {
        Self {
            targets,
            active: None,
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn target(&self, idx: usize) -> Option<&str> {
        self.targets.get(idx)?.as_deref()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn active_section(&self) -> Option<&str> {
        self.target(self.active?)
    }

    /// Scroll-driven activation. Unknown ids leave the state untouched.
    pub fn show_section(&mut self, id: &str) -> Option<usize> {
        let idx = self
            .targets
            .iter()
            .position(|target| target.as_deref() == Some(id))?;
        self.active = Some(idx);
        self.active
    }

    /// Click-driven activation. Links without a target change nothing.
    pub fn click(&mut self, idx: usize) -> Option<usize> {
        if self.target(idx).is_some() {
            self.active = Some(idx);
        }
        self.active
    }

    pub fn is_active(&self, idx: usize) -> bool {
        self.active == Some(idx)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn from_open(open: bool) -> Self {
        Self { open }
    }

    pub fn is_open(self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(ids: &[Option<&str>]) -> NavState {
        NavState::new(ids.iter().map(|id| id.map(str::to_string)).collect())
    }

    fn sections() -> NavState {
        targets(&[Some("accueil"), Some("projets"), Some("contact")])
    }

    #[test]
    fn parses_in_page_fragments_only() {
        assert_eq!(fragment_id("#projets"), Some("projets"));
        assert_eq!(fragment_id(" #contact "), Some("contact"));
        assert_eq!(fragment_id("#"), None);
        assert_eq!(fragment_id("https://example.com/#x"), None);
        assert_eq!(fragment_id("cv.pdf"), None);
        assert_eq!(fragment_id("#a#b"), None);
    }

    #[test]
    fn scroll_then_click_then_scroll() {
        let mut nav = sections();
        assert_eq!(nav.active(), None);

        nav.show_section("projets");
        assert_eq!(nav.active_section(), Some("projets"));

        nav.click(2);
        assert_eq!(nav.active_section(), Some("contact"));
        assert_eq!((0..nav.len()).filter(|i| nav.is_active(*i)).count(), 1);

        nav.show_section("accueil");
        assert_eq!(nav.active(), Some(0));
    }

    #[test]
    fn unknown_section_and_bad_index_are_ignored() {
        let mut nav = sections();
        nav.click(1);
        assert_eq!(nav.show_section("missing"), None);
        assert_eq!(nav.click(9), Some(1));
        assert_eq!(nav.active(), Some(1));
    }

    #[test]
    fn duplicate_targets_activate_first_link() {
        let mut nav = targets(&[Some("a"), Some("b"), Some("a")]);
        assert_eq!(nav.show_section("a"), Some(0));
    }

    #[test]
    fn unresolved_links_are_never_active() {
        let mut nav = targets(&[Some("accueil"), None, Some("contact")]);
        assert_eq!(nav.click(1), None);
        assert!(!nav.is_active(1));

        nav.show_section("contact");
        let active: Vec<usize> = (0..nav.len()).filter(|i| nav.is_active(*i)).collect();
        assert_eq!(active, vec![2]);

        nav.click(1);
        assert_eq!(nav.active_section(), Some("contact"));
    }

    #[test]
    fn menu_toggles_and_closes_idempotently() {
        let mut menu = MenuState::default();
        assert!(menu.toggle());
        assert!(!menu.toggle());
        menu.toggle();
        menu.close();
        assert!(!menu.is_open());
        menu.close();
        assert!(!menu.is_open());
    }
}
