/// Scroll-offset driven page chrome: the sticky header and the back-to-top
/// button. Both markers are pure functions of `scrollY`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollChrome {
    pub sticky_offset: f64,
    pub back_to_top_offset: f64,
}

impl Default for ScrollChrome {
    fn default() -> Self {
        Self {
            sticky_offset: 20.0,
            back_to_top_offset: 300.0,
        }
    }
}

impl ScrollChrome {
    pub fn new(sticky_offset: f64, back_to_top_offset: f64) -> Self {
        Self {
            sticky_offset,
            back_to_top_offset,
        }
    }

    pub fn is_sticky(&self, scroll_y: f64) -> bool {
        scroll_y > self.sticky_offset
    }

    pub fn shows_back_to_top(&self, scroll_y: f64) -> bool {
        scroll_y > self.back_to_top_offset
    }
}

/// A class change to write, or `None` when the element already matches.
pub fn marker_change(current: bool, wanted: bool) -> Option<bool> {
    (current != wanted).then_some(wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sticky_past_twenty_pixels() {
        let chrome = ScrollChrome::default();
        assert!(!chrome.is_sticky(0.0));
        assert!(!chrome.is_sticky(20.0));
        assert!(chrome.is_sticky(21.0));
        // already scrolled at load
        assert!(chrome.is_sticky(50.0));
    }

    #[test]
    fn back_to_top_past_three_hundred() {
        let chrome = ScrollChrome::default();
        assert!(!chrome.shows_back_to_top(300.0));
        assert!(chrome.shows_back_to_top(301.0));
        assert!(!chrome.shows_back_to_top(12.0));
    }

    #[test]
    fn marker_change_only_on_difference() {
        assert_eq!(marker_change(false, true), Some(true));
        assert_eq!(marker_change(true, true), None);
        assert_eq!(marker_change(true, false), Some(false));
        assert_eq!(marker_change(false, false), None);
    }
}
