//! DOM-free bookkeeping for the three intersection watchers.
//!
//! The browser delivers batches of entries; each watcher keeps its tracked
//! nodes in an [`ObservedSet`] keyed by node identity and decides per entry
//! what to apply.

pub const DEFAULT_PROGRESS_WIDTH: &str = "0%";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub is_intersecting: bool,
    pub ratio: f64,
}

impl Intersection {
    pub fn entering(ratio: f64) -> Self {
        Self {
            is_intersecting: true,
            ratio,
        }
    }

    pub fn leaving() -> Self {
        Self {
            is_intersecting: false,
            ratio: 0.0,
        }
    }
}

/// A tracked node plus its per-node state, looked up by identity.
#[derive(Clone, Debug)]
pub struct ObservedSet<K, S> {
    entries: Vec<(K, S)>,
}

impl<K, S> Default for ObservedSet<K, S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq, S> ObservedSet<K, S> {
    pub fn insert(&mut self, key: K, state: S) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = state;
        } else {
            self.entries.push((key, state));
        }
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut S> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, state)| state)
    }

    pub fn remove(&mut self, key: &K) -> Option<S> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

}

/// One-shot latch for a progress bar: yields its target width the first
/// time the bar qualifies, never again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressLatch {
    target: Option<String>,
    applied: bool,
}

impl ProgressLatch {
    pub fn new(target: Option<String>) -> Self {
        Self {
            target,
            applied: false,
        }
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    pub fn observe(&mut self, hit: Intersection) -> Option<String> {
        if !hit.is_intersecting || self.applied {
            return None;
        }
        self.applied = true;
        Some(
            self.target
                .take()
                .filter(|width| !width.is_empty())
                .unwrap_or_else(|| DEFAULT_PROGRESS_WIDTH.to_string()),
        )
    }
}

/// Reveal marker. Monotonic: once set it stays set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealMarker {
    revealed: bool,
}

impl RevealMarker {
    pub fn from_revealed(revealed: bool) -> Self {
        Self { revealed }
    }

    pub fn is_revealed(self) -> bool {
        self.revealed
    }

    /// Returns true only on the transition to revealed.
    pub fn observe(&mut self, hit: Intersection) -> bool {
        if hit.is_intersecting && !self.revealed {
            self.revealed = true;
            return true;
        }
        false
    }
}

/// Picks the section to activate from one batch of section entries.
/// Later qualifying entries overwrite earlier ones.
pub fn resolve_section_batch<'a, I>(batch: I) -> Option<&'a str>
where
    I: IntoIterator<Item = (&'a str, Intersection)>,
{
    batch
        .into_iter()
        .filter(|(_, hit)| hit.is_intersecting)
        .map(|(id, _)| id)
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_width_applied_once() {
        let mut latch = ProgressLatch::new(Some("85%".to_string()));
        assert_eq!(latch.observe(Intersection::leaving()), None);
        assert!(!latch.is_applied());
        assert_eq!(latch.observe(Intersection::entering(0.5)), Some("85%".to_string()));
        assert_eq!(latch.observe(Intersection::entering(1.0)), None);
        assert!(latch.is_applied());
    }

    #[test]
    fn progress_width_defaults_to_zero() {
        let mut missing = ProgressLatch::new(None);
        assert_eq!(missing.observe(Intersection::entering(0.4)).as_deref(), Some("0%"));

        let mut blank = ProgressLatch::new(Some(String::new()));
        assert_eq!(blank.observe(Intersection::entering(0.4)).as_deref(), Some("0%"));
    }

    #[test]
    fn reveal_marker_is_monotonic() {
        let mut marker = RevealMarker::default();
        assert!(!marker.observe(Intersection::leaving()));
        assert!(!marker.is_revealed());
        assert!(marker.observe(Intersection::entering(0.12)));
        assert!(!marker.observe(Intersection::leaving()));
        assert!(!marker.observe(Intersection::entering(0.9)));
        assert!(marker.is_revealed());

        let mut preset = RevealMarker::from_revealed(true);
        assert!(!preset.observe(Intersection::entering(0.5)));
    }

    #[test]
    fn section_batch_last_write_wins() {
        let batch = [
            ("about", Intersection::entering(0.6)),
            ("skills", Intersection::entering(0.7)),
            ("contact", Intersection::leaving()),
        ];
        assert_eq!(resolve_section_batch(batch), Some("skills"));
        assert_eq!(
            resolve_section_batch([("about", Intersection::leaving())]),
            None
        );
    }

    #[test]
    fn observed_set_tracks_by_identity() {
        let mut set: ObservedSet<u32, ProgressLatch> = ObservedSet::default();
        set.insert(1, ProgressLatch::new(Some("40%".to_string())));
        set.insert(2, ProgressLatch::new(None));

        let hit = set
            .get_mut(&1)
            .and_then(|latch| latch.observe(Intersection::entering(0.5)));
        assert_eq!(hit.as_deref(), Some("40%"));
        assert!(set.remove(&1).is_some_and(|latch| latch.is_applied()));
        assert!(set.get_mut(&1).is_none());
        assert!(set.get_mut(&2).is_some_and(|latch| !latch.is_applied()));
    }
}
