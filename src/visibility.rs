//! Subscriptions to "became visible" notifications.
//!
//! Elements register interest under a numeric key. Fade-ins stay subscribed
//! for the whole page session; skill-bar reveals fire once and are dropped.

use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reveal {
    FadeIn,
    SkillBar,
}

impl Reveal {
    pub fn is_one_shot(self) -> bool {
        matches!(self, Self::SkillBar)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub key: u32,
    pub fresh: bool,
}

#[derive(Debug, Default)]
pub struct VisibilityHub {
    subscriptions: HashSet<(u32, Reveal)>,
    next_key: u32,
}

impl VisibilityHub {
    pub fn allocate_key(&mut self) -> u32 {
        self.next_key += 1;
        self.next_key
    }

    /// Returns `false` when the key is already subscribed to `reveal`.
    pub fn subscribe(&mut self, key: u32, reveal: Reveal) -> bool {
        self.subscriptions.insert((key, reveal))
    }

    /// Subscribes an element that may already carry a key. Only a fresh
    /// subscription should be handed to the observer.
    pub fn attach(&mut self, existing: Option<u32>, reveal: Reveal) -> Attachment {
        let key = existing.unwrap_or_else(|| self.allocate_key());
        Attachment {
            key,
            fresh: self.subscribe(key, reveal),
        }
    }

    pub fn is_subscribed(&self, key: u32, reveal: Reveal) -> bool {
        self.subscriptions.contains(&(key, reveal))
    }

    /// Reveals to apply for `key` under the given observer kind, consuming
    /// one-shot subscriptions.
    pub fn became_visible(&mut self, key: u32, reveal: Reveal) -> Option<Reveal> {
        if !self.is_subscribed(key, reveal) {
            return None;
        }

        if reveal.is_one_shot() {
            self.subscriptions.remove(&(key, reveal));
        }

        Some(reveal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attaching_twice_binds_once() {
        let mut hub = VisibilityHub::default();
        let key = hub.allocate_key();

        assert!(hub.subscribe(key, Reveal::FadeIn));
        assert!(!hub.subscribe(key, Reveal::FadeIn));
        assert_eq!(hub.became_visible(key, Reveal::FadeIn), Some(Reveal::FadeIn));
        assert_ne!(hub.allocate_key(), key);
    }

    #[test]
    fn reattaching_a_keyed_element_reuses_its_key() {
        let mut hub = VisibilityHub::default();

        let first = hub.attach(None, Reveal::FadeIn);
        assert!(first.fresh);

        let again = hub.attach(Some(first.key), Reveal::FadeIn);
        assert_eq!(again, Attachment { key: first.key, fresh: false });

        let skill = hub.attach(Some(first.key), Reveal::SkillBar);
        assert!(skill.fresh);
        assert_eq!(skill.key, first.key);
    }

    #[test]
    fn fade_in_survives_repeated_visibility() {
        let mut hub = VisibilityHub::default();
        let key = hub.allocate_key();
        hub.subscribe(key, Reveal::FadeIn);

        assert_eq!(hub.became_visible(key, Reveal::FadeIn), Some(Reveal::FadeIn));
        assert_eq!(hub.became_visible(key, Reveal::FadeIn), Some(Reveal::FadeIn));
    }

    #[test]
    fn skill_bar_fires_once() {
        let mut hub = VisibilityHub::default();
        let key = hub.allocate_key();
        hub.subscribe(key, Reveal::FadeIn);
        hub.subscribe(key, Reveal::SkillBar);

        assert_eq!(hub.became_visible(key, Reveal::SkillBar), Some(Reveal::SkillBar));
        assert_eq!(hub.became_visible(key, Reveal::SkillBar), None);
        assert!(hub.is_subscribed(key, Reveal::FadeIn));
    }

    #[test]
    fn unknown_key_yields_nothing() {
        let mut hub = VisibilityHub::default();
        assert!(!hub.is_subscribed(7, Reveal::FadeIn));
        assert_eq!(hub.became_visible(7, Reveal::FadeIn), None);
    }
}
