//! Latest-value broadcast for page-wide state that views follow.
//!
//! Views read a value while rendering and subscribe afterwards, so a change
//! published in between would otherwise be missed. Every value carries a
//! revision; a subscriber that saw an older revision is caught up on
//! subscription.

use std::rc::Rc;

pub type Listener<T> = Rc<dyn Fn(Versioned<T>)>;

#[derive(Clone, Debug, PartialEq)]
pub struct Versioned<T> {
    pub revision: u64,
    pub value: T,
}

pub struct Broadcast<T> {
    latest: Versioned<T>,
    listeners: Vec<Listener<T>>,
}

impl<T: Clone> Broadcast<T> {
    pub fn new(value: T) -> Self {
        Self {
            latest: Versioned { revision: 0, value },
            listeners: Vec::new(),
        }
    }

    pub fn latest(&self) -> &Versioned<T> {
        &self.latest
    }

    /// Stores `value` and returns the listeners to notify. Callers invoke them
    /// after releasing any borrow of the broadcast.
    pub fn publish(&mut self, value: T) -> (Versioned<T>, Vec<Listener<T>>) {
        self.latest = Versioned {
            revision: self.latest.revision + 1,
            value,
        };
        (self.latest.clone(), self.listeners.clone())
    }

    /// Registers `listener`. Returns the latest value when the subscriber
    /// last saw an older revision.
    pub fn subscribe(&mut self, seen_revision: u64, listener: Listener<T>) -> Option<Versioned<T>> {
        self.listeners.push(listener);
        (seen_revision < self.latest.revision).then(|| self.latest.clone())
    }
}

/// Publishes and notifies in one step for callers that own the broadcast.
pub fn notify<T: Clone>(broadcast: &std::cell::RefCell<Broadcast<T>>, value: T) {
    let (latest, listeners) = broadcast.borrow_mut().publish(value);
    for listener in listeners {
        listener(latest.clone());
    }
}

/// Subscribes and delivers any missed value in one step.
pub fn follow<T: Clone>(broadcast: &std::cell::RefCell<Broadcast<T>>, seen_revision: u64, listener: Listener<T>) {
    let missed = broadcast.borrow_mut().subscribe(seen_revision, listener.clone());
    if let Some(latest) = missed {
        listener(latest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recorder() -> (Rc<RefCell<Vec<(u64, &'static str)>>>, Listener<&'static str>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let listener: Listener<&'static str> = Rc::new(move |update: Versioned<&'static str>| {
            sink.borrow_mut().push((update.revision, update.value));
        });
        (seen, listener)
    }

    #[test]
    fn update_published_before_subscribing_is_delivered() {
        let broadcast = RefCell::new(Broadcast::new("defaults"));
        let rendered_with = broadcast.borrow().latest().revision;

        notify(&broadcast, "translations");

        let (seen, listener) = recorder();
        follow(&broadcast, rendered_with, listener);
        assert_eq!(*seen.borrow(), vec![(1, "translations")]);
    }

    #[test]
    fn up_to_date_subscriber_is_not_replayed() {
        let broadcast = RefCell::new(Broadcast::new("defaults"));
        notify(&broadcast, "es");

        let (seen, listener) = recorder();
        let rendered_with = broadcast.borrow().latest().revision;
        follow(&broadcast, rendered_with, listener);
        assert!(seen.borrow().is_empty());

        notify(&broadcast, "en");
        assert_eq!(*seen.borrow(), vec![(2, "en")]);
    }
}
