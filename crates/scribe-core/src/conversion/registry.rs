use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::conversion::priority::Priority;

pub type ConverterId = u64;

struct Registered<H: ?Sized> {
    id: ConverterId,
    priority: Priority,
    handler: Arc<H>,
}

/// Ordered handler lists keyed by event name.
///
/// Event names are namespaced with `:`. Firing `attribute:bold:$text`
/// collects the handlers of `attribute:bold:$text`, `attribute:bold` and
/// `attribute`, ordered by priority and then by registration.
pub struct ConverterRegistry<H: ?Sized> {
    handlers: HashMap<String, Vec<Registered<H>>>,
    next_id: ConverterId,
}

impl<H: ?Sized> fmt::Debug for ConverterRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut events: Vec<_> = self.handlers.iter().map(|(name, list)| (name.as_str(), list.len())).collect();
        events.sort();
        f.debug_struct("ConverterRegistry").field("events", &events).finish()
    }
}

impl<H: ?Sized> ConverterRegistry<H> {
    pub fn new() -> Self {
        Self { handlers: HashMap::new(), next_id: 1 }
    }

    pub fn on(&mut self, event_name: &str, priority: Priority, handler: Arc<H>) -> ConverterId {
        let id = self.next_id;
        self.next_id += 1;
        self.handlers
            .entry(event_name.to_string())
            .or_default()
            .push(Registered { id, priority, handler });
        id
    }

    pub fn off(&mut self, id: ConverterId) -> bool {
        let mut found = false;
        for list in self.handlers.values_mut() {
            let before = list.len();
            list.retain(|r| r.id != id);
            found |= list.len() < before;
        }
        found
    }

    pub fn handlers_for(&self, event_name: &str) -> Vec<Arc<H>> {
        let mut matching: Vec<&Registered<H>> = namespaces(event_name)
            .filter_map(|name| self.handlers.get(name))
            .flatten()
            .collect();
        matching.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
        matching.into_iter().map(|r| Arc::clone(&r.handler)).collect()
    }

    pub fn has_handlers(&self, event_name: &str) -> bool {
        namespaces(event_name).any(|name| self.handlers.get(name).is_some_and(|l| !l.is_empty()))
    }
}

impl<H: ?Sized> Default for ConverterRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

/// `a:b:c` -> `a:b:c`, `a:b`, `a`
fn namespaces(event_name: &str) -> impl Iterator<Item = &str> {
    let cuts = event_name.match_indices(':').map(|(i, _)| i).collect::<Vec<_>>();
    std::iter::once(event_name).chain(cuts.into_iter().rev().map(move |i| &event_name[..i]))
}
