use crate::conversion::downcast::DowncastDispatcher;
use crate::conversion::priority::Priority;
use crate::conversion::upcast::UpcastDispatcher;
use crate::conversion::{downcast_helpers, upcast_helpers};
use crate::event::EventResult;

/// Which downcast pipeline a registration targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DowncastGroup {
    /// The editing view shown to the user.
    Editing,
    /// Serialization to external data.
    Data,
    Both,
}

/// The editor's dispatchers: one upcast and two downcast pipelines.
#[derive(Debug, Default)]
pub struct Conversion {
    upcast: UpcastDispatcher,
    editing_downcast: DowncastDispatcher,
    data_downcast: DowncastDispatcher,
}

impl Conversion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upcast(&self) -> &UpcastDispatcher {
        &self.upcast
    }

    pub fn for_upcast(&mut self) -> &mut UpcastDispatcher {
        &mut self.upcast
    }

    pub fn editing_downcast(&self) -> &DowncastDispatcher {
        &self.editing_downcast
    }

    pub fn data_downcast(&self) -> &DowncastDispatcher {
        &self.data_downcast
    }

    /// Runs `register` once for every dispatcher of `group`.
    pub fn for_downcast<F>(&mut self, group: DowncastGroup, mut register: F)
    where
        F: FnMut(&mut DowncastDispatcher),
    {
        if matches!(group, DowncastGroup::Editing | DowncastGroup::Both) {
            register(&mut self.editing_downcast);
        }
        if matches!(group, DowncastGroup::Data | DowncastGroup::Both) {
            register(&mut self.data_downcast);
        }
    }

    /// Two-way conversion between a model element and a view container.
    pub fn element_to_element(&mut self, model_name: &str, view_name: &str) {
        upcast_helpers::element_to_named_element(&mut self.upcast, view_name, model_name);
        self.for_downcast(DowncastGroup::Both, |dispatcher| {
            downcast_helpers::element_to_element(dispatcher, model_name, view_name);
        });
    }

    /// Two-way conversion between a boolean text attribute and a wrapping
    /// view element.
    pub fn attribute_to_element(&mut self, model_key: &str, view_name: &str) {
        upcast_helpers::element_to_attribute(&mut self.upcast, view_name, model_key, Priority::NORMAL, |_| {
            Some(serde_json::Value::Bool(true))
        });
        self.for_downcast(DowncastGroup::Both, |dispatcher| {
            downcast_helpers::attribute_to_element(dispatcher, model_key, view_name);
        });
    }

    /// Stops every upcast of the view element `view_name` at the highest
    /// priority, leaving it and its content out of the model.
    pub fn ignore_view_element(&mut self, view_name: &str) {
        self.upcast.on(&format!("element:{}", view_name), Priority::HIGHEST, |_event, data, api| {
            api.consumable.consume(data.view_item, &["name"]);
            Ok(EventResult::Stop)
        });
    }
}
