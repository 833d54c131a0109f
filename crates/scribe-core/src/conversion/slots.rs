//! Slots: named content regions of a structural view template.
//!
//! A template marks each slot with a `data-slot` attribute. The model
//! element it represents holds one child element per slot, carrying the
//! slot name in its `slotName` attribute. Both sides must name exactly the
//! same slots.

use std::collections::BTreeMap;

use crate::conversion::error::{ConversionError, ConversionResult};
use crate::conversion::mapper::Mapper;
use crate::model::ModelTree;
use crate::tree::NodeId;
use crate::view::ViewTree;

pub const VIEW_SLOT_ATTRIBUTE: &str = "data-slot";
pub const MODEL_SLOT_ATTRIBUTE: &str = "slotName";

/// Slot elements of a view template, by slot name.
pub fn template_slots(view: &ViewTree, template: NodeId) -> BTreeMap<String, NodeId> {
    view.descendants(template)
        .into_iter()
        .filter_map(|node| {
            let name = view.element(node)?.attribute(VIEW_SLOT_ATTRIBUTE)?;
            Some((name.to_string(), node))
        })
        .collect()
}

/// Slot children of a model element, by slot name.
pub fn model_slots(model: &ModelTree, element: NodeId) -> ConversionResult<BTreeMap<String, NodeId>> {
    let mut slots = BTreeMap::new();
    for child in model.children(element) {
        match model.attribute(*child, MODEL_SLOT_ATTRIBUTE).and_then(|v| v.as_str()) {
            Some(name) => {
                slots.insert(name.to_string(), *child);
            }
            None => {
                return Err(ConversionError::UnexpectedSlotContent {
                    element: model.name(element).to_string(),
                    child: model.name(*child).to_string(),
                })
            }
        }
    }
    Ok(slots)
}

/// Binds every model slot to the template slot of the same name.
pub fn bind_slots(
    model: &ModelTree,
    view: &ViewTree,
    mapper: &mut Mapper,
    element: NodeId,
    template: NodeId,
) -> ConversionResult<()> {
    let view_slots = template_slots(view, template);
    let model_slots = model_slots(model, element)?;
    if !view_slots.keys().eq(model_slots.keys()) {
        return Err(ConversionError::SlotMismatch {
            template: view_slots.into_keys().collect(),
            model: model_slots.into_keys().collect(),
        });
    }
    for (name, model_slot) in model_slots {
        if let Some(view_slot) = view_slots.get(&name) {
            mapper.bind_elements(model_slot, *view_slot);
        }
    }
    Ok(())
}
