use crate::controller::processor::DataProcessor;
use crate::conversion::downcast::DowncastConversionApi;
use crate::conversion::error::{ConversionError, ConversionResult};
use crate::conversion::groups::Conversion;
use crate::conversion::mapper::Mapper;
use crate::model::Model;
use crate::tree::{NodeId, Range};
use crate::view::{ViewItem, ViewTree};

/// Loads external data into model roots and serializes model content.
pub struct DataController {
    processor: Box<dyn DataProcessor>,
    mapper: Mapper,
}

impl std::fmt::Debug for DataController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataController").field("mapper", &self.mapper).finish_non_exhaustive()
    }
}

impl DataController {
    pub fn new(processor: Box<dyn DataProcessor>) -> Self {
        Self { processor, mapper: Mapper::new() }
    }

    pub fn set_processor(&mut self, processor: Box<dyn DataProcessor>) {
        self.processor = processor;
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    /// Upcasts `data` into a detached model fragment.
    pub fn parse(&self, data: &str, model: &mut Model, conversion: &Conversion, context: &[String]) -> ConversionResult<NodeId> {
        let mut view = ViewTree::new();
        let view_fragment = self.processor.to_view(data, &mut view)?;
        let (tree, schema, _) = model.parts_mut();
        conversion.upcast().convert(&view, view_fragment, tree, schema, context)
    }

    /// Loads initial data into an empty root.
    pub fn init(&self, data: &str, model: &mut Model, conversion: &Conversion, root_name: &str) -> ConversionResult<()> {
        let root = model.root(root_name).ok_or_else(|| ConversionError::RootNotFound { root: root_name.to_string() })?;
        if model.tree().child_count(root) > 0 {
            return Err(ConversionError::NonEmptyRoot { root: root_name.to_string() });
        }
        self.insert_data(data, model, conversion, root)
    }

    /// Replaces the content of a root.
    pub fn set(&self, data: &str, model: &mut Model, conversion: &Conversion, root_name: &str) -> ConversionResult<()> {
        let root = model.root(root_name).ok_or_else(|| ConversionError::RootNotFound { root: root_name.to_string() })?;
        model.change(|writer| writer.clear(root));
        self.insert_data(data, model, conversion, root)
    }

    fn insert_data(&self, data: &str, model: &mut Model, conversion: &Conversion, root: NodeId) -> ConversionResult<()> {
        let fragment = self.parse(data, model, conversion, &["$root".to_string()])?;
        let nodes = model.tree().children(fragment).to_vec();
        model.change(|writer| {
            for node in nodes {
                writer.append(node, root);
            }
        });
        Ok(())
    }

    /// Serializes a root.
    pub fn get(&mut self, model: &Model, conversion: &Conversion, root_name: &str) -> ConversionResult<String> {
        let root = model.root(root_name).ok_or_else(|| ConversionError::RootNotFound { root: root_name.to_string() })?;
        self.stringify(model, conversion, root)
    }

    /// Serializes the children of a model element or fragment.
    pub fn stringify(&mut self, model: &Model, conversion: &Conversion, element: NodeId) -> ConversionResult<String> {
        let (view, fragment) = self.to_view(model, conversion, element)?;
        self.processor.to_data(&view, fragment)
    }

    /// Downcasts the children of `element` into a fresh view fragment.
    pub fn to_view(&mut self, model: &Model, conversion: &Conversion, element: NodeId) -> ConversionResult<(ViewTree, NodeId)> {
        self.mapper.clear_bindings();
        let mut view = ViewTree::new();
        let fragment = view.create(ViewItem::Fragment);
        self.mapper.bind_elements(element, fragment);

        let range = Range::flat(element, 0, model.tree().child_count(element));
        let mut api = DowncastConversionApi::new(model.tree(), model.schema(), &mut view, &mut self.mapper);
        conversion.data_downcast().convert_insert(range, &mut api)?;
        Ok((view, fragment))
    }

    pub fn destroy(&mut self) {
        self.mapper.clear_bindings();
    }
}
