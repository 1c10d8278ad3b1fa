//! TestGrid - Engine wrapper with an in-memory content host.

use std::collections::HashMap;

use gridkit_engine::{
    ContentHost, ContentMeasurable, GridEngine, GridEngineBuilder, ItemId, Rect,
};

/// Content host backed by boxed fixtures.
#[derive(Default)]
pub struct TestHost {
    contents: HashMap<ItemId, Box<dyn ContentMeasurable>>,
}

impl ContentHost for TestHost {
    fn content(&self, id: ItemId) -> Option<&dyn ContentMeasurable> {
        self.contents.get(&id).map(|content| content.as_ref())
    }
}

/// A grid engine together with the content of its items.
pub struct TestGrid {
    pub engine: GridEngine,
    pub host: TestHost,
    next_id: u64,
}

impl TestGrid {
    /// Create a test grid in an 800x600 container.
    pub fn new(columns: &str, rows: &str) -> Self {
        Self::with_size(columns, rows, 800.0, 600.0)
    }

    /// Create a test grid in a container of the given size.
    pub fn with_size(columns: &str, rows: &str, width: f64, height: f64) -> Self {
        let engine = GridEngineBuilder::new()
            .columns(columns)
            .rows(rows)
            .available_size(width, height)
            .build()
            .expect("Failed to create test grid");
        Self::from_engine(engine)
    }

    pub fn from_engine(engine: GridEngine) -> Self {
        super::init_tracing();
        Self {
            engine,
            host: TestHost::default(),
            next_id: 1,
        }
    }

    fn register(&mut self, content: impl ContentMeasurable + 'static) -> ItemId {
        let id = ItemId::new(self.next_id);
        self.next_id += 1;
        self.host.contents.insert(id, Box::new(content));
        id
    }

    /// Add an auto-placed item.
    pub fn add(&mut self, content: impl ContentMeasurable + 'static) -> ItemId {
        let id = self.register(content);
        self.engine.add_item(id).expect("Failed to add item");
        id
    }

    /// Add an item at the given span strings.
    pub fn add_at(
        &mut self,
        column_span: &str,
        row_span: &str,
        content: impl ContentMeasurable + 'static,
    ) -> ItemId {
        let id = self.register(content);
        self.engine
            .add_item_with_spans(id, column_span, row_span)
            .expect("Failed to add item");
        id
    }

    /// Add an item the host has no content for.
    pub fn add_without_content(&mut self) -> ItemId {
        let id = ItemId::new(self.next_id);
        self.next_id += 1;
        self.engine.add_item(id).expect("Failed to add item");
        id
    }

    /// Run a layout pass.
    pub fn layout(&mut self) -> bool {
        self.engine.run_layout(&self.host)
    }

    /// Rectangle of an item after layout.
    pub fn rect(&self, id: ItemId) -> Rect {
        self.engine
            .item_rect(id)
            .unwrap_or_else(|| panic!("No rect for {:?}", id))
    }
}
