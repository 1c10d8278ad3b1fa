//! GridKit Smoke Harness
//!
//! Lays out a grid scene described in JSON and prints every item's
//! rectangle. Used to eyeball solver behavior and to diff layouts between
//! builds.
//!
//! ```bash
//! gridkit-smoke --scene crates/gridkit-smoke/scenes/dashboard.json --pretty
//! RUST_LOG=gridkit_layout=trace gridkit-smoke --width 480
//! ```

use std::collections::HashMap;

use anyhow::{Context, Result};
use gridkit_engine::{
    Axis, ContentMeasurable, GridEngine, GridEngineBuilder, ItemId, Rect,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

const DEFAULT_SCENE: &str = r#"{
    "columns": "120px 1fr 2fr",
    "rows": "auto 1fr",
    "column_gap": "8px",
    "row_gap": "8px",
    "width": 640,
    "height": 480,
    "items": [
        { "id": 1, "column": "1 / 4", "row": "1", "content": { "kind": "text", "words": 24, "word_width": 40, "line_height": 18 } },
        { "id": 2, "content": { "kind": "fixed", "width": 100, "height": 80 } },
        { "id": 3, "content": { "kind": "fixed", "width": 100, "height": 80 } }
    ]
}"#;

/// Parse command line arguments
struct Args {
    scene_file: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    pretty: bool,
    cells: bool,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut scene_file = None;
        let mut width = None;
        let mut height = None;
        let mut pretty = false;
        let mut cells = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--scene" => {
                    scene_file = args.next();
                }
                "--width" => {
                    width = args.next().and_then(|val| val.parse().ok());
                }
                "--height" => {
                    height = args.next().and_then(|val| val.parse().ok());
                }
                "--pretty" => pretty = true,
                "--cells" => cells = true,
                other => warn!(arg = other, "Ignoring unknown argument"),
            }
        }

        Self {
            scene_file,
            width,
            height,
            pretty,
            cells,
        }
    }

    /// Load the scene from file or use the built-in one.
    fn load_scene(&self) -> Result<Scene> {
        let source = match &self.scene_file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read scene file {}", path))?,
            None => DEFAULT_SCENE.to_string(),
        };
        serde_json::from_str(&source).context("Failed to parse scene")
    }
}

/// A grid and the items placed on it.
#[derive(Debug, Deserialize)]
struct Scene {
    columns: String,
    #[serde(default = "auto_tracks")]
    rows: String,
    #[serde(default)]
    column_gap: Option<String>,
    #[serde(default)]
    row_gap: Option<String>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
    #[serde(default)]
    stretch_auto_tracks: bool,
    #[serde(default)]
    items: Vec<SceneItem>,
}

fn auto_tracks() -> String {
    "auto".to_string()
}

#[derive(Debug, Deserialize)]
struct SceneItem {
    id: u64,
    #[serde(default)]
    column: Option<String>,
    #[serde(default)]
    row: Option<String>,
    #[serde(default)]
    content: SceneContent,
}

/// Item content as described in a scene.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SceneContent {
    /// A box with a fixed preferred size that may shrink to its minimum.
    Fixed {
        width: f64,
        height: f64,
        #[serde(default)]
        min_width: Option<f64>,
        #[serde(default)]
        min_height: Option<f64>,
    },
    /// Equal-width words that wrap to the column width.
    Text {
        words: usize,
        word_width: f64,
        line_height: f64,
    },
}

impl Default for SceneContent {
    fn default() -> Self {
        SceneContent::Fixed {
            width: 0.0,
            height: 0.0,
            min_width: None,
            min_height: None,
        }
    }
}

impl SceneContent {
    fn text_height(words: usize, word_width: f64, line_height: f64, width: f64) -> f64 {
        if words == 0 || word_width <= 0.0 {
            return 0.0;
        }
        let per_line = ((width / word_width).floor() as usize).max(1);
        words.div_ceil(per_line) as f64 * line_height
    }
}

impl ContentMeasurable for SceneContent {
    fn min_content(&self, axis: Axis, cross_size: Option<f64>) -> f64 {
        match (*self, axis) {
            (SceneContent::Fixed { width, min_width, .. }, Axis::Column) => {
                min_width.unwrap_or(width)
            }
            (SceneContent::Fixed { height, min_height, .. }, Axis::Row) => {
                min_height.unwrap_or(height)
            }
            (SceneContent::Text { word_width, .. }, Axis::Column) => word_width,
            (SceneContent::Text { .. }, Axis::Row) => self.max_content(axis, cross_size),
        }
    }

    fn max_content(&self, axis: Axis, cross_size: Option<f64>) -> f64 {
        match (*self, axis) {
            (SceneContent::Fixed { width, .. }, Axis::Column) => width,
            (SceneContent::Fixed { height, .. }, Axis::Row) => height,
            (
                SceneContent::Text {
                    words, word_width, ..
                },
                Axis::Column,
            ) => words as f64 * word_width,
            (
                SceneContent::Text {
                    words,
                    word_width,
                    line_height,
                },
                Axis::Row,
            ) => {
                let width = cross_size.unwrap_or(words as f64 * word_width);
                Self::text_height(words, word_width, line_height, width)
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct RectReport {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl From<Rect> for RectReport {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

#[derive(Debug, Serialize)]
struct ItemReport {
    id: u64,
    #[serde(flatten)]
    rect: RectReport,
}

fn build_engine(scene: &Scene, args: &Args) -> Result<GridEngine> {
    let mut builder = GridEngineBuilder::new()
        .columns(scene.columns.as_str())
        .rows(scene.rows.as_str())
        .stretch_auto_tracks(scene.stretch_auto_tracks)
        .available_size(
            args.width.or(scene.width).unwrap_or(f64::INFINITY),
            args.height.or(scene.height).unwrap_or(f64::INFINITY),
        );
    if let Some(gap) = &scene.column_gap {
        builder = builder.column_gap(gap.as_str());
    }
    if let Some(gap) = &scene.row_gap {
        builder = builder.row_gap(gap.as_str());
    }

    let mut engine = builder.build().context("Invalid grid definition")?;
    for item in &scene.items {
        let id = ItemId::new(item.id);
        match (&item.column, &item.row) {
            (None, None) => engine.add_item(id)?,
            (column, row) => engine.add_item_with_spans(
                id,
                column.as_deref().unwrap_or("auto"),
                row.as_deref().unwrap_or("auto"),
            )?,
        }
    }
    Ok(engine)
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!(
        scene_file = ?args.scene_file,
        width = ?args.width,
        height = ?args.height,
        "Starting GridKit Smoke Harness"
    );

    let scene = args.load_scene()?;
    let mut engine = build_engine(&scene, &args)?;
    let host: HashMap<ItemId, SceneContent> = scene
        .items
        .iter()
        .map(|item| (ItemId::new(item.id), item.content))
        .collect();

    engine.run_layout(&host);

    let items: Vec<ItemReport> = engine
        .rects()
        .iter()
        .map(|(id, rect)| ItemReport {
            id: id.raw(),
            rect: (*rect).into(),
        })
        .collect();
    let item_count = items.len();
    let mut result = json!({
        "width": engine.calc_width(false),
        "height": engine.calc_height(false),
        "columns": engine.column_breadths(),
        "rows": engine.row_breadths(),
        "items": items,
    });
    if args.cells {
        let cells: Vec<RectReport> = engine.cell_areas().into_iter().map(Into::into).collect();
        result["cells"] = serde_json::to_value(cells)?;
    }

    let output = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        result.to_string()
    };
    println!("{}", output);

    info!(items = item_count, "Layout written");
    Ok(())
}
