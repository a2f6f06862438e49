//! Renderer-neutral view model of a family tree
//!
//! Nodes and edges carry everything an external graph renderer needs:
//! labels, tooltips, colors, shapes and sizes. Layout is left to the renderer.

use crate::dataset::FamilyDataset;
use crate::error::Error;
use crate::person::{Gender, PersonRecord};
use crate::resolver::Relationships;
use crate::stats::descendant_counts;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#E8B04B";
pub const DEFAULT_NODE_COLOR: &str = "#8FA4B1";
pub const DEFAULT_NODE_SIZE: u32 = 25;

const GENERATION_COLORS: [&str; 9] = [
    "#8B4513", "#A0522D", "#BC8F8F", "#CD853F", "#DEB887", "#F4A460", "#FFE4B5", "#FFDEAD",
    "#FFE4C4",
];
const GENERATION_FALLBACK: &str = "#DEB887";

const LOCATION_COLORS: [(&str, &str); 6] = [
    ("Israel", "#5B8FA8"),
    ("USA", "#9B7653"),
    ("Brazil", "#8FA068"),
    ("Europe", "#7D6B91"),
    ("Asia", "#C17E61"),
    ("Africa", "#7A9A65"),
];
const LOCATION_FALLBACK: &str = "#A8A8A8";

/// Attribute that drives node color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBy {
    #[default]
    Generation,
    Gender,
    Location,
    Highlight,
}

impl ColorBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generation => "generation",
            Self::Gender => "gender",
            Self::Location => "location",
            Self::Highlight => "highlight",
        }
    }
}

impl FromStr for ColorBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "generation" => Ok(Self::Generation),
            "gender" => Ok(Self::Gender),
            "location" => Ok(Self::Location),
            "highlight" => Ok(Self::Highlight),
            other => Err(Error::InvalidOption(format!(
                "unknown color scheme '{}' (expected generation, gender, location or highlight)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ColorBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for building a `TreeView`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    pub color_by: ColorBy,
    pub show_lifespan: bool,
    pub show_generation: bool,
    pub size_by_descendants: bool,
    pub highlight_color: String,
    pub default_color: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color_by: ColorBy::default(),
            show_lifespan: true,
            show_generation: true,
            size_by_descendants: false,
            highlight_color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
            default_color: DEFAULT_NODE_COLOR.to_string(),
        }
    }
}

/// Node shape hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeShape {
    Square,
    Ellipse,
    Box,
    CircularImage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    /// Person name
    pub id: String,
    pub label: String,
    pub tooltip: String,
    pub color: String,
    pub shape: NodeShape,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Solid line, parent to child
    ParentChild,
    /// Dashed line
    Spouse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

/// Everything a graph renderer draws
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeView {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

impl TreeView {
    /// Build the view for a dataset.
    ///
    /// One node per distinct name, in record order; duplicates after the
    /// first occurrence are not drawn.
    pub fn build(
        dataset: &FamilyDataset,
        relationships: &Relationships,
        options: &RenderOptions,
    ) -> Self {
        let descendants: HashMap<String, usize> = if options.size_by_descendants {
            descendant_counts(dataset, relationships)
        } else {
            HashMap::new()
        };

        let mut nodes = Vec::with_capacity(dataset.len());
        let mut edges = Vec::new();

        for (i, record) in dataset.iter().enumerate() {
            if relationships.index_of(&record.name) != Some(i) {
                continue;
            }

            let count = descendants.get(&record.name).copied();
            nodes.push(node_view(record, options, count));

            if let Some(parent) = relationships.parent_index(i) {
                edges.push(EdgeView {
                    from: dataset.records()[parent].name.clone(),
                    to: record.name.clone(),
                    kind: EdgeKind::ParentChild,
                });
            }
        }

        edges.extend(
            relationships
                .spouse_pairs()
                .into_iter()
                .map(|(from, to)| EdgeView {
                    from,
                    to,
                    kind: EdgeKind::Spouse,
                }),
        );

        tracing::debug!("Built view with {} nodes and {} edges", nodes.len(), edges.len());

        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&NodeView> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &EdgeView> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }
}

fn node_view(record: &PersonRecord, options: &RenderOptions, descendants: Option<usize>) -> NodeView {
    let birth = record.birth.to_string();
    let death = record
        .death
        .known()
        .map_or_else(|| "Living".to_string(), |y| y.to_string());

    let mut label = vec![record.name.clone()];
    if options.show_lifespan {
        label.push(format!("({}-{})", birth, death));
    }
    if options.show_generation {
        if let Some(generation) = record.generation {
            label.push(format!("Gen {}", generation));
        }
    }

    let mut tooltip = vec![record.name.clone()];
    if record.gender != Gender::Unknown {
        tooltip.push(format!("Gender: {}", record.gender));
    }
    tooltip.push(format!("Born: {}", birth));
    match record.lifespan() {
        Some(age) => tooltip.push(format!("Died: {} (Age: {})", death, age)),
        None => tooltip.push(format!("Died: {}", death)),
    }
    for (key, value) in [
        ("Location", record.location.as_str()),
        ("Occupation", record.occupation.as_str()),
        ("Spouse", record.spouse.as_deref().unwrap_or("")),
    ] {
        if !value.trim().is_empty() {
            tooltip.push(format!("{}: {}", key, value));
        }
    }
    if options.show_generation {
        if let Some(generation) = record.generation {
            tooltip.push(format!("Generation: {}", generation));
        }
    }
    if !record.notes.trim().is_empty() {
        tooltip.push(format!("Notes: {}", record.notes));
    }
    if let Some(count) = descendants.filter(|&c| c > 0) {
        tooltip.push(format!("Descendants: {}", count));
    }

    let image = record.photo_url().map(str::to_string);
    let shape = if image.is_some() {
        NodeShape::CircularImage
    } else {
        match record.gender {
            Gender::Male => NodeShape::Square,
            Gender::Female => NodeShape::Ellipse,
            Gender::Unknown => NodeShape::Box,
        }
    };

    let size = match descendants {
        Some(count) => 20 + (count.saturating_mul(3)).min(60) as u32,
        None => DEFAULT_NODE_SIZE,
    };

    NodeView {
        id: record.name.clone(),
        label: label.join("\n"),
        tooltip: tooltip.join("\n"),
        color: node_color(record, options),
        shape,
        size,
        image,
    }
}

/// Color of a node under the selected scheme
pub fn node_color(record: &PersonRecord, options: &RenderOptions) -> String {
    match options.color_by {
        ColorBy::Generation => generation_color(record.generation).to_string(),
        ColorBy::Gender => gender_color(record.gender).to_string(),
        ColorBy::Location => location_color(&record.location).to_string(),
        ColorBy::Highlight => {
            if record.highlight {
                options.highlight_color.clone()
            } else {
                options.default_color.clone()
            }
        }
    }
}

fn generation_color(generation: Option<i32>) -> &'static str {
    generation
        .and_then(|g| usize::try_from(g).ok())
        .and_then(|g| g.checked_sub(1))
        .and_then(|g| GENERATION_COLORS.get(g).copied())
        .unwrap_or(GENERATION_FALLBACK)
}

fn gender_color(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "#6B8CAE",
        Gender::Female => "#D4A5A5",
        Gender::Unknown => "#C0C0C0",
    }
}

/// First palette keyword found in the location, case-insensitively
fn location_color(location: &str) -> &'static str {
    let location = location.to_lowercase();
    LOCATION_COLORS
        .iter()
        .find(|(keyword, _)| location.contains(&keyword.to_lowercase()))
        .map_or(LOCATION_FALLBACK, |(_, color)| color)
}
