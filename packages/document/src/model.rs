//! # Document Model
//!
//! Project → Pages → Blocks. Render and export order is array order.
//!
//! Blocks are a closed set of kind tags, each carrying an open attribute map
//! for `content` and `styles`. New kinds arrive as data (block templates), so
//! the payload stays a string-keyed map checked against the kind's template
//! rather than a fixed struct per kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::id_generator::{new_id, slugify};

/// Open key → value map used for block content, block styles and theme extras.
pub type AttrMap = serde_json::Map<String, Value>;

/// Block kind tag.
///
/// Serializes as its lowercase name. Kinds this build does not know about are
/// kept verbatim in `Other` so they survive a load/export round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockType {
    Header,
    Hero,
    Footer,
    Text,
    Features,
    Testimonials,
    Stats,
    Faq,
    Image,
    Gallery,
    Video,
    Pricing,
    Cta,
    Contact,
    Divider,
    Spacer,
    Other(String),
}

impl BlockType {
    /// Every built-in kind, in palette order.
    pub const BUILTIN: [BlockType; 16] = [
        BlockType::Header,
        BlockType::Hero,
        BlockType::Footer,
        BlockType::Text,
        BlockType::Features,
        BlockType::Testimonials,
        BlockType::Stats,
        BlockType::Faq,
        BlockType::Image,
        BlockType::Gallery,
        BlockType::Video,
        BlockType::Pricing,
        BlockType::Cta,
        BlockType::Contact,
        BlockType::Divider,
        BlockType::Spacer,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Header => "header",
            BlockType::Hero => "hero",
            BlockType::Footer => "footer",
            BlockType::Text => "text",
            BlockType::Features => "features",
            BlockType::Testimonials => "testimonials",
            BlockType::Stats => "stats",
            BlockType::Faq => "faq",
            BlockType::Image => "image",
            BlockType::Gallery => "gallery",
            BlockType::Video => "video",
            BlockType::Pricing => "pricing",
            BlockType::Cta => "cta",
            BlockType::Contact => "contact",
            BlockType::Divider => "divider",
            BlockType::Spacer => "spacer",
            BlockType::Other(name) => name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, BlockType::Other(_))
    }
}

impl From<String> for BlockType {
    fn from(name: String) -> Self {
        BlockType::BUILTIN
            .iter()
            .find(|kind| kind.as_str() == name)
            .cloned()
            .unwrap_or(BlockType::Other(name))
    }
}

impl From<&str> for BlockType {
    fn from(name: &str) -> Self {
        BlockType::from(name.to_string())
    }
}

impl From<BlockType> for String {
    fn from(kind: BlockType) -> Self {
        match kind {
            BlockType::Other(name) => name,
            builtin => builtin.as_str().to_string(),
        }
    }
}

impl FromStr for BlockType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BlockType::from(s))
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Atomic typed content unit on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Unique within its page. Empty means "assign one on insert".
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type")]
    pub kind: BlockType,

    #[serde(default)]
    pub content: AttrMap,

    /// May embed an animation descriptor under `animation`.
    #[serde(default)]
    pub styles: AttrMap,
}

impl Block {
    pub fn new(kind: BlockType) -> Self {
        Self {
            id: String::new(),
            kind,
            content: AttrMap::new(),
            styles: AttrMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_content(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.content.insert(key.into(), value.into());
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.styles.insert(key.into(), value.into());
        self
    }

    /// Embedded animation descriptor, if present and well-formed.
    pub fn animation(&self) -> Option<AnimationDescriptor> {
        self.styles
            .get("animation")
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

/// Animation carried inside a block's `styles.animation`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
}

impl AnimationDescriptor {
    /// CSS `animation` shorthand value.
    pub fn to_css(&self) -> String {
        format!(
            "{} {}ms {} {}ms both",
            self.name,
            self.duration_ms.unwrap_or(600),
            self.easing.as_deref().unwrap_or("ease-out"),
            self.delay_ms.unwrap_or(0),
        )
    }
}

/// SEO / social preview settings of a page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSettings {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
}

/// Ordered sequence of blocks plus page-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub settings: PageSettings,
}

impl Page {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: new_id(),
            slug: slugify(&name),
            settings: PageSettings {
                title: name.clone(),
                ..Default::default()
            },
            name,
            blocks: Vec::new(),
        }
    }

    pub fn block(&self, block_id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == block_id)
    }

    pub fn block_mut(&mut self, block_id: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id == block_id)
    }

    pub fn block_index(&self, block_id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id == block_id)
    }
}

/// Project-wide theme.
///
/// The four named keys are always present; any other theme key lands in
/// `extra` and is treated the same way by style resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalStyles {
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: String,
    pub border_radius: String,
    #[serde(flatten)]
    pub extra: AttrMap,
}

impl GlobalStyles {
    pub const PRIMARY_COLOR: &'static str = "primaryColor";
    pub const SECONDARY_COLOR: &'static str = "secondaryColor";
    pub const FONT_FAMILY: &'static str = "fontFamily";
    pub const BORDER_RADIUS: &'static str = "borderRadius";

    pub const NAMED_KEYS: [&'static str; 4] = [
        Self::PRIMARY_COLOR,
        Self::SECONDARY_COLOR,
        Self::FONT_FAMILY,
        Self::BORDER_RADIUS,
    ];

    /// Set one theme key. Named keys are stored as strings.
    pub fn set(&mut self, key: &str, value: Value) {
        let named = match key {
            Self::PRIMARY_COLOR => &mut self.primary_color,
            Self::SECONDARY_COLOR => &mut self.secondary_color,
            Self::FONT_FAMILY => &mut self.font_family,
            Self::BORDER_RADIUS => &mut self.border_radius,
            _ => {
                self.extra.insert(key.to_string(), value);
                return;
            }
        };
        *named = match value {
            Value::String(s) => s,
            other => other.to_string(),
        };
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            Self::PRIMARY_COLOR => Some(Value::String(self.primary_color.clone())),
            Self::SECONDARY_COLOR => Some(Value::String(self.secondary_color.clone())),
            Self::FONT_FAMILY => Some(Value::String(self.font_family.clone())),
            Self::BORDER_RADIUS => Some(Value::String(self.border_radius.clone())),
            _ => self.extra.get(key).cloned(),
        }
    }

    /// Shallow, key-by-key merge.
    pub fn merge(&mut self, patch: &AttrMap) {
        for (key, value) in patch {
            self.set(key, value.clone());
        }
    }

    /// The whole theme as one key → value map.
    pub fn to_map(&self) -> AttrMap {
        let mut map = AttrMap::new();
        for key in Self::NAMED_KEYS {
            if let Some(value) = self.get(key) {
                map.insert(key.to_string(), value);
            }
        }
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
        map
    }
}

impl Default for GlobalStyles {
    fn default() -> Self {
        Self {
            primary_color: "#8B5CF6".to_string(),
            secondary_color: "#D4EDE1".to_string(),
            font_family: "Pretendard".to_string(),
            border_radius: "16px".to_string(),
            extra: AttrMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl ProjectMetadata {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
        }
    }
}

/// Top-level container: pages plus a global theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub pages: Vec<Page>,
    pub global_styles: GlobalStyles,
    #[serde(flatten)]
    pub metadata: ProjectMetadata,
}

impl Project {
    /// New project with one default page and the default theme.
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        let mut home = Page::new("Home");
        home.settings.title = "My Website".to_string();
        home.settings.description = "Built with blockpage".to_string();

        Self {
            id: new_id(),
            name: name.into(),
            pages: vec![home],
            global_styles: GlobalStyles::default(),
            metadata: ProjectMetadata::new(now),
        }
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    pub fn page_mut(&mut self, page_id: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == page_id)
    }

    pub fn page_index(&self, page_id: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.id == page_id)
    }
}
