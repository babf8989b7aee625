//! Block templates: palette-provided prototypes that seed new blocks.
//!
//! A template's `default_content` keys are the required content keys of its
//! block kind. Registering a template is how a new kind joins the document
//! model; nothing else in this crate changes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::id_generator::new_id;
use crate::model::{AttrMap, Block, BlockType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Layout,
    Content,
    Media,
    Commerce,
    Utility,
}

impl TemplateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::Layout => "layout",
            TemplateCategory::Content => "content",
            TemplateCategory::Media => "media",
            TemplateCategory::Commerce => "commerce",
            TemplateCategory::Utility => "utility",
        }
    }
}

impl std::str::FromStr for TemplateCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "layout" => Ok(TemplateCategory::Layout),
            "content" => Ok(TemplateCategory::Content),
            "media" => Ok(TemplateCategory::Media),
            "commerce" => Ok(TemplateCategory::Commerce),
            "utility" => Ok(TemplateCategory::Utility),
            other => Err(format!("unknown template category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTemplate {
    #[serde(rename = "type")]
    pub kind: BlockType,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    pub default_content: AttrMap,
    pub default_styles: AttrMap,
}

impl BlockTemplate {
    /// Content keys every block of this kind must carry.
    pub fn required_keys(&self) -> impl Iterator<Item = &str> {
        self.default_content.keys().map(String::as_str)
    }

    /// Fresh block with a new id and the template's defaults.
    pub fn instantiate(&self) -> Block {
        Block {
            id: new_id(),
            kind: self.kind.clone(),
            content: self.default_content.clone(),
            styles: self.default_styles.clone(),
        }
    }

    /// Fill keys the block lacks from this template's defaults.
    pub fn seed(&self, block: &mut Block) {
        for (key, value) in &self.default_content {
            if !block.content.contains_key(key) {
                block.content.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in &self.default_styles {
            if !block.styles.contains_key(key) {
                block.styles.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Lookup table from block kind to template
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: Vec<BlockTemplate>,
}

impl TemplateRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry preloaded with every built-in block kind.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for template in builtin_templates() {
            registry.register(template);
        }
        registry
    }

    /// Add a template, replacing any existing one for the same kind.
    pub fn register(&mut self, template: BlockTemplate) {
        if let Some(existing) = self.templates.iter_mut().find(|t| t.kind == template.kind) {
            *existing = template;
        } else {
            self.templates.push(template);
        }
    }

    pub fn get(&self, kind: &BlockType) -> Option<&BlockTemplate> {
        self.templates.iter().find(|t| &t.kind == kind)
    }

    pub fn contains(&self, kind: &BlockType) -> bool {
        self.get(kind).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockTemplate> {
        self.templates.iter()
    }

    pub fn kinds(&self) -> Vec<BlockType> {
        self.templates.iter().map(|t| t.kind.clone()).collect()
    }

    pub fn by_category(&self, category: TemplateCategory) -> Vec<&BlockTemplate> {
        self.templates
            .iter()
            .filter(|t| t.category == category)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn object(value: Value) -> AttrMap {
    match value {
        Value::Object(map) => map,
        _ => AttrMap::new(),
    }
}

fn template(
    kind: BlockType,
    name: &str,
    description: &str,
    category: TemplateCategory,
    default_content: Value,
    default_styles: Value,
) -> BlockTemplate {
    BlockTemplate {
        kind,
        name: name.to_string(),
        description: description.to_string(),
        category,
        default_content: object(default_content),
        default_styles: object(default_styles),
    }
}

fn builtin_templates() -> Vec<BlockTemplate> {
    use TemplateCategory::*;

    vec![
        template(
            BlockType::Header,
            "Header",
            "Logo and navigation menu",
            Layout,
            json!({
                "logo": "My Brand",
                "menuItems": [
                    { "label": "Home", "link": "#" },
                    { "label": "About", "link": "#about" },
                    { "label": "Services", "link": "#services" },
                    { "label": "Contact", "link": "#contact" }
                ]
            }),
            json!({ "backgroundColor": "#FFFFFF", "padding": "py-4 px-6", "shadow": "shadow-soft" }),
        ),
        template(
            BlockType::Hero,
            "Hero",
            "Main headline with a call-to-action button",
            Layout,
            json!({
                "title": "Turn your idea into reality",
                "subtitle": "Build a website quickly and easily",
                "buttonText": "Get started",
                "buttonLink": "#"
            }),
            json!({
                "backgroundColor": "bg-gradient-to-br from-purple-100 via-blue-100 to-green-100",
                "padding": "py-24 px-6",
                "alignment": "center"
            }),
        ),
        template(
            BlockType::Footer,
            "Footer",
            "Site information at the bottom of the page",
            Layout,
            json!({
                "logo": "My Brand",
                "description": "Delivering better digital experiences.",
                "links": [
                    {
                        "title": "Services",
                        "items": [
                            { "label": "Web", "link": "#" },
                            { "label": "Apps", "link": "#" },
                            { "label": "Design", "link": "#" }
                        ]
                    },
                    {
                        "title": "Company",
                        "items": [
                            { "label": "About", "link": "#" },
                            { "label": "Team", "link": "#" },
                            { "label": "Careers", "link": "#" }
                        ]
                    }
                ],
                "copyright": "© 2024 My Brand. All rights reserved."
            }),
            json!({ "backgroundColor": "#1F2937", "textColor": "#FFFFFF", "padding": "py-12 px-6" }),
        ),
        template(
            BlockType::Text,
            "Text",
            "Heading, paragraph or quote",
            Content,
            json!({
                "content": "Type your text here. Click to edit.",
                "variant": "paragraph"
            }),
            json!({ "padding": "py-6 px-6", "alignment": "left", "width": "container" }),
        ),
        template(
            BlockType::Features,
            "Features",
            "Highlights of a product or service",
            Content,
            json!({
                "title": "Why choose us?",
                "items": [
                    { "icon": "Zap", "title": "Fast", "description": "Optimized for quick page loads." },
                    { "icon": "Shield", "title": "Secure", "description": "Your data stays protected." },
                    { "icon": "Heart", "title": "Friendly", "description": "An interface anyone can use." }
                ]
            }),
            json!({ "backgroundColor": "#FFFFFF", "padding": "py-16 px-6", "alignment": "center" }),
        ),
        template(
            BlockType::Testimonials,
            "Testimonials",
            "Customer reviews and recommendations",
            Content,
            json!({
                "items": [
                    { "quote": "An amazing service. Our productivity doubled!", "author": "Alex Kim", "role": "CEO, Startup" },
                    { "quote": "Easy to use with great results. Highly recommended.", "author": "Sam Lee", "role": "Marketing Director" }
                ]
            }),
            json!({ "backgroundColor": "bg-amber-50", "padding": "py-16 px-6" }),
        ),
        template(
            BlockType::Stats,
            "Stats",
            "Achievements shown as numbers",
            Content,
            json!({
                "items": [
                    { "value": "10K+", "label": "Active users" },
                    { "value": "99.9%", "label": "Uptime" },
                    { "value": "24/7", "label": "Support" },
                    { "value": "50+", "label": "Countries" }
                ]
            }),
            json!({
                "backgroundColor": "bg-gradient-to-r from-purple-500 to-purple-600",
                "textColor": "#FFFFFF",
                "padding": "py-12 px-6"
            }),
        ),
        template(
            BlockType::Faq,
            "FAQ",
            "Frequently asked questions",
            Content,
            json!({
                "title": "Frequently asked questions",
                "items": [
                    { "question": "How do I get started?", "answer": "Sign up and start right away." },
                    { "question": "What is the refund policy?", "answer": "Full refund within 7 days of purchase." }
                ]
            }),
            json!({ "padding": "py-16 px-6", "width": "container" }),
        ),
        template(
            BlockType::Image,
            "Image",
            "A single image",
            Media,
            json!({
                "src": "https://images.unsplash.com/photo-1618005182384-a83a8bd57fbe?w=800",
                "alt": "Image description",
                "caption": ""
            }),
            json!({ "padding": "py-6 px-6", "borderRadius": "rounded-2xl", "alignment": "center" }),
        ),
        template(
            BlockType::Gallery,
            "Gallery",
            "Image grid",
            Media,
            json!({
                "images": [
                    { "src": "https://images.unsplash.com/photo-1618005182384-a83a8bd57fbe?w=400", "alt": "Image 1" },
                    { "src": "https://images.unsplash.com/photo-1614850523296-d8c1af93d400?w=400", "alt": "Image 2" },
                    { "src": "https://images.unsplash.com/photo-1557672172-298e090bd0f1?w=400", "alt": "Image 3" }
                ],
                "columns": 3
            }),
            json!({ "padding": "py-8 px-6" }),
        ),
        template(
            BlockType::Video,
            "Video",
            "Embedded video",
            Media,
            json!({
                "url": "https://www.youtube.com/embed/dQw4w9WgXcQ",
                "title": "Video title"
            }),
            json!({ "padding": "py-8 px-6", "alignment": "center" }),
        ),
        template(
            BlockType::Pricing,
            "Pricing",
            "Plan comparison table",
            Commerce,
            json!({
                "title": "Simple pricing",
                "plans": [
                    {
                        "name": "Starter",
                        "price": "$29",
                        "period": "/mo",
                        "features": ["5 projects", "Basic analytics", "Email support"],
                        "buttonText": "Get started"
                    },
                    {
                        "name": "Pro",
                        "price": "$79",
                        "period": "/mo",
                        "features": ["Unlimited projects", "Advanced analytics", "Priority support", "API access"],
                        "highlighted": true,
                        "buttonText": "Most popular"
                    },
                    {
                        "name": "Enterprise",
                        "price": "Contact us",
                        "period": "",
                        "features": ["Custom solutions", "Dedicated manager", "SLA", "On-premise"],
                        "buttonText": "Contact sales"
                    }
                ]
            }),
            json!({ "padding": "py-16 px-6", "alignment": "center" }),
        ),
        template(
            BlockType::Cta,
            "Call to action",
            "Banner that prompts an action",
            Commerce,
            json!({
                "title": "Start today",
                "description": "Try every feature free for 14 days.",
                "buttonText": "Start free trial",
                "buttonLink": "#"
            }),
            json!({
                "backgroundColor": "bg-gradient-to-r from-pink-100 to-orange-100",
                "padding": "py-16 px-6",
                "alignment": "center"
            }),
        ),
        template(
            BlockType::Contact,
            "Contact form",
            "Contact details and inquiry form",
            Commerce,
            json!({
                "title": "Contact us",
                "description": "Questions? Reach out any time.",
                "fields": [
                    { "type": "text", "label": "Name", "placeholder": "Jane Doe", "required": true },
                    { "type": "email", "label": "Email", "placeholder": "you@example.com", "required": true },
                    { "type": "textarea", "label": "Message", "placeholder": "How can we help?", "required": true }
                ],
                "submitText": "Send message"
            }),
            json!({ "padding": "py-16 px-6", "width": "narrow" }),
        ),
        template(
            BlockType::Divider,
            "Divider",
            "Section separator",
            Utility,
            json!({ "style": "line" }),
            json!({ "padding": "py-4 px-6" }),
        ),
        template(
            BlockType::Spacer,
            "Spacer",
            "Empty vertical space",
            Utility,
            json!({ "height": "medium" }),
            json!({}),
        ),
    ]
}
