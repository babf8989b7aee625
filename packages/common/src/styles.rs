//! Effective block styles → section attributes.
//!
//! Style values are either CSS (`#FFFFFF`, `16px`, `1px solid red`) or
//! utility classes for the shared CSS framework (`py-16 px-6`). The first kind
//! becomes inline style, the second becomes classes. Theme keys are exposed
//! once as `:root` custom properties; a block that overrides one gets a
//! section-scoped custom property instead.

use blockpage_document::{AnimationDescriptor, AttrMap, Block, GlobalStyles};
use serde_json::Value;

/// `primaryColor` → `--primary-color`
pub fn css_var_name(key: &str) -> String {
    format!("--{}", kebab_case(key))
}

/// `backgroundColor` → `background-color`
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else if c == '_' || c == ' ' {
            out.push('-');
        } else {
            out.push(c);
        }
    }
    out
}

/// True when every token looks like a framework utility class
pub fn is_utility_classes(value: &str) -> bool {
    let mut tokens = value.split_whitespace().peekable();
    if tokens.peek().is_none() {
        return false;
    }
    tokens.all(|token| {
        token.contains('-')
            && token.starts_with(|c: char| c.is_ascii_lowercase())
            && token.chars().all(|c| {
                c.is_ascii_lowercase()
                    || c.is_ascii_digit()
                    || matches!(c, '-' | ':' | '/' | '.' | '[' | ']' | '%')
            })
    })
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Theme as `:root` custom properties, sorted by key
pub fn root_variables(global: &GlobalStyles) -> Vec<(String, String)> {
    global
        .to_map()
        .iter()
        .filter_map(|(key, value)| scalar(value).map(|v| (css_var_name(key), v)))
        .collect()
}

/// Classes and inline declarations for one section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionStyle {
    pub classes: Vec<String>,
    pub declarations: Vec<(String, String)>,
}

impl SectionStyle {
    /// Resolve a block's effective styles.
    ///
    /// Theme keys the block does not override are left to `:root`.
    pub fn from_effective(effective: &AttrMap, block: &Block, global: &GlobalStyles) -> Self {
        let mut style = SectionStyle::default();

        for (key, value) in effective {
            let is_theme_key = global.get(key).is_some();
            if is_theme_key && !block.styles.contains_key(key) {
                continue;
            }

            if key == "animation" {
                // Malformed descriptors are dropped
                if let Ok(animation) = serde_json::from_value::<AnimationDescriptor>(value.clone()) {
                    style.declare("animation", animation.to_css());
                }
                continue;
            }

            let Some(text) = scalar(value) else {
                continue;
            };

            if is_theme_key {
                style.declare(&css_var_name(key), text);
                continue;
            }

            match key.as_str() {
                "alignment" => style.add_class(match text.as_str() {
                    "center" => "text-center",
                    "right" => "text-right",
                    _ => "text-left",
                }),
                "width" => match text.as_str() {
                    "container" => style.add_class("container mx-auto"),
                    "narrow" => style.add_class("max-w-2xl mx-auto"),
                    "full" => style.add_class("w-full"),
                    other => style.declare("max-width", other.to_string()),
                },
                "textColor" => style.declare("color", text),
                _ if is_utility_classes(&text) => style.add_class(&text),
                _ => style.declare(&kebab_case(key), text),
            }
        }

        style
    }

    fn add_class(&mut self, classes: &str) {
        for class in classes.split_whitespace() {
            if !self.classes.iter().any(|c| c == class) {
                self.classes.push(class.to_string());
            }
        }
    }

    fn declare(&mut self, property: &str, value: String) {
        self.declarations.push((property.to_string(), value));
    }

    pub fn class_attr(&self) -> String {
        self.classes.join(" ")
    }

    pub fn style_attr(&self) -> String {
        self.declarations
            .iter()
            .map(|(property, value)| format!("{}: {};", property, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
