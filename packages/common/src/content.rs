use blockpage_document::AttrMap;
use serde_json::Value;

/// Lenient readers over open content maps.
///
/// Block content is user-editable data, so generators read it without
/// failing: a missing or mistyped value reads as empty.
pub trait ContentExt {
    fn value(&self, key: &str) -> Option<&Value>;

    /// Scalar as text; missing, null, arrays and objects read as "".
    fn text(&self, key: &str) -> String {
        match self.value(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Non-empty text only.
    fn opt_text(&self, key: &str) -> Option<String> {
        let text = self.text(key);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn list(&self, key: &str) -> &[Value] {
        match self.value(key) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        }
    }

    fn flag(&self, key: &str) -> bool {
        matches!(self.value(key), Some(Value::Bool(true)))
    }
}

impl ContentExt for AttrMap {
    fn value(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}

impl ContentExt for Value {
    fn value(&self, key: &str) -> Option<&Value> {
        self.get(key)
    }
}
