//! One markup generator per block kind.
//!
//! Generators only write the inside of a section; the compiler owns the
//! wrapping element, its id and its styles. All content is escaped here.

use blockpage_common::{BlockContext, ContentExt, GeneratorRegistry};
use blockpage_document::BlockType;
use serde_json::Value;

use crate::compiler::{escape_html, escape_url, Context};

/// Markup generator for one block kind
#[derive(Clone, Copy)]
pub struct HtmlGenerator {
    /// Wrapping element
    pub tag: &'static str,
    /// Human name used in the section comment
    pub label: &'static str,
    pub(crate) render: fn(&BlockContext<'_>, &mut Context),
}

impl std::fmt::Debug for HtmlGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlGenerator")
            .field("tag", &self.tag)
            .field("label", &self.label)
            .finish()
    }
}

fn generator(
    tag: &'static str,
    label: &'static str,
    render: fn(&BlockContext<'_>, &mut Context),
) -> HtmlGenerator {
    HtmlGenerator { tag, label, render }
}

/// The HTML registry: every builtin kind has a generator
pub fn html_registry() -> GeneratorRegistry<HtmlGenerator> {
    GeneratorRegistry::new("html")
        .with(BlockType::Header, generator("header", "Header", header))
        .with(BlockType::Hero, generator("section", "Hero", hero))
        .with(BlockType::Footer, generator("footer", "Footer", footer))
        .with(BlockType::Text, generator("section", "Text", text))
        .with(BlockType::Features, generator("section", "Features", features))
        .with(BlockType::Testimonials, generator("section", "Testimonials", testimonials))
        .with(BlockType::Stats, generator("section", "Stats", stats))
        .with(BlockType::Faq, generator("section", "FAQ", faq))
        .with(BlockType::Image, generator("section", "Image", image))
        .with(BlockType::Gallery, generator("section", "Gallery", gallery))
        .with(BlockType::Video, generator("section", "Video", video))
        .with(BlockType::Pricing, generator("section", "Pricing", pricing))
        .with(BlockType::Cta, generator("section", "CTA", cta))
        .with(BlockType::Contact, generator("section", "Contact", contact))
        .with(BlockType::Divider, generator("div", "Divider", divider))
        .with(BlockType::Spacer, generator("div", "Spacer", spacer))
}

fn link(ctx: &mut Context, href: &str, class: &str, label: &str) {
    ctx.element(
        "a",
        &format!("href=\"{}\" class=\"{}\"", escape_url(href), class),
        label,
    );
}

fn heading(ctx: &mut Context, tag: &str, class: &str, text: &str) {
    if !text.is_empty() {
        ctx.element(tag, &format!("class=\"{}\"", class), text);
    }
}

fn header(block: &BlockContext<'_>, ctx: &mut Context) {
    let content = block.content();
    ctx.open("<div class=\"max-w-7xl mx-auto flex items-center justify-between\">");
    ctx.element(
        "div",
        "class=\"text-2xl font-bold\" style=\"color: var(--primary-color)\"",
        &content.text("logo"),
    );
    ctx.open("<nav class=\"hidden md:flex items-center gap-8\">");
    for item in content.list("menuItems") {
        link(ctx, &item.text("link"), "text-gray-600 hover:text-gray-900", &item.text("label"));
    }
    ctx.close("</nav>");
    ctx.close("</div>");
}

fn hero(block: &BlockContext<'_>, ctx: &mut Context) {
    let content = block.content();
    ctx.open("<div class=\"max-w-4xl mx-auto\">");
    heading(ctx, "h1", "text-5xl md:text-6xl font-bold text-gray-900 mb-6", &content.text("title"));
    heading(ctx, "p", "text-xl text-gray-600 mb-8", &content.text("subtitle"));
    if let Some(button) = content.opt_text("buttonText") {
        let href = content.opt_text("buttonLink").unwrap_or_else(|| "#".to_string());
        link(ctx, &href, "btn-primary", &button);
    }
    ctx.close("</div>");
}

fn footer(block: &BlockContext<'_>, ctx: &mut Context) {
    let content = block.content();
    ctx.open("<div class=\"max-w-7xl mx-auto\">");
    ctx.open("<div class=\"grid md:grid-cols-4 gap-8 mb-8\">");

    ctx.open("<div class=\"md:col-span-2\">");
    heading(ctx, "div", "text-2xl font-bold mb-4", &content.text("logo"));
    heading(ctx, "p", "opacity-70", &content.text("description"));
    ctx.close("</div>");

    for group in content.list("links") {
        ctx.open("<div>");
        heading(ctx, "h4", "font-semibold mb-4", &group.text("title"));
        ctx.open("<ul class=\"space-y-2\">");
        for item in group.list("items") {
            ctx.open("<li>");
            link(ctx, &item.text("link"), "opacity-70 hover:opacity-100", &item.text("label"));
            ctx.close("</li>");
        }
        ctx.close("</ul>");
        ctx.close("</div>");
    }

    ctx.close("</div>");
    heading(ctx, "p", "pt-8 border-t border-gray-700 text-center opacity-60 text-sm", &content.text("copyright"));
    ctx.close("</div>");
}

fn text(block: &BlockContext<'_>, ctx: &mut Context) {
    let content = block.content();
    let body = content.text("content");
    match content.text("variant").as_str() {
        "heading" => ctx.element("h2", "class=\"text-3xl font-bold text-gray-900\"", &body),
        "quote" => ctx.element(
            "blockquote",
            "class=\"text-xl italic text-gray-700 border-l-4 pl-6\" style=\"border-color: var(--primary-color)\"",
            &body,
        ),
        _ => ctx.element("p", "class=\"text-lg text-gray-700 leading-relaxed\"", &body),
    }
}

fn features(block: &BlockContext<'_>, ctx: &mut Context) {
    let content = block.content();
    ctx.open("<div class=\"max-w-6xl mx-auto\">");
    heading(ctx, "h2", "text-4xl font-bold text-gray-900 mb-12", &content.text("title"));
    ctx.open("<div class=\"grid md:grid-cols-3 gap-8\">");
    for item in content.list("items") {
        ctx.open("<div class=\"p-6 rounded-2xl accent-bg\">");
        if let Some(icon) = item.opt_text("icon") {
            ctx.comment(&format!("icon: {}", icon));
        }
        heading(ctx, "h3", "text-xl font-semibold text-gray-900 mb-2", &item.text("title"));
        heading(ctx, "p", "text-gray-600", &item.text("description"));
        ctx.close("</div>");
    }
    ctx.close("</div>");
    ctx.close("</div>");
}

fn testimonials(block: &BlockContext<'_>, ctx: &mut Context) {
    ctx.open("<div class=\"max-w-6xl mx-auto grid md:grid-cols-2 gap-8\">");
    for item in block.content().list("items") {
        ctx.open("<figure class=\"p-8 bg-white rounded-2xl shadow-soft\">");
        ctx.element("blockquote", "class=\"text-lg text-gray-700 mb-4\"", &item.text("quote"));
        ctx.open("<figcaption>");
        heading(ctx, "div", "font-semibold text-gray-900", &item.text("author"));
        heading(ctx, "div", "text-sm text-gray-500", &item.text("role"));
        ctx.close("</figcaption>");
        ctx.close("</figure>");
    }
    ctx.close("</div>");
}

fn stats(block: &BlockContext<'_>, ctx: &mut Context) {
    ctx.open("<div class=\"max-w-6xl mx-auto grid grid-cols-2 md:grid-cols-4 gap-8 text-center\">");
    for item in block.content().list("items") {
        ctx.open("<div>");
        ctx.element("div", "class=\"text-4xl font-bold mb-2\"", &item.text("value"));
        ctx.element("div", "class=\"opacity-80\"", &item.text("label"));
        ctx.close("</div>");
    }
    ctx.close("</div>");
}

fn faq(block: &BlockContext<'_>, ctx: &mut Context) {
    let content = block.content();
    ctx.open("<div class=\"max-w-3xl mx-auto\">");
    heading(ctx, "h2", "text-4xl font-bold text-gray-900 mb-8 text-center", &content.text("title"));
    for item in content.list("items") {
        ctx.open("<details class=\"mb-4 p-6 bg-white rounded-2xl\">");
        ctx.element("summary", "class=\"font-semibold cursor-pointer\"", &item.text("question"));
        ctx.element("p", "class=\"mt-4 text-gray-600\"", &item.text("answer"));
        ctx.close("</details>");
    }
    ctx.close("</div>");
}

fn img(ctx: &mut Context, item: &Value, class: &str) {
    ctx.element(
        "img",
        &format!(
            "src=\"{}\" alt=\"{}\" class=\"{}\"",
            escape_url(&item.text("src")),
            escape_html(&item.text("alt")),
            class
        ),
        "",
    );
}

fn image(block: &BlockContext<'_>, ctx: &mut Context) {
    let content = block.content();
    ctx.open("<figure class=\"max-w-4xl mx-auto\">");
    ctx.element(
        "img",
        &format!(
            "src=\"{}\" alt=\"{}\" class=\"w-full rounded-2xl\"",
            escape_url(&content.text("src")),
            escape_html(&content.text("alt"))
        ),
        "",
    );
    heading(ctx, "figcaption", "mt-3 text-sm text-gray-500", &content.text("caption"));
    ctx.close("</figure>");
}

fn gallery(block: &BlockContext<'_>, ctx: &mut Context) {
    let content = block.content();
    let columns = content
        .text("columns")
        .parse::<u8>()
        .ok()
        .filter(|c| (1..=6).contains(c))
        .unwrap_or(3);
    ctx.open(&format!(
        "<div class=\"max-w-6xl mx-auto grid grid-cols-2 md:grid-cols-{} gap-4\">",
        columns
    ));
    for item in content.list("images") {
        img(ctx, item, "w-full h-64 object-cover rounded-2xl");
    }
    ctx.close("</div>");
}

fn video(block: &BlockContext<'_>, ctx: &mut Context) {
    let content = block.content();
    ctx.open("<div class=\"max-w-4xl mx-auto aspect-w-16 aspect-h-9\">");
    ctx.element(
        "iframe",
        &format!(
            "src=\"{}\" title=\"{}\" class=\"w-full h-full rounded-2xl\" allowfullscreen",
            escape_url(&content.text("url")),
            escape_html(&content.text("title"))
        ),
        "",
    );
    ctx.close("</div>");
}

fn pricing(block: &BlockContext<'_>, ctx: &mut Context) {
    let content = block.content();
    ctx.open("<div class=\"max-w-6xl mx-auto\">");
    heading(ctx, "h2", "text-4xl font-bold text-gray-900 mb-12 text-center", &content.text("title"));
    ctx.open("<div class=\"grid md:grid-cols-3 gap-8\">");
    for plan in content.list("plans") {
        let card = if plan.flag("highlighted") {
            "p-8 rounded-2xl bg-white shadow-soft ring-2 ring-purple-500"
        } else {
            "p-8 rounded-2xl bg-white shadow-soft"
        };
        ctx.open(&format!("<div class=\"{}\">", card));
        heading(ctx, "h3", "text-xl font-semibold mb-4", &plan.text("name"));
        ctx.open("<div class=\"mb-6\">");
        ctx.element("span", "class=\"text-4xl font-bold\"", &plan.text("price"));
        ctx.element("span", "class=\"text-gray-500\"", &plan.text("period"));
        ctx.close("</div>");
        ctx.open("<ul class=\"space-y-2 mb-8\">");
        for feature in plan.list("features") {
            let label = match feature {
                Value::String(s) => s.clone(),
                other => other.text("label"),
            };
            ctx.element("li", "", &label);
        }
        ctx.close("</ul>");
        if let Some(button) = plan.opt_text("buttonText") {
            link(ctx, "#", "btn-primary w-full text-center", &button);
        }
        ctx.close("</div>");
    }
    ctx.close("</div>");
    ctx.close("</div>");
}

fn cta(block: &BlockContext<'_>, ctx: &mut Context) {
    let content = block.content();
    ctx.open("<div class=\"max-w-3xl mx-auto\">");
    heading(ctx, "h2", "text-4xl font-bold mb-4", &content.text("title"));
    heading(ctx, "p", "text-xl opacity-90 mb-8", &content.text("description"));
    if let Some(button) = content.opt_text("buttonText") {
        let href = content.opt_text("buttonLink").unwrap_or_else(|| "#".to_string());
        link(ctx, &href, "btn-primary", &button);
    }
    ctx.close("</div>");
}

const INPUT_TYPES: [&str; 6] = ["text", "email", "tel", "number", "url", "date"];

fn contact(block: &BlockContext<'_>, ctx: &mut Context) {
    let content = block.content();
    ctx.open("<div class=\"max-w-2xl mx-auto\">");
    heading(ctx, "h2", "text-4xl font-bold text-gray-900 mb-4", &content.text("title"));
    heading(ctx, "p", "text-gray-600 mb-8", &content.text("description"));
    ctx.open("<form class=\"space-y-4\">");
    for (i, field) in content.list("fields").iter().enumerate() {
        let field_id = format!("{}-field-{}", escape_html(&block.block.id), i);
        let required = if field.flag("required") { " required" } else { "" };
        let placeholder = escape_html(&field.text("placeholder"));

        ctx.open("<div>");
        ctx.element(
            "label",
            &format!("for=\"{}\" class=\"block text-sm font-medium mb-1\"", field_id),
            &field.text("label"),
        );
        let kind = field.text("type");
        if kind == "textarea" {
            ctx.add_line(&format!(
                "<textarea id=\"{}\" placeholder=\"{}\" class=\"w-full p-3 border rounded-xl\"{}></textarea>",
                field_id, placeholder, required
            ));
        } else {
            let kind = if INPUT_TYPES.contains(&kind.as_str()) { kind.as_str() } else { "text" };
            ctx.element(
                "input",
                &format!(
                    "id=\"{}\" type=\"{}\" placeholder=\"{}\" class=\"w-full p-3 border rounded-xl\"{}",
                    field_id, kind, placeholder, required
                ),
                "",
            );
        }
        ctx.close("</div>");
    }
    let submit = content.opt_text("submitText").unwrap_or_else(|| "Send".to_string());
    ctx.element("button", "type=\"submit\" class=\"btn-primary w-full\"", &submit);
    ctx.close("</form>");
    ctx.close("</div>");
}

fn divider(block: &BlockContext<'_>, ctx: &mut Context) {
    match block.content().text("style").as_str() {
        "dots" => ctx.element("div", "class=\"text-center text-gray-400 tracking-widest\"", "• • •"),
        "dashed" => ctx.element("hr", "class=\"border-dashed border-gray-300\"", ""),
        _ => ctx.element("hr", "class=\"border-gray-200\"", ""),
    }
}

fn spacer(block: &BlockContext<'_>, ctx: &mut Context) {
    match block.content().text("height").as_str() {
        "small" => ctx.add_line("<div class=\"h-8\"></div>"),
        "medium" | "" => ctx.add_line("<div class=\"h-16\"></div>"),
        "large" => ctx.add_line("<div class=\"h-32\"></div>"),
        custom => ctx.add_line(&format!(
            "<div style=\"height: {}\"></div>",
            escape_html(custom)
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockpage_document::TemplateRegistry;

    #[test]
    fn test_registry_covers_builtin_templates() {
        let registry = html_registry();
        let templates = TemplateRegistry::builtin();
        assert!(registry.missing(templates.kinds().iter()).is_empty());
        assert_eq!(registry.len(), BlockType::BUILTIN.len());
    }

    #[test]
    fn test_script_urls_are_neutralised() {
        assert_eq!(escape_url("javascript:alert(1)"), "#");
        assert_eq!(escape_url("  JavaScript:alert(1)"), "#");
        assert_eq!(escape_url("java\tscript:alert(1)"), "#");
        assert_eq!(escape_url("\u{1}jav\r\nascript:alert(1)"), "#");
        assert_eq!(escape_url("VB\tScript:msgbox"), "#");
        assert_eq!(escape_url("https://a.com/?x=1&y=2"), "https://a.com/?x=1&amp;y=2");
    }
}
