use blockpage_common::{dispatch_page, root_variables, BlockContext, SectionStyle};
use blockpage_document::{Page, Project, SerializationError};
use thiserror::Error;
use tracing::debug;

use crate::generators::{html_registry, HtmlGenerator};

pub const TAILWIND_CDN: &str = "https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css";
pub const PRETENDARD_CSS: &str =
    "https://cdn.jsdelivr.net/gh/orioncactus/pretendard/dist/web/static/pretendard.css";

/// Errors that can occur during HTML compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Page not found: {0}")]
    PageNotFound(String),
}

/// Options for HTML compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// Emit `style` attributes for CSS-valued block styles
    pub inline_styles: bool,
    /// `lang` attribute of the document
    pub lang: String,
    /// Stylesheet providing the utility classes
    pub framework_href: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            inline_styles: true,
            lang: "en".to_string(),
            framework_href: TAILWIND_CDN.to_string(),
        }
    }
}

/// A rendered page plus the blocks that fell back to stubs
#[derive(Debug)]
pub struct HtmlOutput {
    pub html: String,
    pub warnings: Vec<SerializationError>,
}

pub(crate) struct Context {
    options: CompileOptions,
    depth: usize,
    buffer: String,
}

impl Context {
    pub(crate) fn new(options: CompileOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    pub(crate) fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub(crate) fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        let indent = self.options.indent.clone();
        for _ in 0..self.depth {
            self.add(&indent);
        }
    }

    pub(crate) fn indent(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    /// `open` line, then indent
    pub(crate) fn open(&mut self, text: &str) {
        self.add_line(text);
        self.indent();
    }

    /// Dedent, then `close` line
    pub(crate) fn close(&mut self, text: &str) {
        self.dedent();
        self.add_line(text);
    }

    /// `<tag attrs>escaped text</tag>` on one line
    pub(crate) fn element(&mut self, tag: &str, attrs: &str, text: &str) {
        let open = if attrs.is_empty() {
            format!("<{}>", tag)
        } else {
            format!("<{} {}>", tag, attrs)
        };
        if is_self_closing(tag) {
            self.add_line(&open);
        } else {
            self.add_line(&format!("{}{}</{}>", open, escape_html(text), tag));
        }
    }

    pub(crate) fn comment(&mut self, text: &str) {
        self.add_line(&format!("<!-- {} -->", comment_text(text)));
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Compile one page of `project` to a standalone HTML document
pub fn compile_to_html(
    project: &Project,
    page_id: &str,
    options: CompileOptions,
) -> Result<HtmlOutput, CompileError> {
    let page = project
        .page(page_id)
        .ok_or_else(|| CompileError::PageNotFound(page_id.to_string()))?;
    Ok(compile_page(project, page, options))
}

/// Compile a page that is already resolved
pub fn compile_page(project: &Project, page: &Page, options: CompileOptions) -> HtmlOutput {
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line(&format!("<html lang=\"{}\">", escape_html(&ctx.options.lang)));
    ctx.indent();

    compile_head(project, page, &mut ctx);

    ctx.open("<body class=\"bg-gray-50\">");

    let registry = html_registry();
    let warnings = dispatch_page(
        project,
        page,
        &registry,
        &mut ctx,
        compile_section,
        compile_stub,
    );

    ctx.close("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    debug!(
        page_id = %page.id,
        blocks = page.blocks.len(),
        stubs = warnings.len(),
        "Compiled page to HTML"
    );

    HtmlOutput {
        html: ctx.get_output(),
        warnings,
    }
}

fn compile_head(project: &Project, page: &Page, ctx: &mut Context) {
    ctx.open("<head>");

    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");

    let title = if page.settings.title.is_empty() {
        &page.name
    } else {
        &page.settings.title
    };
    ctx.element("title", "", title);

    if !page.settings.description.is_empty() {
        ctx.add_line(&format!(
            "<meta name=\"description\" content=\"{}\">",
            escape_html(&page.settings.description)
        ));
    }
    if let Some(image) = page.settings.og_image.as_deref().filter(|s| !s.is_empty()) {
        ctx.add_line(&format!(
            "<meta property=\"og:image\" content=\"{}\">",
            escape_html(image)
        ));
    }

    let framework = escape_html(&ctx.options.framework_href);
    ctx.add_line(&format!("<link href=\"{}\" rel=\"stylesheet\">", framework));
    if project.global_styles.font_family == "Pretendard" {
        ctx.add_line(&format!("<link href=\"{}\" rel=\"stylesheet\">", PRETENDARD_CSS));
    }

    ctx.open("<style>");
    ctx.open(":root {");
    for (name, value) in root_variables(&project.global_styles) {
        ctx.add_line(&format!("{}: {};", name, css_value(&value)));
    }
    ctx.close("}");
    ctx.add_line("body { font-family: var(--font-family), sans-serif; }");
    // Per section, so a block's own --font-family takes effect
    ctx.add_line("[id^=\"block-\"] { font-family: var(--font-family), sans-serif; }");
    ctx.add_line(
        ".btn-primary { background: var(--primary-color); color: white; padding: 12px 24px; \
         border-radius: var(--border-radius); font-weight: 500; display: inline-block; }",
    );
    ctx.add_line(".accent-bg { background: var(--secondary-color); }");
    ctx.add_line("@keyframes fadeIn { from { opacity: 0; } to { opacity: 1; } }");
    ctx.add_line(
        "@keyframes slideUp { from { opacity: 0; transform: translateY(24px); } \
         to { opacity: 1; transform: none; } }",
    );
    ctx.close("</style>");

    ctx.close("</head>");
}

fn compile_section(generator: &HtmlGenerator, block: &BlockContext<'_>, ctx: &mut Context) {
    let style = SectionStyle::from_effective(
        &block.effective_styles,
        block.block,
        &block.project.global_styles,
    );

    ctx.comment(&format!("{} Section", generator.label));
    ctx.open(&section_open(generator.tag, block, &style, ctx.options.inline_styles));
    (generator.render)(block, ctx);
    ctx.close(&format!("</{}>", generator.tag));
}

fn compile_stub(block: &BlockContext<'_>, ctx: &mut Context) {
    let style = SectionStyle::from_effective(
        &block.effective_styles,
        block.block,
        &block.project.global_styles,
    );

    ctx.comment(&format!("{} Block", block.kind()));
    ctx.open(&section_open("section", block, &style, ctx.options.inline_styles));
    ctx.comment(&format!("unsupported block: {}", block.kind()));
    ctx.close("</section>");
}

fn section_open(tag: &str, block: &BlockContext<'_>, style: &SectionStyle, inline: bool) -> String {
    let mut classes = format!("block-{}", class_token(block.kind().as_str()));
    if !style.classes.is_empty() {
        classes.push(' ');
        classes.push_str(&style.class_attr());
    }

    let mut open = format!(
        "<{} id=\"block-{}\" class=\"{}\"",
        tag,
        escape_html(&block.block.id),
        escape_html(&classes)
    );
    if inline && !style.declarations.is_empty() {
        open.push_str(&format!(" style=\"{}\"", escape_html(&style.style_attr())));
    }
    open.push('>');
    open
}

/// Kind names are free-form; keep class names to `[a-z0-9-]`
fn class_token(kind: &str) -> String {
    kind.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

fn css_value(value: &str) -> String {
    value.replace(|c: char| matches!(c, '<' | '>' | '{' | '}' | ';'), "")
}

fn comment_text(text: &str) -> String {
    text.replace("--", "- -").replace('>', "&gt;")
}

pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escaped `href`/`src`; script URLs collapse to `#`
pub(crate) fn escape_url(url: &str) -> String {
    let trimmed = url.trim();
    // Browsers drop tab and newlines anywhere and leading controls before the scheme
    let scheme: String = trimmed
        .trim_start_matches(|c: char| c.is_ascii_control() || c == ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect::<String>()
        .to_ascii_lowercase();
    if scheme.starts_with("javascript:") || scheme.starts_with("vbscript:") {
        return "#".to_string();
    }
    escape_html(trimmed)
}

pub(crate) fn is_self_closing(tag: &str) -> bool {
    matches!(
        tag,
        "img"
            | "input"
            | "br"
            | "hr"
            | "meta"
            | "link"
            | "area"
            | "base"
            | "col"
            | "embed"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
