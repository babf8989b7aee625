//! JSX bodies of the per-kind stub components.
//!
//! Bodies read `props` only; each block's content is spread into its
//! component at the call site.

use blockpage_common::GeneratorRegistry;
use blockpage_document::BlockType;

use crate::context::CompilerContext;

/// Stub component generator for one block kind
#[derive(Clone, Copy)]
pub struct ReactGenerator {
    /// Root JSX element of the component
    pub tag: &'static str,
    pub(crate) body: fn(&CompilerContext),
}

impl std::fmt::Debug for ReactGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactGenerator").field("tag", &self.tag).finish()
    }
}

/// The React registry: every builtin kind has a stub component
pub fn react_registry() -> GeneratorRegistry<ReactGenerator> {
    let entry = |tag: &'static str, body: fn(&CompilerContext)| ReactGenerator { tag, body };
    GeneratorRegistry::new("react")
        .with(BlockType::Header, entry("header", header))
        .with(BlockType::Hero, entry("section", hero))
        .with(BlockType::Footer, entry("footer", footer))
        .with(BlockType::Text, entry("section", text))
        .with(BlockType::Features, entry("section", features))
        .with(BlockType::Testimonials, entry("section", testimonials))
        .with(BlockType::Stats, entry("section", stats))
        .with(BlockType::Faq, entry("section", faq))
        .with(BlockType::Image, entry("section", image))
        .with(BlockType::Gallery, entry("section", gallery))
        .with(BlockType::Video, entry("section", video))
        .with(BlockType::Pricing, entry("section", pricing))
        .with(BlockType::Cta, entry("section", cta))
        .with(BlockType::Contact, entry("section", contact))
        .with(BlockType::Divider, entry("div", divider))
        .with(BlockType::Spacer, entry("div", spacer))
}

fn lines(ctx: &CompilerContext, jsx: &[&str]) {
    for line in jsx {
        ctx.add_line(line);
    }
}

fn header(ctx: &CompilerContext) {
    lines(ctx, &[
        "<div className=\"max-w-7xl mx-auto flex items-center justify-between\">",
        "  <div className=\"text-2xl font-bold\">{props.logo}</div>",
        "  <nav className=\"hidden md:flex items-center gap-8\">",
        "    {props.menuItems?.map((item, i) => (",
        "      <a key={i} href={item.link}>{item.label}</a>",
        "    ))}",
        "  </nav>",
        "</div>",
    ]);
}

fn hero(ctx: &CompilerContext) {
    lines(ctx, &[
        "<div className=\"max-w-4xl mx-auto\">",
        "  <h1 className=\"text-5xl font-bold mb-6\">{props.title}</h1>",
        "  <p className=\"text-xl text-gray-600 mb-8\">{props.subtitle}</p>",
        "  {props.buttonText && (",
        "    <a href={props.buttonLink} className=\"btn-primary\">{props.buttonText}</a>",
        "  )}",
        "</div>",
    ]);
}

fn footer(ctx: &CompilerContext) {
    lines(ctx, &[
        "<div className=\"max-w-7xl mx-auto\">",
        "  <div className=\"text-2xl font-bold mb-4\">{props.logo}</div>",
        "  <p>{props.description}</p>",
        "  {props.links?.map((group, i) => (",
        "    <ul key={i}>",
        "      <li className=\"font-semibold\">{group.title}</li>",
        "      {group.items.map((item, j) => (",
        "        <li key={j}><a href={item.link}>{item.label}</a></li>",
        "      ))}",
        "    </ul>",
        "  ))}",
        "  <p className=\"text-sm opacity-60\">{props.copyright}</p>",
        "</div>",
    ]);
}

fn text(ctx: &CompilerContext) {
    lines(ctx, &[
        "{props.variant === \"heading\" ? (",
        "  <h2 className=\"text-3xl font-bold\">{props.content}</h2>",
        ") : props.variant === \"quote\" ? (",
        "  <blockquote className=\"text-xl italic\">{props.content}</blockquote>",
        ") : (",
        "  <p className=\"text-lg leading-relaxed\">{props.content}</p>",
        ")}",
    ]);
}

fn features(ctx: &CompilerContext) {
    lines(ctx, &[
        "<h2 className=\"text-4xl font-bold mb-12\">{props.title}</h2>",
        "<div className=\"grid md:grid-cols-3 gap-8\">",
        "  {props.items?.map((item, i) => (",
        "    <div key={i} className=\"p-6 rounded-2xl\">",
        "      {/* icon: {item.icon} */}",
        "      <h3 className=\"text-xl font-semibold\">{item.title}</h3>",
        "      <p>{item.description}</p>",
        "    </div>",
        "  ))}",
        "</div>",
    ]);
}

fn testimonials(ctx: &CompilerContext) {
    lines(ctx, &[
        "{props.items?.map((item, i) => (",
        "  <figure key={i}>",
        "    <blockquote>{item.quote}</blockquote>",
        "    <figcaption>{item.author}, {item.role}</figcaption>",
        "  </figure>",
        "))}",
    ]);
}

fn stats(ctx: &CompilerContext) {
    lines(ctx, &[
        "<div className=\"grid grid-cols-2 md:grid-cols-4 gap-8 text-center\">",
        "  {props.items?.map((item, i) => (",
        "    <div key={i}>",
        "      <div className=\"text-4xl font-bold\">{item.value}</div>",
        "      <div>{item.label}</div>",
        "    </div>",
        "  ))}",
        "</div>",
    ]);
}

fn faq(ctx: &CompilerContext) {
    lines(ctx, &[
        "<h2 className=\"text-4xl font-bold mb-8\">{props.title}</h2>",
        "{props.items?.map((item, i) => (",
        "  <details key={i}>",
        "    <summary>{item.question}</summary>",
        "    <p>{item.answer}</p>",
        "  </details>",
        "))}",
    ]);
}

fn image(ctx: &CompilerContext) {
    lines(ctx, &[
        "<figure>",
        "  <img src={props.src} alt={props.alt} className=\"w-full rounded-2xl\" />",
        "  {props.caption && <figcaption>{props.caption}</figcaption>}",
        "</figure>",
    ]);
}

fn gallery(ctx: &CompilerContext) {
    lines(ctx, &[
        "<div className={`grid grid-cols-2 md:grid-cols-${props.columns ?? 3} gap-4`}>",
        "  {props.images?.map((image, i) => (",
        "    <img key={i} src={image.src} alt={image.alt} />",
        "  ))}",
        "</div>",
    ]);
}

fn video(ctx: &CompilerContext) {
    lines(ctx, &[
        "<iframe src={props.url} title={props.title} className=\"w-full aspect-video\" allowFullScreen />",
    ]);
}

fn pricing(ctx: &CompilerContext) {
    lines(ctx, &[
        "<h2 className=\"text-4xl font-bold mb-12\">{props.title}</h2>",
        "<div className=\"grid md:grid-cols-3 gap-8\">",
        "  {props.plans?.map((plan, i) => (",
        "    <div key={i} className={plan.highlighted ? \"ring-2 ring-purple-500\" : \"\"}>",
        "      <h3>{plan.name}</h3>",
        "      <div>{plan.price}{plan.period}</div>",
        "      <ul>{plan.features.map((feature, j) => <li key={j}>{feature}</li>)}</ul>",
        "      <a href=\"#\" className=\"btn-primary\">{plan.buttonText}</a>",
        "    </div>",
        "  ))}",
        "</div>",
    ]);
}

fn cta(ctx: &CompilerContext) {
    lines(ctx, &[
        "<h2 className=\"text-4xl font-bold mb-4\">{props.title}</h2>",
        "<p className=\"text-xl mb-8\">{props.description}</p>",
        "<a href={props.buttonLink} className=\"btn-primary\">{props.buttonText}</a>",
    ]);
}

fn contact(ctx: &CompilerContext) {
    lines(ctx, &[
        "<h2 className=\"text-4xl font-bold mb-4\">{props.title}</h2>",
        "<p>{props.description}</p>",
        "<form>",
        "  {props.fields?.map((field, i) => (",
        "    <label key={i}>",
        "      {field.label}",
        "      {field.type === \"textarea\" ? (",
        "        <textarea placeholder={field.placeholder} required={field.required} />",
        "      ) : (",
        "        <input type={field.type} placeholder={field.placeholder} required={field.required} />",
        "      )}",
        "    </label>",
        "  ))}",
        "  <button type=\"submit\" className=\"btn-primary\">{props.submitText}</button>",
        "</form>",
    ]);
}

fn divider(ctx: &CompilerContext) {
    lines(ctx, &["<hr className={props.style === \"dashed\" ? \"border-dashed\" : \"\"} />"]);
}

fn spacer(ctx: &CompilerContext) {
    lines(ctx, &["<div data-height={props.height} />"]);
}
