use blockpage_document::{resolve_block, AttrMap, Block, BlockType, Page, Project, SerializationError};
use tracing::warn;

use crate::registry::GeneratorRegistry;

/// Everything a generator needs to render one block
#[derive(Debug)]
pub struct BlockContext<'a> {
    pub project: &'a Project,
    pub page: &'a Page,
    pub block: &'a Block,
    /// Position of the block in its page.
    pub index: usize,
    /// Theme defaults merged with the block's own styles.
    pub effective_styles: AttrMap,
}

impl<'a> BlockContext<'a> {
    pub fn kind(&self) -> &BlockType {
        &self.block.kind
    }

    pub fn content(&self) -> &AttrMap {
        &self.block.content
    }
}

/// Visitor over a page's blocks, in array order
///
/// Override `visit_block` to render; `visit_page` walks every block with its
/// effective style already resolved.
pub trait Visitor: Sized {
    fn visit_page(&mut self, project: &Project, page: &Page) {
        walk_page(self, project, page);
    }

    fn visit_block(&mut self, ctx: &BlockContext<'_>);
}

pub fn walk_page<V: Visitor>(visitor: &mut V, project: &Project, page: &Page) {
    for (index, block) in page.blocks.iter().enumerate() {
        let ctx = BlockContext {
            project,
            page,
            block,
            index,
            effective_styles: resolve_block(&project.global_styles, block),
        };
        visitor.visit_block(&ctx);
    }
}

struct Dispatch<'r, G, C, Gen, Fallback> {
    registry: &'r GeneratorRegistry<G>,
    out: &'r mut C,
    generate: Gen,
    fallback: Fallback,
    warnings: Vec<SerializationError>,
}

impl<'r, G, C, Gen, Fallback> Visitor for Dispatch<'r, G, C, Gen, Fallback>
where
    Gen: FnMut(&G, &BlockContext<'_>, &mut C),
    Fallback: FnMut(&BlockContext<'_>, &mut C),
{
    fn visit_block(&mut self, ctx: &BlockContext<'_>) {
        match self.registry.get(ctx.kind()) {
            Some(generator) => (self.generate)(generator, ctx, &mut *self.out),
            None => {
                warn!(
                    format = self.registry.format(),
                    block_id = %ctx.block.id,
                    kind = %ctx.kind(),
                    "No generator for block type - emitting stub"
                );
                self.warnings.push(SerializationError::unsupported_block(
                    self.registry.format(),
                    ctx.kind().to_string(),
                    ctx.block.id.clone(),
                ));
                (self.fallback)(ctx, &mut *self.out);
            }
        }
    }
}

/// Shared export traversal.
///
/// Walks `page` in order, resolves each block's effective style, and hands the
/// block to its registered generator. Blocks without one go to `fallback` and
/// are reported in the returned warnings; the rest of the page still renders.
pub fn dispatch_page<G, C>(
    project: &Project,
    page: &Page,
    registry: &GeneratorRegistry<G>,
    out: &mut C,
    generate: impl FnMut(&G, &BlockContext<'_>, &mut C),
    fallback: impl FnMut(&BlockContext<'_>, &mut C),
) -> Vec<SerializationError> {
    let mut dispatch = Dispatch {
        registry,
        out,
        generate,
        fallback,
        warnings: Vec::new(),
    };
    dispatch.visit_page(project, page);
    dispatch.warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockpage_document::{Block, BlockType};
    use chrono::Utc;

    fn project_with(kinds: &[BlockType]) -> Project {
        let mut project = Project::new("Test", Utc::now());
        for (i, kind) in kinds.iter().enumerate() {
            project.pages[0]
                .blocks
                .push(Block::new(kind.clone()).with_id(format!("b{}", i)));
        }
        project
    }

    struct Collect(Vec<(usize, String)>);

    impl Visitor for Collect {
        fn visit_block(&mut self, ctx: &BlockContext<'_>) {
            self.0.push((ctx.index, ctx.block.id.clone()));
        }
    }

    #[test]
    fn test_walk_visits_in_array_order() {
        let project = project_with(&[BlockType::Hero, BlockType::Stats, BlockType::Footer]);
        let mut collect = Collect(Vec::new());
        collect.visit_page(&project, &project.pages[0]);
        assert_eq!(
            collect.0,
            vec![(0, "b0".into()), (1, "b1".into()), (2, "b2".into())]
        );
    }

    #[test]
    fn test_effective_styles_are_resolved() {
        let mut project = project_with(&[BlockType::Hero]);
        project.pages[0].blocks[0]
            .styles
            .insert("primaryColor".into(), "#000".into());

        struct Check;
        impl Visitor for Check {
            fn visit_block(&mut self, ctx: &BlockContext<'_>) {
                assert_eq!(ctx.effective_styles["primaryColor"], "#000");
                assert_eq!(ctx.effective_styles["borderRadius"], "16px");
            }
        }
        Check.visit_page(&project, &project.pages[0]);
    }

    #[test]
    fn test_unregistered_kind_falls_back() {
        let project = project_with(&[
            BlockType::Hero,
            BlockType::Other("carousel".into()),
            BlockType::Footer,
        ]);
        let registry = GeneratorRegistry::new("text")
            .with(BlockType::Hero, "HERO")
            .with(BlockType::Footer, "FOOTER");

        let mut out: Vec<String> = Vec::new();
        let warnings = dispatch_page(
            &project,
            &project.pages[0],
            &registry,
            &mut out,
            |label, _ctx, out| out.push(label.to_string()),
            |ctx, out| out.push(format!("stub:{}", ctx.kind())),
        );

        assert_eq!(out, vec!["HERO", "stub:carousel", "FOOTER"]);
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            SerializationError::UnsupportedBlock { kind, .. } if kind == "carousel"
        ));
    }
}
