use std::{borrow::Cow, path::Path};

use crate::{
    foundation::{
        color::Rgba8,
        error::{PromoError, PromoResult},
    },
    render::{canvas::Canvas, cpu::render_layer},
    text::font::{FontOrigin, LoadedFont, load_font, system_fallback},
};

/// Pixel box of one placed line, in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl LineBox {
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn overlaps(&self, other: &LineBox) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// A stacked block of centered lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBlock {
    pub top: i32,
    /// Sum of line heights plus the gaps between lines.
    pub height: u32,
    pub lines: Vec<LineBox>,
}

impl TextBlock {
    pub fn bottom(&self) -> i32 {
        self.top + self.height as i32
    }
}

/// Center each `(width, height)` line on a canvas `canvas_width` wide and stack them from
/// `top` downward with `gap` pixels between consecutive lines.
pub fn stack_lines(canvas_width: u32, top: i32, sizes: &[(u32, u32)], gap: u32) -> TextBlock {
    let mut lines = Vec::with_capacity(sizes.len());
    let mut y = top;
    for (i, &(width, height)) in sizes.iter().enumerate() {
        if i > 0 {
            y += gap as i32;
        }
        let x = (canvas_width as i32 - width as i32).div_euclid(2);
        lines.push(LineBox {
            x,
            y,
            width,
            height,
        });
        y += height as i32;
    }
    TextBlock {
        top,
        height: (y - top) as u32,
        lines,
    }
}

struct ShapedLine {
    layout: parley::Layout<Rgba8>,
    width: u32,
    height: u32,
}

/// Text split into lines, shaped and measured but not yet placed.
pub struct ShapedText {
    lines: Vec<ShapedLine>,
    color: Rgba8,
    gap: u32,
}

impl ShapedText {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Measured `(width, height)` of each line.
    pub fn line_sizes(&self) -> Vec<(u32, u32)> {
        self.lines.iter().map(|l| (l.width, l.height)).collect()
    }

    /// Height the block occupies once stacked.
    pub fn height(&self) -> u32 {
        let lines: u32 = self.lines.iter().map(|l| l.height).sum();
        lines + self.gap * (self.lines.len() as u32).saturating_sub(1)
    }

    /// Where the lines land on a canvas `canvas_width` wide when the block starts at `top`.
    pub fn place(&self, canvas_width: u32, top: i32) -> TextBlock {
        stack_lines(canvas_width, top, &self.line_sizes(), self.gap)
    }
}

struct Face {
    family: String,
    data: vello_cpu::peniko::FontData,
    origin: FontOrigin,
}

/// Shapes and draws centered text blocks with a single font face.
///
/// Without a usable font the engine still works, but shapes every string to an empty block.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    face: Option<Face>,
}

impl TextEngine {
    /// Engine using the font at `path`, or the system fallback when it is missing or unusable.
    pub fn load(path: &Path) -> Self {
        let mut engine = Self::without_font();
        if let Some(font) = load_font(path) {
            let from_file = matches!(font.origin, FontOrigin::File(_));
            match engine.register(font) {
                Ok(()) => return engine,
                Err(err) if from_file => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "custom font unusable, using default"
                    );
                }
                Err(err) => tracing::warn!(error = %err, "fallback font unusable"),
            }
            if from_file
                && let Some(fallback) = system_fallback()
                && engine.register(fallback).is_ok()
            {
                return engine;
            }
        }
        tracing::warn!(
            path = %path.display(),
            "no usable font file and no system font found; no built-in font is bundled, \
             so titles and subtitles are omitted"
        );
        engine
    }

    /// Engine bound to an already loaded font.
    pub fn with_font(font: LoadedFont) -> PromoResult<Self> {
        let mut engine = Self::without_font();
        engine.register(font)?;
        Ok(engine)
    }

    pub fn without_font() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            face: None,
        }
    }

    pub fn font_origin(&self) -> Option<&FontOrigin> {
        self.face.as_ref().map(|f| &f.origin)
    }

    pub fn family_name(&self) -> Option<&str> {
        self.face.as_ref().map(|f| f.family.as_str())
    }

    fn register(&mut self, font: LoadedFont) -> PromoResult<()> {
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            PromoError::validation("no font families registered from font bytes")
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PromoError::validation("registered font family has no name"))?
            .to_string();

        let data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
            font.index,
        );
        self.face = Some(Face {
            family,
            data,
            origin: font.origin,
        });
        Ok(())
    }

    /// Split `text` on line breaks and shape each line at `size_px`.
    pub fn shape(
        &mut self,
        text: &str,
        size_px: f32,
        color: Rgba8,
        gap: u32,
    ) -> PromoResult<ShapedText> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PromoError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let mut shaped = ShapedText {
            lines: Vec::new(),
            color,
            gap,
        };
        let Some(face) = &self.face else {
            return Ok(shaped);
        };

        for line in text.lines() {
            let mut builder = self
                .layout_ctx
                .ranged_builder(&mut self.font_ctx, line, 1.0, true);
            builder.push_default(parley::style::StyleProperty::FontStack(
                parley::style::FontStack::Source(Cow::Owned(face.family.clone())),
            ));
            builder.push_default(parley::style::StyleProperty::FontSize(size_px));
            builder.push_default(parley::style::StyleProperty::Brush(color));

            let mut layout: parley::Layout<Rgba8> = builder.build(line);
            layout.break_all_lines(None);

            let width = layout.width().ceil().max(0.0) as u32;
            let height = layout.height().ceil().max(0.0) as u32;
            shaped.lines.push(ShapedLine {
                layout,
                width,
                height,
            });
        }
        Ok(shaped)
    }

    /// Draw `shaped` centered on `canvas`, starting at `top`.
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        shaped: &ShapedText,
        top: i32,
    ) -> PromoResult<TextBlock> {
        let block = shaped.place(canvas.width(), top);
        let Some(face) = &self.face else {
            return Ok(block);
        };
        if shaped.is_empty() {
            return Ok(block);
        }

        let layer = render_layer(0, 0, canvas.width(), canvas.height(), |ctx| {
            ctx.set_paint(shaped.color.to_cpu());
            for (line, placed) in shaped.lines.iter().zip(&block.lines) {
                ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                    f64::from(placed.x),
                    f64::from(placed.y),
                )));
                for visual in line.layout.lines() {
                    for item in visual.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        });
                        ctx.glyph_run(&face.data)
                            .font_size(run.run().font_size())
                            .fill_glyphs(glyphs);
                    }
                }
            }
        })?;
        canvas.composite(&layer)?;

        tracing::debug!(
            lines = block.lines.len(),
            top,
            height = block.height,
            "drew text block"
        );
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_centered_independently() {
        let block = stack_lines(1080, 150, &[(400, 100), (700, 100)], 20);
        assert_eq!(block.lines[0].x, 340);
        assert_eq!(block.lines[1].x, 190);
        for line in &block.lines {
            let left = line.x;
            let right = 1080 - line.right();
            assert!((left - right).abs() <= 1);
        }
    }

    #[test]
    fn lines_stack_with_gap_and_report_height() {
        let block = stack_lines(1080, 150, &[(400, 90), (700, 110), (300, 80)], 20);
        assert_eq!(block.lines[0].y, 150);
        assert_eq!(block.lines[1].y, 150 + 90 + 20);
        assert_eq!(block.lines[2].y, 150 + 90 + 20 + 110 + 20);
        assert_eq!(block.height, 90 + 110 + 80 + 40);
        assert_eq!(block.bottom(), block.lines[2].bottom());
    }

    #[test]
    fn stacked_lines_never_overlap() {
        let block = stack_lines(1024, 0, &[(500, 60), (500, 60), (900, 60)], 0);
        for (i, a) in block.lines.iter().enumerate() {
            for b in &block.lines[i + 1..] {
                assert!(!a.overlaps(b));
            }
        }
    }

    #[test]
    fn odd_remainder_rounds_left_and_wide_lines_go_negative() {
        let block = stack_lines(11, 0, &[(4, 1), (20, 1)], 0);
        assert_eq!(block.lines[0].x, 3);
        assert_eq!(block.lines[1].x, -5);
    }

    #[test]
    fn empty_input_is_an_empty_block() {
        let block = stack_lines(100, 42, &[], 20);
        assert!(block.lines.is_empty());
        assert_eq!(block.height, 0);
        assert_eq!(block.bottom(), 42);
    }

    #[test]
    fn engine_without_font_shapes_nothing() {
        let mut engine = TextEngine::without_font();
        let shaped = engine
            .shape("Dive into\nDeep Focus", 100.0, Rgba8::rgb(255, 255, 255), 20)
            .unwrap();
        assert!(shaped.is_empty());
        assert_eq!(shaped.height(), 0);

        let mut canvas = Canvas::filled(32, 32, Rgba8::rgb(0, 0, 0)).unwrap();
        let block = engine.draw(&mut canvas, &shaped, 10).unwrap();
        assert_eq!(block.height, 0);
        assert!(canvas.data().chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
    }

    #[test]
    fn non_positive_size_is_rejected() {
        let mut engine = TextEngine::without_font();
        assert!(engine.shape("x", 0.0, Rgba8::default(), 0).is_err());
        assert!(engine.shape("x", f32::NAN, Rgba8::default(), 0).is_err());
    }

    #[test]
    fn garbage_font_bytes_are_rejected() {
        let font = LoadedFont {
            bytes: std::sync::Arc::new(b"nope".to_vec()),
            index: 0,
            origin: FontOrigin::File("nope.ttf".into()),
        };
        assert!(TextEngine::with_font(font).is_err());
    }
}
