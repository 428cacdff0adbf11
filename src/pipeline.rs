use std::path::PathBuf;

use anyhow::Context as _;

use crate::{
    background::build_background,
    config::{AssetSet, AssetSpec},
    foundation::{error::PromoResult, rng::Rng},
    frame::{PlacedFrame, draw_device_frame},
    render::canvas::Canvas,
    text::layout::{TextBlock, TextEngine},
};

/// A finished canvas plus where its parts were placed.
#[derive(Debug)]
pub struct RenderedAsset {
    pub canvas: Canvas,
    pub title: TextBlock,
    pub subtitle: Option<TextBlock>,
    /// `None` for feature graphics and for screenshots whose source file is missing.
    pub frame: Option<PlacedFrame>,
}

/// Outcome of writing one asset.
#[derive(Clone, Debug)]
pub struct AssetReport {
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub frame: Option<PlacedFrame>,
}

/// Renders the assets of one [`AssetSet`], one at a time.
pub struct Processor<'a> {
    set: &'a AssetSet,
    text: TextEngine,
    rng: Rng,
}

impl<'a> Processor<'a> {
    /// Create the set's output directory and load its font.
    pub fn new(set: &'a AssetSet, rng: Rng) -> PromoResult<Self> {
        let text = TextEngine::load(&set.font_path);
        Self::with_text_engine(set, text, rng)
    }

    /// Like [`Processor::new`] with a caller-provided text engine.
    pub fn with_text_engine(set: &'a AssetSet, text: TextEngine, rng: Rng) -> PromoResult<Self> {
        std::fs::create_dir_all(&set.output_dir).with_context(|| {
            format!("create output dir '{}'", set.output_dir.display())
        })?;
        Ok(Self { set, text, rng })
    }

    /// Render `spec` and write it to the set's output directory.
    #[tracing::instrument(skip(self, spec), fields(set = %self.set.name, output = spec.output()))]
    pub fn process(&mut self, spec: &AssetSpec) -> PromoResult<AssetReport> {
        let rendered = self.render(spec)?;
        let output = self.set.output_dir.join(spec.output());
        rendered.canvas.save_png(&output)?;

        tracing::info!(
            path = %output.display(),
            framed = rendered.frame.is_some(),
            "wrote asset"
        );
        Ok(AssetReport {
            output,
            width: rendered.canvas.width(),
            height: rendered.canvas.height(),
            frame: rendered.frame,
        })
    }

    /// Render `spec` in memory without writing anything.
    pub fn render(&mut self, spec: &AssetSpec) -> PromoResult<RenderedAsset> {
        let set = self.set;
        let theme = &set.theme;
        let typo = &theme.typography;
        let (size, metrics) = match spec {
            AssetSpec::Screenshot { .. } => (theme.screenshot_size, typo.screenshot),
            AssetSpec::FeatureGraphic { .. } => (theme.feature_size, typo.feature),
        };

        let mut canvas =
            build_background(size.width, size.height, &theme.background, &mut self.rng)?;

        let title = self.text.shape(
            spec.title(),
            metrics.title_px,
            typo.title_color,
            typo.line_gap,
        )?;
        let title_top = match spec {
            AssetSpec::Screenshot { .. } => typo.title_top,
            AssetSpec::FeatureGraphic { .. } => {
                (size.height as i32 - title.height() as i32).div_euclid(2) - typo.feature_lift
            }
        };
        let title = self.text.draw(&mut canvas, &title, title_top)?;

        let subtitle = match spec.subtitle() {
            Some(text) => {
                let shaped = self.text.shape(
                    text,
                    metrics.subtitle_px,
                    typo.subtitle_color,
                    typo.line_gap,
                )?;
                let top = title.bottom() + metrics.subtitle_gap;
                Some(self.text.draw(&mut canvas, &shaped, top)?)
            }
            None => None,
        };

        let frame = match spec {
            AssetSpec::Screenshot { source, .. } => {
                let path = set.input_dir.join(source);
                let top = title.bottom() + theme.frame.gap_below_title;
                draw_device_frame(&mut canvas, &path, top, theme.frame.scale, &theme.frame)?
            }
            AssetSpec::FeatureGraphic { .. } => None,
        };

        Ok(RenderedAsset {
            canvas,
            title,
            subtitle,
            frame,
        })
    }
}

/// Render and write every asset of `set` in order.
pub fn run_set(set: &AssetSet, rng: Rng) -> PromoResult<Vec<AssetReport>> {
    let mut processor = Processor::new(set, rng)?;
    set.assets
        .iter()
        .map(|spec| processor.process(spec))
        .collect()
}
