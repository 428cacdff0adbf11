use crate::{
    foundation::{
        color::Rgba8,
        error::{PromoError, PromoResult},
        rng::Rng,
    },
    render::{
        blur::GaussianKernel,
        canvas::{Canvas, Layer},
        cpu::{ShapeFill, fill_shapes},
    },
};

/// The glow is rasterized and blurred at `1 / GLOW_DOWNSCALE` resolution, then upscaled.
const GLOW_DOWNSCALE: u32 = 8;

/// How the canvas behind the text and device frame is painted.
#[derive(Clone, Debug, PartialEq)]
pub enum BackgroundStyle {
    /// Dark base, soft accent glow near the bottom, scattered translucent bubbles.
    DeepSea(DeepSea),
    /// Vertical linear gradient from `top` to `bottom`.
    Gradient { top: Rgba8, bottom: Rgba8 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeepSea {
    pub base: Rgba8,
    pub accent: Rgba8,
    pub glow_alpha: u8,
    /// Gaussian sigma of the glow, in output pixels.
    pub glow_sigma: f32,
    pub bubble_count: usize,
    pub bubble_sigma: f32,
}

/// One decorative circle, in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bubble {
    pub cx: i32,
    pub cy: i32,
    pub radius: u32,
    pub alpha: u8,
}

/// Paint a fresh, fully opaque `width × height` background.
pub fn build_background(
    width: u32,
    height: u32,
    style: &BackgroundStyle,
    rng: &mut Rng,
) -> PromoResult<Canvas> {
    match style {
        BackgroundStyle::DeepSea(deep) => deep_sea(width, height, deep, rng),
        BackgroundStyle::Gradient { top, bottom } => linear_gradient(width, height, *top, *bottom),
    }
}

fn deep_sea(width: u32, height: u32, style: &DeepSea, rng: &mut Rng) -> PromoResult<Canvas> {
    let mut canvas = Canvas::filled(width, height, style.base)?;

    let glow = glow_layer(width, height, style)?;
    canvas.composite(&glow)?;

    let bubbles = scatter_bubbles(style.bubble_count, width, height, rng);
    let layer = bubble_layer(width, height, &bubbles, style.accent, style.bubble_sigma)?;
    canvas.composite(&layer)?;

    tracing::debug!(width, height, bubbles = bubbles.len(), "built deep-sea background");
    Ok(canvas)
}

fn glow_layer(width: u32, height: u32, style: &DeepSea) -> PromoResult<Layer> {
    let sw = width.div_ceil(GLOW_DOWNSCALE);
    let sh = height.div_ceil(GLOW_DOWNSCALE);
    let (fw, fh) = (f64::from(sw), f64::from(sh));

    let ellipse = kurbo::Ellipse::from_rect(kurbo::Rect::new(
        -0.2 * fw,
        0.6 * fh,
        1.2 * fw,
        1.4 * fh,
    ));
    let mut small = fill_shapes(
        0,
        0,
        sw,
        sh,
        &[ShapeFill::new(
            &ellipse,
            style.accent.with_alpha(style.glow_alpha),
        )],
    )?;
    small.blur(style.glow_sigma / GLOW_DOWNSCALE as f32)?;

    let (w, h) = small.size();
    let img = image::RgbaImage::from_raw(w, h, small.data().to_vec())
        .ok_or_else(|| PromoError::render("glow buffer does not match its dimensions"))?;
    let full = image::imageops::resize(&img, width, height, image::imageops::FilterType::Triangle);
    Layer::from_parts(0, 0, width, height, full.into_raw())
}

/// Draw `count` bubbles. Small ones are brighter, large ones fainter.
pub fn scatter_bubbles(count: usize, width: u32, height: u32, rng: &mut Rng) -> Vec<Bubble> {
    (0..count)
        .map(|_| {
            let choice = rng.next_f64();
            let (radius, alpha) = if choice < 0.6 {
                (rng.range_inclusive(10, 30), rng.range_inclusive(20, 50))
            } else if choice < 0.9 {
                (rng.range_inclusive(30, 80), rng.range_inclusive(10, 30))
            } else {
                (rng.range_inclusive(100, 200), rng.range_inclusive(5, 15))
            };
            Bubble {
                cx: rng.range_inclusive(0, i64::from(width)) as i32,
                cy: rng.range_inclusive(0, i64::from(height)) as i32,
                radius: radius as u32,
                alpha: alpha as u8,
            }
        })
        .collect()
}

fn bubble_layer(
    width: u32,
    height: u32,
    bubbles: &[Bubble],
    accent: Rgba8,
    sigma: f32,
) -> PromoResult<Layer> {
    let mut layer = Layer::transparent(0, 0, width, height)?;
    let margin = GaussianKernel::new(sigma).map_or(0, |k| k.radius()) as i32 + 1;

    // Each bubble is rasterized and blurred in its own tile; the layer itself is mostly empty.
    for b in bubbles {
        let r = b.radius as i32;
        let side = ((r + margin) * 2) as u32;
        let circle = kurbo::Circle::new((f64::from(b.cx), f64::from(b.cy)), f64::from(b.radius));
        let mut tile = fill_shapes(
            b.cx - r - margin,
            b.cy - r - margin,
            side,
            side,
            &[ShapeFill::new(&circle, accent.with_alpha(b.alpha))],
        )?;
        tile.blur(sigma)?;
        layer.composite(&tile)?;
    }
    Ok(layer)
}

fn linear_gradient(width: u32, height: u32, top: Rgba8, bottom: Rgba8) -> PromoResult<Canvas> {
    let mut canvas = Canvas::filled(width, height, top)?;
    let row_bytes = width as usize * 4;
    for (y, row) in canvas.data_mut().chunks_exact_mut(row_bytes).enumerate() {
        let t = y as f32 / height as f32;
        let px = top.lerp(bottom, t).with_alpha(255).to_premul();
        for dst in row.chunks_exact_mut(4) {
            dst.copy_from_slice(&px);
        }
    }
    Ok(canvas)
}
