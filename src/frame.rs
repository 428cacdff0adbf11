use std::{borrow::Cow, path::Path};

use anyhow::Context as _;

use crate::{
    foundation::{
        color::Rgba8,
        error::{PromoError, PromoResult},
    },
    render::{
        canvas::{Canvas, Layer},
        composite::premultiply_rgba8_in_place,
        cpu::{ShapeFill, fill_shapes},
    },
};

/// Which width the scale factor applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameFit {
    /// `scale × canvas_width` is the width of the screenshot inside the bezel.
    ScreenWidth,
    /// `scale × canvas_width` is the outer width of the device, bezel included.
    DeviceWidth,
}

/// Device mockup geometry and colors.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameStyle {
    pub bezel: u32,
    pub corner_radius: f64,
    /// Diagonal shadow displacement (down and to the right for positive values).
    pub shadow_offset: i32,
    /// Blended with its alpha, so a translucent color gives a soft shadow. An opaque
    /// black reproduces the hard shadow of fills drawn straight onto an RGB image.
    pub shadow: Rgba8,
    pub body: Rgba8,
    pub fit: FrameFit,
    pub scale: f32,
    /// Distance from the end of the title to the top of the device.
    pub gap_below_title: i32,
}

/// Axis-aligned pixel rectangle in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    fn union(&self, other: &PixelRect) -> PixelRect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        PixelRect {
            x,
            y,
            width: (self.right().max(other.right()) - x) as u32,
            height: (self.bottom().max(other.bottom()) - y) as u32,
        }
    }

    fn intersect(&self, other: &PixelRect) -> Option<PixelRect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (right > x && bottom > y).then(|| PixelRect {
            x,
            y,
            width: (right - x) as u32,
            height: (bottom - y) as u32,
        })
    }
}

/// Where a device frame ended up on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedFrame {
    /// Outer edge of the device body.
    pub outer: PixelRect,
    /// Screenshot area inside the bezel.
    pub screen: PixelRect,
    pub shadow: PixelRect,
}

/// Size of the resized screenshot for a source of `src_w × src_h` on a canvas `canvas_w` wide.
///
/// The height follows the source aspect ratio and is truncated to whole pixels.
pub fn screen_size(
    src_w: u32,
    src_h: u32,
    canvas_w: u32,
    scale: f32,
    style: &FrameStyle,
) -> PromoResult<(u32, u32)> {
    if src_w == 0 || src_h == 0 {
        return Err(PromoError::validation("screenshot has zero size"));
    }
    if !scale.is_finite() || scale <= 0.0 {
        return Err(PromoError::validation("frame scale must be finite and > 0"));
    }

    let target = (f64::from(canvas_w) * f64::from(scale)).floor() as i64;
    let screen_w = match style.fit {
        FrameFit::ScreenWidth => target,
        FrameFit::DeviceWidth => target - 2 * i64::from(style.bezel),
    };
    if screen_w <= 0 {
        return Err(PromoError::validation(format!(
            "bezel {} leaves no room for the screen at scale {scale}",
            style.bezel
        )));
    }

    let screen_h = (screen_w as u64 * u64::from(src_h) / u64::from(src_w)).max(1);
    if screen_h > i32::MAX as u64 / 2 {
        return Err(PromoError::validation(format!(
            "screenshot {src_w}x{src_h} resizes past addressable canvas coordinates"
        )));
    }
    Ok((screen_w as u32, screen_h as u32))
}

/// Draw a device frame holding the screenshot at `path`, its top edge at `top`.
///
/// A missing file is not an error: a warning is logged and `Ok(None)` is returned so the asset
/// can still be written without a device. Decode failures propagate.
pub fn draw_device_frame(
    canvas: &mut Canvas,
    path: &Path,
    top: i32,
    scale: f32,
    style: &FrameStyle,
) -> PromoResult<Option<PlacedFrame>> {
    if !path.is_file() {
        tracing::warn!(path = %path.display(), "screenshot not found, skipping device frame");
        return Ok(None);
    }

    let screenshot = image::open(path)
        .with_context(|| format!("decode screenshot '{}'", path.display()))?
        .to_rgba8();
    composite_device_frame(canvas, &screenshot, top, scale, style).map(Some)
}

/// Same as [`draw_device_frame`] for an already decoded screenshot.
pub fn composite_device_frame(
    canvas: &mut Canvas,
    screenshot: &image::RgbaImage,
    top: i32,
    scale: f32,
    style: &FrameStyle,
) -> PromoResult<PlacedFrame> {
    let (src_w, src_h) = screenshot.dimensions();
    let (screen_w, screen_h) = screen_size(src_w, src_h, canvas.width(), scale, style)?;

    let bezel = style.bezel;
    let outer = PixelRect {
        x: (canvas.width() as i32 - (screen_w + 2 * bezel) as i32).div_euclid(2),
        y: top,
        width: screen_w + 2 * bezel,
        height: screen_h + 2 * bezel,
    };
    let shadow = PixelRect {
        x: outer.x + style.shadow_offset,
        y: outer.y + style.shadow_offset,
        ..outer
    };
    let screen = PixelRect {
        x: outer.x + bezel as i32,
        y: outer.y + bezel as i32,
        width: screen_w,
        height: screen_h,
    };

    let bounds = PixelRect {
        x: 0,
        y: 0,
        width: canvas.width(),
        height: canvas.height(),
    };
    if let Some(area) = outer.union(&shadow).intersect(&bounds) {
        let layer = fill_shapes(
            area.x,
            area.y,
            area.width,
            area.height,
            &[
                ShapeFill::new(&rounded(&shadow, style.corner_radius), style.shadow),
                ShapeFill::new(&rounded(&outer, style.corner_radius), style.body),
            ],
        )?;
        canvas.composite(&layer)?;
    }

    if let Some(visible) = screen.intersect(&bounds) {
        canvas.composite(&screen_layer(screenshot, &screen, &visible)?)?;
    }

    tracing::debug!(?outer, ?screen, "placed device frame");
    Ok(PlacedFrame {
        outer,
        screen,
        shadow,
    })
}

/// Resize only the source rows that land inside `visible`.
fn screen_layer(
    screenshot: &image::RgbaImage,
    screen: &PixelRect,
    visible: &PixelRect,
) -> PromoResult<Layer> {
    let (src_w, src_h) = screenshot.dimensions();
    let (src_h64, screen_h64) = (u64::from(src_h), u64::from(screen.height));
    let top = (visible.y - screen.y) as u64;
    let bottom = (visible.bottom() - screen.y) as u64;

    let src_top = top * src_h64 / screen_h64;
    let src_bottom = (bottom * src_h64).div_ceil(screen_h64).clamp(src_top + 1, src_h64);
    let dst_top = src_top * screen_h64 / src_h64;
    let dst_bottom = (src_bottom * screen_h64).div_ceil(src_h64).min(screen_h64);
    let rows = (dst_bottom - dst_top).max(1) as u32;

    let source = if src_top == 0 && src_bottom == src_h64 {
        Cow::Borrowed(screenshot)
    } else {
        Cow::Owned(
            image::imageops::crop_imm(
                screenshot,
                0,
                src_top as u32,
                src_w,
                (src_bottom - src_top) as u32,
            )
            .to_image(),
        )
    };
    let resized = image::imageops::resize(
        &*source,
        screen.width,
        rows,
        image::imageops::FilterType::Lanczos3,
    );
    let mut pixels = resized.into_raw();
    premultiply_rgba8_in_place(&mut pixels);
    Layer::from_parts(
        screen.x,
        screen.y + dst_top as i32,
        screen.width,
        rows,
        pixels,
    )
}

fn rounded(rect: &PixelRect, radius: f64) -> kurbo::RoundedRect {
    kurbo::RoundedRect::new(
        f64::from(rect.x),
        f64::from(rect.y),
        f64::from(rect.right()),
        f64::from(rect.bottom()),
        radius,
    )
}
