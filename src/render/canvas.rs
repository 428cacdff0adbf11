use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::{
        color::Rgba8,
        error::{PromoError, PromoResult},
    },
    render::{
        blur::{GaussianKernel, blur_in_place},
        composite::{self, Placement},
    },
};

/// Output pixel buffer for one asset, premultiplied RGBA8 in row-major order.
#[derive(Clone, Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Canvas filled with a single color.
    ///
    /// Both dimensions must be in `1..=u16::MAX` so the canvas can be rasterized with
    /// `vello_cpu`.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> PromoResult<Self> {
        check_dims(width, height)?;
        let data = color.to_premul().repeat(width as usize * height as usize);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw premultiplied bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Premultiplied pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Blend a layer onto the canvas at the layer's origin.
    pub fn composite(&mut self, layer: &Layer) -> PromoResult<()> {
        self.composite_with_opacity(layer, 1.0)
    }

    pub fn composite_with_opacity(&mut self, layer: &Layer, opacity: f32) -> PromoResult<()> {
        composite::over_at(
            &mut self.data,
            &layer.data,
            Placement {
                dst_width: self.width,
                dst_height: self.height,
                src_width: layer.width,
                src_height: layer.height,
                x: layer.x,
                y: layer.y,
            },
            opacity,
        )
    }

    /// Straight-alpha RGB copy of the canvas (alpha is dropped).
    pub fn to_rgb_image(&self) -> PromoResult<image::RgbImage> {
        let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for px in self.data.chunks_exact(4) {
            let [r, g, b, _] = composite::unpremultiply([px[0], px[1], px[2], px[3]]);
            rgb.extend_from_slice(&[r, g, b]);
        }
        image::RgbImage::from_raw(self.width, self.height, rgb)
            .ok_or_else(|| PromoError::render("rgb buffer does not match canvas size"))
    }

    /// Encode the canvas as PNG at `path`.
    pub fn save_png(&self, path: &Path) -> PromoResult<()> {
        let rgb = self.to_rgb_image()?;
        rgb.save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// Transient premultiplied RGBA8 buffer positioned in canvas coordinates.
///
/// A layer is drawn into once, blended onto a [`Canvas`] once, and dropped.
#[derive(Clone, Debug)]
pub struct Layer {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) data: Vec<u8>,
}

impl Layer {
    /// Fully transparent layer.
    pub fn transparent(x: i32, y: i32, width: u32, height: u32) -> PromoResult<Self> {
        check_dims(width, height)?;
        Ok(Self {
            x,
            y,
            width,
            height,
            data: vec![0u8; width as usize * height as usize * 4],
        })
    }

    pub(crate) fn from_parts(
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> PromoResult<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return Err(PromoError::render("layer byte length mismatch"));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
            data,
        })
    }

    pub fn origin(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Blend `other` onto this layer, both positioned in canvas coordinates.
    pub fn composite(&mut self, other: &Layer) -> PromoResult<()> {
        composite::over_at(
            &mut self.data,
            &other.data,
            Placement {
                dst_width: self.width,
                dst_height: self.height,
                src_width: other.width,
                src_height: other.height,
                x: other.x - self.x,
                y: other.y - self.y,
            },
            1.0,
        )
    }

    /// Gaussian-blur the layer contents in place.
    pub fn blur(&mut self, sigma: f32) -> PromoResult<()> {
        match GaussianKernel::new(sigma) {
            Some(kernel) => blur_in_place(&mut self.data, self.width, self.height, &kernel),
            None => Ok(()),
        }
    }
}

fn check_dims(width: u32, height: u32) -> PromoResult<()> {
    if width == 0 || height == 0 {
        return Err(PromoError::validation("canvas dimensions must be non-zero"));
    }
    if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
        return Err(PromoError::validation(format!(
            "canvas {width}x{height} exceeds {} px per side",
            u16::MAX
        )));
    }
    Ok(())
}
