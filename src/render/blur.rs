use crate::foundation::error::{PromoError, PromoResult};

const Q16: u32 = 1 << 16;

/// Normalized Q16 Gaussian weights reaching three standard deviations to each side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GaussianKernel {
    weights: Vec<u32>,
}

impl GaussianKernel {
    /// `None` when `sigma` is not a positive finite number; such a blur is a no-op.
    pub fn new(sigma: f32) -> Option<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return None;
        }
        let radius = (sigma * 3.0).ceil() as usize;
        let two_var = 2.0 * f64::from(sigma).powi(2);
        let raw: Vec<f64> = (0..=2 * radius)
            .map(|i| {
                let x = i as f64 - radius as f64;
                (-x * x / two_var).exp()
            })
            .collect();
        let sum: f64 = raw.iter().sum();

        let mut weights: Vec<u32> = raw
            .iter()
            .map(|w| (w / sum * f64::from(Q16)).round() as u32)
            .collect();
        // Rounding residue goes to the center tap so the taps sum to exactly one.
        let total: i64 = weights.iter().map(|&w| i64::from(w)).sum();
        weights[radius] = (i64::from(weights[radius]) + i64::from(Q16) - total) as u32;
        Some(Self { weights })
    }

    /// Pixels reached on each side of the center.
    pub fn radius(&self) -> u32 {
        (self.weights.len() / 2) as u32
    }
}

/// Blur a premultiplied RGBA8 buffer in place, rows then columns, clamping at the edges.
pub fn blur_in_place(
    data: &mut [u8],
    width: u32,
    height: u32,
    kernel: &GaussianKernel,
) -> PromoResult<()> {
    let (w, h) = (width as usize, height as usize);
    if data.len() != w * h * 4 {
        return Err(PromoError::render(format!(
            "blur buffer of {} bytes does not match {width}x{height}",
            data.len()
        )));
    }
    if kernel.radius() == 0 || data.is_empty() {
        return Ok(());
    }

    let mut line = Vec::with_capacity(w.max(h) * 4);
    for y in 0..h {
        convolve_line(data, y * w, 1, w, &kernel.weights, &mut line);
    }
    for x in 0..w {
        convolve_line(data, x, w, h, &kernel.weights, &mut line);
    }
    Ok(())
}

/// Convolve the `len` pixels starting at pixel index `start`, `step` pixels apart.
fn convolve_line(
    data: &mut [u8],
    start: usize,
    step: usize,
    len: usize,
    weights: &[u32],
    line: &mut Vec<u8>,
) {
    line.clear();
    for i in 0..len {
        let at = (start + i * step) * 4;
        line.extend_from_slice(&data[at..at + 4]);
    }

    let radius = weights.len() / 2;
    for i in 0..len {
        let mut acc = [0u32; 4];
        for (k, &weight) in weights.iter().enumerate() {
            let j = (i + k).saturating_sub(radius).min(len - 1);
            for (a, &v) in acc.iter_mut().zip(&line[j * 4..j * 4 + 4]) {
                *a += weight * u32::from(v);
            }
        }
        let at = (start + i * step) * 4;
        for (dst, a) in data[at..at + 4].iter_mut().zip(acc) {
            *dst = ((a + Q16 / 2) >> 16).min(255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(data: &[u8], width: u32, x: u32, y: u32) -> u8 {
        data[((y * width + x) * 4 + 3) as usize]
    }

    #[test]
    fn kernel_reaches_three_sigma_and_sums_to_one() {
        let k = GaussianKernel::new(2.0).unwrap();
        assert_eq!(k.radius(), 6);
        assert_eq!(k.weights.iter().sum::<u32>(), Q16);
        let mirrored: Vec<u32> = k.weights.iter().rev().copied().collect();
        assert_eq!(mirrored, k.weights);
        assert!(k.weights[6] > k.weights[5]);
    }

    #[test]
    fn non_positive_sigma_has_no_kernel() {
        assert!(GaussianKernel::new(0.0).is_none());
        assert!(GaussianKernel::new(-1.0).is_none());
        assert!(GaussianKernel::new(f32::NAN).is_none());
    }

    #[test]
    fn bubble_tile_softens_its_rim_and_stays_inside_the_margin() {
        let kernel = GaussianKernel::new(2.0).unwrap();
        let (r, margin) = (10i32, kernel.radius() as i32 + 1);
        let side = ((r + margin) * 2) as u32;
        let c = r + margin;
        let mut tile = vec![0u8; (side * side * 4) as usize];
        for y in 0..side as i32 {
            for x in 0..side as i32 {
                if (x - c).pow(2) + (y - c).pow(2) <= r * r {
                    let at = ((y as u32 * side + x as u32) * 4) as usize;
                    tile[at..at + 4].copy_from_slice(&[6, 31, 34, 40]);
                }
            }
        }

        blur_in_place(&mut tile, side, side, &kernel).unwrap();

        let (cx, cy) = (c as u32, c as u32);
        assert_eq!(alpha_at(&tile, side, cx, cy), 40);
        assert!(alpha_at(&tile, side, cx + r as u32 - 1, cy) < 40);
        assert!(alpha_at(&tile, side, cx + r as u32 + 1, cy) > 0);
        assert_eq!(alpha_at(&tile, side, 0, 0), 0);
        assert_eq!(alpha_at(&tile, side, side - 1, side - 1), 0);
    }

    #[test]
    fn glow_edge_ramps_monotonically() {
        let (w, h) = (8u32, 40u32);
        let mut layer = vec![0u8; (w * h * 4) as usize];
        for px in layer[(w * 20 * 4) as usize..].chunks_exact_mut(4) {
            px.copy_from_slice(&[6, 31, 34, 40]);
        }

        blur_in_place(&mut layer, w, h, &GaussianKernel::new(3.0).unwrap()).unwrap();

        let column: Vec<u8> = (0..h).map(|y| alpha_at(&layer, w, 3, y)).collect();
        assert!(column.windows(2).all(|p| p[0] <= p[1]), "{column:?}");
        assert_eq!(column[0], 0);
        assert_eq!(column[h as usize - 1], 40);
        assert!(column[19] > 0 && column[20] < 40);
    }

    #[test]
    fn mismatched_length_is_rejected() {
        let kernel = GaussianKernel::new(1.0).unwrap();
        assert!(blur_in_place(&mut [0u8; 7], 1, 2, &kernel).is_err());
    }
}
