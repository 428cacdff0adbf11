use crate::foundation::error::{PromoError, PromoResult};

pub type PremulRgba8 = [u8; 4];

/// Source-over for one premultiplied pixel, with an extra global `opacity`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> PromoResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(PromoError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Placement of a smaller buffer inside a larger one.
#[derive(Clone, Copy, Debug)]
pub struct Placement {
    pub dst_width: u32,
    pub dst_height: u32,
    pub src_width: u32,
    pub src_height: u32,
    pub x: i32,
    pub y: i32,
}

/// Source-over of `src` onto `dst` at `(x, y)`, clipping whatever falls outside `dst`.
pub fn over_at(dst: &mut [u8], src: &[u8], at: Placement, opacity: f32) -> PromoResult<()> {
    let dst_len = at.dst_width as usize * at.dst_height as usize * 4;
    let src_len = at.src_width as usize * at.src_height as usize * 4;
    if dst.len() != dst_len || src.len() != src_len {
        return Err(PromoError::render(
            "over_at buffer lengths do not match their dimensions",
        ));
    }

    let x0 = i64::from(at.x).max(0);
    let y0 = i64::from(at.y).max(0);
    let x1 = (i64::from(at.x) + i64::from(at.src_width)).min(i64::from(at.dst_width));
    let y1 = (i64::from(at.y) + i64::from(at.src_height)).min(i64::from(at.dst_height));
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let row_px = (x1 - x0) as usize;
    for dy in y0..y1 {
        let sy = (dy - i64::from(at.y)) as usize;
        let sx = (x0 - i64::from(at.x)) as usize;
        let s_start = (sy * at.src_width as usize + sx) * 4;
        let d_start = (dy as usize * at.dst_width as usize + x0 as usize) * 4;
        over_in_place(
            &mut dst[d_start..d_start + row_px * 4],
            &src[s_start..s_start + row_px * 4],
            opacity,
        )?;
    }
    Ok(())
}

pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub fn unpremultiply(px: PremulRgba8) -> PremulRgba8 {
    let a = u32::from(px[3]);
    match a {
        0 => [0, 0, 0, 0],
        255 => px,
        _ => {
            let un = |c: u8| -> u8 { ((u32::from(c) * 255 + a / 2) / a).min(255) as u8 };
            [un(px[0]), un(px[1]), un(px[2]), px[3]]
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}
