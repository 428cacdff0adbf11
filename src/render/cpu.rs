use crate::{
    foundation::{
        color::Rgba8,
        error::{PromoError, PromoResult},
    },
    render::canvas::Layer,
};

/// A closed path filled with a solid color.
#[derive(Clone, Debug)]
pub struct ShapeFill {
    pub path: kurbo::BezPath,
    pub color: Rgba8,
}

impl ShapeFill {
    pub fn new(shape: &impl kurbo::Shape, color: Rgba8) -> Self {
        Self {
            path: shape.to_path(0.1),
            color,
        }
    }
}

/// Rasterize `shapes` in painter's order into a layer covering
/// `(x, y, width, height)` in canvas coordinates.
pub fn fill_shapes(
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    shapes: &[ShapeFill],
) -> PromoResult<Layer> {
    render_layer(x, y, width, height, |ctx| {
        for shape in shapes {
            ctx.set_paint(shape.color.to_cpu());
            ctx.fill_path(&bezpath_to_cpu(&shape.path));
        }
    })
}

/// Run `draw` against a fresh transparent `vello_cpu` context whose user space is canvas
/// coordinates, and read the result back as a [`Layer`].
pub(crate) fn render_layer(
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) -> PromoResult<Layer> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PromoError::render("layer width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PromoError::render("layer height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(PromoError::render("layer must be non-empty"));
    }

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(layer_origin(x, y));
    draw(&mut ctx);
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Layer::from_parts(x, y, width, height, pixmap.data_as_u8_slice().to_vec())
}

/// Transform from canvas coordinates into a layer whose top-left sits at `(x, y)`.
pub(crate) fn layer_origin(x: i32, y: i32) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::translate((-f64::from(x), -f64::from(y)))
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
