use viewmorph_image::Image;

/// Boundary slack for the edge-function inclusion test. Pixels exactly on a
/// shared edge must test inside for both neighboring triangles so that the
/// union of adjacent triangles has no gaps; the caller's coverage mask keeps
/// them from being painted twice.
const EDGE_EPS: f32 = 1e-3;

#[inline]
fn edge_function(a: [f32; 2], b: [f32; 2], x: f32, y: f32) -> f32 {
    (b[0] - a[0]) * (y - a[1]) - (b[1] - a[1]) * (x - a[0])
}

/// Fills a triangle on a single-channel image inplace.
///
/// Pixels are sampled at integer coordinates, matching the warp kernels.
/// Boundary pixels are included. A degenerate (zero-area) triangle fills
/// nothing.
///
/// # Arguments
///
/// * `img` - The mask image to draw on.
/// * `vertices` - The triangle vertices as (x, y) pairs.
/// * `value` - The value to write inside the triangle.
pub fn fill_triangle<const C: usize>(
    img: &mut Image<u8, C>,
    vertices: &[[f32; 2]; 3],
    value: [u8; C],
) {
    let [a, b, c] = *vertices;

    // twice the signed area; orients the three edge functions
    let area = edge_function(a, b, c[0], c[1]);
    if area == 0.0 {
        return;
    }
    let sign = area.signum();

    let (cols, rows) = (img.cols(), img.rows());

    let x_min = a[0].min(b[0]).min(c[0]).floor().max(0.0) as usize;
    let y_min = a[1].min(b[1]).min(c[1]).floor().max(0.0) as usize;
    let x_max = (a[0].max(b[0]).max(c[0]).ceil() as usize).min(cols.saturating_sub(1));
    let y_max = (a[1].max(b[1]).max(c[1]).ceil() as usize).min(rows.saturating_sub(1));

    let data = img.as_slice_mut();
    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let (xf, yf) = (x as f32, y as f32);
            let e0 = sign * edge_function(a, b, xf, yf);
            let e1 = sign * edge_function(b, c, xf, yf);
            let e2 = sign * edge_function(c, a, xf, yf);
            if e0 >= -EDGE_EPS && e1 >= -EDGE_EPS && e2 >= -EDGE_EPS {
                let base = (y * cols + x) * C;
                data[base..base + C].copy_from_slice(&value);
            }
        }
    }
}
