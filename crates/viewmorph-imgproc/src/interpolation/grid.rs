/// Create a pair of coordinate maps of shape (rows, cols) from a mapping
/// function from destination pixel coordinates to source coordinates.
///
/// # Arguments
///
/// * `cols` - The number of columns indicating the width of the grid
/// * `rows` - The number of rows indicating the height of the grid
/// * `f` - The mapping from destination (x, y) to source (x, y)
///
/// # Returns
///
/// Two row-major buffers of length `rows * cols` with the source x and y
/// coordinates for every destination pixel.
pub fn meshgrid_from_fn(
    cols: usize,
    rows: usize,
    f: impl Fn(usize, usize) -> (f32, f32),
) -> (Vec<f32>, Vec<f32>) {
    let mut map_x = Vec::with_capacity(rows * cols);
    let mut map_y = Vec::with_capacity(rows * cols);

    for r in 0..rows {
        for c in 0..cols {
            let (x, y) = f(c, r);
            map_x.push(x);
            map_y.push(y);
        }
    }

    (map_x, map_y)
}
