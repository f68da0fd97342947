use crate::linalg::signed_area2;
use crate::GeometryError;

/// Computes the Delaunay triangulation of a planar point set with the
/// Bowyer–Watson incremental algorithm.
///
/// The result is deterministic for a given input order: points are inserted
/// in order, the in-circumcircle predicate is strict (cocircular points do
/// not retriangulate), and the returned index triples are sorted.
///
/// The index triples are meant to be reused against other point sets of the
/// same length and ordering, so they always refer to positions in `points`.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateTriangulation`] for fewer than 3
/// points, exactly coincident points, or an all-collinear input.
pub fn delaunay(points: &[[f64; 2]]) -> Result<Vec<[usize; 3]>, GeometryError> {
    let n = points.len();
    if n < 3 {
        return Err(GeometryError::DegenerateTriangulation(
            "need at least 3 points",
        ));
    }
    for i in 0..n {
        for j in (i + 1)..n {
            if points[i] == points[j] {
                return Err(GeometryError::DegenerateTriangulation(
                    "coincident input points",
                ));
            }
        }
    }

    // super-triangle generously enclosing the input
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p[0]);
        max_x = max_x.max(p[0]);
        min_y = min_y.min(p[1]);
        max_y = max_y.max(p[1]);
    }
    let d = (max_x - min_x).max(max_y - min_y).max(1.0);
    let cx = (min_x + max_x) / 2.0;
    let cy = (min_y + max_y) / 2.0;

    let mut verts: Vec<[f64; 2]> = points.to_vec();
    verts.push([cx - 20.0 * d, cy - d]);
    verts.push([cx, cy + 20.0 * d]);
    verts.push([cx + 20.0 * d, cy - d]);

    let mut triangles: Vec<[usize; 3]> = vec![[n, n + 1, n + 2]];

    for i in 0..n {
        let p = verts[i];

        // triangles whose circumcircle strictly contains the new point
        let mut bad: Vec<usize> = Vec::new();
        for (ti, t) in triangles.iter().enumerate() {
            if in_circumcircle(verts[t[0]], verts[t[1]], verts[t[2]], p) {
                bad.push(ti);
            }
        }

        // the cavity boundary: edges belonging to exactly one bad triangle
        let mut boundary: Vec<(usize, usize)> = Vec::new();
        for &ti in &bad {
            let t = triangles[ti];
            for (a, b) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
                let key = (a.min(b), a.max(b));
                if let Some(pos) = boundary.iter().position(|&k| k == key) {
                    boundary.swap_remove(pos);
                } else {
                    boundary.push(key);
                }
            }
        }

        for &ti in bad.iter().rev() {
            triangles.swap_remove(ti);
        }
        for &(a, b) in &boundary {
            triangles.push([a, b, i]);
        }
    }

    // drop triangles touching the super-triangle and canonicalize the output
    let mut result: Vec<[usize; 3]> = triangles
        .into_iter()
        .filter(|t| t.iter().all(|&v| v < n))
        .map(|mut t| {
            t.sort_unstable();
            t
        })
        .collect();
    result.sort_unstable();

    if result.is_empty() {
        return Err(GeometryError::DegenerateTriangulation(
            "collinear point set",
        ));
    }

    Ok(result)
}

/// Strict in-circumcircle predicate, orientation-normalized.
fn in_circumcircle(a: [f64; 2], b: [f64; 2], c: [f64; 2], p: [f64; 2]) -> bool {
    let (b, c) = if signed_area2(a, b, c) < 0.0 {
        (c, b)
    } else {
        (b, c)
    };

    let (ax, ay) = (a[0] - p[0], a[1] - p[1]);
    let (bx, by) = (b[0] - p[0], b[1] - p[1]);
    let (cx, cy) = (c[0] - p[0], c[1] - p[1]);
    let aw = ax * ax + ay * ay;
    let bw = bx * bx + by * by;
    let cw = cx * cx + cy * cy;

    let det = ax * (by * cw - bw * cy) - ay * (bx * cw - bw * cx) + aw * (bx * cy - by * cx);
    det > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delaunay_square() -> Result<(), GeometryError> {
        let points = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let tris = delaunay(&points)?;
        assert_eq!(tris.len(), 2);

        // every point participates and all indices are valid
        let mut seen = [false; 4];
        for t in &tris {
            for &v in t {
                assert!(v < points.len());
                seen[v] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
        Ok(())
    }

    #[test]
    fn delaunay_square_with_center() -> Result<(), GeometryError> {
        let points = [
            [0.0, 0.0],
            [1.0, 0.0],
            [0.0, 1.0],
            [1.0, 1.0],
            [0.5, 0.5],
        ];
        let tris = delaunay(&points)?;
        assert_eq!(tris.len(), 4);

        // the center belongs to every triangle
        for t in &tris {
            assert!(t.contains(&4));
        }
        Ok(())
    }

    #[test]
    fn delaunay_triangles_have_positive_area() -> Result<(), GeometryError> {
        let points = [
            [12.0, 7.0],
            [80.0, 15.0],
            [45.0, 60.0],
            [20.0, 90.0],
            [95.0, 85.0],
            [60.0, 30.0],
        ];
        let tris = delaunay(&points)?;
        for t in &tris {
            let area = signed_area2(points[t[0]], points[t[1]], points[t[2]]);
            assert!(area.abs() > 0.0);
        }
        Ok(())
    }

    #[test]
    fn delaunay_is_deterministic() -> Result<(), GeometryError> {
        let points = [
            [3.0, 1.0],
            [7.0, 2.0],
            [5.0, 8.0],
            [1.0, 6.0],
            [9.0, 7.0],
        ];
        assert_eq!(delaunay(&points)?, delaunay(&points)?);
        Ok(())
    }

    #[test]
    fn delaunay_rejects_duplicates() {
        let points = [[0.0, 0.0], [1.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        assert!(matches!(
            delaunay(&points),
            Err(GeometryError::DegenerateTriangulation(_))
        ));
    }

    #[test]
    fn delaunay_rejects_collinear() {
        let points = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        assert!(matches!(
            delaunay(&points),
            Err(GeometryError::DegenerateTriangulation(_))
        ));
    }

    #[test]
    fn delaunay_rejects_too_few() {
        let points = [[0.0, 0.0], [1.0, 0.0]];
        assert!(matches!(
            delaunay(&points),
            Err(GeometryError::DegenerateTriangulation(_))
        ));
    }
}
