use viewmorph_geometry::homography::affine_from_3pt;
use viewmorph_geometry::Affine2;
use viewmorph_image::Image;
use viewmorph_imgproc::draw::fill_triangle;
use viewmorph_imgproc::interpolation::InterpolationMode;
use viewmorph_imgproc::parallel;
use viewmorph_imgproc::warp::warp_affine;

use crate::error::MorphError;

/// The composited blend and its coverage mask, both at canvas size.
#[derive(Clone, Debug)]
pub struct Composite<const C: usize> {
    /// The blended image, painted triangle by triangle.
    pub image: Image<f32, C>,
    /// 255 where exactly one triangle painted the pixel, 0 elsewhere.
    pub coverage: Image<u8, 1>,
}

/// Composites the two framed images into the blended landmark geometry,
/// one triangle at a time.
///
/// For each triangle of the shared triangulation the three vertex positions
/// are looked up in `pts_1`, `pts_2` and the blended set `pts_s`; an exact
/// affine transform sends each source triangle to the blended location, the
/// two warped images are mixed at `fraction`, and the triangle's pixels are
/// copied into the output wherever no earlier triangle claimed them. The
/// coverage mask makes painting exclusive, so overlapping rasterizations
/// never blend twice.
///
/// Triangles touching the synthetic frame corners (index `>= landmark_count`)
/// are background and skipped.
///
/// # Errors
///
/// Returns [`MorphError::CollinearTriangle`] when a triangle has zero area
/// in any of the three point sets.
pub fn composite<const C: usize>(
    image_1: &Image<f32, C>,
    image_2: &Image<f32, C>,
    pts_1: &[[f64; 3]],
    pts_2: &[[f64; 3]],
    pts_s: &[[f64; 3]],
    triangles: &[[usize; 3]],
    landmark_count: usize,
    fraction: f64,
) -> Result<Composite<C>, MorphError> {
    // the first image is already framed, so it fixes the canvas
    let canvas = image_1.size();
    let mut out = Image::from_size_val(canvas, 0.0f32)?;
    let mut coverage = Image::<u8, 1>::from_size_val(canvas, 0)?;

    // scratch buffers reused across triangles
    let mut warped_1 = Image::from_size_val(canvas, 0.0f32)?;
    let mut warped_2 = Image::from_size_val(canvas, 0.0f32)?;
    let mut blended = Image::<f32, C>::from_size_val(canvas, 0.0f32)?;
    let mut mask = Image::<u8, 1>::from_size_val(canvas, 0)?;

    let s = fraction as f32;
    let mut skipped = 0usize;

    for tri in triangles {
        if tri.iter().any(|&i| i >= landmark_count) {
            skipped += 1;
            continue;
        }

        let t_1 = triangle_xy(pts_1, tri);
        let t_2 = triangle_xy(pts_2, tri);
        let t_s = triangle_xy(pts_s, tri);

        let s_1 = affine_to_f32(&affine_from_3pt(&t_1, &t_s)?);
        let s_2 = affine_to_f32(&affine_from_3pt(&t_2, &t_s)?);

        warped_1.as_slice_mut().fill(0.0);
        warped_2.as_slice_mut().fill(0.0);
        warp_affine(image_1, &mut warped_1, &s_1, InterpolationMode::Bilinear);
        warp_affine(image_2, &mut warped_2, &s_2, InterpolationMode::Bilinear);

        parallel::par_iter_rows_val_two(&warped_1, &warped_2, &mut blended, |&p_1, &p_2, dst| {
            *dst = s * p_1 + (1.0 - s) * p_2;
        });

        mask.as_slice_mut().fill(0);
        let vertices = [
            [t_s[0][0] as f32, t_s[0][1] as f32],
            [t_s[1][0] as f32, t_s[1][1] as f32],
            [t_s[2][0] as f32, t_s[2][1] as f32],
        ];
        fill_triangle(&mut mask, &vertices, [255]);

        // claim each masked pixel exactly once
        let blended_slice = blended.as_slice();
        let out_slice = out.as_slice_mut();
        for (p, (&m, painted)) in mask
            .as_slice()
            .iter()
            .zip(coverage.as_slice_mut().iter_mut())
            .enumerate()
        {
            if m != 0 && *painted == 0 {
                *painted = 255;
                out_slice[p * C..(p + 1) * C].copy_from_slice(&blended_slice[p * C..(p + 1) * C]);
            }
        }
    }

    if skipped > 0 {
        log::debug!("skipped {skipped} background triangles touching the frame corners");
    }

    Ok(Composite {
        image: out,
        coverage,
    })
}

fn triangle_xy(pts: &[[f64; 3]], tri: &[usize; 3]) -> [[f64; 2]; 3] {
    [
        [pts[tri[0]][0], pts[tri[0]][1]],
        [pts[tri[1]][0], pts[tri[1]][1]],
        [pts[tri[2]][0], pts[tri[2]][1]],
    ]
}

fn affine_to_f32(m: &Affine2) -> [f32; 6] {
    [
        m[0][0] as f32,
        m[0][1] as f32,
        m[0][2] as f32,
        m[1][0] as f32,
        m[1][1] as f32,
        m[1][2] as f32,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewmorph_image::ImageSize;

    fn constant_image(size: ImageSize, val: f32) -> Image<f32, 1> {
        Image::from_size_val(size, val).unwrap()
    }

    fn gradient_image(size: ImageSize) -> Image<f32, 1> {
        let data = (0..size.width * size.height)
            .map(|i| (i % size.width) as f32 / size.width as f32)
            .collect();
        Image::new(size, data).unwrap()
    }

    #[test]
    fn composite_blends_constant_images() -> Result<(), MorphError> {
        let size = ImageSize {
            width: 20,
            height: 20,
        };
        let image_1 = constant_image(size, 1.0);
        let image_2 = constant_image(size, 0.0);

        let pts: Vec<[f64; 3]> = vec![
            [2.0, 2.0, 1.0],
            [17.0, 2.0, 1.0],
            [17.0, 17.0, 1.0],
            [2.0, 17.0, 1.0],
        ];
        let triangles = [[0, 1, 2], [0, 2, 3]];

        let result = composite(
            &image_1, &image_2, &pts, &pts, &pts, &triangles, 4, 0.25,
        )?;

        // interior pixels hold the 0.25 mix of the two constants
        let center = *result.image.get([10, 10, 0]).unwrap();
        assert!((center - 0.25).abs() < 1e-5, "center = {center}");
        assert_eq!(*result.coverage.get([10, 10, 0]).unwrap(), 255);

        // outside the landmark hull nothing is painted
        assert_eq!(*result.coverage.get([0, 0, 0]).unwrap(), 0);
        assert_eq!(*result.image.get([0, 0, 0]).unwrap(), 0.0);
        Ok(())
    }

    #[test]
    fn composite_first_claim_wins_on_overlap() -> Result<(), MorphError> {
        let size = ImageSize {
            width: 20,
            height: 20,
        };
        let image = gradient_image(size);

        // both triangles rasterize onto the same destination region, but the
        // second one samples the source two pixels to the right
        let pts_1: Vec<[f64; 3]> = vec![
            [2.0, 2.0, 1.0],
            [17.0, 2.0, 1.0],
            [2.0, 17.0, 1.0],
            [4.0, 2.0, 1.0],
            [19.0, 2.0, 1.0],
            [4.0, 17.0, 1.0],
        ];
        let pts_s: Vec<[f64; 3]> = vec![
            [2.0, 2.0, 1.0],
            [17.0, 2.0, 1.0],
            [2.0, 17.0, 1.0],
            [2.0, 2.0, 1.0],
            [17.0, 2.0, 1.0],
            [2.0, 17.0, 1.0],
        ];
        let triangles = [[0, 1, 2], [3, 4, 5]];

        let result = composite(&image, &image, &pts_1, &pts_1, &pts_s, &triangles, 6, 1.0)?;

        // the first triangle maps identity, so the pixel keeps its own
        // gradient value; the shifted second triangle must not overwrite it
        let got = *result.image.get([5, 5, 0]).unwrap();
        assert!((got - 0.25).abs() < 1e-5, "got = {got}");
        assert_eq!(*result.coverage.get([5, 5, 0]).unwrap(), 255);
        Ok(())
    }

    #[test]
    fn composite_skips_frame_corner_triangles() -> Result<(), MorphError> {
        let size = ImageSize {
            width: 10,
            height: 10,
        };
        let image = constant_image(size, 1.0);
        let pts: Vec<[f64; 3]> = vec![
            [2.0, 2.0, 1.0],
            [8.0, 2.0, 1.0],
            [5.0, 8.0, 1.0],
            [0.0, 0.0, 1.0], // frame corner
        ];
        // only the second triangle is facial; the first touches index 3
        let triangles = [[0, 1, 3], [0, 1, 2]];

        let result = composite(&image, &image, &pts, &pts, &pts, &triangles, 3, 0.5)?;
        assert_eq!(*result.coverage.get([4, 5, 0]).unwrap(), 255);
        assert_eq!(*result.coverage.get([0, 0, 0]).unwrap(), 0);
        Ok(())
    }

    #[test]
    fn composite_rejects_zero_area_triangle() {
        let size = ImageSize {
            width: 10,
            height: 10,
        };
        let image = constant_image(size, 1.0);
        let pts: Vec<[f64; 3]> = vec![
            [1.0, 1.0, 1.0],
            [5.0, 5.0, 1.0],
            [9.0, 9.0, 1.0], // collinear with the other two
        ];
        let triangles = [[0, 1, 2]];

        let result = composite(&image, &image, &pts, &pts, &pts, &triangles, 3, 0.5);
        assert!(matches!(result, Err(MorphError::CollinearTriangle)));
    }
}
