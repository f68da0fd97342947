use viewmorph_image::Image;

use crate::interpolation::{grid::meshgrid_from_fn, interpolate_pixel, InterpolationMode};
use crate::parallel;

/// Inverts a 2x3 affine transformation matrix.
///
/// A singular matrix inverts to the zero matrix, which maps every
/// destination pixel outside the source bounds.
///
/// # Arguments
///
/// * `m` - The 2x3 affine transformation matrix, row-major.
///
/// # Returns
///
/// The inverted 2x3 affine transformation matrix.
pub fn invert_affine_transform(m: &[f32; 6]) -> [f32; 6] {
    let (a, b, c, d, e, f) = (m[0], m[1], m[2], m[3], m[4], m[5]);

    let determinant = a * e - b * d;
    let inv_determinant = if determinant != 0.0 {
        1.0 / determinant
    } else {
        0.0
    };

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    [new_a, new_b, new_c, new_d, new_e, new_f]
}

/// Applies an affine transformation to a point.
fn transform_point(x: f32, y: f32, m: &[f32; 6]) -> (f32, f32) {
    let u = m[0] * x + m[1] * y + m[2];
    let v = m[3] * x + m[4] * y + m[5];
    (u, v)
}

/// Applies an affine transformation to an image.
///
/// # Arguments
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image with shape (height, width, channels).
/// * `m` - The 2x3 affine transformation matrix src -> dst, row-major.
/// * `interpolation` - The interpolation mode to use.
///
/// Destination pixels mapping outside the source keep their current
/// (background) value.
pub fn warp_affine<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    m: &[f32; 6],
    interpolation: InterpolationMode,
) {
    // invert the affine transform to find corresponding positions in src from dst
    let m_inv = invert_affine_transform(m);

    let (dst_rows, dst_cols) = (dst.rows(), dst.cols());
    let (map_x, map_y) = meshgrid_from_fn(dst_cols, dst_rows, |x, y| {
        transform_point(x as f32, y as f32, &m_inv)
    });

    parallel::par_iter_rows_resample(dst, &map_x, &map_y, |&x, &y, dst_pixel| {
        if x >= 0.0f32 && x < src.cols() as f32 && y >= 0.0f32 && y < src.rows() as f32 {
            dst_pixel
                .iter_mut()
                .enumerate()
                .for_each(|(k, pixel)| *pixel = interpolate_pixel(src, x, y, k, interpolation));
        }
    });
}

#[cfg(test)]
mod tests {
    use viewmorph_image::{Image, ImageError, ImageSize};

    #[test]
    fn invert_affine_identity() {
        let m = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        assert_eq!(super::invert_affine_transform(&m), m);
    }

    #[test]
    fn invert_affine_translation() {
        let m = [1.0, 0.0, 2.0, 0.0, 1.0, -3.0];
        let expected = [1.0, 0.0, -2.0, 0.0, 1.0, 3.0];
        assert_eq!(super::invert_affine_transform(&m), expected);
    }

    #[test]
    fn warp_affine_identity() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            (0..20).map(|x| x as f32).collect(),
        )?;

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0.0)?;

        super::warp_affine(
            &image,
            &mut image_transformed,
            &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            super::InterpolationMode::Nearest,
        );

        assert_eq!(image_transformed.as_slice(), image.as_slice());
        assert_eq!(image_transformed.size(), image.size());

        Ok(())
    }

    #[test]
    fn warp_affine_shift() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0.0f32, 1.0, 2.0, 3.0],
        )?;

        // shift right by one pixel
        let m = [1.0, 0.0, 1.0, 0.0, 1.0, 0.0];

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0.0)?;

        super::warp_affine(
            &image,
            &mut image_transformed,
            &m,
            super::InterpolationMode::Nearest,
        );

        assert_eq!(image_transformed.as_slice(), &[0.0, 0.0, 0.0, 2.0]);

        Ok(())
    }

    #[test]
    fn warp_affine_smoke_ch3() -> Result<(), ImageError> {
        let image = Image::<_, 3>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            vec![0f32; 4 * 5 * 3],
        )?;

        let new_size = ImageSize {
            width: 2,
            height: 3,
        };

        let mut image_transformed = Image::<_, 3>::from_size_val(new_size, 0.0)?;

        super::warp_affine(
            &image,
            &mut image_transformed,
            &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            super::InterpolationMode::Bilinear,
        );

        assert_eq!(image_transformed.num_channels(), 3);
        assert_eq!(image_transformed.size().width, 2);
        assert_eq!(image_transformed.size().height, 3);

        Ok(())
    }
}
