use viewmorph_geometry::homography::perspective_from_4pt;
use viewmorph_image::{Image, ImageSize};
use viewmorph_imgproc::interpolation::InterpolationMode;
use viewmorph_imgproc::warp::warp_perspective;

use crate::error::MorphError;
use crate::framer::mat3_to_f32;

/// Warps the composite back into the source frame.
///
/// The exact perspective transform sending the four blended frame corners
/// onto the output frame corners undoes the framing pre-warp, so the result
/// has `out_size` regardless of the canvas the composite was painted on.
///
/// # Errors
///
/// Returns [`MorphError::DegenerateGeometry`] when the blended corners are
/// degenerate and no invertible transform exists.
pub fn postwarp<const C: usize>(
    composite: &Image<f32, C>,
    blended_corners: &[[f64; 2]; 4],
    frame_corners: &[[f64; 2]; 4],
    out_size: ImageSize,
) -> Result<Image<f32, C>, MorphError> {
    let h_s = perspective_from_4pt(blended_corners, frame_corners)?;

    let mut out = Image::from_size_val(out_size, 0.0f32)?;
    warp_perspective(
        composite,
        &mut out,
        &mat3_to_f32(&h_s),
        InterpolationMode::Bilinear,
    )?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postwarp_identity_corners() -> Result<(), MorphError> {
        let size = ImageSize {
            width: 8,
            height: 6,
        };
        let mut data = vec![0.0f32; 8 * 6];
        data[2 * 8 + 3] = 1.0;
        let composite = Image::<f32, 1>::new(size, data)?;

        let corners = [[0.0, 0.0], [8.0, 0.0], [0.0, 6.0], [8.0, 6.0]];
        let out = postwarp(&composite, &corners, &corners, size)?;
        assert_eq!(*out.get([2, 3, 0]).unwrap(), 1.0);
        Ok(())
    }

    #[test]
    fn postwarp_rejects_collapsed_corners() {
        let size = ImageSize {
            width: 8,
            height: 6,
        };
        let composite = Image::<f32, 1>::from_size_val(size, 0.0).unwrap();

        let collapsed = [[0.0, 0.0], [0.0, 0.0], [0.0, 6.0], [8.0, 6.0]];
        let frame = [[0.0, 0.0], [8.0, 0.0], [0.0, 6.0], [8.0, 6.0]];
        let result = postwarp(&composite, &collapsed, &frame, size);
        assert!(matches!(result, Err(MorphError::DegenerateGeometry(_))));
    }
}
