//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Largest size with the source's aspect ratio that fits inside `bound`.
///
/// Never upscales: a source already inside the box keeps its size. Each side
/// is at least one pixel.
///
/// # Examples
/// ```
/// # use cam_site::imaging::calculate_fit_dimensions;
/// // 4:3 landscape into 256x256 → 256x192
/// assert_eq!(calculate_fit_dimensions((2560, 1920), (256, 256)), (256, 192));
///
/// // Already small enough → unchanged
/// assert_eq!(calculate_fit_dimensions((100, 80), (256, 256)), (100, 80));
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), bound: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bound;

    if src_w <= max_w && src_h <= max_h {
        return (src_w, src_h);
    }

    let scale = (max_w as f64 / src_w as f64).min(max_h as f64 / src_h as f64);
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, max_w);
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, max_h);
    (w, h)
}

/// Size of a generated video tile: 16:9, as large as the bounding box allows.
pub fn calculate_placeholder_dimensions(bound: (u32, u32)) -> (u32, u32) {
    let (max_w, max_h) = bound;
    let h = (max_w as f64 * 9.0 / 16.0).round() as u32;
    if h <= max_h {
        (max_w, h.max(1))
    } else {
        let w = (max_h as f64 * 16.0 / 9.0).round() as u32;
        (w.clamp(1, max_w), max_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // calculate_fit_dimensions tests
    // =========================================================================

    #[test]
    fn fit_landscape_into_square() {
        assert_eq!(calculate_fit_dimensions((2560, 1440), (256, 256)), (256, 144));
    }

    #[test]
    fn fit_portrait_into_square() {
        assert_eq!(calculate_fit_dimensions((1080, 1920), (256, 256)), (144, 256));
    }

    #[test]
    fn fit_square_source() {
        assert_eq!(calculate_fit_dimensions((1000, 1000), (256, 256)), (256, 256));
    }

    #[test]
    fn fit_into_wide_box() {
        // Height is the binding constraint
        assert_eq!(calculate_fit_dimensions((1600, 1200), (400, 150)), (200, 150));
    }

    #[test]
    fn fit_never_upscales() {
        assert_eq!(calculate_fit_dimensions((120, 90), (256, 256)), (120, 90));
        assert_eq!(calculate_fit_dimensions((256, 10), (256, 256)), (256, 10));
    }

    #[test]
    fn fit_keeps_at_least_one_pixel() {
        assert_eq!(calculate_fit_dimensions((10000, 1), (256, 256)), (256, 1));
    }

    #[test]
    fn fit_result_stays_inside_bound() {
        for src in [(3000, 2000), (2000, 3000), (1234, 567), (7, 9001)] {
            let (w, h) = calculate_fit_dimensions(src, (256, 200));
            assert!(w <= 256 && h <= 200, "{src:?} → {w}x{h}");
        }
    }

    // =========================================================================
    // calculate_placeholder_dimensions tests
    // =========================================================================

    #[test]
    fn placeholder_in_square_box() {
        assert_eq!(calculate_placeholder_dimensions((256, 256)), (256, 144));
    }

    #[test]
    fn placeholder_in_flat_box() {
        assert_eq!(calculate_placeholder_dimensions((400, 90)), (160, 90));
    }
}
