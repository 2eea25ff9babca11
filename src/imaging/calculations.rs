//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Fit `(width, height)` inside a square of side `max_side`, preserving aspect ratio.
///
/// Images that already fit are returned unchanged: this never upscales.
/// Otherwise the longer side becomes exactly `max_side` and the shorter side
/// is scaled and truncated, but never below one pixel.
///
/// # Examples
/// ```
/// # use img_optimize::imaging::fit_within;
/// // 2000x1000 landscape → 900x450
/// assert_eq!(fit_within((2000, 1000), 900), (900, 450));
///
/// // Already small enough → untouched
/// assert_eq!(fit_within((640, 480), 900), (640, 480));
/// ```
pub fn fit_within(size: (u32, u32), max_side: u32) -> (u32, u32) {
    let (w, h) = size;

    if w <= max_side && h <= max_side {
        return (w, h);
    }

    if w >= h {
        // Landscape or square: width is the long side
        let new_h = (h as u64 * max_side as u64 / w as u64) as u32;
        (max_side, new_h.max(1))
    } else {
        // Portrait: height is the long side
        let new_w = (w as u64 * max_side as u64 / h as u64) as u32;
        (new_w.max(1), max_side)
    }
}
