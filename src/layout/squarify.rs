//! Squarified treemap layout (Bruls, Huizing, van Wijk).
//!
//! Partitions a rectangle into sub-rectangles whose areas are proportional to
//! a list of weights, greedily grouping weights into alternating rows and
//! columns so every rectangle stays as close to square as practical.
//!
//! The math runs in "value space": a rectangle with the container's aspect
//! ratio in which a weight sum maps directly to area. A single scalar
//! converts value-space coordinates to container units at the moment a
//! rectangle is emitted.

use super::LayoutError;

/// A positioned rectangle, in the same units as the container.
///
/// Doubles as the container argument: a top-level call passes
/// [`Rect::sized`], a nested call passes a rectangle from the parent call and
/// gets output offset by that rectangle's `top`/`left`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Container at the origin, for a top-level layout call.
    pub const fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Tuning parameters for a layout call.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Total value the container area represents. Defaults to the sum of the
    /// weights; a larger total leaves part of the container empty, which the
    /// surrounding app uses for placeholder weights while feeds load.
    pub total_value: Option<f64>,
    /// Multiplier on the cross-axis breadth used when scoring a vertical row.
    /// Values above 1 nudge the greedy split toward wider rectangles. Affects
    /// only row grouping, never the emitted geometry. 1.0 is neutral.
    pub horizontal_bias: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            total_value: None,
            horizontal_bias: 1.0,
        }
    }
}

/// Direction of the row currently being filled. `Horizontal` rows span the
/// container width and stack downward; `Vertical` rows are full-height
/// columns advancing rightward. Alternates after every finalized row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    fn flip(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// A weight together with its position in the caller's sequence, so output
/// rectangles land at the original index after the internal sort.
#[derive(Debug, Clone, Copy)]
struct Entry {
    index: usize,
    value: f64,
}

/// Working state threaded through row finalization: the remaining value-space
/// extent, the cursor, and the orientation of the row being filled.
#[derive(Debug, Clone, Copy)]
struct LayoutState {
    value_width: f64,
    value_height: f64,
    x: f64,
    y: f64,
    orientation: Orientation,
}

/// Compute a squarified treemap layout.
///
/// Returns one rectangle per weight, at the same index. Weights are sorted
/// descending internally (stable, tracking indices), so the aspect-ratio
/// bound's largest-first assumption always holds; pre-sorted input lays out
/// unchanged. The call is pure: no state survives it, and identical arguments
/// produce identical output.
pub fn layout_treemap(
    weights: &[f64],
    container: Rect,
    options: &LayoutOptions,
) -> Result<Vec<Rect>, LayoutError> {
    validate(weights, &container)?;
    if weights.is_empty() {
        return Ok(Vec::new());
    }

    let sum: f64 = weights.iter().sum();
    let total = options.total_value.unwrap_or(sum);
    if !total.is_finite() || total <= 0.0 {
        return Err(LayoutError::InvalidTotal(total));
    }

    // Largest weight first within each greedy row.
    let mut order: Vec<Entry> = weights
        .iter()
        .enumerate()
        .map(|(index, &value)| Entry { index, value })
        .collect();
    order.sort_by(|a, b| b.value.total_cmp(&a.value));

    // Value space: same aspect ratio as the container, area == total.
    let ratio = container.height / container.width;
    let value_width = (total / ratio).sqrt();
    let value_height = value_width * ratio;
    let scale = container.width / value_width;

    let mut state = LayoutState {
        value_width,
        value_height,
        x: 0.0,
        y: 0.0,
        // Rows first span whatever dimension currently has less room.
        orientation: if container.width < container.height {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        },
    };

    let mut rects = vec![Rect::default(); weights.len()];
    let mut row: Vec<Entry> = Vec::new();
    let mut row_count = 0usize;

    for (pos, entry) in order.iter().enumerate() {
        let breadth = match state.orientation {
            Orientation::Horizontal => state.value_width,
            Orientation::Vertical => state.value_height * options.horizontal_bias,
        };

        let row_value: f64 = row.iter().map(|e| e.value).sum();
        let worst_with = worst_aspect_ratio(
            row.first().map_or(entry.value, |e| e.value),
            entry.value,
            row_value + entry.value,
            breadth,
        );

        let baseline = if pos == order.len() - 1 {
            // Final weight: compare against placing it alone in the fresh row
            // that would open once the current row is finalized. Without this
            // the last item can end up as a badly distorted sliver.
            let remaining = match state.orientation {
                Orientation::Horizontal => state.value_height - row_value / state.value_width,
                Orientation::Vertical => state.value_width - row_value / state.value_height,
            };
            worst_aspect_ratio(entry.value, entry.value, entry.value, remaining)
        } else {
            worst_row(&row, breadth)
        };

        // NaN comparisons are false, so degenerate zero-weight rows always
        // keep absorbing entries rather than splitting.
        if worst_with > baseline {
            state = finalize_row(state, &row, scale, &container, &mut rects);
            row.clear();
            row_count += 1;
        }
        row.push(*entry);
    }

    if !row.is_empty() {
        finalize_row(state, &row, scale, &container, &mut rects);
        row_count += 1;
    }

    tracing::trace!(
        "squarified {} weights into {} rows in {:.0}x{:.0}",
        weights.len(),
        row_count,
        container.width,
        container.height
    );

    Ok(rects)
}

fn validate(weights: &[f64], container: &Rect) -> Result<(), LayoutError> {
    let valid_dim = |d: f64| d.is_finite() && d > 0.0;
    if !valid_dim(container.width) || !valid_dim(container.height) {
        return Err(LayoutError::InvalidDimension {
            width: container.width,
            height: container.height,
        });
    }
    for (index, &value) in weights.iter().enumerate() {
        if !value.is_finite() || value < 0.0 {
            return Err(LayoutError::InvalidWeight { index, value });
        }
    }
    Ok(())
}

/// Convert the accumulated row into output rectangles at their original
/// indices, advance the cursor, shrink the remaining value space, and flip
/// orientation. Pure step: takes the current state, returns the next one.
fn finalize_row(
    state: LayoutState,
    row: &[Entry],
    scale: f64,
    container: &Rect,
    out: &mut [Rect],
) -> LayoutState {
    let row_value: f64 = row.iter().map(|e| e.value).sum();

    if row_value <= 0.0 {
        // All-zero trailing row (reachable only with a total_value override):
        // every member collapses to a zero-area rectangle at the cursor.
        for entry in row {
            out[entry.index] = Rect::new(
                container.top + state.y * scale,
                container.left + state.x * scale,
                0.0,
                0.0,
            );
        }
        return state;
    }

    let mut next = state;
    let row_width;
    let row_height;
    match state.orientation {
        Orientation::Vertical => {
            row_width = row_value / state.value_height;
            row_height = state.value_height;
            next.value_width -= row_width;
            next.x += row_width;
        }
        Orientation::Horizontal => {
            row_width = state.value_width;
            row_height = row_value / state.value_width;
            next.value_height -= row_height;
            next.y += row_height;
        }
    }

    let mut x = state.x;
    let mut y = state.y;
    for entry in row {
        let (width, height) = match state.orientation {
            Orientation::Vertical => (row_width, entry.value / row_width),
            Orientation::Horizontal => (entry.value / row_height, row_height),
        };
        out[entry.index] = Rect::new(
            container.top + y * scale,
            container.left + x * scale,
            width * scale,
            height * scale,
        );
        match state.orientation {
            Orientation::Vertical => y += height,
            Orientation::Horizontal => x += width,
        }
    }

    next.orientation = state.orientation.flip();
    next
}

fn worst_row(row: &[Entry], breadth: f64) -> f64 {
    match (row.first(), row.last()) {
        (Some(first), Some(last)) => {
            let sum: f64 = row.iter().map(|e| e.value).sum();
            worst_aspect_ratio(first.value, last.value, sum, breadth)
        }
        _ => f64::INFINITY,
    }
}

/// Closed-form bound on the worst rectangle aspect ratio a row would have if
/// finalized now with the given cross-axis breadth. Assumes `largest` and
/// `smallest` really are the row's extremes, which the descending sort
/// guarantees. An empty row scores infinite, so the first weight always opens
/// one.
fn worst_aspect_ratio(largest: f64, smallest: f64, sum: f64, breadth: f64) -> f64 {
    let b2 = breadth * breadth;
    let s2 = sum * sum;
    f64::max(b2 * smallest / s2, s2 / (b2 * largest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutError;

    fn layout(weights: &[f64], width: f64, height: f64) -> Vec<Rect> {
        layout_treemap(weights, Rect::sized(width, height), &LayoutOptions::default()).unwrap()
    }

    fn total_area(rects: &[Rect]) -> f64 {
        rects.iter().map(Rect::area).sum()
    }

    #[track_caller]
    fn assert_rect_close(r: &Rect, top: f64, left: f64, width: f64, height: f64) {
        assert!((r.top - top).abs() < 1e-9, "top {} != {}", r.top, top);
        assert!((r.left - left).abs() < 1e-9, "left {} != {}", r.left, left);
        assert!((r.width - width).abs() < 1e-9, "width {} != {}", r.width, width);
        assert!(
            (r.height - height).abs() < 1e-9,
            "height {} != {}",
            r.height,
            height
        );
    }

    #[test]
    fn single_item_fills_container() {
        let rects = layout(&[100.0], 200.0, 100.0);
        assert_eq!(rects.len(), 1);
        assert_rect_close(&rects[0], 0.0, 0.0, 200.0, 100.0);
    }

    #[test]
    fn two_equal_weights_split_wide_container_into_squares() {
        let rects = layout(&[1.0, 1.0], 200.0, 100.0);
        assert_eq!(rects.len(), 2);
        for r in &rects {
            assert!((r.width - 100.0).abs() < 1e-9, "width {}", r.width);
            assert!((r.height - 100.0).abs() < 1e-9, "height {}", r.height);
            assert!(r.top.abs() < 1e-9);
        }
        assert!(rects[0].left.abs() < 1e-9);
        assert!((rects[1].left - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_weights_yield_empty_layout() {
        let rects = layout(&[], 100.0, 100.0);
        assert!(rects.is_empty());
    }

    #[test]
    fn preserves_area_for_simple_case() {
        let weights = [400.0, 300.0, 200.0, 100.0];
        let rects = layout(&weights, 50.0, 20.0);
        assert_eq!(rects.len(), 4);
        assert!((total_area(&rects) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn rect_areas_are_proportional_to_weights_at_their_index() {
        let weights = [1.0, 3.0, 2.0];
        let rects = layout(&weights, 120.0, 80.0);
        let unit = 120.0 * 80.0 / 6.0;
        for (w, r) in weights.iter().zip(&rects) {
            assert!(
                (r.area() - w * unit).abs() < 1e-9,
                "weight {} got area {}",
                w,
                r.area()
            );
        }
    }

    #[test]
    fn zero_weight_collapses_without_poisoning_neighbors() {
        let rects = layout(&[5.0, 0.0, 5.0], 200.0, 100.0);
        assert_eq!(rects.len(), 3);
        assert!(rects[1].area().abs() < 1e-9);
        assert!((rects[0].area() - 10_000.0).abs() < 1e-9);
        assert!((rects[2].area() - 10_000.0).abs() < 1e-9);
        for r in &rects {
            assert!(r.width.is_finite() && r.height.is_finite());
        }
    }

    #[test]
    fn rejects_non_positive_container() {
        let err = layout_treemap(&[1.0], Rect::sized(0.0, 100.0), &LayoutOptions::default());
        assert_eq!(
            err,
            Err(LayoutError::InvalidDimension {
                width: 0.0,
                height: 100.0
            })
        );
        let err = layout_treemap(
            &[1.0],
            Rect::sized(100.0, f64::NAN),
            &LayoutOptions::default(),
        );
        assert!(matches!(err, Err(LayoutError::InvalidDimension { .. })));
    }

    #[test]
    fn rejects_invalid_weights() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let err = layout_treemap(
                &[1.0, bad, 2.0],
                Rect::sized(100.0, 100.0),
                &LayoutOptions::default(),
            );
            assert!(
                matches!(err, Err(LayoutError::InvalidWeight { index: 1, .. })),
                "weight {bad} not rejected"
            );
        }
    }

    #[test]
    fn rejects_degenerate_total_instead_of_emitting_nan() {
        let opts = LayoutOptions {
            total_value: Some(0.0),
            ..LayoutOptions::default()
        };
        let err = layout_treemap(&[1.0, 2.0, 3.0], Rect::sized(100.0, 100.0), &opts);
        assert_eq!(err, Err(LayoutError::InvalidTotal(0.0)));

        // All-zero weights hit the same guard through the default total.
        let err = layout_treemap(
            &[0.0, 0.0],
            Rect::sized(100.0, 100.0),
            &LayoutOptions::default(),
        );
        assert_eq!(err, Err(LayoutError::InvalidTotal(0.0)));
    }

    #[test]
    fn oversized_total_underfills_but_stays_finite() {
        let opts = LayoutOptions {
            total_value: Some(200.0),
            ..LayoutOptions::default()
        };
        let rects = layout_treemap(&[50.0, 50.0], Rect::sized(100.0, 100.0), &opts).unwrap();
        assert!((total_area(&rects) - 5000.0).abs() < 1e-9);
        for r in &rects {
            assert!(r.left >= 0.0 && r.top >= 0.0);
            assert!(r.left + r.width <= 100.0 + 1e-9);
            assert!(r.top + r.height <= 100.0 + 1e-9);
        }
    }

    #[test]
    fn nested_container_offsets_output() {
        let container = Rect::new(40.0, 60.0, 100.0, 100.0);
        let rects = layout_treemap(&[7.0], container, &LayoutOptions::default()).unwrap();
        assert_eq!(rects.len(), 1);
        assert_rect_close(&rects[0], 40.0, 60.0, 100.0, 100.0);
    }

    #[test]
    fn identical_calls_produce_identical_output() {
        let weights = [9.0, 7.0, 5.0, 3.0, 2.0, 1.0];
        let a = layout(&weights, 317.0, 141.0);
        let b = layout(&weights, 317.0, 141.0);
        assert_eq!(a, b);
    }

    #[test]
    fn horizontal_bias_widens_rows() {
        // Neutral bias splits two equal weights in a 2:1 container into
        // side-by-side squares; a strong bias keeps them in one full-width
        // column of stacked 200x50 slabs.
        let container = Rect::sized(200.0, 100.0);
        let neutral = layout_treemap(&[1.0, 1.0], container, &LayoutOptions::default()).unwrap();
        assert!((neutral[0].width - 100.0).abs() < 1e-9);

        let biased = LayoutOptions {
            total_value: None,
            horizontal_bias: 2.0,
        };
        let wide = layout_treemap(&[1.0, 1.0], container, &biased).unwrap();
        assert!((wide[0].width - 200.0).abs() < 1e-9);
        assert!((wide[0].height - 50.0).abs() < 1e-9);
        assert!((wide[1].top - 50.0).abs() < 1e-9);
    }

    #[test]
    fn unsorted_input_keeps_index_correspondence() {
        let weights = [2.0, 8.0, 1.0, 4.0];
        let rects = layout(&weights, 160.0, 90.0);
        assert_eq!(rects.len(), weights.len());
        let unit = 160.0 * 90.0 / 15.0;
        for (w, r) in weights.iter().zip(&rects) {
            assert!((r.area() - w * unit).abs() < 1e-6);
        }
    }

    #[test]
    fn rects_tile_the_container() {
        let weights = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let rects = layout(&weights, 400.0, 300.0);
        assert!((total_area(&rects) - 120_000.0).abs() < 1e-6);
        for r in &rects {
            assert!(r.left >= -1e-9 && r.top >= -1e-9);
            assert!(r.left + r.width <= 400.0 + 1e-6);
            assert!(r.top + r.height <= 300.0 + 1e-6);
        }
        // Pairwise non-overlap.
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                let w = f64::min(a.left + a.width, b.left + b.width) - f64::max(a.left, b.left);
                let h = f64::min(a.top + a.height, b.top + b.height) - f64::max(a.top, b.top);
                if w > 0.0 && h > 0.0 {
                    assert!(w * h < 1e-6, "rects overlap by {}", w * h);
                }
            }
        }
    }
}
