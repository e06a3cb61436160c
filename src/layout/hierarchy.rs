//! Two-level layout composition: categories over the canvas, then each
//! category's articles over that category's own rectangle.
//!
//! The composer performs no geometry of its own. It is two rounds of
//! independent [`layout_treemap`] calls, recomputed from scratch on every
//! invocation so output always reflects the latest weights and canvas size.

use super::squarify::{layout_treemap, LayoutOptions, Rect};
use super::LayoutError;

/// One category's weight plus the weights of its articles, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryWeights {
    pub weight: f64,
    pub articles: Vec<f64>,
}

/// Geometry for one category subtree.
///
/// A failed inner layout (commonly a category whose articles all still carry
/// zero weight while feeds load) is recorded here instead of aborting the
/// sibling categories. Article rectangles are absolute, already offset by the
/// category bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryLayout {
    pub bounds: Rect,
    pub articles: Result<Vec<Rect>, LayoutError>,
}

/// Lay out categories across the canvas, then each category's articles
/// within the category's allotted rectangle.
///
/// `options.total_value` applies to the category round only; articles always
/// fill their category. `options.horizontal_bias` is forwarded to both
/// rounds. A failure in the category round fails the whole call; a failure
/// inside one category is isolated to that category's entry.
pub fn layout_hierarchy(
    categories: &[CategoryWeights],
    canvas: Rect,
    options: &LayoutOptions,
) -> Result<Vec<CategoryLayout>, LayoutError> {
    let weights: Vec<f64> = categories.iter().map(|c| c.weight).collect();
    let bounds = layout_treemap(&weights, canvas, options)?;

    let article_options = LayoutOptions {
        total_value: None,
        horizontal_bias: options.horizontal_bias,
    };

    Ok(categories
        .iter()
        .zip(bounds)
        .enumerate()
        .map(|(i, (category, bounds))| {
            let articles = layout_treemap(&category.articles, bounds, &article_options);
            if let Err(err) = &articles {
                tracing::debug!(
                    "skipping article layout for category {} ({} articles): {}",
                    i,
                    category.articles.len(),
                    err
                );
            }
            CategoryLayout { bounds, articles }
        })
        .collect())
}
