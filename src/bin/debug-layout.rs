/// Diagnostic tool to eyeball squarified layouts from the command line
use anyhow::{bail, Context};
use newsmap_layout::layout::{layout_treemap, LayoutOptions, Rect};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("newsmap_layout=debug".parse().unwrap()),
        )
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let mut bias = 1.0;
    if let Some(pos) = args.iter().position(|a| a == "--bias") {
        if pos + 1 >= args.len() {
            bail!("--bias requires a value");
        }
        bias = args[pos + 1]
            .parse()
            .context("parsing --bias value")?;
        args.drain(pos..pos + 2);
    }

    if args.len() < 3 {
        bail!("usage: debug-layout [--bias N] WIDTH HEIGHT WEIGHT [WEIGHT...]");
    }

    let width: f64 = args[0].parse().context("parsing WIDTH")?;
    let height: f64 = args[1].parse().context("parsing HEIGHT")?;
    let weights: Vec<f64> = args[2..]
        .iter()
        .map(|a| a.parse().with_context(|| format!("parsing weight '{a}'")))
        .collect::<Result<_, _>>()?;

    println!("=== DIAGNOSTIC: Squarified Layout ===");
    println!(
        "Container: {:.0}x{:.0}, {} weights, bias {:.2}",
        width,
        height,
        weights.len(),
        bias
    );

    let options = LayoutOptions {
        total_value: None,
        horizontal_bias: bias,
    };
    let rects = layout_treemap(&weights, Rect::sized(width, height), &options)?;

    println!("\n[1] Rectangles:");
    let mut worst = 1.0f64;
    for (i, rect) in rects.iter().enumerate() {
        let aspect = aspect_ratio(rect);
        if aspect.is_finite() {
            worst = worst.max(aspect);
        }
        println!(
            "    [{}] weight {:>8.2} - {:.1}x{:.1} at ({:.1}, {:.1}) - aspect {:.2}",
            i, weights[i], rect.width, rect.height, rect.left, rect.top, aspect
        );
    }

    println!("\n[2] Checks:");
    let area_sum: f64 = rects.iter().map(Rect::area).sum();
    let container_area = width * height;
    println!("    Total rect area: {:.0}", area_sum);
    println!("    Container area:  {:.0}", container_area);
    println!("    Coverage: {:.3}%", area_sum / container_area * 100.0);
    println!("    Worst aspect ratio: {:.2}", worst);

    Ok(())
}

fn aspect_ratio(rect: &Rect) -> f64 {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return f64::INFINITY;
    }
    f64::max(rect.width / rect.height, rect.height / rect.width)
}
