//! Show the aspect plan, scaled style, and safe band for a source size.

use std::path::PathBuf;

use reelcap_caption_model::config::CaptionConfig;
use reelcap_caption_model::geometry::{AspectFitResult, AspectPlan, SafeAreaBounds};
use reelcap_caption_model::style::ActiveStyle;
use reelcap_common::config::AppConfig;
use reelcap_layout_core::grouping::width_budget;
use reelcap_layout_core::{AspectFitPlanner, DynamicScaler, SafeZonePositioner};
use serde::Serialize;

use super::load_caption_config;

/// Everything decided before any word is seen.
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub plan: AspectPlan,
    pub style: ActiveStyle,
    pub safe_area: SafeAreaBounds,
    pub width_budget: u32,
}

pub fn build_report(config: &CaptionConfig, width: i64, height: i64) -> anyhow::Result<PlanReport> {
    let plan = AspectFitPlanner::from_config(&config.aspect).plan(width, height)?;
    let (out_w, out_h) = plan.output_size();
    Ok(PlanReport {
        style: DynamicScaler::from_config(&config.scaling).scale(&config.style, out_w),
        safe_area: SafeZonePositioner::from_config(&config.placement).safe_area_bounds(out_w, out_h),
        width_budget: width_budget(out_w, &config.grouping, config.scaling.reference_width),
        plan,
    })
}

pub fn run(
    width: i64,
    height: i64,
    config: Option<PathBuf>,
    json: bool,
    app: &AppConfig,
) -> anyhow::Result<()> {
    let (config, _) = load_caption_config(config, app)?;
    let report = build_report(&config, width, height)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let plan = &report.plan;
    let (out_w, out_h) = plan.output_size();
    println!("Source: {}x{}", plan.source_width, plan.source_height);
    println!(
        "  Ratio: {:.4} (target {:.4}, {:?})",
        plan.ratio, plan.target_ratio, plan.orientation
    );
    println!("  Within tolerance: {}", plan.within_tolerance);
    println!();

    println!("Fit:");
    match plan.fit {
        AspectFitResult::Unchanged { .. } => println!("  Unchanged"),
        AspectFitResult::Crop { x1, y1, x2, y2 } => {
            println!("  Center crop [{x1}, {x2}) x [{y1}, {y2})")
        }
        AspectFitResult::FitWithBars {
            content_width,
            content_height,
            x_offset,
            y_offset,
            ..
        } => println!(
            "  Scaled to {content_width}x{content_height}, placed at ({x_offset}, {y_offset})"
        ),
    }
    if let Some(color) = plan.bar_color {
        println!("  Bars: {}", color.to_hex());
    }
    println!("  Output: {out_w}x{out_h}");
    println!();

    let style = &report.style;
    println!("Style (x{:.3}):", style.scale_factor);
    println!("  Font size: {}px", style.font_size);
    println!("  Stroke: {}px, corner radius {}px", style.stroke_width, style.corner_radius);
    println!("  Shadow: {:?}", style.shadow_style);
    println!("  Width budget: {}px", report.width_budget);
    println!();

    let safe = &report.safe_area;
    println!("Safe band:");
    println!("  Rows {}..{} ({}px)", safe.top, safe.bottom, safe.height);
    println!("  Columns {}..{} ({}px)", safe.left, safe.right, safe.width);

    Ok(())
}
