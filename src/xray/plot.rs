//! # 图表生成
//!
//! 使用 `plotters` 库绘制透射率曲线、能谱对比与高度-能量演化热图。
//!
//! ## 功能
//! - 透射率-能量折线图
//! - 初始/最终能谱对比图（未定义点处断开）
//! - 演化网格热图（高度 km × 能量 keV，颜色表示强度）
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `models/` 与 `xray/model.rs` 的数据结构
//! - 使用 `plotters` 渲染图表

use crate::error::{Result, XattenError};
use crate::models::{SpectrumComparison, TransmissionSample};
use crate::xray::model::EvolutionGrid;

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

const TITLE_FONT: u32 = 28;
const LABEL_FONT: u32 = 16;
const AXIS_DESC_FONT: u32 = 18;

fn plot_err<E: std::fmt::Debug>(e: E) -> XattenError {
    XattenError::PlotError(format!("{:?}", e))
}

/// 生成透射率曲线
pub fn generate_transmission_plot(
    samples: &[TransmissionSample],
    output_path: &Path,
    title: &str,
    size: (u32, u32),
    use_svg: bool,
) -> Result<()> {
    if use_svg {
        let root = SVGBackend::new(output_path, size).into_drawing_area();
        draw_transmission_chart(&root, samples, title)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(output_path, size).into_drawing_area();
        draw_transmission_chart(&root, samples, title)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

/// 生成能谱对比图
pub fn generate_comparison_plot(
    cmp: &SpectrumComparison,
    output_path: &Path,
    title: &str,
    size: (u32, u32),
    use_svg: bool,
) -> Result<()> {
    if use_svg {
        let root = SVGBackend::new(output_path, size).into_drawing_area();
        draw_comparison_chart(&root, cmp, title)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(output_path, size).into_drawing_area();
        draw_comparison_chart(&root, cmp, title)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

/// 生成演化热图
pub fn generate_surface_plot(
    grid: &EvolutionGrid,
    output_path: &Path,
    title: &str,
    size: (u32, u32),
    use_svg: bool,
) -> Result<()> {
    if use_svg {
        let root = SVGBackend::new(output_path, size).into_drawing_area();
        draw_surface_chart(&root, grid, title)?;
        root.present().map_err(plot_err)?;
    } else {
        let root = BitMapBackend::new(output_path, size).into_drawing_area();
        draw_surface_chart(&root, grid, title)?;
        root.present().map_err(plot_err)?;
    }
    Ok(())
}

/// 绘制透射率曲线
fn draw_transmission_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    samples: &[TransmissionSample],
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let x_max = samples.last().map(|s| s.energy_kev as f64).unwrap_or(125.0);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", TITLE_FONT).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, 0.0..1.05)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Photon Energy (keV)")
        .y_desc("Transmission Percentage")
        .x_label_style(("sans-serif", LABEL_FONT))
        .y_label_style(("sans-serif", LABEL_FONT))
        .axis_desc_style(("sans-serif", AXIS_DESC_FONT))
        .draw()
        .map_err(plot_err)?;

    let line_color = RGBColor(0, 102, 204);
    chart
        .draw_series(LineSeries::new(
            samples.iter().map(|s| (s.energy_kev as f64, s.fraction)),
            line_color.stroke_width(2),
        ))
        .map_err(plot_err)?;

    Ok(())
}

/// 绘制能谱对比图
///
/// 第二条曲线在未定义的能量处断开为多段。
fn draw_comparison_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    cmp: &SpectrumComparison,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let x_max = cmp.rows.last().map(|r| r.energy_kev as f64).unwrap_or(125.0);
    let y_max = (cmp.peak() * 1.1).max(1e-9);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", TITLE_FONT).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Photon Energy (keV)")
        .y_desc("Photon Intensity")
        .x_label_style(("sans-serif", LABEL_FONT))
        .y_label_style(("sans-serif", LABEL_FONT))
        .axis_desc_style(("sans-serif", AXIS_DESC_FONT))
        .draw()
        .map_err(plot_err)?;

    let first_color = RGBColor(0, 102, 204);
    let second_color = RGBColor(214, 39, 40);

    chart
        .draw_series(LineSeries::new(
            cmp.rows.iter().map(|r| (r.energy_kev as f64, r.first)),
            first_color.stroke_width(2),
        ))
        .map_err(plot_err)?
        .label(cmp.first_label.as_str())
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], first_color.stroke_width(2))
        });

    let segments = defined_segments(cmp);
    for (i, segment) in segments.into_iter().enumerate() {
        let series = chart
            .draw_series(LineSeries::new(segment, second_color.stroke_width(2)))
            .map_err(plot_err)?;
        if i == 0 {
            series
                .label(cmp.second_label.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], second_color.stroke_width(2))
                });
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_err)?;

    Ok(())
}

/// 第二条曲线中连续已定义的片段
fn defined_segments(cmp: &SpectrumComparison) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();

    for row in &cmp.rows {
        match row.second {
            Some(v) => current.push((row.energy_kev as f64, v)),
            None => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// 绘制演化热图
fn draw_surface_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    grid: &EvolutionGrid,
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_err)?;

    let to_km = |h: i64| h as f64 / 1000.0;
    let dh = match grid.altitudes_m.as_slice() {
        [a, b, ..] => to_km(b - a),
        _ => 1.0,
    };
    let de = match grid.energies_kev.as_slice() {
        [a, b, ..] => (b - a) as f64,
        _ => 1.0,
    };

    let x_min = grid.altitudes_m.first().map(|&h| to_km(h)).unwrap_or(0.0);
    let x_max = grid.altitudes_m.last().map(|&h| to_km(h)).unwrap_or(100.0) + dh;
    let y_min = grid.energies_kev.first().map(|&e| e as f64).unwrap_or(1.0);
    let y_max = grid.energies_kev.last().map(|&e| e as f64).unwrap_or(125.0) + de;

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", TITLE_FONT).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Altitude (km)")
        .y_desc("Photon Energy (keV)")
        .x_label_style(("sans-serif", LABEL_FONT))
        .y_label_style(("sans-serif", LABEL_FONT))
        .axis_desc_style(("sans-serif", AXIS_DESC_FONT))
        .draw()
        .map_err(plot_err)?;

    let peak = grid.peak();
    chart
        .draw_series(grid.cells().map(|(h, e, intensity)| {
            let x0 = to_km(h);
            let y0 = e as f64;
            let t = if peak > 0.0 { intensity / peak } else { 0.0 };
            Rectangle::new([(x0, y0), (x0 + dh, y0 + de)], intensity_color(t).filled())
        }))
        .map_err(plot_err)?;

    let peak_text = format!("max intensity = {:.2}", peak);
    chart
        .draw_series(std::iter::once(Text::new(
            peak_text,
            (x_min + 0.02 * (x_max - x_min), y_max - 0.05 * (y_max - y_min)),
            ("sans-serif", 14).into_font().color(&BLACK),
        )))
        .map_err(plot_err)?;

    Ok(())
}

/// 归一化强度 → 颜色（蓝 → 红）
fn intensity_color(t: f64) -> HSLColor {
    let t = t.clamp(0.0, 1.0);
    HSLColor((1.0 - t) * 240.0 / 360.0, 0.75, 0.25 + 0.3 * t)
}
