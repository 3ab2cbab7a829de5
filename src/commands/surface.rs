//! # surface 子命令实现
//!
//! 合成能谱从 start 出发，在每个中间高度 h 处计算 spectrum(E)·T(start, h, E)，
//! 得到高度 × 能量的演化网格。
//!
//! ## 依赖关系
//! - 使用 `cli/simulate.rs` 定义的 SurfaceArgs
//! - 使用 `xray/model.rs` 的 evolution（rayon 并行积分各行）
//! - 使用 `utils/progress.rs` 显示 spinner

use crate::cli::common::OutputFormat;
use crate::cli::simulate::SurfaceArgs;
use crate::commands::print_interval;
use crate::error::Result;
use crate::utils::{output, progress};
use crate::xray::{export, plot, synthesize, AttenuationModel};

/// 执行 surface 命令
pub fn execute(args: SurfaceArgs, model: &AttenuationModel) -> Result<()> {
    output::print_header("Spectrum Evolution over Altitude");

    let (start, end) = (args.altitude.start, args.altitude.end);
    print_interval(model, start, end);
    output::print_param("Decay factor", &args.decay.to_string());
    output::print_param("Altitude interval", &format!("{} m", args.interval));
    output::print_param("Energy step", &format!("{} keV", args.energy_step));
    output::print_param("Threads", &rayon::current_num_threads().to_string());

    let initial = synthesize(args.decay)?;

    let spinner = progress::create_spinner("Integrating column densities...");
    let grid = model.evolution(&initial, start, end, args.interval, args.energy_step);
    spinner.finish_and_clear();
    let grid = grid?;

    output::print_success(&format!(
        "Grid: {} altitudes x {} energies, peak intensity {:.4}",
        grid.altitudes_m.len(),
        grid.energies_kev.len(),
        grid.peak()
    ));

    match args.output.target() {
        Some((path, format)) => {
            match format {
                OutputFormat::Png | OutputFormat::Svg => {
                    let default_title = format!("Spectrum evolution: {} m to {} m", start, end);
                    plot::generate_surface_plot(
                        &grid,
                        path,
                        args.output.title_or(&default_title),
                        args.output.size(),
                        format == OutputFormat::Svg,
                    )?;
                }
                OutputFormat::Csv => export::grid_to_csv(&grid, path)?,
                OutputFormat::Xy => export::grid_to_xy(&grid, path)?,
            }
            output::print_success(&format!("Surface saved to '{}'", path.display()));
        }
        None => output::print_info("No output file given (use -o surface.png)"),
    }

    Ok(())
}
