//! # attenuate 子命令实现
//!
//! 合成指数衰减初始能谱 100·decay^E，计算经过 [start, end] 后的能谱，
//! 并输出初始/最终对比。
//!
//! ## 依赖关系
//! - 使用 `cli/simulate.rs` 定义的 AttenuateArgs
//! - 使用 `xray/model.rs` 合成与变换能谱
//! - 使用 `models/comparison.rs` 对齐两条曲线

use crate::cli::common::OutputFormat;
use crate::cli::simulate::AttenuateArgs;
use crate::commands::print_interval;
use crate::error::{Result, XattenError};
use crate::models::SpectrumComparison;
use crate::utils::output;
use crate::xray::{export, plot, synthesize, AttenuationModel};

/// 执行 attenuate 命令
pub fn execute(args: AttenuateArgs, model: &AttenuationModel) -> Result<()> {
    output::print_header("Synthetic Spectrum Attenuation");

    if args.energy_step == 0 {
        return Err(XattenError::InvalidRange(
            "energy step must be >= 1 keV".to_string(),
        ));
    }

    let (start, end) = (args.altitude.start, args.altitude.end);
    print_interval(model, start, end);
    output::print_param("Decay factor", &args.decay.to_string());
    if args.decay > 1.0 {
        output::print_warning("Decay factor > 1 gives an intensity rising with energy");
    }

    let initial = synthesize(args.decay)?;
    let attenuated = model.forward(&initial, start, end)?;
    let name = format!("decay {}", args.decay);
    let cmp = SpectrumComparison::forward(&name, &initial, &attenuated).thinned(args.energy_step);

    output::print_param("Initial peak", &format!("{:.4}", initial.peak()));
    output::print_param("Final peak", &format!("{:.4}", attenuated.peak()));
    output::print_param("Initial total", &format!("{:.4}", initial.total()));
    output::print_param("Final total", &format!("{:.4}", attenuated.total()));
    if initial.total() > 0.0 {
        output::print_param(
            "Surviving fraction",
            &format!("{:.4}%", 100.0 * attenuated.total() / initial.total()),
        );
    }

    if let Some((path, format)) = args.output.target() {
        match format {
            OutputFormat::Png | OutputFormat::Svg => {
                let default_title = format!("Spectrum: {} m to {} m", start, end);
                plot::generate_comparison_plot(
                    &cmp,
                    path,
                    args.output.title_or(&default_title),
                    args.output.size(),
                    format == OutputFormat::Svg,
                )?;
            }
            OutputFormat::Csv => export::comparison_to_csv(&cmp, path)?,
            OutputFormat::Xy => export::comparison_to_xy(&cmp, path)?,
        }
        output::print_success(&format!("Spectra saved to '{}'", path.display()));
    }

    Ok(())
}
