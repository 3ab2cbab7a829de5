//! # transmission 子命令实现
//!
//! 计算 1-125 keV 每个能量穿过 [start, end] 的透射率。
//!
//! ## 依赖关系
//! - 使用 `cli/simulate.rs` 定义的 TransmissionArgs
//! - 使用 `xray/model.rs` 计算透射率
//! - 使用 `xray/plot.rs` 与 `xray/export.rs` 输出

use crate::cli::common::OutputFormat;
use crate::cli::simulate::TransmissionArgs;
use crate::commands::print_interval;
use crate::error::Result;
use crate::models::TransmissionSample;
use crate::utils::output;
use crate::xray::{export, plot, AttenuationModel};

use tabled::{Table, Tabled};

/// 表格中展示的能量点
const TABLE_ENERGIES: [u32; 9] = [1, 5, 10, 20, 30, 50, 75, 100, 125];

/// 执行 transmission 命令
pub fn execute(args: TransmissionArgs, model: &AttenuationModel) -> Result<()> {
    output::print_header("X-Ray Transmission");

    let (start, end) = (args.altitude.start, args.altitude.end);
    print_interval(model, start, end);

    if let Some(energy) = args.energy {
        let fraction = model.transmission(start, end, energy)?;
        output::print_param("Photon energy", &format!("{} keV", energy));
        output::print_success(&format!("Transmission: {:.9e}", fraction));
        return Ok(());
    }

    let column = model.column_density(start, end)?;
    output::print_param("Column density", &format!("{:.6} kg/m²", column));

    let samples = model.transmission_curve(start, end)?;
    print_transmission_table(&samples);

    if let Some((path, format)) = args.output.target() {
        match format {
            OutputFormat::Png | OutputFormat::Svg => {
                let default_title = format!("Transmission: {} m to {} m", start, end);
                plot::generate_transmission_plot(
                    &samples,
                    path,
                    args.output.title_or(&default_title),
                    args.output.size(),
                    format == OutputFormat::Svg,
                )?;
            }
            OutputFormat::Csv => export::transmission_to_csv(&samples, path)?,
            OutputFormat::Xy => export::transmission_to_xy(&samples, start, end, path)?,
        }
        output::print_success(&format!("Transmission saved to '{}'", path.display()));
    }

    Ok(())
}

fn print_transmission_table(samples: &[TransmissionSample]) {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "E (keV)")]
        energy: u32,
        #[tabled(rename = "Transmission")]
        fraction: String,
    }

    let rows: Vec<Row> = samples
        .iter()
        .filter(|s| TABLE_ENERGIES.contains(&s.energy_kev))
        .map(|s| Row {
            energy: s.energy_kev,
            fraction: format!("{:.6e}", s.fraction),
        })
        .collect();

    if !rows.is_empty() {
        println!();
        println!("{}", Table::new(&rows));
    }
}
