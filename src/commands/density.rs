//! # density 子命令实现
//!
//! 打印标准大气的密度剖面，或单个高度的层号与密度。
//!
//! ## 依赖关系
//! - 使用 `cli/simulate.rs` 定义的 DensityArgs
//! - 使用 `xray/atmosphere.rs` 计算密度
//! - 使用 `xray/export.rs` 导出 CSV

use crate::cli::simulate::{parse_altitude_range, DensityArgs};
use crate::error::{Result, XattenError};
use crate::utils::output;
use crate::xray::atmosphere;
use crate::xray::export::{self, DensityRow};

use tabled::{Table, Tabled};

/// 执行 density 命令
pub fn execute(args: DensityArgs) -> Result<()> {
    output::print_header("Standard Atmosphere Density");

    let rows = match args.altitude {
        Some(h) => vec![density_row(h)?],
        None => {
            let (min, max) = parse_altitude_range(&args.range)?;
            density_profile(min, max, args.interval)?
        }
    };

    print_density_table(&rows);

    if let Some(ref path) = args.output {
        export::density_to_csv(&rows, path)?;
        output::print_success(&format!("Density profile saved to '{}'", path.display()));
    }

    Ok(())
}

fn density_row(altitude_m: f64) -> Result<DensityRow> {
    Ok(DensityRow {
        altitude_m,
        layer: atmosphere::resolve_layer(altitude_m)?,
        density: atmosphere::density(altitude_m)?,
    })
}

/// 从 min 起每隔 interval 取样直到 max（含）
fn density_profile(min: f64, max: f64, interval: f64) -> Result<Vec<DensityRow>> {
    if !interval.is_finite() || interval <= 0.0 {
        return Err(XattenError::InvalidRange(format!(
            "altitude interval must be > 0 m, got {}",
            interval
        )));
    }

    let n = ((max - min) / interval).floor() as usize;
    (0..=n)
        .map(|i| density_row(min + i as f64 * interval))
        .collect()
}

fn print_density_table(rows: &[DensityRow]) {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Altitude (m)")]
        altitude: String,
        #[tabled(rename = "Layer")]
        layer: usize,
        #[tabled(rename = "Density (kg/m³)")]
        density: String,
    }

    let table_rows: Vec<Row> = rows
        .iter()
        .map(|r| Row {
            altitude: format!("{:.1}", r.altitude_m),
            layer: r.layer,
            density: format!("{:.6e}", r.density),
        })
        .collect();

    println!("{}", Table::new(&table_rows));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_profile_includes_both_ends() {
        let rows = density_profile(0.0, 100000.0, 5000.0).unwrap();
        assert_eq!(rows.len(), 21);
        assert_eq!(rows[0].layer, 0);
        assert_eq!(rows[0].density, 1.225);
        assert_eq!(rows[20].layer, atmosphere::SENTINEL_LAYER);
        assert_eq!(rows[20].density, 0.0);
    }

    #[test]
    fn test_density_profile_rejects_bad_interval() {
        assert!(density_profile(0.0, 1000.0, 0.0).is_err());
        assert!(density_profile(0.0, 1000.0, -5.0).is_err());
    }

    #[test]
    fn test_density_row_rejects_negative() {
        assert!(matches!(
            density_row(-1.0),
            Err(XattenError::NegativeAltitude(_))
        ));
    }
}
