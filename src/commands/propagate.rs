//! # propagate 子命令实现
//!
//! 读取调用方提供的能谱文件，正向（初始 → 最终）或逆向（最终 → 初始）变换。
//!
//! ## 功能
//! - 支持单文件和批量目录处理
//! - 并行处理（rayon）
//! - 逆向变换中未定义的能量在图中断开、在 CSV 中留空、在 XY 中省略
//! - 输出高质量图像 (PNG/SVG) 或数据文件 (CSV/XY)
//!
//! ## 依赖关系
//! - 使用 `cli/propagate.rs` 定义的 PropagateArgs
//! - 使用 `batch/` 模块进行批量处理
//! - 使用 `parsers/` 读取能谱
//! - 使用 `xray/` 模块进行计算与输出

use crate::batch::{BatchResult, BatchRunner, FileCollector, ProcessResult};
use crate::cli::common::OutputFormat;
use crate::cli::propagate::{Direction, PropagateArgs};
use crate::commands::print_interval;
use crate::error::{Result, XattenError};
use crate::models::SpectrumComparison;
use crate::parsers;
use crate::utils::output;
use crate::xray::{export, plot, AttenuationModel};

use std::fs;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

/// 表格中展示的能量点
const TABLE_ENERGIES: [u32; 9] = [1, 5, 10, 20, 30, 50, 75, 100, 125];

/// 执行 propagate 命令
pub fn execute(args: PropagateArgs, model: &AttenuationModel) -> Result<()> {
    output::print_header(&format!("Spectrum Propagation ({})", args.direction));

    // 检测输入类型
    if args.input.is_file() {
        execute_single_file(&args, model)
    } else if args.input.is_dir() {
        execute_batch(&args, model)
    } else {
        Err(XattenError::FileNotFound {
            path: args.input.display().to_string(),
        })
    }
}

/// 单文件模式
fn execute_single_file(args: &PropagateArgs, model: &AttenuationModel) -> Result<()> {
    output::print_info(&format!("Single file mode: '{}'", args.input.display()));
    print_interval(model, args.altitude.start, args.altitude.end);

    let output_path = args.output_or_default(false);
    let format = args
        .format
        .unwrap_or_else(|| OutputFormat::from_extension(&output_path));
    let config = PropagateConfig::from_args(args, format);

    let cmp = propagate_file(&args.input, model, &config)?;
    print_comparison_table(&cmp);
    if cmp.undefined_count() > 0 {
        output::print_warning(&format!(
            "{} of {} energies are undefined (transmission too small or result too large)",
            cmp.undefined_count(),
            cmp.rows.len()
        ));
    }

    write_comparison(&cmp, &output_path, &config)?;
    output::print_success(&format!("Spectra saved to '{}'", output_path.display()));
    Ok(())
}

/// 批量处理模式
fn execute_batch(args: &PropagateArgs, model: &AttenuationModel) -> Result<()> {
    output::print_info(&format!("Batch mode: directory '{}'", args.input.display()));
    print_interval(model, args.altitude.start, args.altitude.end);

    let output_dir = args.output_or_default(true);

    // 收集文件（跳过输出目录，避免重复处理已生成的文件）
    let collector = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive);

    // 确保输出目录存在
    fs::create_dir_all(&output_dir).map_err(|e| XattenError::FileWriteError {
        path: output_dir.display().to_string(),
        source: e,
    })?;
    output::print_info(&format!("Output directory: '{}'", output_dir.display()));

    let files = collector.excluding(&output_dir).collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} spectrum files", files.len()));

    let format = args.format.unwrap_or(OutputFormat::Png);
    output::print_info(&format!("Output format: {}", format));

    let config = PropagateConfig::from_args(args, format);

    // 并行处理
    let runner = BatchRunner::new(args.jobs);
    output::print_info(&format!("Using {} parallel jobs", runner.jobs()));
    let result = runner.run(files, |file| {
        process_batch_file(file, &output_dir, model, &config)
    })?;

    // 打印统计
    output::print_separator();
    for (msg, undefined) in result.completed.iter().take(10) {
        if *undefined > 0 {
            output::print_warning(msg);
        } else {
            output::print_info(msg);
        }
    }
    if result.completed.len() > 10 {
        output::print_info(&format!("  ... and {} more", result.completed.len() - 10));
    }
    for msg in result.skips.iter().take(10) {
        output::print_warning(msg);
    }
    if result.skips.len() > 10 {
        output::print_warning(&format!("  ... and {} more skipped", result.skips.len() - 10));
    }

    output::print_success(&batch_summary(&result));

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    Ok(())
}

/// 批量统计行，含所有输出中未定义的能量点总数
fn batch_summary(result: &BatchResult) -> String {
    format!(
        "Batch complete: {} files ({} success, {} skipped, {} failed), {} undefined energies",
        result.total(),
        result.success,
        result.skipped,
        result.failed,
        result.flagged
    )
}

/// 单个文件的处理配置
struct PropagateConfig {
    direction: Direction,
    start_altitude_m: i64,
    end_altitude_m: i64,
    format: OutputFormat,
    size: (u32, u32),
    title: Option<String>,
    overwrite: bool,
}

impl PropagateConfig {
    fn from_args(args: &PropagateArgs, format: OutputFormat) -> Self {
        Self {
            direction: args.direction,
            start_altitude_m: args.altitude.start,
            end_altitude_m: args.altitude.end,
            format,
            size: (args.width, args.height),
            title: args.title.clone(),
            overwrite: args.overwrite,
        }
    }
}

/// 批量模式的输出文件名：`<stem>_<direction>.<ext>`
fn batch_output_path(input: &Path, output_dir: &Path, config: &PropagateConfig) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("spectrum");

    output_dir.join(format!(
        "{}_{}.{}",
        stem,
        config.direction,
        config.format.extension()
    ))
}

/// 处理批量模式中的单个文件
fn process_batch_file(
    input: &PathBuf,
    output_dir: &Path,
    model: &AttenuationModel,
    config: &PropagateConfig,
) -> ProcessResult {
    let output_file = batch_output_path(input, output_dir, config);

    // 检查是否已存在
    if output_file.exists() && !config.overwrite {
        return ProcessResult::Skipped(format!(
            "Output exists, skipping: {}",
            output_file.display()
        ));
    }

    let result = propagate_file(input, model, config)
        .and_then(|cmp| write_comparison(&cmp, &output_file, config).map(|_| cmp));

    match result {
        Ok(cmp) => ProcessResult::Success {
            message: format!(
                "{} -> {} ({} undefined)",
                input.display(),
                output_file.display(),
                cmp.undefined_count()
            ),
            flagged: cmp.undefined_count(),
        },
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}

/// 读取能谱并按方向变换
fn propagate_file(
    input: &Path,
    model: &AttenuationModel,
    config: &PropagateConfig,
) -> Result<SpectrumComparison> {
    let spectrum = parsers::parse_spectrum_file(input)?;
    let name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("spectrum");

    let (start, end) = (config.start_altitude_m, config.end_altitude_m);
    match config.direction {
        Direction::Forward => {
            let attenuated = model.forward(&spectrum, start, end)?;
            Ok(SpectrumComparison::forward(name, &spectrum, &attenuated))
        }
        Direction::Backward => {
            let reconstructed = model.backward(&spectrum, start, end)?;
            Ok(SpectrumComparison::backward(name, &spectrum, &reconstructed))
        }
    }
}

/// 按输出格式写出对比结果
fn write_comparison(
    cmp: &SpectrumComparison,
    output_path: &Path,
    config: &PropagateConfig,
) -> Result<()> {
    match config.format {
        OutputFormat::Png | OutputFormat::Svg => {
            let default_title = format!(
                "{} ({}): {} m to {} m",
                cmp.name, config.direction, config.start_altitude_m, config.end_altitude_m
            );
            plot::generate_comparison_plot(
                cmp,
                output_path,
                config.title.as_deref().unwrap_or(&default_title),
                config.size,
                config.format == OutputFormat::Svg,
            )
        }
        OutputFormat::Csv => export::comparison_to_csv(cmp, output_path),
        OutputFormat::Xy => export::spectrum_to_xy(cmp, output_path),
    }
}

/// 打印能谱对比表格
fn print_comparison_table(cmp: &SpectrumComparison) {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "E (keV)")]
        energy: u32,
        #[tabled(rename = "Input")]
        first: String,
        #[tabled(rename = "Output")]
        second: String,
    }

    let rows: Vec<Row> = cmp
        .rows
        .iter()
        .filter(|r| TABLE_ENERGIES.contains(&r.energy_kev))
        .map(|r| Row {
            energy: r.energy_kev,
            first: format!("{:.6}", r.first),
            second: r
                .second
                .map(|v| format!("{:.6}", v))
                .unwrap_or_else(|| "undefined".to_string()),
        })
        .collect();

    if !rows.is_empty() {
        output::print_header(&format!(
            "{}: {} -> {}",
            cmp.name, cmp.first_label, cmp.second_label
        ));
        println!("{}", Table::new(&rows));
    }
}
