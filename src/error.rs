//! # 统一错误处理模块
//!
//! 定义 xatten 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分类
//! - I/O 与解析错误：文件读写、能谱文件格式
//! - 定义域错误：负高度、非正能量、非正衰减因子、区间倒置等，
//!   由数值核心直接拒绝，不做静默计算
//! - 输出错误：CSV、绘图后端
//!
//! 逆变换中的"未定义"点不是错误，见 `models::SpectrumValue`。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// xatten 统一错误类型
#[derive(Error, Debug)]
pub enum XattenError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Invalid range format: {0}")]
    InvalidRange(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // 定义域错误
    // ─────────────────────────────────────────────────────────────
    #[error("Altitude must be a finite value >= 0 m, got {0}")]
    NegativeAltitude(f64),

    #[error("Photon energy must be > 0 keV, got {0}")]
    NonPositiveEnergy(f64),

    #[error("Decay factor must be > 0, got {0}")]
    NonPositiveDecayFactor(f64),

    #[error("Start altitude {start} m is above end altitude {end} m")]
    InvertedInterval { start: i64, end: i64 },

    #[error("Integration step must be > 0 m, got {0}")]
    InvalidStep(i64),

    #[error("Invalid intensity {value} at {energy} keV (must be finite and >= 0)")]
    InvalidIntensity { energy: i64, value: f64 },

    #[error("Photon energy {0} keV is outside the supported 1-125 keV range")]
    EnergyOutOfRange(i64),

    #[error("Invalid threshold {name} = {value}")]
    InvalidThreshold { name: String, value: f64 },

    // ─────────────────────────────────────────────────────────────
    // 输出错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plot rendering failed: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, XattenError>;
