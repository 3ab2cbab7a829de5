//! # 批量处理模块
//!
//! 对目录中的多个能谱文件并行执行变换。
//!
//! ## 功能
//! - 收集匹配文件列表（跳过输出目录）
//! - 并行处理
//! - 进度反馈与统计
//!
//! ## 依赖关系
//! - 被 `commands/propagate.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use collector::FileCollector;
pub use runner::{BatchResult, BatchRunner, ProcessResult};
