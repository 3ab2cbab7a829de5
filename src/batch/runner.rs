//! # 批量执行器
//!
//! 并行执行批量处理任务。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代
//! - 进度条显示
//! - 错误收集与汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/propagate.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::error::{Result, XattenError};
use crate::utils::progress;

use rayon::prelude::*;
use std::path::PathBuf;

/// 单个文件处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult {
    /// 处理成功
    Success {
        /// 结果描述（如 "输入 -> 输出"）
        message: String,
        /// 需要提醒的条目数（如未定义的能量点）
        flagged: usize,
    },
    /// 跳过（如文件已存在）
    Skipped(String),
    /// 处理失败
    Failed(String, String), // (文件路径, 错误信息)
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功数量
    pub success: usize,
    /// 跳过数量
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 所有成功文件的提醒条目总数
    pub flagged: usize,
    /// 成功详情 (描述, 提醒条目数)
    pub completed: Vec<(String, usize)>,
    /// 跳过详情
    pub skips: Vec<String>,
    /// 失败详情
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success { message, flagged } => {
                self.success += 1;
                self.flagged += flagged;
                self.completed.push((message, flagged));
            }
            ProcessResult::Skipped(msg) => {
                self.skipped += 1;
                self.skips.push(msg);
            }
            ProcessResult::Failed(path, err) => {
                self.failed += 1;
                self.failures.push((path, err));
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批量执行器（0 = 全部 CPU 核心）
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    /// 并行作业数
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 并行处理文件列表
    pub fn run<F>(&self, files: Vec<PathBuf>, processor: F) -> Result<BatchResult>
    where
        F: Fn(&PathBuf) -> ProcessResult + Sync + Send,
    {
        let pb = progress::create_progress_bar(files.len() as u64, "Processing");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| XattenError::Other(format!("Failed to start thread pool: {}", e)))?;

        let results: Vec<ProcessResult> = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    let result = processor(file);
                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();

        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }

        Ok(batch_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_collects_all_outcomes() {
        let files: Vec<PathBuf> = ["ok.csv", "skip.csv", "bad.csv", "ok2.xy"]
            .iter()
            .map(PathBuf::from)
            .collect();

        let result = BatchRunner::new(2)
            .run(files, |path| {
                let name = path.display().to_string();
                if name.starts_with("ok2") {
                    ProcessResult::Success {
                        message: name,
                        flagged: 4,
                    }
                } else if name.starts_with("ok") {
                    ProcessResult::Success {
                        message: name,
                        flagged: 1,
                    }
                } else if name.starts_with("skip") {
                    ProcessResult::Skipped(name)
                } else {
                    ProcessResult::Failed(name, "parse error".to_string())
                }
            })
            .unwrap();

        assert_eq!(result.success, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.failed, 1);
        assert_eq!(result.total(), 4);
        assert_eq!(result.flagged, 5);
        assert_eq!(result.completed.len(), 2);
        assert_eq!(result.skips, vec!["skip.csv".to_string()]);
        assert_eq!(result.failures[0].0, "bad.csv");
    }

    #[test]
    fn test_auto_jobs() {
        assert!(BatchRunner::new(0).jobs() >= 1);
        assert_eq!(BatchRunner::new(3).jobs(), 3);
    }
}
