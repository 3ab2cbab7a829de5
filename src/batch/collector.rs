//! # 文件收集器
//!
//! 根据输入路径和模式收集待处理的能谱文件。
//!
//! ## 功能
//! - 支持单文件和目录输入
//! - glob 模式匹配（逗号分隔多模式，不区分大小写）
//! - 递归目录搜索
//! - 排除输出目录，避免重复处理已生成的文件
//!
//! ## 依赖关系
//! - 被 `commands/propagate.rs` 调用
//! - 使用 `walkdir` 遍历目录
//! - 使用 `glob` 匹配文件名

use crate::error::{Result, XattenError};

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// 文件收集器
pub struct FileCollector {
    /// 输入路径
    input: PathBuf,
    /// 匹配模式列表
    patterns: Vec<Pattern>,
    /// 是否递归
    recursive: bool,
    /// 排除的目录
    excluded: Option<PathBuf>,
}

impl FileCollector {
    /// 创建新的文件收集器（匹配所有文件）
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            patterns: Vec::new(),
            recursive: false,
            excluded: None,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns = pattern
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    XattenError::InvalidArgument(format!("Invalid pattern '{}': {}", p, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 跳过该目录下的文件
    pub fn excluding(mut self, dir: &Path) -> Self {
        self.excluded = Some(dir.to_path_buf());
        self
    }

    /// 收集所有匹配的文件（按路径排序）
    pub fn collect(&self) -> Vec<PathBuf> {
        if self.input.is_file() {
            return vec![self.input.clone()];
        }

        if !self.input.is_dir() {
            return vec![];
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let excluded = self
            .excluded
            .as_ref()
            .and_then(|d| d.canonicalize().ok());

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(|e| {
                if e.depth() == 0 || !e.file_type().is_dir() {
                    return true;
                }
                match (&excluded, e.path().canonicalize()) {
                    (Some(ex), Ok(p)) => &p != ex,
                    _ => true,
                }
            })
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|entry| self.matches_patterns(entry.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        files
    }

    /// 检查文件名是否匹配任一模式；未设置模式时全部匹配
    fn matches_patterns(&self, path: &Path) -> bool {
        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };

        self.patterns.is_empty()
            || self
                .patterns
                .iter()
                .any(|pattern| pattern.matches_with(filename, MATCH_OPTIONS))
    }
}
