//! # xatten - X 射线高层大气衰减模拟
//!
//! 计算高空核爆产生的 X 射线光子通量穿过高层大气到达传感器时的衰减，
//! 以及由传感器测得的能谱反推源能谱。
//!
//! ## 子命令
//! - `density`      - 标准大气密度剖面
//! - `transmission` - 透射率-能量曲线
//! - `attenuate`    - 合成能谱衰减前后对比
//! - `surface`      - 能谱随高度的演化
//! - `propagate`    - 对给定能谱做正向/逆向变换（单文件或批量）
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (能谱文件解析)
//!   │     ├── batch/     (批量处理)
//!   │     ├── xray/      (大气模型、积分、变换、输出)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod utils;
mod xray;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    let result = cli
        .model
        .build()
        .and_then(|model| commands::run(cli.command, &model));

    if let Err(e) = result {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
