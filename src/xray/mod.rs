//! # X 射线大气衰减计算模块
//!
//! 模拟 X 射线光子通量穿过高层大气时的衰减。
//!
//! ## 子模块
//! - `atmosphere`: ISA 分层表、层查找与密度公式
//! - `column`: 梯形法柱密度积分
//! - `coefficient`: 能量相关的衰减系数
//! - `model`: 透射率、正向/逆向能谱变换、演化网格
//! - `plot`: 图表生成
//! - `export`: 数据导出
//!
//! ## 调用链
//! ```text
//! model ── column ── atmosphere
//!   └──── coefficient
//! ```

pub mod atmosphere;
pub mod coefficient;
pub mod column;
pub mod export;
pub mod model;
pub mod plot;

pub use model::{synthesize, AttenuationModel};
