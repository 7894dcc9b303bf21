// crates/pf_foundation/src/lib.rs

//! PolyFlux 基础层
//!
//! 提供整个项目共享的基础设施：
//! - 统一错误类型 (error)
//! - 数值容差配置 (tolerance)
//!
//! # 设计原则
//!
//! 基础层只定义核心错误与数值常量，物理求解相关的错误
//! 在 `pf_physics` 中扩展。所有容差通过参数注入传递，
//! 不使用任何全局可变状态。

pub mod error;
pub mod tolerance;

pub use error::{PfError, PfResult};
pub use tolerance::NumericalTolerance;
