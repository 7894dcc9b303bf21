// crates/pf_physics/src/error.rs

//! 求解阶段错误类型
//!
//! 扩展 `pf_foundation::PfError`，定义时间推进过程中可能出现的
//! 物理/数值错误。配置阶段的错误仍使用基础层类型。
//!
//! # 错误分类
//!
//! 1. 牛顿迭代不收敛 —— 总是致命，不做回退（阻尼、二分），由
//!    运行驱动层决定中止或报告
//! 2. 非物理状态 —— 压力低于状态方程有效下限，一次性求值场合
//!    报告该错误；迭代循环内部则用 `clamp_pressure` 就地修正
//! 3. 封闭模型约束违反 —— 相数或状态方程族不被所选封闭模型支持

use thiserror::Error;

/// 求解结果类型
pub type ModelResult<T> = Result<T, ModelError>;

/// 求解阶段错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// 牛顿迭代超过次数上限
    #[error("{solver} 牛顿迭代未收敛: 已迭代 {iterations} 次, 残差 {residual:.3e}")]
    NonConvergence {
        /// 发生不收敛的求解器名称
        solver: &'static str,
        /// 已执行的迭代次数
        iterations: usize,
        /// 终止时的残差
        residual: f64,
    },

    /// 压力低于状态方程有效下限
    #[error("{context}: 压力 {pressure:.6e} 低于状态方程 {eos} 的有效下限 {floor:.6e}")]
    NonPhysicalPressure {
        /// 出错的调用位置描述
        context: &'static str,
        /// 实际压力
        pressure: f64,
        /// 有效下限
        floor: f64,
        /// 状态方程名称
        eos: String,
    },

    /// 封闭模型不支持的状态方程族
    #[error("封闭模型 {closure} 不支持状态方程 {eos}: 需要刚性气体族")]
    UnsupportedEos {
        /// 封闭模型名称
        closure: &'static str,
        /// 状态方程名称
        eos: String,
    },

    /// 封闭模型不支持的相数
    #[error("封闭模型 {closure} 不支持 {actual} 相: 至多 {max} 相")]
    PhaseCount {
        /// 封闭模型名称
        closure: &'static str,
        /// 实际相数
        actual: usize,
        /// 允许的最大相数
        max: usize,
    },
}

impl ModelError {
    /// 牛顿迭代不收敛
    pub fn non_convergence(solver: &'static str, iterations: usize, residual: f64) -> Self {
        Self::NonConvergence {
            solver,
            iterations,
            residual,
        }
    }

    /// 非物理压力
    pub fn non_physical_pressure(
        context: &'static str,
        pressure: f64,
        floor: f64,
        eos: impl Into<String>,
    ) -> Self {
        Self::NonPhysicalPressure {
            context,
            pressure,
            floor,
            eos: eos.into(),
        }
    }
}
