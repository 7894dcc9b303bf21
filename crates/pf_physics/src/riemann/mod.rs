// crates/pf_physics/src/riemann/mod.rs

//! 黎曼通量引擎
//!
//! 给定相邻两个控制体的状态（或单个控制体加边界条件），计算穿过
//! 公共界面的数值通量，与活动混合物封闭模型保持一致。
//!
//! # 组成
//!
//! - [`FluxBuffer`]: 单次界面求解的通量暂存，由调用方独占持有
//! - [`InterfaceBasis`]: 界面局部正交基（法向/切向/副法向）
//! - [`DtBound`]: CFL 时间步上界累积器
//! - [`RiemannSolver`]: 统一求解接口（内部界面 + 四类边界 + 输运）
//! - [`MultiPRiemann`] / [`ThermalEqRiemann`]: 按封闭模型的两个实现
//!
//! # 求解结构
//!
//! 内部界面使用 Davis 波速估计的 HLLC 型三波近似求解；壁面为
//! 反射闭式解；出流为左行等熵波假设；入流与储罐边界为星区压力
//! 的牛顿迭代，迭代上限 50 次，不收敛为致命错误，无回退策略。

mod flux;
mod multip;
mod thermal_eq;
pub mod transport;
mod traits;

pub use flux::{FluxBuffer, InterfaceBasis};
pub use multip::MultiPRiemann;
pub use thermal_eq::ThermalEqRiemann;
pub use traits::{DtBound, RiemannSolver};
