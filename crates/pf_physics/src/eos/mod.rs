// crates/pf_physics/src/eos/mod.rs

//! 状态方程层
//!
//! 为单相流体提供封闭式热力学关系：压力/密度/能量/温度/声速
//! 的相互换算、等熵与 Hugoniot 关系、以及入流/储罐求解器使用的
//! 比容三元组。
//!
//! # 多态设计
//!
//! 所有定律实现 [`EquationOfState`] trait，黎曼求解层只通过该
//! trait 访问热力学关系，从不按具体定律分支。具体定律在配置阶段
//! 按名称选择。
//!
//! # 可用定律
//!
//! - [`StiffenedGas`]: 刚性气体，适用于液相与高压气相
//! - [`IdealGas`]: 理想气体，刚性气体在 pInf = 0 时的退化形式

mod ideal_gas;
mod stiffened_gas;
mod traits;

pub use ideal_gas::IdealGas;
pub use stiffened_gas::StiffenedGas;
pub use traits::{EosSet, EquationOfState, StiffenedCoefficients, EPSILON};
