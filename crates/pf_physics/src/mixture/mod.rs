// crates/pf_physics/src/mixture/mod.rs

//! 混合物封闭模型
//!
//! 定义相状态如何组合为混合物状态，两种可互换的封闭：
//!
//! - [`ThermalEqClosure`]: 机械 + 热平衡，各相共享单一压力与温度，
//!   仅支持至多两相的刚性气体族流体，提供解析等熵关系与
//!   解析混合压力求解
//! - [`MultiPClosure`]: 仅机械弛豫，各相保留独立压力与温度，
//!   混合物量为体积/质量分数加权和
//!
//! 边界求解器所需的跨相耦合：热平衡封闭内嵌混合物等熵关系；
//! 多压力封闭不内嵌任何耦合，由黎曼求解器逐相调用状态方程完成。

mod multip;
mod thermal_eq;

pub use multip::MultiPClosure;
pub use thermal_eq::ThermalEqClosure;
