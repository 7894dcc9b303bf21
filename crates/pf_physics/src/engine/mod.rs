// crates/pf_physics/src/engine/mod.rs

//! 引擎核心
//!
//! - 残差累加 (accumulator) - 将界面通量累加到相邻单元的残差，
//!   支持按线程的部分和与合并
//! - 界面扫掠 (sweep) - 对所有界面的并行映射，每个任务独占自己的
//!   通量暂存，输出合并后的残差、收紧的时间步上界与出流边界的
//!   质量流量

mod accumulator;
mod sweep;

pub use accumulator::ResidualAccumulator;
pub use sweep::{BoundaryFace, FluxSweep, Interface, InterfaceKind, SweepOutput};
