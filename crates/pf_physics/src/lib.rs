// crates/pf_physics/src/lib.rs

//! 物理求解器模块
//!
//! 提供多相可压缩流的数值通量计算功能，包括：
//! - 状态方程层 (eos) - 刚性气体 / 理想气体封闭式热力学关系
//! - 状态管理 (state) - 相状态、混合物状态与单元状态
//! - 混合物封闭 (mixture) - 热平衡与多压力两种封闭模型
//! - 黎曼求解器 (riemann) - 内部界面与四类边界的半黎曼求解
//! - 边界参数 (boundary) - 储罐/入流/出流参数与时变表
//! - 引擎核心 (engine) - 并行界面扫掠与残差累加
//!
//! # Trait 抽象
//!
//! - [`EquationOfState`]: 单相热力学封闭关系接口
//! - [`RiemannSolver`]: 界面通量求解接口，按封闭模型各有一个实现
//!
//! 黎曼求解层对具体状态方程保持多态，从不按具体定律分支。

pub mod boundary;
pub mod engine;
pub mod error;
pub mod eos;
pub mod mixture;
pub mod riemann;
pub mod state;

// 重导出常用类型
pub use error::{ModelError, ModelResult};
pub use eos::{EosSet, EquationOfState, IdealGas, StiffenedCoefficients, StiffenedGas};
pub use mixture::{MultiPClosure, ThermalEqClosure};
pub use riemann::{
    DtBound, FluxBuffer, InterfaceBasis, MultiPRiemann, RiemannSolver, ThermalEqRiemann,
};
pub use state::{CellState, MixtureState, PhaseState, Phases};

// 重导出边界条件类型
pub use boundary::{
    Composition, InflowParameters, OutflowParameters, ReservoirState, TankParameters, TimeTable,
};

// 重导出引擎类型
pub use engine::{
    BoundaryFace, FluxSweep, Interface, InterfaceKind, ResidualAccumulator, SweepOutput,
};
