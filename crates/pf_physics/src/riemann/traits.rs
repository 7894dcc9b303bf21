// crates/pf_physics/src/riemann/traits.rs

//! 黎曼求解器统一接口与 CFL 时间步上界

use glam::DVec3;

use pf_foundation::NumericalTolerance;

use crate::boundary::{InflowParameters, ReservoirState};
use crate::eos::EosSet;
use crate::error::ModelResult;
use crate::state::CellState;

use super::flux::{FluxBuffer, InterfaceBasis};
use super::transport;

/// CFL 时间步上界累积器
///
/// 每处理一个界面单调收紧一次，绝不放宽。接近零的波速
/// （|s| 低于下限）不参与限制，避免接近静止的波导致步长僵化。
#[derive(Debug, Clone, Copy)]
pub struct DtBound {
    dt: f64,
    floor: f64,
}

impl DtBound {
    /// 以初始上界创建
    pub fn new(dt_max: f64) -> Self {
        Self {
            dt: dt_max,
            floor: NumericalTolerance::default().wave_speed_floor,
        }
    }

    /// 指定波速下限
    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = floor;
        self
    }

    /// 用波速 s 与单元尺度 dx 收紧上界
    #[inline]
    pub fn restrict(&mut self, dx: f64, s: f64) {
        if s.abs() > self.floor {
            self.dt = self.dt.min(dx / s.abs());
        }
    }

    /// 与另一累积器合并（取较小者）
    #[inline]
    pub fn merge(&mut self, other: &DtBound) {
        self.dt = self.dt.min(other.dt);
    }

    /// 当前上界
    #[inline]
    pub fn value(&self) -> f64 {
        self.dt
    }
}

/// 黎曼求解器 trait
///
/// 每个混合物封闭模型各有一个实现。所有方法为有界迭代的纯数值
/// 计算（牛顿循环上限 50 次），无阻塞、无挂起；各界面求解互不
/// 依赖，可以以任意顺序并发执行，但每次调用必须使用调用方独占
/// 的 `FluxBuffer`。
pub trait RiemannSolver: Send + Sync {
    /// 求解器名称
    fn name(&self) -> &'static str;

    /// 相数
    fn n_phases(&self) -> usize;

    /// 按相索引的状态方程集
    fn eos_set(&self) -> &EosSet;

    /// 内部界面求解（两个计算单元之间）
    ///
    /// 通量写入 `flux`（动量已旋转回全局坐标系），同时收紧 `dt`。
    #[allow(clippy::too_many_arguments)]
    fn solve_interface(
        &self,
        left: &CellState,
        right: &CellState,
        basis: &InterfaceBasis,
        dx_left: f64,
        dx_right: f64,
        dt: &mut DtBound,
        flux: &mut FluxBuffer,
    );

    /// 壁面边界求解
    ///
    /// 反射闭式解：各相质量/能量通量为零，动量通量来自镜像速度
    /// 的声学关系 `p* = ρL(uL-sL)uL + pL`，`sL = min(uL-cL, -uL-cL)`。
    fn solve_wall(
        &self,
        left: &CellState,
        basis: &InterfaceBasis,
        dx_left: f64,
        dt: &mut DtBound,
        flux: &mut FluxBuffer,
    ) {
        let (u_l, _, _) = basis.local_components(left.mixture.velocity);
        let c_l = left.mixture.sound_speed;
        let p_l = left.mixture.pressure;
        let rho_l = left.mixture.density;

        let s_l = (u_l - c_l).min(-u_l - c_l);
        dt.restrict(dx_left, s_l);

        let p_star = rho_l * (u_l - s_l) * u_l + p_l;

        flux.reset();
        flux.momentum = DVec3::new(p_star, 0.0, 0.0);
        flux.reverse_projection(basis);
    }

    /// 出流边界求解（给定静压 p0）
    ///
    /// 左行等熵波假设。病态情形（超声速出流、接触速度指示实际
    /// 入流）原样复制左状态。各相穿越边界的质量流量写入
    /// `mass_rates` 供调用方做储量记账。
    #[allow(clippy::too_many_arguments)]
    fn solve_outflow(
        &self,
        left: &CellState,
        basis: &InterfaceBasis,
        dx_left: f64,
        dt: &mut DtBound,
        p0: f64,
        flux: &mut FluxBuffer,
        mass_rates: &mut [f64],
    );

    /// 入流边界求解（给定质量流量与储源组分）
    ///
    /// 星区压力的牛顿迭代；超过迭代上限返回致命的
    /// [`ModelError::NonConvergence`](crate::error::ModelError)。
    fn solve_inflow(
        &self,
        left: &CellState,
        basis: &InterfaceBasis,
        dx_left: f64,
        dt: &mut DtBound,
        inflow: &InflowParameters,
        flux: &mut FluxBuffer,
    ) -> ModelResult<()>;

    /// 储罐边界求解（给定滞止压力/温度与组分）
    ///
    /// 三分支判别：超声速出流 / 亚声速出流 / 真实储罐入流
    /// （后者为牛顿迭代）。
    fn solve_tank(
        &self,
        left: &CellState,
        basis: &InterfaceBasis,
        dx_left: f64,
        dt: &mut DtBound,
        reservoir: &ReservoirState,
        flux: &mut FluxBuffer,
    ) -> ModelResult<()>;

    // --------------------------------------------------------------------
    // 被动输运求解
    //
    // 紧跟同一界面的流体动力学求解执行，消费其接触波速 sM。
    // --------------------------------------------------------------------

    /// 内部界面输运：按 sM 符号迎风
    fn solve_transport_interface(&self, left: &CellState, right: &CellState, flux: &mut FluxBuffer) {
        transport::solve_interior(flux, &left.transports, &right.transports);
    }

    /// 壁面输运：零通量
    fn solve_transport_wall(&self, flux: &mut FluxBuffer) {
        transport::solve_wall(flux);
    }

    /// 入流输运：从外部给定的储源值迎风
    fn solve_transport_inflow(&self, left: &CellState, values0: &[f64], flux: &mut FluxBuffer) {
        transport::solve_reservoir(flux, &left.transports, values0);
    }

    /// 储罐输运：从外部给定的储源值迎风
    fn solve_transport_tank(&self, left: &CellState, values0: &[f64], flux: &mut FluxBuffer) {
        transport::solve_reservoir(flux, &left.transports, values0);
    }

    /// 出流输运：从左单元值迎风
    fn solve_transport_outflow(&self, left: &CellState, flux: &mut FluxBuffer) {
        transport::solve_outflow(flux, &left.transports);
    }
}
