// crates/pf_physics/src/engine/sweep.rs

//! 界面并行扫掠
//!
//! 对网格所有界面的并行映射：每个内部界面求解只读取相邻两个
//! 单元的状态、网格几何与只读共享的状态方程集；边界界面另读取
//! 该边界实例持有的参数。界面求解互不依赖，以任意顺序并发执行。
//!
//! 每个并行任务独占一个 `FluxBuffer` 与一个部分残差累加器，
//! 扫掠结束后按线程合并——同一单元的两个界面可能落在不同线程，
//! 通量施加绝不跨线程直接写同一单元。
//!
//! 牛顿不收敛通过 `?` 中止整个扫掠并上交运行驱动层，不做重试。

use rayon::prelude::*;

use pf_foundation::{PfError, PfResult};

use crate::boundary::{InflowParameters, OutflowParameters, TankParameters};
use crate::error::ModelResult;
use crate::riemann::{DtBound, FluxBuffer, InterfaceBasis, RiemannSolver};
use crate::state::CellState;

use super::accumulator::ResidualAccumulator;

// ============================================================
// 界面描述
// ============================================================

/// 边界面条件
pub enum BoundaryFace {
    /// 固壁（无参数）
    Wall,
    /// 给定静压出流
    Outflow(OutflowParameters),
    /// 给定质量流量入流
    Inflow(InflowParameters),
    /// 滞止储罐
    Tank(TankParameters),
}

/// 界面类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    /// 内部界面：左右两个计算单元
    Interior {
        /// 左单元索引
        left: usize,
        /// 右单元索引
        right: usize,
    },
    /// 边界界面：一个计算单元加一个边界条件
    Boundary {
        /// 单元索引
        cell: usize,
        /// 边界条件索引（指向 [`FluxSweep`] 的边界表）
        boundary: usize,
    },
}

/// 一个界面的几何与拓扑
///
/// 由外部网格层提供：局部正交基、左右特征单元尺度与面积。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interface {
    /// 界面类别
    pub kind: InterfaceKind,
    /// 界面局部正交基（法向指向右侧/域外）
    pub basis: InterfaceBasis,
    /// 左单元特征尺度 [m]
    pub dx_left: f64,
    /// 右单元特征尺度 [m]（边界界面未使用）
    pub dx_right: f64,
    /// 界面面积 [m²]
    pub area: f64,
}

// ============================================================
// 扫掠输出
// ============================================================

/// 一次扫掠的输出
pub struct SweepOutput {
    /// 合并后的单元残差
    pub residuals: ResidualAccumulator,
    /// 收紧后的 CFL 时间步上界（单调减小，绝不增大）
    pub dt_max: f64,
    /// 各出流边界本步的各相质量流量之和（非出流边界为零）
    pub outflow_mass_rates: Vec<Vec<f64>>,
}

// ============================================================
// 扫掠执行器
// ============================================================

/// 按线程的扫掠任务状态
struct SweepTask {
    residuals: ResidualAccumulator,
    dt: DtBound,
    flux: FluxBuffer,
    outflow_rates: Vec<Vec<f64>>,
    rate_scratch: Vec<f64>,
}

impl SweepTask {
    fn new(n_cells: usize, n_phases: usize, n_transports: usize, n_boundaries: usize, dt_max: f64) -> Self {
        Self {
            residuals: ResidualAccumulator::new(n_cells, n_phases, n_transports),
            dt: DtBound::new(dt_max),
            flux: FluxBuffer::new(n_phases, n_transports),
            outflow_rates: vec![vec![0.0; n_phases]; n_boundaries],
            rate_scratch: vec![0.0; n_phases],
        }
    }

    fn merge(mut self, other: Self) -> Self {
        self.residuals.merge(&other.residuals);
        self.dt.merge(&other.dt);
        for (a, b) in self.outflow_rates.iter_mut().zip(&other.outflow_rates) {
            for (x, y) in a.iter_mut().zip(b) {
                *x += y;
            }
        }
        self
    }
}

/// 通量扫掠执行器
///
/// 持有求解器、界面表与边界条件表；单元状态在每次扫掠时传入。
pub struct FluxSweep<S: RiemannSolver> {
    solver: S,
    interfaces: Vec<Interface>,
    boundaries: Vec<BoundaryFace>,
    n_transports: usize,
}

impl<S: RiemannSolver> FluxSweep<S> {
    /// 创建扫掠执行器并校验界面/边界表的一致性
    pub fn new(
        solver: S,
        interfaces: Vec<Interface>,
        boundaries: Vec<BoundaryFace>,
        n_transports: usize,
    ) -> PfResult<Self> {
        let n_phases = solver.n_phases();
        for iface in &interfaces {
            if let InterfaceKind::Boundary { boundary, .. } = iface.kind {
                if boundary >= boundaries.len() {
                    return Err(PfError::invalid_input(format!(
                        "边界索引 {boundary} 超出边界表长度 {}",
                        boundaries.len()
                    )));
                }
            }
        }
        for face in &boundaries {
            match face {
                BoundaryFace::Inflow(p) => {
                    PfError::check_size("InflowParameters::alpha", n_phases, p.alpha.len())?;
                    PfError::check_size(
                        "InflowParameters::transports",
                        n_transports,
                        p.transports.len(),
                    )?;
                }
                BoundaryFace::Tank(p) => {
                    PfError::check_size(
                        "TankParameters::transports",
                        n_transports,
                        p.transports().len(),
                    )?;
                }
                BoundaryFace::Wall | BoundaryFace::Outflow(_) => {}
            }
        }
        log::info!(
            "通量扫掠初始化: {} 界面, {} 边界, {} 相",
            interfaces.len(),
            boundaries.len(),
            n_phases
        );
        Ok(Self {
            solver,
            interfaces,
            boundaries,
            n_transports,
        })
    }

    /// 求解器
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// 界面表
    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    /// 对所有界面做一次并行扫掠
    ///
    /// `time` 为当前物理时间（驱动时变储罐表查询），`dt_max` 为
    /// 传入的时间步上界；输出的上界只会更小。
    pub fn sweep(
        &self,
        cells: &[CellState],
        time: f64,
        dt_max: f64,
    ) -> ModelResult<SweepOutput> {
        let n_phases = self.solver.n_phases();
        let make_task = || {
            SweepTask::new(
                cells.len(),
                n_phases,
                self.n_transports,
                self.boundaries.len(),
                dt_max,
            )
        };

        let task = self
            .interfaces
            .par_iter()
            .try_fold(make_task, |mut task, iface| -> ModelResult<SweepTask> {
                self.solve_one(cells, time, iface, &mut task)?;
                Ok(task)
            })
            .try_reduce(make_task, |a, b| Ok(a.merge(b)))?;

        Ok(SweepOutput {
            residuals: task.residuals,
            dt_max: task.dt.value(),
            outflow_mass_rates: task.outflow_rates,
        })
    }

    /// 求解单个界面并把通量累加到任务的部分残差
    fn solve_one(
        &self,
        cells: &[CellState],
        time: f64,
        iface: &Interface,
        task: &mut SweepTask,
    ) -> ModelResult<()> {
        match iface.kind {
            InterfaceKind::Interior { left, right } => {
                let (l, r) = (&cells[left], &cells[right]);
                self.solver.solve_interface(
                    l,
                    r,
                    &iface.basis,
                    iface.dx_left,
                    iface.dx_right,
                    &mut task.dt,
                    &mut task.flux,
                );
                self.solver.solve_transport_interface(l, r, &mut task.flux);
                task.residuals.apply(left, &task.flux, -iface.area);
                task.residuals.apply(right, &task.flux, iface.area);
            }
            InterfaceKind::Boundary { cell, boundary } => {
                let l = &cells[cell];
                match &self.boundaries[boundary] {
                    BoundaryFace::Wall => {
                        self.solver
                            .solve_wall(l, &iface.basis, iface.dx_left, &mut task.dt, &mut task.flux);
                        self.solver.solve_transport_wall(&mut task.flux);
                    }
                    BoundaryFace::Outflow(params) => {
                        self.solver.solve_outflow(
                            l,
                            &iface.basis,
                            iface.dx_left,
                            &mut task.dt,
                            params.p0,
                            &mut task.flux,
                            &mut task.rate_scratch,
                        );
                        for (sum, rate) in task.outflow_rates[boundary]
                            .iter_mut()
                            .zip(&task.rate_scratch)
                        {
                            *sum += rate;
                        }
                        self.solver.solve_transport_outflow(l, &mut task.flux);
                    }
                    BoundaryFace::Inflow(params) => {
                        self.solver.solve_inflow(
                            l,
                            &iface.basis,
                            iface.dx_left,
                            &mut task.dt,
                            params,
                            &mut task.flux,
                        )?;
                        self.solver
                            .solve_transport_inflow(l, &params.transports, &mut task.flux);
                    }
                    BoundaryFace::Tank(params) => {
                        let reservoir = params.resolve(time, self.solver.eos_set());
                        self.solver.solve_tank(
                            l,
                            &iface.basis,
                            iface.dx_left,
                            &mut task.dt,
                            &reservoir,
                            &mut task.flux,
                        )?;
                        self.solver
                            .solve_transport_tank(l, &reservoir.transports, &mut task.flux);
                    }
                }
                task.residuals.apply(cell, &task.flux, -iface.area);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eos::{EosSet, EquationOfState, IdealGas, StiffenedGas};
    use crate::mixture::MultiPClosure;
    use crate::riemann::MultiPRiemann;
    use crate::state::{MixtureState, PhaseState, Phases};
    use glam::DVec3;
    use std::sync::Arc;

    fn eos_set() -> EosSet {
        vec![
            Arc::new(StiffenedGas::new("water", 4.4, 6.0e8, 1000.0, 0.0, 0.0).unwrap())
                as Arc<dyn EquationOfState>,
            Arc::new(IdealGas::new("air", 1.4, 717.5, 0.0, 0.0).unwrap()),
        ]
    }

    fn cell(p: f64, u: f64) -> CellState {
        let closure = MultiPClosure::new(eos_set());
        let phases = Phases::new(vec![
            PhaseState::new(0.3, 1000.0, p),
            PhaseState::new(0.7, 1.2, p),
        ])
        .unwrap();
        let mixture = MixtureState {
            velocity: DVec3::new(u, 0.0, 0.0),
            ..Default::default()
        };
        let mut cell = CellState::new(phases, mixture);
        closure.fulfill_state(&mut cell);
        cell
    }

    /// 3 单元 1D 网格，左右固壁
    fn closed_box() -> (FluxSweep<MultiPRiemann>, Vec<CellState>) {
        let dx = 0.1;
        let interfaces = vec![
            Interface {
                kind: InterfaceKind::Boundary { cell: 0, boundary: 0 },
                basis: InterfaceBasis::new(-DVec3::X, -DVec3::Y, DVec3::Z),
                dx_left: dx,
                dx_right: dx,
                area: 1.0,
            },
            Interface {
                kind: InterfaceKind::Interior { left: 0, right: 1 },
                basis: InterfaceBasis::x_axis(),
                dx_left: dx,
                dx_right: dx,
                area: 1.0,
            },
            Interface {
                kind: InterfaceKind::Interior { left: 1, right: 2 },
                basis: InterfaceBasis::x_axis(),
                dx_left: dx,
                dx_right: dx,
                area: 1.0,
            },
            Interface {
                kind: InterfaceKind::Boundary { cell: 2, boundary: 0 },
                basis: InterfaceBasis::x_axis(),
                dx_left: dx,
                dx_right: dx,
                area: 1.0,
            },
        ];
        let sweep = FluxSweep::new(
            MultiPRiemann::new(eos_set()),
            interfaces,
            vec![BoundaryFace::Wall],
            0,
        )
        .unwrap();
        let cells = vec![cell(3.0e5, 0.0), cell(1.0e5, 0.0), cell(1.0e5, 0.0)];
        (sweep, cells)
    }

    #[test]
    fn test_closed_box_conserves_mass() {
        // 固壁封闭盒内，所有单元质量残差之和严格为零
        let (sweep, cells) = closed_box();
        let out = sweep.sweep(&cells, 0.0, 1.0).unwrap();

        for k in 0..2 {
            let total: f64 = (0..3).map(|c| out.residuals.mass_of(c)[k]).sum();
            assert!(
                total.abs() < 1e-9,
                "phase {k} mass residual sum = {total:e}"
            );
        }
    }

    #[test]
    fn test_sweep_tightens_dt() {
        let (sweep, cells) = closed_box();
        let out = sweep.sweep(&cells, 0.0, 1.0).unwrap();
        assert!(out.dt_max < 1.0);
        assert!(out.dt_max > 0.0);

        // 传入更小的上界时输出不会变大
        let out2 = sweep.sweep(&cells, 0.0, out.dt_max * 0.5).unwrap();
        assert!(out2.dt_max <= out.dt_max * 0.5);
    }

    #[test]
    fn test_outflow_rates_reported() {
        let dx = 0.1;
        let interfaces = vec![Interface {
            kind: InterfaceKind::Boundary { cell: 0, boundary: 0 },
            basis: InterfaceBasis::x_axis(),
            dx_left: dx,
            dx_right: dx,
            area: 1.0,
        }];
        let sweep = FluxSweep::new(
            MultiPRiemann::new(eos_set()),
            interfaces,
            vec![BoundaryFace::Outflow(OutflowParameters::new(1.0e5).unwrap())],
            0,
        )
        .unwrap();
        let cells = vec![cell(2.0e5, 2.0)];

        let out = sweep.sweep(&cells, 0.0, 1.0).unwrap();
        // 出流为正方向的质量流量
        assert!(out.outflow_mass_rates[0].iter().all(|&r| r > 0.0));
        // 残差与上报的流量一致（所有者取负）
        for k in 0..2 {
            assert!(
                (out.residuals.mass_of(0)[k] + out.outflow_mass_rates[0][k]).abs() < 1e-12
            );
        }
    }

    #[test]
    fn test_invalid_boundary_index_rejected() {
        let interfaces = vec![Interface {
            kind: InterfaceKind::Boundary { cell: 0, boundary: 3 },
            basis: InterfaceBasis::x_axis(),
            dx_left: 0.1,
            dx_right: 0.1,
            area: 1.0,
        }];
        let result = FluxSweep::new(
            MultiPRiemann::new(eos_set()),
            interfaces,
            vec![BoundaryFace::Wall],
            0,
        );
        assert!(result.is_err());
    }
}
