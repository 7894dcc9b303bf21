// crates/pf_physics/src/riemann/transport.rs

//! 被动输运标量的界面通量
//!
//! 所有被动标量用已求得的接触波速 sM 做一阶迎风对流。
//! 输运通量总是在同一界面的流体动力学求解之后立即计算，
//! 依赖其写入 `FluxBuffer` 的 sM。

use super::flux::FluxBuffer;

/// 内部界面：按 sM 符号迎风
pub fn solve_interior(flux: &mut FluxBuffer, left: &[f64], right: &[f64]) {
    let s_m = flux.s_m;
    for (i, value) in flux.transports.iter_mut().enumerate() {
        *value = if s_m > 0.0 {
            left[i] * s_m
        } else {
            right[i] * s_m
        };
    }
}

/// 壁面：零通量
pub fn solve_wall(flux: &mut FluxBuffer) {
    flux.transports.fill(0.0);
}

/// 入流/储罐：出流时取左单元值，入流时取储源值
pub fn solve_reservoir(flux: &mut FluxBuffer, left: &[f64], values0: &[f64]) {
    let s_m = flux.s_m;
    for (i, value) in flux.transports.iter_mut().enumerate() {
        *value = if s_m > 0.0 {
            left[i] * s_m
        } else {
            values0[i] * s_m
        };
    }
}

/// 出流：总是取左单元值
pub fn solve_outflow(flux: &mut FluxBuffer, left: &[f64]) {
    let s_m = flux.s_m;
    for (i, value) in flux.transports.iter_mut().enumerate() {
        *value = left[i] * s_m;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(s_m: f64) -> FluxBuffer {
        let mut flux = FluxBuffer::new(1, 2);
        flux.s_m = s_m;
        flux
    }

    #[test]
    fn test_interior_upwind_left() {
        let mut flux = buffer(2.0);
        solve_interior(&mut flux, &[1.0, 3.0], &[10.0, 30.0]);
        assert_eq!(flux.transports, vec![2.0, 6.0]);
    }

    #[test]
    fn test_interior_upwind_right() {
        let mut flux = buffer(-2.0);
        solve_interior(&mut flux, &[1.0, 3.0], &[10.0, 30.0]);
        assert_eq!(flux.transports, vec![-20.0, -60.0]);
    }

    #[test]
    fn test_interior_zero_sm() {
        let mut flux = buffer(0.0);
        solve_interior(&mut flux, &[1.0, 3.0], &[10.0, 30.0]);
        assert_eq!(flux.transports, vec![0.0, 0.0]);
    }

    #[test]
    fn test_wall_zero() {
        let mut flux = buffer(5.0);
        flux.transports = vec![9.0, 9.0];
        solve_wall(&mut flux);
        assert_eq!(flux.transports, vec![0.0, 0.0]);
    }

    #[test]
    fn test_reservoir_inflow_uses_reservoir_value() {
        let mut flux = buffer(-1.5);
        solve_reservoir(&mut flux, &[1.0, 2.0], &[100.0, 200.0]);
        assert_eq!(flux.transports, vec![-150.0, -300.0]);
    }

    #[test]
    fn test_reservoir_outflow_uses_left_value() {
        let mut flux = buffer(1.5);
        solve_reservoir(&mut flux, &[1.0, 2.0], &[100.0, 200.0]);
        assert_eq!(flux.transports, vec![1.5, 3.0]);
    }

    #[test]
    fn test_outflow_always_left() {
        let mut flux = buffer(-1.0);
        solve_outflow(&mut flux, &[4.0, 5.0]);
        assert_eq!(flux.transports, vec![-4.0, -5.0]);
    }
}
