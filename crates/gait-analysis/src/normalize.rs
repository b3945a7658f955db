//! Time normalization of stride windows onto a percent-of-cycle grid.

use ndarray::{Array1, Array2, ArrayView1, Axis as GridAxis};
use serde::{Deserialize, Serialize};

use gait_core::{lerp, Axis, NormalizedCycle, Side, SidePair};

use crate::segmentation::StrideWindow;

/// Resample `values` onto `points` evenly spaced positions by piecewise
/// linear interpolation.
///
/// Both endpoints are reproduced exactly for any input of length >= 2.
pub fn resample(values: &[f64], points: usize) -> Vec<f64> {
    match (values.len(), points) {
        (_, 0) => return Vec::new(),
        (0, _) => return vec![0.0; points],
        (1, _) => return vec![values[0]; points],
        (_, 1) => return vec![values[0]],
        _ => {}
    }

    let last = values.len() - 1;
    (0..points)
        .map(|i| {
            let target = i as f64 / (points - 1) as f64 * last as f64;
            let x0 = (target.floor() as usize).min(last);
            let x1 = (x0 + 1).min(last);
            if x0 == x1 {
                values[x0]
            } else {
                lerp(x0 as f64, values[x0], x1 as f64, values[x1], target)
            }
        })
        .collect()
}

/// Cross-window average of one axis at every grid position.
///
/// Always returns exactly `points` entries. `std` is the population standard
/// deviation across windows; with no windows both mean and std are `0.0`.
pub fn average_cycles(
    windows: &[StrideWindow<'_>],
    axis: Axis,
    points: usize,
) -> Vec<NormalizedCycle> {
    let mut grid = Array2::<f64>::zeros((windows.len(), points));

    for (mut row, window) in grid.rows_mut().into_iter().zip(windows.iter()) {
        let resampled = resample(&window.values(axis), points);
        row.assign(&ArrayView1::from(&resampled[..]));
    }

    let (mean, std) = if windows.is_empty() {
        (Array1::zeros(points), Array1::zeros(points))
    } else {
        (
            grid.mean_axis(GridAxis(0))
                .unwrap_or_else(|| Array1::zeros(points)),
            grid.std_axis(GridAxis(0), 0.0),
        )
    };

    mean.iter()
        .zip(std.iter())
        .enumerate()
        .map(|(percent, (&mean, &std))| NormalizedCycle {
            percent: percent as u32,
            mean,
            std,
        })
        .collect()
}

/// Normalized cycles for the three axes of one side
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisCycles {
    pub x: Vec<NormalizedCycle>,
    pub y: Vec<NormalizedCycle>,
    pub z: Vec<NormalizedCycle>,
    /// Stride windows that contributed
    pub window_count: usize,
}

impl AxisCycles {
    pub fn from_windows(windows: &[StrideWindow<'_>], points: usize) -> Self {
        Self {
            x: average_cycles(windows, Axis::X, points),
            y: average_cycles(windows, Axis::Y, points),
            z: average_cycles(windows, Axis::Z, points),
            window_count: windows.len(),
        }
    }

    pub fn axis(&self, axis: Axis) -> &[NormalizedCycle] {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

/// Representative cycle curves per side and axis
pub type CycleProfiles = SidePair<AxisCycles>;

/// Normalize the stride windows of both sides
pub fn cycle_profiles<'a>(
    mut windows_for: impl FnMut(Side) -> Vec<StrideWindow<'a>>,
    points: usize,
) -> CycleProfiles {
    SidePair::from_fn(|side| AxisCycles::from_windows(&windows_for(side), points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gait_core::{ConditionedSample, RawSample};

    fn samples_from(values: &[f64]) -> Vec<ConditionedSample> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| ConditionedSample::new(RawSample::new(i as f64, v, v, v), v, v, v))
            .collect()
    }

    fn window(samples: &[ConditionedSample]) -> StrideWindow<'_> {
        StrideWindow {
            side: Side::Left,
            start_time: samples[0].time(),
            end_time: samples[samples.len() - 1].time(),
            samples,
        }
    }

    #[test]
    fn test_resample_endpoints_exact() {
        for len in [2usize, 3, 7, 51, 100, 137, 400] {
            let values: Vec<f64> = (0..len).map(|i| (i as f64 * 0.37).sin() * 3.1 + 0.01).collect();
            let out = resample(&values, 100);

            assert_eq!(out.len(), 100);
            assert_eq!(out[0], values[0]);
            assert_eq!(out[99], values[len - 1]);
        }
    }

    #[test]
    fn test_resample_length() {
        let values = [1.0, 2.0, 3.0];
        for points in [2usize, 5, 100, 1000] {
            assert_eq!(resample(&values, points).len(), points);
        }
        assert!(resample(&values, 0).is_empty());
        assert_eq!(resample(&[], 4), vec![0.0; 4]);
        assert_eq!(resample(&[5.0], 3), vec![5.0; 3]);
    }

    #[test]
    fn test_resample_linear_ramp() {
        let values = [0.0, 10.0];
        let out = resample(&values, 11);
        for (i, v) in out.iter().enumerate() {
            assert!((v - i as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn test_resample_monotonic_input_stays_monotonic() {
        let values: Vec<f64> = (0..37).map(|i| (i * i) as f64).collect();
        let out = resample(&values, 100);
        for w in out.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn test_average_no_windows() {
        let cycles = average_cycles(&[], Axis::Y, 100);
        assert_eq!(cycles.len(), 100);
        assert!(cycles.iter().all(|c| c.mean == 0.0 && c.std == 0.0));
        assert_eq!(cycles[99].percent, 99);
    }

    #[test]
    fn test_average_across_windows() {
        let a = samples_from(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let b = samples_from(&[2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0]);
        let windows = vec![window(&a), window(&b)];

        let cycles = average_cycles(&windows, Axis::X, 100);

        assert_eq!(cycles.len(), 100);
        for c in &cycles {
            assert!((c.mean - 1.0).abs() < 1e-12);
            assert!((c.std - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_single_window_has_zero_spread() {
        let a = samples_from(&[1.0, 3.0, 5.0, 7.0, 9.0, 11.0]);
        let cycles = average_cycles(&[window(&a)], Axis::Z, 100);

        assert_eq!(cycles[0].mean, 1.0);
        assert_eq!(cycles[99].mean, 11.0);
        assert!(cycles.iter().all(|c| c.std == 0.0));
    }

    #[test]
    fn test_axis_cycles_counts() {
        let a = samples_from(&[1.0; 10]);
        let cycles = AxisCycles::from_windows(&[window(&a), window(&a)], 50);

        assert_eq!(cycles.window_count, 2);
        assert_eq!(cycles.axis(Axis::Y).len(), 50);
    }
}
