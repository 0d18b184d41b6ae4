use plotters::prelude::*;
use tracing::{info, warn};

use crate::threaded_impl::processing_thread::CalibrationReport;

/// Draws the recorded raw trace, the confirmed turning points and the final
/// bounds into a PNG at `path`.
pub fn render_calibration_chart(
    report: &CalibrationReport,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(first), Some(last)) = (report.trace.first(), report.trace.last()) else {
        warn!(path, "no samples recorded, skipping calibration chart");
        return Ok(());
    };

    let t_min = first.timestamp.as_secs_f64();
    let t_max = last.timestamp.as_secs_f64().max(t_min + 1e-3);
    let (v_min, v_max) = report
        .trace
        .iter()
        .map(|r| r.value)
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !v_min.is_finite() {
        warn!(path, "trace holds no finite values, skipping calibration chart");
        return Ok(());
    }
    let pad = ((v_max - v_min) * 0.1).max(1.0);

    let root = BitMapBackend::new(path, (1024, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Range of motion calibration", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(t_min..t_max, (v_min - pad)..(v_max + pad))?;

    chart.configure_mesh().x_desc("Time (s)").y_desc("Distance").draw()?;

    chart.draw_series(LineSeries::new(
        report.trace.iter().map(|r| (r.timestamp.as_secs_f64(), r.value)),
        &BLUE,
    ))?;

    chart.draw_series(
        report
            .turning_points
            .iter()
            .filter(|tp| tp.time.as_secs_f64() >= t_min)
            .map(|tp| Circle::new((tp.time.as_secs_f64(), tp.value), 5, RED.filled())),
    )?;

    if let Some(bounds) = report.bounds {
        for level in [bounds.low(), bounds.high()] {
            chart.draw_series(LineSeries::new(vec![(t_min, level), (t_max, level)], &GREEN))?;
        }
    }

    root.present()?;
    info!(path, "calibration chart written");
    Ok(())
}
