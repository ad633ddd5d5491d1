use crate::api::types::ProfilerSample;

/// Format renderer timings as aligned lines. The first sample is the
/// whole frame and every percentage is relative to it.
pub fn format_report(samples: &[ProfilerSample]) -> Vec<String> {
    let Some(total) = samples.first() else {
        return Vec::new();
    };
    let width = samples.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let total_nanos = total.nanos.max(1) as f64;

    let mut lines = Vec::with_capacity(samples.len() + 1);
    for sample in samples {
        let ms = sample.nanos as f64 / 1e6;
        let percent = sample.nanos as f64 / total_nanos * 100.0;
        lines.push(format!("{:<width$} {:>9.3}ms {:>6.1}%", sample.name, ms, percent));
    }
    lines.push("-".repeat(width + 19));
    lines
}
