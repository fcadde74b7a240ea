// ASCII field rendering for the --watch mode: values map onto an
// intensity ramp, downsampled to fit the terminal.

const RAMP: &[u8] = b" .:-=+*#%@";

/// Map a value in [min, max] to a ramp character.
fn ramp_char(v: f64, min: f64, max: f64) -> char {
    let span = max - min;
    if span.abs() < 1e-12 {
        return RAMP[0] as char;
    }
    let t = ((v - min) / span).clamp(0.0, 1.0);
    let i = (t * (RAMP.len() - 1) as f64).round() as usize;
    RAMP[i] as char
}

/// Render a 1-D profile as a single character row of at most `cols`
/// characters, bucket-averaging when the grid is wider than the terminal.
pub fn render_profile(u: &[f64], cols: usize) -> String {
    if u.is_empty() || cols == 0 {
        return String::new();
    }
    let cols = cols.min(u.len());
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for &v in u {
        min = min.min(v);
        max = max.max(v);
    }
    let mut out = String::with_capacity(cols);
    for c in 0..cols {
        let lo = c * u.len() / cols;
        let hi = ((c + 1) * u.len() / cols).max(lo + 1);
        let avg: f64 = u[lo..hi].iter().sum::<f64>() / (hi - lo) as f64;
        out.push(ramp_char(avg, min, max));
    }
    out
}

/// Render a row-major 2-D field as stacked rows, top row last so y grows
/// upward on screen. Rows are sampled down to `max_rows`, columns bucketed
/// to `cols`.
pub fn render_field(u: &[f64], nx: usize, ny: usize, cols: usize, max_rows: usize) -> String {
    if nx == 0 || ny == 0 || u.len() < nx * ny || cols == 0 || max_rows == 0 {
        return String::new();
    }
    let rows = ny.min(max_rows);
    let mut out = String::new();
    for r in 0..rows {
        // Sample from the top of the grid downward.
        let y = if rows > 1 { (rows - 1 - r) * (ny - 1) / (rows - 1) } else { 0 };
        let row = &u[y * nx..(y + 1) * nx];
        out.push_str(&render_profile(row, cols));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_profile_renders_blank() {
        let s = render_profile(&[1.0; 40], 40);
        assert_eq!(s.len(), 40);
        assert!(s.chars().all(|c| c == ' '), "flat field has no relief: {:?}", s);
    }

    #[test]
    fn test_peak_maps_to_top_of_ramp() {
        let mut u = vec![1.0; 40];
        u[20] = 2.0;
        let s = render_profile(&u, 40);
        let chars: Vec<char> = s.chars().collect();
        assert_eq!(chars[20], '@', "the maximum should hit the ramp top");
        assert_eq!(chars[0], ' ', "background sits at the ramp bottom");
    }

    #[test]
    fn test_downsampling_keeps_width() {
        let u: Vec<f64> = (0..400).map(|i| i as f64).collect();
        let s = render_profile(&u, 80);
        assert_eq!(s.chars().count(), 80);
    }

    #[test]
    fn test_narrow_grid_not_padded() {
        let s = render_profile(&[0.0, 1.0], 80);
        assert_eq!(s.chars().count(), 2);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(render_profile(&[], 80), "");
        assert_eq!(render_profile(&[1.0], 0), "");
        assert_eq!(render_field(&[], 0, 0, 80, 20), "");
    }

    #[test]
    fn test_field_row_count() {
        let (nx, ny) = (10, 8);
        let u = vec![0.0; nx * ny];
        let s = render_field(&u, nx, ny, 10, 20);
        assert_eq!(s.lines().count(), 8, "ny below the cap renders every row");
        let s = render_field(&u, nx, ny, 10, 4);
        assert_eq!(s.lines().count(), 4, "tall grids sample down to the cap");
    }

    #[test]
    fn test_field_short_buffer_rejected() {
        assert_eq!(render_field(&[0.0; 10], 10, 8, 10, 8), "");
    }
}
