use thiserror::Error;

/// Errors reported by the length-checked stepping wrappers.
///
/// The raw `advance_*` kernels never construct these; they trust their
/// preconditions. The checked `step_*` entry points validate every buffer
/// before the first write, so a returned error guarantees the fields are
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("{field} holds {actual} samples, need at least {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{field} holds {len} samples, cannot cover a {nx}x{ny} grid")]
    ShapeMismatch {
        field: &'static str,
        nx: usize,
        ny: usize,
        len: usize,
    },
    #[error("grid has no points")]
    EmptyGrid,
}

/// Reject a zero-width 1-D grid.
pub(crate) fn check_grid_1d(nx: usize) -> Result<(), SolverError> {
    if nx == 0 { Err(SolverError::EmptyGrid) } else { Ok(()) }
}

/// Reject a degenerate 2-D grid.
pub(crate) fn check_grid_2d(nx: usize, ny: usize) -> Result<(), SolverError> {
    if nx == 0 || ny == 0 { Err(SolverError::EmptyGrid) } else { Ok(()) }
}

/// A 1-D buffer must cover at least `nx` samples.
pub(crate) fn check_len(field: &'static str, buf: &[f64], nx: usize) -> Result<(), SolverError> {
    if buf.len() < nx {
        return Err(SolverError::LengthMismatch {
            field,
            expected: nx,
            actual: buf.len(),
        });
    }
    Ok(())
}

/// A 2-D buffer must cover at least `nx * ny` samples.
pub(crate) fn check_shape(
    field: &'static str,
    buf: &[f64],
    nx: usize,
    ny: usize,
) -> Result<(), SolverError> {
    if buf.len() < nx * ny {
        return Err(SolverError::ShapeMismatch {
            field,
            nx,
            ny,
            len: buf.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_len_accepts_exact_and_longer() {
        let buf = vec![0.0; 8];
        assert!(check_len("u", &buf, 8).is_ok());
        assert!(check_len("u", &buf, 4).is_ok());
    }

    #[test]
    fn test_check_len_rejects_short() {
        let buf = vec![0.0; 3];
        let err = check_len("un", &buf, 5).unwrap_err();
        assert_eq!(
            err,
            SolverError::LengthMismatch { field: "un", expected: 5, actual: 3 }
        );
    }

    #[test]
    fn test_check_shape_rejects_short() {
        let buf = vec![0.0; 11];
        let err = check_shape("u", &buf, 4, 3).unwrap_err();
        assert_eq!(err, SolverError::ShapeMismatch { field: "u", nx: 4, ny: 3, len: 11 });
    }

    #[test]
    fn test_empty_grid() {
        assert_eq!(check_grid_1d(0).unwrap_err(), SolverError::EmptyGrid);
        assert_eq!(check_grid_2d(4, 0).unwrap_err(), SolverError::EmptyGrid);
        assert!(check_grid_1d(1).is_ok());
        assert!(check_grid_2d(1, 1).is_ok());
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let err = SolverError::LengthMismatch { field: "un", expected: 41, actual: 40 };
        let msg = err.to_string();
        assert!(msg.contains("un"), "message should name the buffer: {}", msg);
        assert!(msg.contains("41"), "message should carry the expected length: {}", msg);
    }
}
