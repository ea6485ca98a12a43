// ── Position to status resolution ──
//
// Devices report a fraction where 0 is fully open and 1 is fully closed.
// Readings near either end jitter, so status is derived with a hysteresis
// band of width `offset` at both endpoints.

use super::status::CoverStatus;

/// Clamp a raw device reading into `[0, 1]`. NaN clamps to 0.
pub fn clamp_position(raw: f64) -> f64 {
    if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) }
}

/// Derive the status for a new reading given the previous one.
///
/// Returns the clamped position together with the status:
///
/// - no previous reading, or no movement: `Closed` above `1 - offset`,
///   otherwise `Open`
/// - moving toward closed: `Closed` once at or beyond `1 - offset`,
///   otherwise `Closing`
/// - moving toward open: `Open` once at or below `offset`, otherwise
///   `Opening`
pub fn resolve(previous: Option<f64>, new: f64, offset: f64) -> (f64, CoverStatus) {
    let pos = clamp_position(new);

    let status = match previous {
        Some(prev) if prev < pos => {
            if pos >= 1.0 - offset {
                CoverStatus::Closed
            } else {
                CoverStatus::Closing
            }
        }
        Some(prev) if prev > pos => {
            if pos <= offset {
                CoverStatus::Open
            } else {
                CoverStatus::Opening
            }
        }
        _ => {
            if pos > 1.0 - offset {
                CoverStatus::Closed
            } else {
                CoverStatus::Open
            }
        }
    };

    (pos, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const OFFSET: f64 = 0.15;

    #[test]
    fn first_reading() {
        assert_eq!(resolve(None, 0.05, OFFSET), (0.05, CoverStatus::Open));
        assert_eq!(resolve(None, 0.5, OFFSET), (0.5, CoverStatus::Open));
        assert_eq!(resolve(None, 0.9, OFFSET), (0.9, CoverStatus::Closed));
    }

    #[test]
    fn closing_reaches_closed_inside_band() {
        assert_eq!(resolve(Some(0.9), 0.95, OFFSET).1, CoverStatus::Closed);
        assert_eq!(resolve(Some(0.2), 0.6, OFFSET).1, CoverStatus::Closing);
        assert_eq!(resolve(Some(0.2), 0.9, OFFSET).1, CoverStatus::Closed);
    }

    #[test]
    fn opening_reaches_open_inside_band() {
        assert_eq!(resolve(Some(0.9), 0.80, OFFSET).1, CoverStatus::Opening);
        assert_eq!(resolve(Some(0.5), 0.15, OFFSET).1, CoverStatus::Open);
        assert_eq!(resolve(Some(0.5), 0.1, OFFSET).1, CoverStatus::Open);
    }

    #[test]
    fn unchanged_reading_uses_thresholds() {
        assert_eq!(resolve(Some(0.4), 0.4, OFFSET).1, CoverStatus::Open);
        assert_eq!(resolve(Some(0.99), 0.99, OFFSET).1, CoverStatus::Closed);
    }

    #[test]
    fn out_of_range_readings_are_clamped() {
        assert_eq!(resolve(None, 1.3, OFFSET), (1.0, CoverStatus::Closed));
        assert_eq!(resolve(None, -0.2, OFFSET), (0.0, CoverStatus::Open));
        assert_eq!(resolve(None, f64::NAN, OFFSET), (0.0, CoverStatus::Open));
    }

    #[test]
    fn clamping_is_idempotent() {
        for raw in [-1.0, 0.0, 0.3, 1.0, 2.5, f64::INFINITY, f64::NEG_INFINITY] {
            let once = clamp_position(raw);
            assert_eq!(clamp_position(once), once);
            assert!((0.0..=1.0).contains(&once));
        }
    }

    #[test]
    fn first_reading_closed_iff_above_band() {
        for step in 0..=100 {
            let p = f64::from(step) / 100.0;
            for offset in [0.0, 0.05, 0.15, 0.3, 0.45] {
                let (_, status) = resolve(None, p, offset);
                assert_eq!(status == CoverStatus::Closed, p > 1.0 - offset, "p={p} o={offset}");
            }
        }
    }

    #[test]
    fn movement_direction_properties() {
        for a in 0..=20 {
            for b in 0..=20 {
                let prev = f64::from(a) / 20.0;
                let new = f64::from(b) / 20.0;
                let (_, status) = resolve(Some(prev), new, OFFSET);
                if prev < new {
                    let expected = if new >= 1.0 - OFFSET {
                        CoverStatus::Closed
                    } else {
                        CoverStatus::Closing
                    };
                    assert_eq!(status, expected);
                } else if prev > new {
                    let expected = if new <= OFFSET {
                        CoverStatus::Open
                    } else {
                        CoverStatus::Opening
                    };
                    assert_eq!(status, expected);
                }
            }
        }
    }
}
