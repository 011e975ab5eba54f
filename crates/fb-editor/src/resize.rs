//! Panel resize snapping.
//!
//! A dragged panel size is clamped to `[min_px, max_px]` and then snapped
//! either to the nearest allowed fraction of its container or to the
//! nearest column boundary of an N-column grid. The DOM wiring lives in the
//! browser shell; this module only does the arithmetic.

use fb_core::{EditorSettings, Width};
use smallvec::SmallVec;
use winnow::ascii::float;
use winnow::combinator::{opt, preceded};
use winnow::prelude::*;

/// Sorted, deduplicated fractions in `[0, 1]`.
pub type Steps = SmallVec<[f64; 8]>;

pub const DEFAULT_STEPS: [&str; 6] = ["1/4", "1/3", "1/2", "2/3", "3/4", "1"];
pub const DEFAULT_GRID_COLUMNS: u32 = 12;

// ─── Step parsing ────────────────────────────────────────────────────────

/// `num` or `num/den`.
fn parse_step_parts(input: &mut &str) -> ModalResult<(f64, Option<f64>)> {
    (float, opt(preceded('/', float))).parse_next(input)
}

/// Parse a step like `"1/4"` or `"0.5"` into a fraction in `[0, 1]`.
///
/// Unparseable text and ratios with a non-positive part mean the whole
/// container (`1.0`).
pub fn parse_step(text: &str) -> f64 {
    match parse_step_parts.parse(text.trim()) {
        Ok((num, Some(den))) if num > 0.0 && den > 0.0 => clamp_step(num / den),
        Ok((value, None)) if value.is_finite() => clamp_step(value),
        _ => 1.0,
    }
}

pub fn clamp_step(value: f64) -> f64 {
    if value.is_nan() {
        1.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Parse, sort and deduplicate `steps`; an empty list yields the defaults.
pub fn normalize_steps<S: AsRef<str>>(steps: &[S]) -> Steps {
    let mut out: Steps = if steps.is_empty() {
        DEFAULT_STEPS.iter().map(|s| parse_step(s)).collect()
    } else {
        steps.iter().map(|s| parse_step(s.as_ref())).collect()
    };
    out.sort_by(f64::total_cmp);
    out.dedup();
    out
}

// ─── Snapping ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum SnapMode {
    Fractions(Steps),
    /// Number of grid columns.
    Grid(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapConfig {
    pub mode: SnapMode,
    pub min_px: f64,
    pub max_px: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self::fractions(normalize_steps::<&str>(&[]))
    }
}

impl SnapConfig {
    pub fn fractions(steps: Steps) -> Self {
        Self {
            mode: SnapMode::Fractions(steps),
            min_px: 0.0,
            max_px: f64::INFINITY,
        }
    }

    pub fn grid(columns: u32) -> Self {
        Self {
            mode: SnapMode::Grid(columns.max(1)),
            min_px: 0.0,
            max_px: f64::INFINITY,
        }
    }

    /// Grid snapping when the settings ask for it, default fractions otherwise.
    pub fn from_settings(settings: &EditorSettings) -> Self {
        if settings.grid_snap {
            Self::grid(DEFAULT_GRID_COLUMNS)
        } else {
            Self::default()
        }
    }

    pub fn with_bounds(mut self, min_px: f64, max_px: f64) -> Self {
        self.min_px = min_px;
        self.max_px = max_px;
        self
    }

    /// New size after dragging a panel of `start_px` by `delta_px` inside a
    /// container `total_px` wide.
    pub fn resize(&self, start_px: f64, delta_px: f64, total_px: f64) -> f64 {
        let target = (start_px + delta_px).max(self.min_px).min(self.max_px);
        self.snap(target, total_px)
    }

    /// Snap `target_px` to the configured steps of a `total_px` container.
    pub fn snap(&self, target_px: f64, total_px: f64) -> f64 {
        match &self.mode {
            SnapMode::Grid(columns) => {
                let column = total_px / f64::from((*columns).max(1));
                if column > 0.0 {
                    (target_px / column).round() * column
                } else {
                    target_px
                }
            }
            SnapMode::Fractions(steps) => {
                let in_bounds = |f: &&f64| {
                    let px = **f * total_px;
                    px >= self.min_px && px <= self.max_px
                };
                nearest(steps.iter().filter(in_bounds), target_px, total_px)
                    .or_else(|| nearest(steps.iter(), target_px, total_px))
                    .map_or(target_px, |f| f * total_px)
            }
        }
    }
}

/// The step whose pixel size is closest to `target_px`; the first on ties.
fn nearest<'a>(
    pool: impl Iterator<Item = &'a f64>,
    target_px: f64,
    total_px: f64,
) -> Option<f64> {
    pool.min_by(|a, b| {
        (**a * total_px - target_px)
            .abs()
            .total_cmp(&(**b * total_px - target_px).abs())
    })
    .copied()
}

/// Width class closest to `px` out of a `total_px` row.
pub fn width_for(px: f64, total_px: f64) -> Width {
    if total_px > 0.0 {
        Width::from_fraction(px / total_px)
    } else {
        Width::Full
    }
}
