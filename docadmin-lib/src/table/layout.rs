//! Grid track sizing.
//!
//! Each visible column gets a track of the form
//! `minmax({min}px, min({max}px, {percent}%))`, where `percent` is the
//! column's average width as a share of the average total width. Columns
//! grow with the container in proportion to their declared size but never
//! leave their own bounds.

use std::fmt;

use super::column::{ColumnDef, ColumnSize};

/// One column track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    /// Floor in pixels.
    pub min: u32,
    /// Ceiling in pixels.
    pub max: u32,
    /// Share of the container, 0 to 100.
    pub percent: f64,
}

impl Track {
    /// Width of this track in a container of `container` pixels.
    pub fn resolve(&self, container: u32) -> u32 {
        let share = (f64::from(container) * self.percent / 100.0).round() as u32;
        share.min(self.max).max(self.min)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "minmax({}px, min({}px, {}%))",
            self.min, self.max, self.percent
        )
    }
}

/// Track list for a set of visible columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableGrid {
    /// Tracks in column order.
    pub tracks: Vec<Track>,
    /// Sum of the minimum widths.
    pub min_width: u32,
    /// Sum of the maximum widths.
    pub max_width: u32,
}

impl TableGrid {
    /// Grid for raw size bounds.
    pub fn from_sizes(sizes: &[ColumnSize]) -> Self {
        let min_width: u32 = sizes.iter().map(|s| s.min).sum();
        let max_width: u32 = sizes.iter().map(|s| s.max).sum();
        let total_average = (f64::from(min_width) + f64::from(max_width)) / 2.0;

        let tracks = sizes
            .iter()
            .map(|size| Track {
                min: size.min,
                max: size.max,
                percent: if total_average > 0.0 {
                    size.average() / total_average * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        Self {
            tracks,
            min_width,
            max_width,
        }
    }

    /// Grid for the given visible columns.
    pub fn for_columns<'a, T: 'a>(columns: impl IntoIterator<Item = &'a ColumnDef<T>>) -> Self {
        let sizes: Vec<ColumnSize> = columns.into_iter().map(|c| c.meta.size).collect();
        Self::from_sizes(&sizes)
    }

    /// Space-separated track template.
    pub fn template(&self) -> String {
        self.tracks
            .iter()
            .map(Track::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Column widths in a container of `container` pixels.
    pub fn resolve(&self, container: u32) -> Vec<u32> {
        self.tracks.iter().map(|t| t.resolve(container)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_share() {
        let grid = TableGrid::from_sizes(&[ColumnSize::new(100, 300), ColumnSize::new(100, 100)]);
        assert_eq!(grid.min_width, 200);
        assert_eq!(grid.max_width, 400);
        assert!((grid.tracks[0].percent - 200.0 / 300.0 * 100.0).abs() < 1e-9);
        assert!((grid.tracks[1].percent - 100.0 / 300.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_template() {
        let grid = TableGrid::from_sizes(&[ColumnSize::new(200, 400)]);
        assert_eq!(grid.template(), "minmax(200px, min(400px, 100%))");
    }

    #[test]
    fn test_resolve_clamps() {
        let grid = TableGrid::from_sizes(&[ColumnSize::new(100, 200), ColumnSize::new(100, 200)]);
        assert_eq!(grid.resolve(100), vec![100, 100]);
        assert_eq!(grid.resolve(300), vec![150, 150]);
        assert_eq!(grid.resolve(1000), vec![200, 200]);
    }

    #[test]
    fn test_empty_and_zero() {
        assert!(TableGrid::from_sizes(&[]).tracks.is_empty());
        let grid = TableGrid::from_sizes(&[ColumnSize::fixed(0)]);
        assert_eq!(grid.tracks[0].percent, 0.0);
    }
}
