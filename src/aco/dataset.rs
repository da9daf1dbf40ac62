//! Capacitated p-median problem instance.
//!
//! File format: the first two whitespace-separated tokens are `n p`, then
//! `n` records of four tokens `x y capacity demand`. Points are indexed
//! `0..n-1`.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// One candidate location: planar position, capacity, and demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub capacity: f64,
    pub demand: f64,
}

impl Point {
    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// An indexed set of points plus the number of medians to select.
#[derive(Debug, Clone)]
pub struct PMedianInstance {
    points: Vec<Point>,
    num_medians: usize,
}

impl PMedianInstance {
    /// Builds an instance from parts, for tests and programmatic use.
    pub fn new(points: Vec<Point>, num_medians: usize) -> Self {
        Self {
            points,
            num_medians,
        }
    }

    /// Loads an instance from a dataset file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self> {
        let parse_error = |line: usize, message: String| Error::Parse {
            path: path.to_path_buf(),
            line,
            message,
        };

        let last_line = text.lines().count().max(1);
        let mut tokens = text
            .lines()
            .enumerate()
            .flat_map(|(index, line)| line.split_whitespace().map(move |t| (index + 1, t)));
        let mut next_number = |what: &str| -> Result<(usize, f64)> {
            let (line, token) = tokens.next().ok_or_else(|| {
                parse_error(last_line, format!("unexpected end of file reading {what}"))
            })?;
            let value = token
                .parse()
                .map_err(|_| parse_error(line, format!("invalid {what}: {token:?}")))?;
            Ok((line, value))
        };

        let (_, num_points) = next_number("point count")?;
        let num_points = num_points as usize;
        let (header_line, num_medians) = next_number("median count")?;
        let num_medians = num_medians as usize;
        if num_medians == 0 || num_medians > num_points {
            return Err(parse_error(
                header_line,
                format!("median count {num_medians} out of range for {num_points} points"),
            ));
        }

        let mut points = Vec::with_capacity(num_points);
        for _ in 0..num_points {
            points.push(Point {
                x: next_number("x coordinate")?.1,
                y: next_number("y coordinate")?.1,
                capacity: next_number("capacity")?.1,
                demand: next_number("demand")?.1,
            });
        }

        Ok(Self {
            points,
            num_medians,
        })
    }

    /// All points, in index order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The point at index `i`.
    pub fn point(&self, i: usize) -> &Point {
        &self.points[i]
    }

    /// Number of points.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Number of medians to select.
    pub fn num_medians(&self) -> usize {
        self.num_medians
    }

    /// The symmetric point-pair distance matrix, zero on the diagonal.
    /// Computed once per run.
    pub fn distance_matrix(&self) -> Vec<Vec<f64>> {
        let n = self.points.len();
        let mut distances = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in i + 1..n {
                let d = self.points[i].distance(&self.points[j]);
                distances[i][j] = d;
                distances[j][i] = d;
            }
        }
        distances
    }
}
