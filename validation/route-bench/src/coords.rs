//! Coordinate loading.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Index;
use std::path::{Path, PathBuf};

use routing_client::Coordinate;
use tracing::debug;

use crate::error::{BenchError, BenchResult};

/// An ordered, immutable list of coordinates.
///
/// Order is file order or argument order. Built once per invocation and then
/// shared read-only between workers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoordinateSet(Vec<Coordinate>);

impl CoordinateSet {
    pub fn new(coords: Vec<Coordinate>) -> Self {
        Self(coords)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Coordinate> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coordinate> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<Coordinate> {
        self.0.clone()
    }

    /// Read a coordinate file: one token per line, trimmed, blank lines skipped.
    ///
    /// Fails without a partial result if the file cannot be opened or a line
    /// cannot be read.
    pub fn from_file(path: &Path) -> BenchResult<Self> {
        let file_error = |source| BenchError::CoordinateFile {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(file_error)?;
        let reader = BufReader::new(file);

        let mut coords = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(file_error)?;
            if let Some(coord) = Coordinate::new(line.trim()) {
                coords.push(coord);
            }
        }

        debug!(path = %path.display(), count = coords.len(), "Loaded coordinate file");
        Ok(Self(coords))
    }

    /// Take command line arguments as they are.
    ///
    /// Arguments are not trimmed; a blank argument is a configuration error.
    pub fn from_args(args: &[String]) -> BenchResult<Self> {
        args.iter()
            .enumerate()
            .map(|(i, arg)| {
                Coordinate::new(arg.as_str()).ok_or_else(|| {
                    BenchError::Configuration(format!("coordinate argument #{} is blank", i + 1))
                })
            })
            .collect::<BenchResult<Vec<_>>>()
            .map(Self)
    }
}

impl Index<usize> for CoordinateSet {
    type Output = Coordinate;

    fn index(&self, index: usize) -> &Coordinate {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a CoordinateSet {
    type Item = &'a Coordinate;
    type IntoIter = std::slice::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Where the coordinates of a run come from.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateSource {
    File(PathBuf),
    Args(Vec<String>),
}

impl CoordinateSource {
    pub fn load(&self) -> BenchResult<CoordinateSet> {
        match self {
            CoordinateSource::File(path) => CoordinateSet::from_file(path),
            CoordinateSource::Args(args) => CoordinateSet::from_args(args),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            CoordinateSource::File(path) => format!("file {}", path.display()),
            CoordinateSource::Args(args) => format!("{} argument(s)", args.len()),
        }
    }
}
