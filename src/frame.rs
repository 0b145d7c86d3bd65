use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hash;

use crate::model::SampleValue;

/// A small two-dimensional labeled table: one column per series, row index
/// = the sorted union of every column's time keys. A column missing a key
/// from the union gets a missing cell.
#[derive(Debug, Clone)]
pub struct DataFrame<K> {
    columns: Vec<String>,
    index: Vec<K>,
    // Column-major; cells[col][row] lines up with index[row].
    cells: Vec<Vec<Option<SampleValue>>>,
}

impl<K: Ord + Copy + Hash> DataFrame<K> {
    /// Assembles a frame from `(name, datapoints)` pairs. When two columns
    /// share a name, the later one wins.
    pub fn from_columns(columns: Vec<(String, HashMap<K, SampleValue>)>) -> Self {
        let mut named: Vec<(String, HashMap<K, SampleValue>)> = Vec::new();
        for (name, points) in columns {
            match named.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1 = points,
                None => named.push((name, points)),
            }
        }

        let index: Vec<K> = named
            .iter()
            .flat_map(|(_, points)| points.keys().copied())
            .collect::<BTreeSet<K>>()
            .into_iter()
            .collect();

        let cells = named
            .iter()
            .map(|(_, points)| index.iter().map(|key| points.get(key).copied()).collect())
            .collect();

        Self {
            columns: named.into_iter().map(|(name, _)| name).collect(),
            index,
            cells,
        }
    }

    #[inline]
    pub fn index(&self) -> &[K] {
        &self.index
    }

    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&[Option<SampleValue>]> {
        let col = self.columns.iter().position(|n| n == name)?;
        Some(&self.cells[col])
    }

    pub fn get(&self, name: &str, key: K) -> Option<SampleValue> {
        let col = self.columns.iter().position(|n| n == name)?;
        let row = self.index.binary_search(&key).ok()?;
        self.cells[col][row]
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.index.len(), self.columns.len())
    }
}

impl<K: fmt::Display> fmt::Display for DataFrame<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "time\t{}", self.columns.join("\t"))?;
        for (row, key) in self.index.iter().enumerate() {
            let cells = self
                .cells
                .iter()
                .map(|col| match col[row] {
                    Some(val) => val.to_string(),
                    None => "-".to_string(),
                })
                .collect::<Vec<_>>()
                .join("\t");
            writeln!(f, "{}\t{}", key, cells)?;
        }
        Ok(())
    }
}
