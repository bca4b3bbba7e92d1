//! Column-oriented table of time-ordered price observations.
//!
//! Rows are implicitly ordered by time (ascending). Each column is a named
//! numeric series with one cell per row; `None` marks a missing cell while
//! `Some(f64::NAN)` is a computed not-a-number value and is kept as such.

use crate::domain::errors::IndicatorError;
use serde::{Deserialize, Serialize};

/// A named numeric series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(with = "cells")]
    pub values: Vec<Option<f64>>,
}

/// Cell encoding for self-describing formats: missing cells are `null`,
/// non-finite values are strings (`"NaN"`, `"inf"`, `"-inf"`) so they survive
/// formats such as JSON that have no literal for them.
mod cells {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(
        values: &[Option<f64>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|value| {
            value.map(|x| {
                if x.is_finite() {
                    Cell::Number(x)
                } else {
                    Cell::Text(x.to_string())
                }
            })
        }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Option<f64>>, D::Error> {
        let raw: Vec<Option<Cell>> = Vec::deserialize(deserializer)?;
        raw.into_iter()
            .map(|cell| match cell {
                None => Ok(None),
                Some(Cell::Number(x)) => Ok(Some(x)),
                Some(Cell::Text(text)) => text
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| D::Error::custom(format!("invalid numeric cell: {:?}", text))),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    index: Vec<String>,
    columns: Vec<Column>,
}

impl PriceTable {
    /// Creates an empty table with the given row labels (typically dates).
    pub fn with_index(index: Vec<String>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Builds a table from fully populated columns, labelling rows `0..n`.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, IndicatorError>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut columns = columns.into_iter().peekable();
        let len = columns.peek().map(|(_, v)| v.len()).unwrap_or(0);
        let mut table = Self::with_index((0..len).map(|i| i.to_string()).collect());

        for (name, values) in columns {
            table.insert_column(name, values.into_iter().map(Some).collect())?;
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Returns the cells of `name`, or `MissingColumn` if the table lacks it.
    pub fn column(&self, name: &str) -> Result<&[Option<f64>], IndicatorError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| IndicatorError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// Inserts a column, replacing (in place) any column with the same name.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), IndicatorError> {
        let name = name.into();
        if values.len() != self.len() {
            return Err(IndicatorError::LengthMismatch {
                column: name,
                expected: self.len(),
                actual: values.len(),
            });
        }

        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(Column { name, values }),
        }
        Ok(())
    }

    /// Removes every row holding at least one missing or NaN cell. Returns the
    /// number of rows dropped.
    pub fn drop_missing_rows(&mut self) -> usize {
        let keep: Vec<bool> = (0..self.len())
            .map(|row| {
                self.columns
                    .iter()
                    .all(|c| matches!(c.values[row], Some(x) if !x.is_nan()))
            })
            .collect();
        let dropped = keep.iter().filter(|k| !**k).count();
        if dropped == 0 {
            return 0;
        }

        let mut flags = keep.iter();
        self.index.retain(|_| *flags.next().unwrap_or(&false));
        for column in &mut self.columns {
            let mut flags = keep.iter();
            column.values.retain(|_| *flags.next().unwrap_or(&false));
        }
        dropped
    }
}
