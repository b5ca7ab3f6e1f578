//! Tender filter Config model
//!
//! Bentuk data "setting" per user beserta primitive mutasinya.
//! Semua mutasi menghasilkan Config baru; list disimpan copy-on-write
//! (`Arc<Vec<String>>`) sehingga clone murah dan aman dibagi antara editor
//! dan pembaca lain.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::errors::{AppError, AppResult};

/// Project value range filter
///
/// `min` and `max` are set independently; no ordering between them is enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NilaiProyek {
    pub min: i64,
    pub max: i64,
}

/// A user's tender filter preferences
///
/// Lists and `nilai_proyek` are required on the wire; `hbu`/`kbli` may be
/// `null` or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Organizing agencies; values come from the `instansi` option list
    pub penyelenggara_proyek: Arc<Vec<String>>,
    /// Project categories; values come from `JENIS_PROYEK_OPTIONS`
    pub jenis_proyek: Arc<Vec<String>>,
    pub nilai_proyek: NilaiProyek,
    pub hbu: Option<String>,
    pub kbli: Option<String>,
}

/// Ordered, list-valued Config attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListField {
    PenyelenggaraProyek,
    JenisProyek,
}

impl ListField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PenyelenggaraProyek => "penyelenggara_proyek",
            Self::JenisProyek => "jenis_proyek",
        }
    }
}

/// Single-valued Config attributes. `Min`/`Max` address `nilai_proyek`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarField {
    Hbu,
    Kbli,
    Min,
    Max,
}

impl ScalarField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hbu => "hbu",
            Self::Kbli => "kbli",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Min | Self::Max)
    }
}

/// Any editable field, addressed by its wire name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    List(ListField),
    Scalar(ScalarField),
}

impl FromStr for ConfigField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "penyelenggara_proyek" => Ok(Self::List(ListField::PenyelenggaraProyek)),
            "jenis_proyek" => Ok(Self::List(ListField::JenisProyek)),
            "hbu" => Ok(Self::Scalar(ScalarField::Hbu)),
            "kbli" => Ok(Self::Scalar(ScalarField::Kbli)),
            "min" => Ok(Self::Scalar(ScalarField::Min)),
            "max" => Ok(Self::Scalar(ScalarField::Max)),
            other => Err(AppError::unknown_field(other)),
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List(field) => f.write_str(field.as_str()),
            Self::Scalar(field) => f.write_str(field.as_str()),
        }
    }
}

impl Config {
    /// Read a list field
    pub fn list(&self, field: ListField) -> &[String] {
        match field {
            ListField::PenyelenggaraProyek => &self.penyelenggara_proyek,
            ListField::JenisProyek => &self.jenis_proyek,
        }
    }

    fn list_mut(&mut self, field: ListField) -> &mut Vec<String> {
        let list = match field {
            ListField::PenyelenggaraProyek => &mut self.penyelenggara_proyek,
            ListField::JenisProyek => &mut self.jenis_proyek,
        };
        Arc::make_mut(list)
    }

    /// Entries to render for a list field, with their storage index.
    /// Empty strings stay in storage but are never displayed.
    pub fn visible_items(&self, field: ListField) -> impl Iterator<Item = (usize, &str)> {
        self.list(field)
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_empty())
            .map(|(idx, item)| (idx, item.as_str()))
    }

    /// Replace a scalar field.
    ///
    /// `min`/`max` parse `value` as an integer; on failure the config is left
    /// as it was and `InvalidNumber` is returned.
    pub fn set_scalar(&self, field: ScalarField, value: &str) -> AppResult<Config> {
        let mut next = self.clone();
        match field {
            ScalarField::Hbu => next.hbu = Some(value.to_string()),
            ScalarField::Kbli => next.kbli = Some(value.to_string()),
            ScalarField::Min => next.nilai_proyek.min = parse_integer(field, value)?,
            ScalarField::Max => next.nilai_proyek.max = parse_integer(field, value)?,
        }
        Ok(next)
    }

    /// Append `value` to a list field. No dedup, no trimming.
    pub fn append_list_item(&self, field: ListField, value: impl Into<String>) -> Config {
        let mut next = self.clone();
        next.list_mut(field).push(value.into());
        next
    }

    /// Remove the first occurrence of `value` from a list field.
    /// Returns an unchanged copy when `value` is absent.
    pub fn remove_list_item(&self, field: ListField, value: &str) -> Config {
        match self.list(field).iter().position(|item| item == value) {
            Some(idx) => {
                let mut next = self.clone();
                next.list_mut(field).remove(idx);
                next
            }
            None => self.clone(),
        }
    }
}

fn parse_integer(field: ScalarField, value: &str) -> AppResult<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::invalid_number(field.as_str(), value))
}
