use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::listing::{Listing, Slug};

pub const YES: &str = "Yes";
pub const NONE: &str = "—";

type CustomFn = dyn Fn(&Listing) -> String + Send + Sync;

/// How a comparison column reads its cell from a listing.
#[derive(Clone)]
pub enum Accessor {
    /// `"Yes"` when the flag is set, `"—"` otherwise.
    Flag(Arc<str>),
    /// The field's value, or `"—"`.
    Field(Arc<str>),
    /// The list joined with `", "`, or `"—"` when empty.
    List(Arc<str>),
    Custom(Arc<CustomFn>),
}

impl Accessor {
    pub fn custom<F>(f: F) -> Self
        where F: Fn(&Listing) -> String + Send + Sync + 'static
    {
        Accessor::Custom(Arc::new(f))
    }

    pub fn cell(&self, listing: &Listing) -> String {
        match self {
            Accessor::Flag(flag) => match listing.flag(flag) {
                true => YES.into(),
                false => NONE.into(),
            },
            Accessor::Field(field) => listing.field(field)
                .map_or_else(|| NONE.into(), |v| v.into_owned()),
            Accessor::List(field) => match &*listing.list(field) {
                [] => NONE.into(),
                items => items.join(", "),
            },
            Accessor::Custom(f) => f(listing),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Flag(v) => f.debug_tuple("Flag").field(v).finish(),
            Accessor::Field(v) => f.debug_tuple("Field").field(v).finish(),
            Accessor::List(v) => f.debug_tuple("List").field(v).finish(),
            Accessor::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A comparison table column.
///
/// In data files a column names its header and exactly one of `flag`,
/// `field` or `list`:
///
/// ```toml
/// [[columns]]
/// header = "Emergency"
/// flag = "emergency"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawColumn")]
pub struct Column {
    pub header: Arc<str>,
    pub accessor: Accessor,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawColumn {
    header: Arc<str>,
    flag: Option<Arc<str>>,
    field: Option<Arc<str>>,
    list: Option<Arc<str>>,
}

impl TryFrom<RawColumn> for Column {
    type Error = String;

    fn try_from(raw: RawColumn) -> Result<Self, Self::Error> {
        let accessor = match (raw.flag, raw.field, raw.list) {
            (Some(flag), None, None) => Accessor::Flag(flag),
            (None, Some(field), None) => Accessor::Field(field),
            (None, None, Some(list)) => Accessor::List(list),
            _ => return Err(format!(
                "column {:?} must set exactly one of `flag`, `field` or `list`",
                raw.header
            )),
        };

        Ok(Column { header: raw.header, accessor })
    }
}

impl Column {
    pub fn new<H: Into<Arc<str>>>(header: H, accessor: Accessor) -> Self {
        Column { header: header.into(), accessor }
    }

    pub fn flag(header: &str, flag: &str) -> Self {
        Column::new(header, Accessor::Flag(flag.into()))
    }

    pub fn field(header: &str, field: &str) -> Self {
        Column::new(header, Accessor::Field(field.into()))
    }

    pub fn list(header: &str, list: &str) -> Self {
        Column::new(header, Accessor::List(list.into()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub slug: Slug,
    pub name: Arc<str>,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ComparisonTable {
    pub headers: Vec<Arc<str>>,
    pub rows: Vec<Row>,
}

impl ComparisonTable {
    /// One row per listing, in input order, one cell per column.
    pub fn project(listings: &[Listing], columns: &[Column]) -> Self {
        ComparisonTable {
            headers: columns.iter().map(|c| c.header.clone()).collect(),
            rows: listings.iter()
                .map(|listing| Row {
                    slug: listing.slug.clone(),
                    name: listing.name.clone(),
                    cells: columns.iter().map(|c| c.accessor.cell(listing)).collect(),
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || self.rows.is_empty()
    }
}
