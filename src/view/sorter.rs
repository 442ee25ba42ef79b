use crate::data::record::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Derived value a view can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "cd_rank")]
    CdRank,
    #[serde(rename = "fees")]
    Fees,
    #[serde(rename = "placements")]
    Placements,
    #[serde(rename = "userReview")]
    UserReview,
    #[serde(rename = "ranking")]
    Ranking,
    #[serde(rename = "name")]
    Name,
}

impl SortKey {
    /// All keys in sort bar order
    pub const ALL: [SortKey; 6] = [
        SortKey::CdRank,
        SortKey::Fees,
        SortKey::Placements,
        SortKey::UserReview,
        SortKey::Ranking,
        SortKey::Name,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::CdRank => "cd_rank",
            SortKey::Fees => "fees",
            SortKey::Placements => "placements",
            SortKey::UserReview => "userReview",
            SortKey::Ranking => "ranking",
            SortKey::Name => "name",
        }
    }

    /// Column heading for the key
    pub fn label(self) -> &'static str {
        match self {
            SortKey::CdRank => "CD Rank",
            SortKey::Fees => "Course Fees",
            SortKey::Placements => "Placement",
            SortKey::UserReview => "User Review",
            SortKey::Ranking => "Ranking",
            SortKey::Name => "College",
        }
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, SortKey::Name)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort key '{0}' (expected one of: cd_rank, fees, placements, userReview, ranking, name)")]
pub struct ParseSortKeyError(pub String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSortKeyError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("ascending"),
            SortDirection::Descending => f.write_str("descending"),
        }
    }
}

/// Active sort, also the indicator shown next to the sorted column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    /// State after selecting `key`: the same key flips direction, any other
    /// key starts ascending.
    pub fn next(previous: Option<SortState>, key: SortKey) -> Self {
        match previous {
            Some(prev) if prev.key == key => Self {
                key,
                direction: prev.direction.toggled(),
            },
            _ => Self::ascending(key),
        }
    }
}

enum SortValue {
    Number(f64),
    Text(String),
}

impl SortValue {
    fn of(record: &Record, key: SortKey, reference_year: i32) -> Self {
        match key {
            SortKey::CdRank => SortValue::Number(f64::from(record.rank_position())),
            SortKey::Fees => SortValue::Number(record.first_year_fee().unwrap_or(0.0)),
            SortKey::Placements => SortValue::Number(record.placement_average(reference_year)),
            SortKey::UserReview => SortValue::Number(record.average_rating()),
            SortKey::Ranking => SortValue::Number(f64::from(record.current_rank(reference_year))),
            SortKey::Name => SortValue::Text(record.name().to_lowercase()),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Order `rows` by `state`. The sort is stable in both directions: rows with
/// equal keys keep their relative input order.
pub fn sort_rows(
    records: &[Record],
    rows: &[usize],
    state: SortState,
    reference_year: i32,
) -> Vec<usize> {
    // Decorate once so each key is derived a single time per row
    let mut keyed: Vec<(usize, SortValue)> = rows
        .iter()
        .filter_map(|&idx| {
            records
                .get(idx)
                .map(|record| (idx, SortValue::of(record, state.key, reference_year)))
        })
        .collect();

    keyed.sort_by(|(_, a), (_, b)| state.direction.apply(a.compare(b)));

    keyed.into_iter().map(|(idx, _)| idx).collect()
}

/// Select `key` against the previous sort and order `rows` accordingly.
///
/// Returns the ordered rows with the state to keep for the next toggle.
pub fn sort(
    records: &[Record],
    rows: &[usize],
    key: SortKey,
    previous: Option<SortState>,
    reference_year: i32,
) -> (Vec<usize>, SortState) {
    let state = SortState::next(previous, key);
    (sort_rows(records, rows, state, reference_year), state)
}
