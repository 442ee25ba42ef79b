use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Rank used when a college has no rank for the requested position/year
pub const DEFAULT_RANK: u32 = 100;

/// Year whose placements and ranking are shown unless configured otherwise
pub const DEFAULT_REFERENCE_YEAR: i32 = 2023;

/// Key of the first-year amount inside a fee entry
pub const FIRST_YEAR_FEE_KEY: &str = "1st Year";

/// One college entry with its nested fee, placement, review and ranking data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Identity key, unique across the dataset
    pub id: u64,

    /// Featured rows are highlighted by the rendering surfaces
    #[serde(default, deserialize_with = "null_as_default")]
    pub featured: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub college: College,

    /// Fee entries, the first one is used for display and sorting
    #[serde(default, deserialize_with = "null_as_default")]
    pub fees: Vec<FeeEntry>,

    /// Placement statistics keyed by year ("2023", ...)
    #[serde(default, deserialize_with = "map_without_nulls")]
    pub placements: BTreeMap<String, Placement>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub reviews: Vec<Review>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub ranking: Vec<RankingEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct College {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cd_rank: Option<u32>,

    #[serde(
        default,
        rename = "collegeLogo",
        skip_serializing_if = "Option::is_none"
    )]
    pub logo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub affiliations: Vec<String>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    /// Amounts keyed by period ("1st Year", ...)
    #[serde(default, deserialize_with = "map_without_nulls")]
    pub fee: BTreeMap<String, f64>,
}

impl FeeEntry {
    pub fn first_year(&self) -> Option<f64> {
        self.fee.get(FIRST_YEAR_FEE_KEY).copied()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<ReviewComment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewComment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// A zero year or rank never matches a lookup, so both may be absent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub year: i32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub rank: u32,
}

/// Read `null` the same as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Keyed map where a `null` map or a `null` value counts as absent
fn map_without_nulls<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let map = Option::<BTreeMap<String, Option<V>>>::deserialize(deserializer)?;
    Ok(map
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect())
}

impl Record {
    pub fn name(&self) -> &str {
        &self.college.name
    }

    /// Position in the CD ranking. Absent or zero ranks fall back
    /// to [`DEFAULT_RANK`].
    pub fn rank_position(&self) -> u32 {
        self.college
            .cd_rank
            .filter(|&rank| rank != 0)
            .unwrap_or(DEFAULT_RANK)
    }

    pub fn first_fee(&self) -> Option<&FeeEntry> {
        self.fees.first()
    }

    /// First-year amount of the first fee entry, if both exist
    pub fn first_year_fee(&self) -> Option<f64> {
        self.first_fee().and_then(FeeEntry::first_year)
    }

    pub fn placement(&self, year: i32) -> Option<&Placement> {
        self.placements.get(&year.to_string())
    }

    /// Average package for `year`, 0 when the year or the figure is missing
    pub fn placement_average(&self, year: i32) -> f64 {
        self.placement(year)
            .and_then(|p| p.average)
            .unwrap_or(0.0)
    }

    /// Highest package for `year`, 0 when the year or the figure is missing
    pub fn placement_highest(&self, year: i32) -> f64 {
        self.placement(year)
            .and_then(|p| p.highest)
            .unwrap_or(0.0)
    }

    /// Mean review rating. A college without reviews rates 0, never NaN.
    pub fn average_rating(&self) -> f64 {
        if self.reviews.is_empty() {
            return 0.0;
        }
        let total: f64 = self.reviews.iter().map(|r| r.rating).sum();
        total / self.reviews.len() as f64
    }

    /// Rank published for `year`, if any
    pub fn rank_for_year(&self, year: i32) -> Option<u32> {
        self.ranking
            .iter()
            .find(|entry| entry.year == year)
            .map(|entry| entry.rank)
            .filter(|&rank| rank != 0)
    }

    /// Rank for `year`, [`DEFAULT_RANK`] when unranked that year
    pub fn current_rank(&self, year: i32) -> u32 {
        self.rank_for_year(year).unwrap_or(DEFAULT_RANK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_minimal_record_uses_defaults() {
        let r = record(json!({"id": 1, "college": {"name": "Lone College"}}));

        assert!(!r.featured);
        assert_eq!(r.rank_position(), DEFAULT_RANK);
        assert_eq!(r.first_year_fee(), None);
        assert_eq!(r.placement_average(2023), 0.0);
        assert_eq!(r.placement_highest(2023), 0.0);
        assert_eq!(r.current_rank(2023), DEFAULT_RANK);
    }

    #[test]
    fn test_average_rating_without_reviews_is_zero() {
        let r = record(json!({"id": 1, "college": {"name": "Quiet"}, "reviews": []}));
        let avg = r.average_rating();
        assert_eq!(avg, 0.0);
        assert!(!avg.is_nan());
    }

    #[test]
    fn test_null_nested_fields_read_as_absent() {
        let r = record(json!({
            "id": 1,
            "featured": null,
            "college": {"name": "Sparse", "affiliations": null, "courses": null, "cd_rank": null},
            "fees": [{"name": null, "fee": {"1st Year": null}}],
            "placements": {"2023": null, "2022": {"average": 5.0, "highest": null}},
            "reviews": null,
            "ranking": [{"year": 2023}, {"rank": 4}, {"year": null, "rank": null}]
        }));

        assert!(!r.featured);
        assert!(r.college.affiliations.is_empty());
        assert_eq!(r.rank_position(), DEFAULT_RANK);
        assert_eq!(r.first_year_fee(), None);
        assert!(r.placement(2023).is_none());
        assert_eq!(r.placement_average(2022), 5.0);
        assert_eq!(r.placement_highest(2022), 0.0);
        assert_eq!(r.average_rating(), 0.0);
        assert_eq!(r.ranking.len(), 3);
        assert_eq!(r.current_rank(2023), DEFAULT_RANK);
    }

    #[test]
    fn test_null_placements_and_college() {
        let r = record(json!({"id": 2, "college": null, "placements": null, "fees": null, "ranking": null}));
        assert_eq!(r.name(), "");
        assert!(r.placements.is_empty());
        assert!(r.fees.is_empty());
        assert_eq!(r.current_rank(2023), DEFAULT_RANK);
    }

    #[test]
    fn test_average_rating() {
        let r = record(json!({
            "id": 1,
            "college": {"name": "Rated"},
            "reviews": [{"rating": 8.0}, {"rating": 9.0}, {"rating": 7.0}]
        }));
        assert!((r.average_rating() - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_nested_fields() {
        let r = record(json!({
            "id": 7,
            "featured": true,
            "college": {"name": "IIT Test", "cd_rank": 3, "collegeLogo": "logo.png"},
            "fees": [
                {"name": "BE/B.Tech", "fee": {"1st Year": 209550}},
                {"name": "M.Tech", "fee": {"1st Year": 50000}}
            ],
            "placements": {"2023": {"average": 1800000, "highest": 5000000}},
            "ranking": [{"year": 2022, "rank": 4}, {"year": 2023, "rank": 2}]
        }));

        assert!(r.featured);
        assert_eq!(r.rank_position(), 3);
        assert_eq!(r.college.logo.as_deref(), Some("logo.png"));
        assert_eq!(r.first_year_fee(), Some(209550.0));
        assert_eq!(r.placement_average(2023), 1_800_000.0);
        assert_eq!(r.placement_highest(2023), 5_000_000.0);
        assert_eq!(r.placement_average(2022), 0.0);
        assert_eq!(r.current_rank(2023), 2);
        assert_eq!(r.current_rank(2022), 4);
        assert_eq!(r.current_rank(2021), DEFAULT_RANK);
    }

    #[test]
    fn test_zero_rank_falls_back() {
        let r = record(json!({
            "id": 1,
            "college": {"name": "Zero", "cd_rank": 0},
            "ranking": [{"year": 2023, "rank": 0}]
        }));
        assert_eq!(r.rank_position(), DEFAULT_RANK);
        assert_eq!(r.current_rank(2023), DEFAULT_RANK);
    }
}
