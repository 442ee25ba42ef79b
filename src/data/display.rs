use crate::config::config::DisplayConfig;
use crate::data::record::Record;

const NOT_AVAILABLE: &str = "N/A";

/// Upper bound printed next to a college's ranking
pub const RANKING_SCALE: u32 = 100;

/// Per-row display strings handed to a rendering surface
#[derive(Debug, Clone, PartialEq)]
pub struct RowDisplay {
    pub id: u64,
    pub featured: bool,
    pub rank: String,
    pub name: String,
    /// "<location> | <affiliations>"
    pub subtitle: String,
    /// "<course> - <exam>" per offered course
    pub courses: Vec<String>,
    pub fee: String,
    pub fee_course: String,
    pub placement_average: String,
    pub placement_highest: String,
    pub rating: String,
    pub review_count: String,
    /// First review headline, prefixed with the check icon
    pub review_highlight: Option<String>,
    pub ranking: String,
    pub ranking_year: String,
}

impl RowDisplay {
    pub fn from_record(record: &Record, display: &DisplayConfig, reference_year: i32) -> Self {
        let currency = &display.currency_symbol;
        let college = &record.college;

        let rank = match college.cd_rank {
            Some(rank) => format!("#{rank}"),
            None => "#-".to_string(),
        };

        let subtitle = format!(
            "{} | {}",
            college.location.as_deref().unwrap_or_default(),
            college.affiliations.join(", ")
        );

        let courses = college
            .courses
            .iter()
            .map(|course| match &course.exam {
                Some(exam) => format!("{} - {}", course.name, exam),
                None => course.name.clone(),
            })
            .collect();

        let fee = record
            .first_year_fee()
            .map(|amount| format!("{currency}{}", format_amount(amount)))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let fee_course = record
            .first_fee()
            .map(|entry| entry.name.clone())
            .unwrap_or_default();

        let placement = record.placement(reference_year);
        let package = |value: Option<f64>| {
            value
                .filter(|&amount| amount != 0.0)
                .map(|amount| format!("{currency}{}", format_amount(amount)))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };

        let review_highlight = record
            .reviews
            .first()
            .and_then(|review| review.comment.as_ref())
            .and_then(|comment| comment.head.as_deref())
            .map(|head| format!("{} {}", display.icons.check, head));

        let ranking = match record.rank_for_year(reference_year) {
            Some(rank) => format!("{rank} / {RANKING_SCALE}"),
            None => format!("{NOT_AVAILABLE} / {RANKING_SCALE}"),
        };

        Self {
            id: record.id,
            featured: record.featured,
            rank,
            name: college.name.clone(),
            subtitle,
            courses,
            fee,
            fee_course,
            placement_average: package(placement.and_then(|p| p.average)),
            placement_highest: package(placement.and_then(|p| p.highest)),
            rating: format_rating(record.average_rating()),
            review_count: format!("Based on {} user reviews", record.reviews.len()),
            review_highlight,
            ranking,
            ranking_year: reference_year.to_string(),
        }
    }
}

/// Whole amounts print without decimals, others with two
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}

pub fn format_rating(rating: f64) -> String {
    format!("{rating:.1}/10")
}
