use crate::config::config::{BehaviorConfig, DisplayConfig};
use crate::data::display::RowDisplay;
use crate::data::record::{Record, DEFAULT_REFERENCE_YEAR};
use crate::view::filter::filter;
use crate::view::page_window::{
    PageWindow, ScrollMetrics, DEFAULT_INITIAL_ROWS, DEFAULT_ROWS_PER_PAGE,
    DEFAULT_SCROLL_TOLERANCE,
};
use crate::view::sorter::{sort_rows, SortKey, SortState};
use std::sync::Arc;
use tracing::{debug, trace};

/// Knobs of the view pipeline, usually taken from [`BehaviorConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub reference_year: i32,
    pub initial_rows: usize,
    pub rows_per_page: usize,
    pub scroll_tolerance: f64,
    pub reset_window_on_change: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            reference_year: DEFAULT_REFERENCE_YEAR,
            initial_rows: DEFAULT_INITIAL_ROWS,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            scroll_tolerance: DEFAULT_SCROLL_TOLERANCE,
            reset_window_on_change: true,
        }
    }
}

impl From<&BehaviorConfig> for ViewSettings {
    fn from(behavior: &BehaviorConfig) -> Self {
        Self {
            reference_year: behavior.reference_year,
            initial_rows: behavior.initial_rows,
            rows_per_page: behavior.rows_per_page,
            scroll_tolerance: behavior.scroll_tolerance,
            reset_window_on_change: behavior.reset_window_on_change,
        }
    }
}

/// Owns the dataset and every piece of view state: the query, the active
/// sort, the ordered working set and the page window.
///
/// The working set is rebuilt from the full dataset on every query or sort
/// change; the active sort is re-applied after each new filter.
#[derive(Debug, Clone)]
pub struct TableController {
    source: Arc<Vec<Record>>,
    settings: ViewSettings,
    query: String,
    sort_state: Option<SortState>,
    /// Filtered and ordered indices into `source`
    rows: Vec<usize>,
    window: PageWindow,
}

impl TableController {
    pub fn new(source: Arc<Vec<Record>>, settings: ViewSettings) -> Self {
        let rows = (0..source.len()).collect();
        let window = PageWindow::new(
            settings.initial_rows,
            settings.rows_per_page,
            settings.scroll_tolerance,
        );
        debug!(target: "view", "Controller over {} records", source.len());

        Self {
            source,
            settings,
            query: String::new(),
            sort_state: None,
            rows,
            window,
        }
    }

    pub fn from_records(records: Vec<Record>, settings: ViewSettings) -> Self {
        Self::new(Arc::new(records), settings)
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn source(&self) -> &[Record] {
        &self.source
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the search query and rebuild the working set
    pub fn set_query(&mut self, query: &str) {
        if self.query == query {
            return;
        }
        self.query = query.to_string();
        self.refresh();
        debug!(
            target: "view",
            "Query '{}' matched {} of {} records",
            self.query,
            self.rows.len(),
            self.source.len()
        );
    }

    /// Select a sort key, toggling direction when it is already active
    pub fn select_sort(&mut self, key: SortKey) -> SortState {
        let state = SortState::next(self.sort_state, key);
        self.sort_state = Some(state);
        self.refresh();
        debug!(target: "view", "Sorted by {} {}", state.key, state.direction);
        state
    }

    /// Active sort for the column indicator
    pub fn sort_indicator(&self) -> Option<SortState> {
        self.sort_state
    }

    /// Feed a scroll event. Returns whether more rows were exposed.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        let grew = self.window.on_scroll(metrics);
        if grew {
            trace!(
                target: "view",
                "Scrolled to bottom, window now {}",
                self.window.visible_count()
            );
        }
        grew
    }

    /// Expose one more page unconditionally
    pub fn load_more(&mut self) {
        self.window.grow();
    }

    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    /// Size of the filtered working set
    pub fn working_set_len(&self) -> usize {
        self.rows.len()
    }

    pub fn total_len(&self) -> usize {
        self.source.len()
    }

    /// No record matches the query; renderers show the sentinel row
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether scrolling further would expose more rows
    pub fn has_more(&self) -> bool {
        self.visible_len() < self.rows.len()
    }

    pub fn visible_len(&self) -> usize {
        self.window.visible(self.rows.len())
    }

    /// Full ordered working set, before windowing
    pub fn ordered_rows(&self) -> &[usize] {
        &self.rows
    }

    /// Windowed indices into [`TableController::source`]
    pub fn visible_rows(&self) -> &[usize] {
        self.window.slice(&self.rows)
    }

    /// Windowed records, in view order
    pub fn visible_records(&self) -> Vec<&Record> {
        self.visible_rows()
            .iter()
            .map(|&idx| &self.source[idx])
            .collect()
    }

    /// Display strings for the windowed records
    pub fn visible_display(&self, display: &DisplayConfig) -> Vec<RowDisplay> {
        self.visible_records()
            .into_iter()
            .map(|record| RowDisplay::from_record(record, display, self.settings.reference_year))
            .collect()
    }

    fn refresh(&mut self) {
        let filtered = filter(&self.source, &self.query);
        self.rows = match self.sort_state {
            Some(state) => sort_rows(
                &self.source,
                &filtered,
                state,
                self.settings.reference_year,
            ),
            None => filtered,
        };
        if self.settings.reset_window_on_change {
            self.window.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::College;
    use crate::view::sorter::SortDirection;

    fn college(id: u64, name: &str, cd_rank: u32) -> Record {
        Record {
            id,
            featured: false,
            college: College {
                name: name.to_string(),
                cd_rank: Some(cd_rank),
                ..College::default()
            },
            fees: Vec::new(),
            placements: Default::default(),
            reviews: Vec::new(),
            ranking: Vec::new(),
        }
    }

    fn many(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| college(i as u64, &format!("College {i:02}"), (n - i) as u32))
            .collect()
    }

    fn ids(controller: &TableController) -> Vec<u64> {
        controller.visible_records().iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_initial_view() {
        let controller = TableController::from_records(many(25), ViewSettings::default());
        assert_eq!(controller.working_set_len(), 25);
        assert_eq!(controller.visible_len(), 10);
        assert_eq!(ids(&controller), (0..10).collect::<Vec<u64>>());
        assert!(controller.sort_indicator().is_none());
        assert!(controller.has_more());
    }

    #[test]
    fn test_query_keeps_active_sort() {
        let records = vec![
            college(1, "IIT Delhi", 2),
            college(2, "Anna University", 18),
            college(3, "IIT Madras", 1),
        ];
        let mut controller = TableController::from_records(records, ViewSettings::default());
        controller.select_sort(SortKey::CdRank);
        controller.select_sort(SortKey::CdRank);
        assert_eq!(ids(&controller), vec![2, 1, 3]);

        controller.set_query("iit");
        assert_eq!(ids(&controller), vec![1, 3]);
        assert_eq!(
            controller.sort_indicator().map(|s| s.direction),
            Some(SortDirection::Descending)
        );

        controller.set_query("");
        assert_eq!(ids(&controller), vec![2, 1, 3]);
    }

    #[test]
    fn test_window_resets_on_change_by_default() {
        let mut controller = TableController::from_records(many(40), ViewSettings::default());
        controller.load_more();
        controller.load_more();
        assert_eq!(controller.visible_len(), 30);

        controller.select_sort(SortKey::Name);
        assert_eq!(controller.visible_len(), 10);

        controller.load_more();
        controller.set_query("College");
        assert_eq!(controller.visible_len(), 10);
    }

    #[test]
    fn test_window_kept_when_reset_disabled() {
        let settings = ViewSettings {
            reset_window_on_change: false,
            ..ViewSettings::default()
        };
        let mut controller = TableController::from_records(many(40), settings);
        controller.load_more();
        controller.select_sort(SortKey::Name);
        controller.set_query("College 1");
        // 10 matches ("College 10".."College 19") under a 20 row window
        assert_eq!(controller.window().visible_count(), 20);
        assert_eq!(controller.visible_len(), 10);
    }

    #[test]
    fn test_same_query_does_not_reset() {
        let mut controller = TableController::from_records(many(40), ViewSettings::default());
        controller.set_query("College");
        controller.load_more();
        controller.set_query("College");
        assert_eq!(controller.visible_len(), 20);
    }

    #[test]
    fn test_scroll_never_overshoots() {
        let mut controller = TableController::from_records(many(15), ViewSettings::default());
        for _ in 0..5 {
            controller.on_scroll(ScrollMetrics::new(100.0, 300.0, 400.0));
            assert!(controller.visible_len() <= controller.working_set_len());
        }
        assert_eq!(controller.visible_len(), 15);
        assert!(!controller.has_more());
    }

    #[test]
    fn test_empty_result() {
        let mut controller = TableController::from_records(many(5), ViewSettings::default());
        controller.set_query("no such college");
        assert!(controller.is_empty());
        assert!(controller.visible_records().is_empty());
        assert!(controller.visible_display(&DisplayConfig::default()).is_empty());
    }
}
