#[cfg(test)]
mod tests {
    use college_table::data::loaders::{load_bundled_dataset, load_dataset_str};
    use college_table::data::record::Record;
    use college_table::view::{
        filter, filter_rows, sort, PageWindow, ScrollMetrics, SortDirection, SortKey, SortState,
        TableController, ViewSettings,
    };
    use serde_json::json;

    const YEAR: i32 = 2023;

    /// Records with the given (name, cd_rank) pairs and ids from 1
    fn ranked(colleges: &[(&str, u32)]) -> Vec<Record> {
        let table: Vec<_> = colleges
            .iter()
            .enumerate()
            .map(|(i, (name, rank))| {
                json!({
                    "id": i + 1,
                    "college": { "name": name, "cd_rank": rank },
                })
            })
            .collect();
        load_dataset_str(&json!({ "tableData": table }).to_string())
            .expect("fixture should parse")
    }

    fn names(records: &[Record], rows: &[usize]) -> Vec<String> {
        rows.iter()
            .map(|&idx| records[idx].college.name.clone())
            .collect()
    }

    fn bundled_controller() -> TableController {
        TableController::from_records(
            load_bundled_dataset().expect("bundled dataset"),
            ViewSettings::default(),
        )
    }

    #[test]
    fn test_empty_query_keeps_everything_in_order() {
        let records = load_bundled_dataset().unwrap();
        let rows = filter(&records, "");
        assert_eq!(rows, (0..records.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_filter_is_case_insensitive_and_idempotent() {
        let records = load_bundled_dataset().unwrap();
        let rows = filter(&records, "InStItUtE");
        assert!(!rows.is_empty());
        for &idx in &rows {
            assert!(records[idx].college.name.to_lowercase().contains("institute"));
        }
        assert_eq!(filter_rows(&records, &rows, "InStItUtE"), rows);
    }

    #[test]
    fn test_equal_ranks_keep_input_order() {
        let records = ranked(&[("B", 50), ("A", 50), ("C", 10)]);
        let rows: Vec<usize> = (0..records.len()).collect();

        let (asc, state) = sort(&records, &rows, SortKey::CdRank, None, YEAR);
        assert_eq!(state, SortState::ascending(SortKey::CdRank));
        assert_eq!(names(&records, &asc), vec!["C", "B", "A"]);

        let (desc, state) = sort(&records, &rows, SortKey::CdRank, Some(state), YEAR);
        assert_eq!(state.direction, SortDirection::Descending);
        assert_eq!(names(&records, &desc), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_descending_reverses_ascending_for_distinct_keys() {
        let records = ranked(&[("P", 7), ("Q", 3), ("R", 12), ("S", 1), ("T", 9)]);
        let rows: Vec<usize> = (0..records.len()).collect();

        let (asc, state) = sort(&records, &rows, SortKey::CdRank, None, YEAR);
        let (desc, _) = sort(&records, &asc, SortKey::CdRank, Some(state), YEAR);

        let mut reversed = asc.clone();
        reversed.reverse();
        assert_eq!(desc, reversed);
    }

    #[test]
    fn test_no_reviews_average_is_zero() {
        let records = load_bundled_dataset().unwrap();
        let unreviewed = records
            .iter()
            .find(|r| r.reviews.is_empty())
            .expect("bundled data has a college without reviews");
        assert_eq!(unreviewed.average_rating(), 0.0);
    }

    #[test]
    fn test_window_never_exceeds_row_count() {
        let mut window = PageWindow::default();
        for _ in 0..50 {
            window.grow();
        }
        assert_eq!(window.visible(15), 15);
        assert_eq!(window.slice(&[1, 2, 3]), &[1, 2, 3]);
    }

    #[test]
    fn test_scrolling_bottom_of_bundled_data() {
        let mut controller = bundled_controller();
        assert_eq!(controller.visible_len(), 10);

        // Two units short of the bottom
        assert!(!controller.on_scroll(ScrollMetrics::new(8.0, 10.0, 20.0)));
        assert_eq!(controller.visible_len(), 10);

        // Within the 1-unit tolerance
        assert!(controller.on_scroll(ScrollMetrics::new(9.0, 10.0, 20.0)));
        assert_eq!(controller.visible_len(), 15);
        assert!(!controller.has_more());
    }

    #[test]
    fn test_query_change_keeps_sort_and_resets_window() {
        let mut controller = bundled_controller();
        controller.select_sort(SortKey::Fees);
        controller.select_sort(SortKey::Fees);
        controller.load_more();
        assert_eq!(controller.visible_len(), 15);

        controller.set_query("iit");
        let state = controller.sort_indicator().unwrap();
        assert_eq!(state.key, SortKey::Fees);
        assert_eq!(state.direction, SortDirection::Descending);
        assert_eq!(controller.window().visible_count(), 10);

        let fees: Vec<f64> = controller
            .visible_records()
            .iter()
            .map(|r| r.first_year_fee().unwrap_or(0.0))
            .collect();
        assert!(fees.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn test_window_kept_when_reset_disabled() {
        let settings = ViewSettings {
            reset_window_on_change: false,
            ..ViewSettings::default()
        };
        let mut controller =
            TableController::from_records(load_bundled_dataset().unwrap(), settings);
        controller.load_more();
        controller.select_sort(SortKey::Name);
        assert_eq!(controller.window().visible_count(), 20);
        assert_eq!(controller.visible_len(), 15);
    }

    #[test]
    fn test_switching_key_starts_ascending() {
        let mut controller = bundled_controller();
        controller.select_sort(SortKey::UserReview);
        controller.select_sort(SortKey::UserReview);
        let state = controller.select_sort(SortKey::Ranking);
        assert_eq!(state, SortState::ascending(SortKey::Ranking));
    }

    #[test]
    fn test_no_match_is_empty_view() {
        let mut controller = bundled_controller();
        controller.set_query("no such college");
        assert!(controller.is_empty());
        assert_eq!(controller.visible_len(), 0);
        assert!(controller.visible_records().is_empty());
    }
}
