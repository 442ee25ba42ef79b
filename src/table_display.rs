use crate::config::config::DisplayConfig;
use crate::data::display::RowDisplay;
use crate::view::controller::TableController;
use crate::view::sorter::{SortDirection, SortKey, SortState};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

/// Sentinel shown instead of an empty body
pub const NO_RESULTS: &str = "No Colleges Found";

/// Column heading with the sort arrow when `key` is the active sort
pub fn header_label(key: SortKey, active: Option<SortState>, display: &DisplayConfig) -> String {
    match active {
        Some(state) if state.key == key => {
            let arrow = match state.direction {
                SortDirection::Ascending => &display.icons.ascending,
                SortDirection::Descending => &display.icons.descending,
            };
            format!("{} {}", key.label(), arrow)
        }
        _ => key.label().to_string(),
    }
}

/// Render the windowed view of `controller` as a text table
pub fn render_table(controller: &TableController, display: &DisplayConfig) -> String {
    let active = controller.sort_indicator();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut headers = Vec::new();
    if display.show_row_numbers {
        headers.push(Cell::new("#").add_attribute(Attribute::Bold));
    }
    headers.extend(
        [
            SortKey::CdRank,
            SortKey::Name,
            SortKey::Fees,
            SortKey::Placements,
            SortKey::UserReview,
            SortKey::Ranking,
        ]
        .into_iter()
        .map(|key| Cell::new(header_label(key, active, display)).add_attribute(Attribute::Bold)),
    );
    let column_count = headers.len();
    table.set_header(headers);

    if controller.is_empty() {
        let mut row = vec![Cell::new(NO_RESULTS).set_alignment(CellAlignment::Center)];
        row.extend((1..column_count).map(|_| Cell::new("")));
        table.add_row(row);
        return table.to_string();
    }

    for (position, row) in controller.visible_display(display).iter().enumerate() {
        let mut cells = Vec::with_capacity(column_count);
        if display.show_row_numbers {
            cells.push(Cell::new(position + 1));
        }
        cells.extend(row_cells(row, display));
        if row.featured {
            cells = cells
                .into_iter()
                .map(|cell| cell.fg(Color::Yellow))
                .collect();
        }
        table.add_row(cells);
    }

    table.to_string()
}

fn row_cells(row: &RowDisplay, display: &DisplayConfig) -> Vec<Cell> {
    let rank = if row.featured {
        format!("{} {}", row.rank, display.icons.featured)
    } else {
        row.rank.clone()
    };

    let mut college = vec![row.name.clone(), row.subtitle.clone()];
    college.extend(row.courses.iter().cloned());

    let fee = format!("{}\n{}\n- 1st Year Fees", row.fee, row.fee_course);
    let placement = format!(
        "{}\nAverage Package\n{}\nHighest Package",
        row.placement_average, row.placement_highest
    );

    let mut review = vec![row.rating.clone(), row.review_count.clone()];
    if let Some(highlight) = &row.review_highlight {
        review.push(highlight.clone());
    }

    let ranking = format!("{}\n{}", row.ranking, row.ranking_year);

    vec![
        Cell::new(rank),
        Cell::new(college.join("\n")).add_attribute(Attribute::Bold),
        Cell::new(fee),
        Cell::new(placement),
        Cell::new(review.join("\n")),
        Cell::new(ranking),
    ]
}

/// One-line summary printed under the table
pub fn summary_line(controller: &TableController) -> String {
    let mut line = format!(
        "Showing {} of {} colleges",
        controller.visible_len(),
        controller.working_set_len()
    );
    if !controller.query().is_empty() {
        line.push_str(&format!(" matching '{}'", controller.query()));
    }
    if controller.working_set_len() != controller.total_len() {
        line.push_str(&format!(" ({} total)", controller.total_len()));
    }
    line
}
