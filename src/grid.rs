//! Generic tabular view engine: per-column sorting and filtering, an
//! Excel-style derived option list, and pagination over an arbitrary
//! in-memory record set. The grid never mutates caller data; it owns
//! only its own view state (an explicit map from column key to filter
//! state, sort state, page state).

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

pub type Accessor<R> = Box<dyn Fn(&R) -> Option<String> + Send + Sync>;
pub type Comparator<R> = Box<dyn Fn(&R, &R) -> Ordering + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// How a column filters, if at all.
pub enum FilterMode {
    None,
    /// Case-insensitive substring match against a typed query.
    FreeText,
    /// Caller-supplied option set, exact match against selected values.
    Options {
        options: Vec<FilterOption>,
        single_select: bool,
    },
    /// Option list derived from the distinct values present in the data.
    AutoDerived,
}

pub struct Column<R> {
    key: String,
    title: String,
    accessor: Accessor<R>,
    comparator: Option<Comparator<R>>,
    filter: FilterMode,
}

impl<R> Column<R> {
    pub fn new(
        key: impl Into<String>,
        title: impl Into<String>,
        accessor: impl Fn(&R) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            accessor: Box::new(accessor),
            comparator: None,
            filter: FilterMode::None,
        }
    }

    pub fn sortable(mut self, comparator: impl Fn(&R, &R) -> Ordering + Send + Sync + 'static) -> Self {
        self.comparator = Some(Box::new(comparator));
        self
    }

    pub fn filter(mut self, mode: FilterMode) -> Self {
        self.filter = mode;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FilterState {
    Text(String),
    Selected(Vec<String>),
}

/// Checkbox-group summary for a filter dropdown: how many options are
/// ticked, and whether the select-all box should render checked,
/// unchecked, or indeterminate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSummary {
    pub selected: usize,
    pub visible: usize,
    pub all_visible_selected: bool,
    pub indeterminate: bool,
}

pub struct GridView<'a, R> {
    pub rows: Vec<&'a R>,
    /// Filtered row count, before pagination.
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub loading: bool,
    /// True when the source data itself is empty (renders the empty
    /// state, not a filtered-to-nothing table).
    pub empty_source: bool,
}

pub struct DataGrid<R> {
    columns: Vec<Column<R>>,
    rows: Vec<R>,
    row_key: Accessor<R>,
    filters: HashMap<String, FilterState>,
    option_queries: HashMap<String, String>,
    sort: Option<SortState>,
    page: usize,
    page_size: usize,
    loading: bool,
    on_search: Option<Box<dyn Fn(&str) + Send + Sync>>,
    on_row_click: Option<Box<dyn Fn(&R) + Send + Sync>>,
}

impl<R> DataGrid<R> {
    pub fn new(
        columns: Vec<Column<R>>,
        rows: Vec<R>,
        row_key: impl Fn(&R) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            columns,
            rows,
            row_key: Box::new(row_key),
            filters: HashMap::new(),
            option_queries: HashMap::new(),
            sort: None,
            page: 1,
            page_size: 10,
            loading: false,
            on_search: None,
            on_row_click: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn on_search(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_search = Some(Box::new(callback));
        self
    }

    pub fn on_row_click(mut self, callback: impl Fn(&R) + Send + Sync + 'static) -> Self {
        self.on_row_click = Some(Box::new(callback));
        self
    }

    /// Replaces the record set. Derived option lists follow the new data
    /// on the next read; filter and sort state carry over.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
    }

    /// Replaces the column set. Filter state for keys that no longer
    /// exist is dropped, so state never outlives its column.
    pub fn set_columns(&mut self, columns: Vec<Column<R>>) {
        self.filters
            .retain(|key, _| columns.iter().any(|c| c.key == *key));
        self.option_queries
            .retain(|key, _| columns.iter().any(|c| c.key == *key));
        if let Some(sort) = &self.sort {
            if !columns.iter().any(|c| c.key == sort.key) {
                self.sort = None;
            }
        }
        self.columns = columns;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Header click: cycles ascending, descending, unsorted. Clicking a
    /// different sortable column starts it ascending (last click wins).
    /// Columns without a comparator do not sort.
    pub fn toggle_sort(&mut self, key: &str) {
        if self.loading {
            return;
        }
        let sortable = self
            .columns
            .iter()
            .any(|c| c.key == key && c.comparator.is_some());
        if !sortable {
            return;
        }
        self.sort = match self.sort.take() {
            Some(state) if state.key == key => match state.direction {
                SortDirection::Ascending => Some(SortState {
                    key: key.to_string(),
                    direction: SortDirection::Descending,
                }),
                SortDirection::Descending => None,
            },
            _ => Some(SortState {
                key: key.to_string(),
                direction: SortDirection::Ascending,
            }),
        };
        self.page = 1;
    }

    /// Forces a sort state directly (query-parameter driven listings).
    pub fn set_sort(&mut self, key: &str, direction: SortDirection) {
        if self
            .columns
            .iter()
            .any(|c| c.key == key && c.comparator.is_some())
        {
            self.sort = Some(SortState {
                key: key.to_string(),
                direction,
            });
            self.page = 1;
        }
    }

    pub fn set_text_filter(&mut self, key: &str, query: &str) {
        if self.loading || !self.has_column(key) {
            return;
        }
        if query.is_empty() {
            self.filters.remove(key);
        } else {
            self.filters
                .insert(key.to_string(), FilterState::Text(query.to_string()));
        }
        self.page = 1;
    }

    pub fn set_selected(&mut self, key: &str, mut values: Vec<String>) {
        if self.loading || !self.has_column(key) {
            return;
        }
        if self.is_single_select(key) && values.len() > 1 {
            values = values.split_off(values.len() - 1);
        }
        if values.is_empty() {
            self.filters.remove(key);
        } else {
            self.filters
                .insert(key.to_string(), FilterState::Selected(values));
        }
        self.page = 1;
    }

    pub fn toggle_value(&mut self, key: &str, value: &str) {
        if self.loading || !self.has_column(key) {
            return;
        }
        let mut selected = match self.filters.get(key) {
            Some(FilterState::Selected(values)) => values.clone(),
            _ => Vec::new(),
        };
        if let Some(pos) = selected.iter().position(|v| v == value) {
            selected.remove(pos);
        } else if self.is_single_select(key) {
            selected = vec![value.to_string()];
        } else {
            selected.push(value.to_string());
        }
        self.set_selected(key, selected);
    }

    /// Ticks every option currently visible in the dropdown (i.e. after
    /// the option search, if one is typed). Selections for options
    /// hidden by the search are left alone.
    pub fn select_all(&mut self, key: &str) {
        if self.loading || !self.has_column(key) {
            return;
        }
        let mut selected = match self.filters.get(key) {
            Some(FilterState::Selected(values)) => values.clone(),
            _ => Vec::new(),
        };
        for option in self.visible_options(key) {
            if !selected.contains(&option.value) {
                selected.push(option.value);
            }
        }
        self.set_selected(key, selected);
    }

    pub fn clear_filter(&mut self, key: &str) {
        if self.loading {
            return;
        }
        self.filters.remove(key);
        self.option_queries.remove(key);
        self.page = 1;
    }

    /// Narrows the option checklist of a dropdown; affects only which
    /// options are listed, never the row filter itself.
    pub fn set_option_query(&mut self, key: &str, query: &str) {
        if self.loading || !self.has_column(key) {
            return;
        }
        if query.is_empty() {
            self.option_queries.remove(key);
        } else {
            self.option_queries
                .insert(key.to_string(), query.to_string());
        }
    }

    /// The full option list for a column: the caller-supplied set for
    /// predefined columns, or the distinct non-null values of the data
    /// (deduplicated, sorted lexicographically by string form) for
    /// auto-derived ones. An empty list is a valid "no options" state.
    pub fn options(&self, key: &str) -> Vec<FilterOption> {
        let Some(column) = self.columns.iter().find(|c| c.key == key) else {
            return Vec::new();
        };
        match &column.filter {
            FilterMode::Options { options, .. } => options.clone(),
            FilterMode::AutoDerived => {
                let distinct: BTreeSet<String> = self
                    .rows
                    .iter()
                    .filter_map(|row| (column.accessor)(row))
                    .collect();
                distinct
                    .into_iter()
                    .map(|value| FilterOption::new(value.clone(), value))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// The option list after the dropdown's own search box.
    pub fn visible_options(&self, key: &str) -> Vec<FilterOption> {
        let options = self.options(key);
        match self.option_queries.get(key) {
            Some(query) => {
                let needle = query.to_lowercase();
                options
                    .into_iter()
                    .filter(|o| o.label.to_lowercase().contains(&needle))
                    .collect()
            }
            None => options,
        }
    }

    pub fn selection_summary(&self, key: &str) -> SelectionSummary {
        let visible = self.visible_options(key);
        let selected: Vec<&String> = match self.filters.get(key) {
            Some(FilterState::Selected(values)) => values.iter().collect(),
            _ => Vec::new(),
        };
        let visible_selected = visible
            .iter()
            .filter(|o| selected.iter().any(|v| **v == o.value))
            .count();
        let all = !visible.is_empty() && visible_selected == visible.len();
        SelectionSummary {
            selected: selected.len(),
            visible: visible.len(),
            all_visible_selected: all,
            indeterminate: visible_selected > 0 && !all,
        }
    }

    /// Global search box: the grid's responsibility ends at handing the
    /// typed text to the caller's callback.
    pub fn search(&self, text: &str) {
        if self.loading {
            return;
        }
        if let Some(callback) = &self.on_search {
            callback(text);
        }
    }

    pub fn rows_clickable(&self) -> bool {
        self.on_row_click.is_some()
    }

    /// Click on the row whose key field matches `key_value`; invokes the
    /// caller's handler with the full record.
    pub fn click_row(&self, key_value: &str) {
        if self.loading {
            return;
        }
        let Some(handler) = &self.on_row_click else {
            return;
        };
        if let Some(row) = self
            .rows
            .iter()
            .find(|r| (self.row_key)(r).as_deref() == Some(key_value))
        {
            handler(row);
        }
    }

    pub fn set_page(&mut self, page: usize) {
        if self.loading {
            return;
        }
        self.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        if self.loading {
            return;
        }
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Computes the current view: filters, then sorts, then paginates.
    pub fn view(&self) -> GridView<'_, R> {
        let mut indices: Vec<usize> = (0..self.rows.len())
            .filter(|&i| self.row_passes(&self.rows[i]))
            .collect();

        if let Some(sort) = &self.sort {
            if let Some(column) = self.columns.iter().find(|c| c.key == sort.key) {
                if let Some(comparator) = &column.comparator {
                    // Stable sort: equal keys keep their prior relative order.
                    indices.sort_by(|&a, &b| {
                        let ord = comparator(&self.rows[a], &self.rows[b]);
                        match sort.direction {
                            SortDirection::Ascending => ord,
                            SortDirection::Descending => ord.reverse(),
                        }
                    });
                }
            }
        }

        let total = indices.len();
        let page_count = if total == 0 {
            1
        } else {
            (total + self.page_size - 1) / self.page_size
        };
        let page = self.page.min(page_count);
        let start = (page - 1) * self.page_size;
        let rows = indices
            .iter()
            .skip(start)
            .take(self.page_size)
            .map(|&i| &self.rows[i])
            .collect();

        GridView {
            rows,
            total,
            page,
            page_size: self.page_size,
            page_count,
            loading: self.loading,
            empty_source: self.rows.is_empty(),
        }
    }

    fn has_column(&self, key: &str) -> bool {
        self.columns.iter().any(|c| c.key == key)
    }

    fn is_single_select(&self, key: &str) -> bool {
        matches!(
            self.columns.iter().find(|c| c.key == key).map(|c| &c.filter),
            Some(FilterMode::Options {
                single_select: true,
                ..
            })
        )
    }

    fn row_passes(&self, row: &R) -> bool {
        self.columns.iter().all(|column| {
            match self.filters.get(&column.key) {
                Some(FilterState::Text(query)) if !query.is_empty() => (column.accessor)(row)
                    .map(|value| value.to_lowercase().contains(&query.to_lowercase()))
                    .unwrap_or(false),
                Some(FilterState::Selected(values)) if !values.is_empty() => (column.accessor)(row)
                    .map(|value| values.contains(&value))
                    .unwrap_or(false),
                _ => true,
            }
        })
    }
}

/// Query parameters accepted by grid-backed list endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl ListQuery {
    /// True when no parameter was supplied, i.e. the caller wants the
    /// plain full array.
    pub fn is_plain(&self) -> bool {
        self.q.is_none()
            && self.sort.is_none()
            && self.dir.is_none()
            && self.page.is_none()
            && self.page_size.is_none()
    }

    pub fn direction(&self) -> SortDirection {
        match self.dir.as_deref() {
            Some("desc") => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

/// One page of a grid-backed listing, as serialized to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub rows: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
}

/// Runs a query against a grid and clones the resulting page out.
pub fn run_query<R: Clone>(mut grid: DataGrid<R>, query: &ListQuery) -> PageResponse<R> {
    if let Some(sort) = &query.sort {
        grid.set_sort(sort, query.direction());
    }
    if let Some(page_size) = query.page_size {
        grid.set_page_size(page_size);
    }
    if let Some(page) = query.page {
        grid.set_page(page);
    }
    let view = grid.view();
    PageResponse {
        rows: view.rows.into_iter().cloned().collect(),
        total: view.total,
        page: view.page,
        page_size: view.page_size,
        page_count: view.page_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        name: &'static str,
        status: &'static str,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 1, name: "b", status: "OPEN" },
            Row { id: 2, name: "a", status: "DONE" },
            Row { id: 3, name: "c", status: "OPEN" },
            Row { id: 4, name: "a", status: "DONE" },
        ]
    }

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column::new("name", "Name", |r: &Row| Some(r.name.to_string()))
                .sortable(|a: &Row, b: &Row| a.name.cmp(b.name))
                .filter(FilterMode::FreeText),
            Column::new("status", "Status", |r: &Row| Some(r.status.to_string()))
                .filter(FilterMode::AutoDerived),
        ]
    }

    fn grid() -> DataGrid<Row> {
        DataGrid::new(columns(), rows(), |r| Some(r.id.to_string()))
    }

    #[test]
    fn sort_ascending_orders_by_name() {
        let mut grid = DataGrid::new(
            columns(),
            vec![
                Row { id: 1, name: "b", status: "OPEN" },
                Row { id: 2, name: "a", status: "OPEN" },
            ],
            |r| Some(r.id.to_string()),
        );
        grid.toggle_sort("name");
        let ids: Vec<u32> = grid.view().rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn sort_cycle_ascending_descending_unsorted() {
        let mut grid = grid();
        grid.toggle_sort("name");
        assert_eq!(
            grid.sort_state().map(|s| s.direction),
            Some(SortDirection::Ascending)
        );
        grid.toggle_sort("name");
        assert_eq!(
            grid.sort_state().map(|s| s.direction),
            Some(SortDirection::Descending)
        );
        grid.toggle_sort("name");
        assert!(grid.sort_state().is_none());
    }

    #[test]
    fn descending_reverses_ascending_for_distinct_keys() {
        let data = vec![
            Row { id: 1, name: "c", status: "OPEN" },
            Row { id: 2, name: "a", status: "OPEN" },
            Row { id: 3, name: "b", status: "OPEN" },
        ];
        let mut grid = DataGrid::new(columns(), data, |r| Some(r.id.to_string()));
        grid.toggle_sort("name");
        let ascending: Vec<u32> = grid.view().rows.iter().map(|r| r.id).collect();
        grid.toggle_sort("name");
        let descending: Vec<u32> = grid.view().rows.iter().map(|r| r.id).collect();
        let mut reversed = ascending.clone();
        reversed.reverse();
        assert_eq!(descending, reversed);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut grid = grid();
        grid.toggle_sort("name");
        // Both "a" rows: id 2 precedes id 4 in the source, and stays so.
        let ids: Vec<u32> = grid.view().rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn last_clicked_column_wins() {
        let mut grid = grid();
        grid.toggle_sort("name");
        grid.toggle_sort("name");
        // Status has no comparator, so clicking it changes nothing.
        grid.toggle_sort("status");
        assert_eq!(grid.sort_state().map(|s| s.key.as_str()), Some("name"));
    }

    #[test]
    fn derived_options_are_distinct_and_sorted_regardless_of_row_order() {
        let grid_a = grid();
        let mut reversed = rows();
        reversed.reverse();
        let grid_b = DataGrid::new(columns(), reversed, |r| Some(r.id.to_string()));

        let values = |g: &DataGrid<Row>| {
            g.options("status")
                .into_iter()
                .map(|o| o.value)
                .collect::<Vec<_>>()
        };
        assert_eq!(values(&grid_a), vec!["DONE", "OPEN"]);
        assert_eq!(values(&grid_a), values(&grid_b));
    }

    #[test]
    fn derived_options_skip_null_values() {
        let column = Column::new("status", "Status", |r: &Row| {
            (r.status != "OPEN").then(|| r.status.to_string())
        })
        .filter(FilterMode::AutoDerived);
        let grid = DataGrid::new(vec![column], rows(), |r| Some(r.id.to_string()));
        let values: Vec<String> = grid.options("status").into_iter().map(|o| o.value).collect();
        assert_eq!(values, vec!["DONE"]);
    }

    #[test]
    fn no_options_state_for_empty_data() {
        let grid = DataGrid::new(columns(), Vec::new(), |r: &Row| Some(r.id.to_string()));
        assert!(grid.options("status").is_empty());
        let view = grid.view();
        assert!(view.empty_source);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn free_text_filter_is_case_insensitive_substring() {
        let mut grid = grid();
        grid.set_text_filter("name", "A");
        let ids: Vec<u32> = grid.view().rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn selecting_all_derived_options_yields_unfiltered_set() {
        let mut grid = grid();
        grid.select_all("status");
        assert_eq!(grid.view().total, 4);
        assert!(grid.selection_summary("status").all_visible_selected);
    }

    #[test]
    fn selected_values_filter_exactly() {
        let mut grid = grid();
        grid.set_selected("status", vec!["DONE".to_string()]);
        let ids: Vec<u32> = grid.view().rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4]);
        grid.toggle_value("status", "DONE");
        assert_eq!(grid.view().total, 4);
    }

    #[test]
    fn select_all_applies_to_searched_options_only() {
        let mut grid = grid();
        grid.set_option_query("status", "do");
        grid.select_all("status");
        let summary = grid.selection_summary("status");
        assert_eq!(summary.selected, 1);
        let ids: Vec<u32> = grid.view().rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn partial_selection_is_indeterminate() {
        let mut grid = grid();
        grid.toggle_value("status", "OPEN");
        let summary = grid.selection_summary("status");
        assert_eq!(summary.selected, 1);
        assert!(summary.indeterminate);
        assert!(!summary.all_visible_selected);
    }

    #[test]
    fn single_select_keeps_last_value() {
        let column = Column::new("status", "Status", |r: &Row| Some(r.status.to_string()))
            .filter(FilterMode::Options {
                options: vec![
                    FilterOption::new("Open", "OPEN"),
                    FilterOption::new("Done", "DONE"),
                ],
                single_select: true,
            });
        let mut grid = DataGrid::new(vec![column], rows(), |r| Some(r.id.to_string()));
        grid.toggle_value("status", "OPEN");
        grid.toggle_value("status", "DONE");
        let ids: Vec<u32> = grid.view().rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn filter_change_resets_page() {
        let mut grid = grid().with_page_size(2);
        grid.set_page(2);
        assert_eq!(grid.view().page, 2);
        grid.set_text_filter("name", "a");
        assert_eq!(grid.view().page, 1);
    }

    #[test]
    fn pagination_covers_filtered_sorted_result() {
        let mut grid = grid().with_page_size(3);
        grid.toggle_sort("name");
        let view = grid.view();
        assert_eq!(view.total, 4);
        assert_eq!(view.page_count, 2);
        assert_eq!(view.rows.len(), 3);
        grid.set_page(2);
        let ids: Vec<u32> = grid.view().rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn page_clamps_to_last_page() {
        let mut grid = grid().with_page_size(3);
        grid.set_page(9);
        assert_eq!(grid.view().page, 2);
    }

    #[test]
    fn loading_disables_interaction() {
        let mut grid = grid();
        grid.set_loading(true);
        grid.toggle_sort("name");
        grid.set_text_filter("name", "a");
        assert!(grid.sort_state().is_none());
        assert_eq!(grid.view().total, 4);
        assert!(grid.view().loading);
    }

    #[test]
    fn search_invokes_caller_callback_only() {
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in_cb = Arc::clone(&seen);
        let grid = DataGrid::new(columns(), rows(), |r: &Row| Some(r.id.to_string()))
            .on_search(move |text| {
                assert_eq!(text, "lap");
                seen_in_cb.fetch_add(1, AtomicOrdering::SeqCst);
            });
        grid.search("lap");
        assert_eq!(seen.load(AtomicOrdering::SeqCst), 1);
        // The grid itself did not filter anything.
        assert_eq!(grid.view().total, 4);
    }

    #[test]
    fn row_click_hands_over_full_record() {
        let clicked = Arc::new(AtomicUsize::new(0));
        let clicked_in_cb = Arc::clone(&clicked);
        let grid = DataGrid::new(columns(), rows(), |r: &Row| Some(r.id.to_string()))
            .on_row_click(move |row| {
                assert_eq!(row.name, "c");
                clicked_in_cb.fetch_add(1, AtomicOrdering::SeqCst);
            });
        assert!(grid.rows_clickable());
        grid.click_row("3");
        assert_eq!(clicked.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn stale_filter_state_dropped_with_its_column() {
        let mut grid = grid();
        grid.set_selected("status", vec!["OPEN".to_string()]);
        grid.set_columns(vec![Column::new("name", "Name", |r: &Row| {
            Some(r.name.to_string())
        })]);
        // The status filter no longer applies.
        assert_eq!(grid.view().total, 4);
    }

    #[test]
    fn run_query_paginates_and_sorts() {
        let query = ListQuery {
            q: None,
            sort: Some("name".to_string()),
            dir: Some("desc".to_string()),
            page: Some(1),
            page_size: Some(2),
        };
        let page = run_query(grid(), &query);
        assert_eq!(page.total, 4);
        assert_eq!(page.page_count, 2);
        let names: Vec<&str> = page.rows.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["c", "b"]);
    }
}
