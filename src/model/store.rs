//! Item list store - raw fetched items and the derived view
//!
//! The store owns every item of the latest fetch plus the active filter and
//! sort parameters. The derived view is a list of indices into the raw
//! items, recomputed deterministically by each mutating call.

use super::columns::RenderedColumn;
use super::filter::{
    FilterState, SelectOption, SobjectTypeFilter, SortDirection, SortState, ViewOption, VIEW_ALL,
};
use super::item::{ApprovalItem, ItemField};
use std::collections::HashSet;

/// Fields searched by the free-text filter
const TEXT_FILTER_FIELDS: [ItemField; 4] = [
    ItemField::RelatedToName,
    ItemField::SobjectType,
    ItemField::MostRecentApproverName,
    ItemField::DateSubmitted,
];

/// Field and direction used until the user picks a sort
const DEFAULT_SORT_FIELD: &str = "dateSubmitted";

#[derive(Debug, Default)]
pub struct ItemListStore {
    /// Items of the latest fetch, in fetch order
    items: Vec<ApprovalItem>,

    /// Derived view as indices into `items`
    view: Vec<usize>,

    filter: FilterState,

    sort: Option<SortState>,

    /// Selected work item ids
    selected: HashSet<String>,

    /// Whether the backend may hold more items than were fetched
    pub has_more: bool,
}

impl ItemListStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Population
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the raw collection and recompute the derived view.
    ///
    /// The current filter is re-applied. The first population is sorted by
    /// date submitted, ascending; later ones keep the active sort.
    pub fn replace(&mut self, items: Vec<ApprovalItem>, columns: &[RenderedColumn]) {
        let mut seen = HashSet::new();
        self.items = items
            .into_iter()
            .filter(|item| {
                let fresh = seen.insert(item.work_item_id.clone());
                if !fresh {
                    tracing::warn!(work_item_id = %item.work_item_id, "dropping duplicate work item");
                }
                fresh
            })
            .collect();

        self.selected.retain(|id| seen.contains(id));
        self.recompute_view();

        match self.sort.clone() {
            Some(sort) => self.sort(&sort.field_name, sort.direction, columns),
            None => self.sort(DEFAULT_SORT_FIELD, SortDirection::Asc, columns),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Filtering
    // ─────────────────────────────────────────────────────────────────────────

    /// Filter the raw collection: view option, then type, then free text.
    ///
    /// The result keeps raw-collection order; no sort is re-applied.
    pub fn apply_filter(
        &mut self,
        view_option: ViewOption,
        text_query: &str,
        sobject_type_filter: SobjectTypeFilter,
    ) {
        self.filter = FilterState {
            view_option,
            text_query: text_query.to_string(),
            sobject_type_filter,
        };
        self.recompute_view();
    }

    pub fn set_view_option(&mut self, view_option: ViewOption) {
        let filter = self.filter.clone();
        self.apply_filter(view_option, &filter.text_query, filter.sobject_type_filter);
    }

    pub fn set_text_query(&mut self, text_query: &str) {
        let filter = self.filter.clone();
        self.apply_filter(filter.view_option, text_query, filter.sobject_type_filter);
    }

    pub fn set_sobject_type_filter(&mut self, sobject_type_filter: SobjectTypeFilter) {
        let filter = self.filter.clone();
        self.apply_filter(filter.view_option, &filter.text_query, sobject_type_filter);
    }

    fn recompute_view(&mut self) {
        let filter = &self.filter;
        let query = filter.text_query.to_lowercase();

        self.view = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| filter.view_option.keeps(item.is_delegated))
            .filter(|(_, item)| filter.sobject_type_filter.keeps(&item.sobject_type))
            .filter(|(_, item)| {
                query.is_empty()
                    || TEXT_FILTER_FIELDS
                        .iter()
                        .any(|field| item.text(*field).to_lowercase().contains(&query))
            })
            .map(|(idx, _)| idx)
            .collect();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sorting
    // ─────────────────────────────────────────────────────────────────────────

    /// Stable sort of the derived view by `field_name`.
    ///
    /// Link fields sort on their display name. Unknown field names leave the
    /// order unchanged. The label of the rendered column showing
    /// `field_name` is recorded for the sort indicator.
    pub fn sort(&mut self, field_name: &str, direction: SortDirection, columns: &[RenderedColumn]) {
        if let Some(field) = ItemField::from_name(field_name).map(|f| f.sort_field()) {
            let items = &self.items;
            self.view.sort_by(|&a, &b| {
                let ordering = items[a].sort_key(field).cmp(&items[b].sort_key(field));
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let label = columns
            .iter()
            .filter_map(RenderedColumn::spec)
            .find(|spec| spec.field.name() == field_name)
            .map(|spec| spec.label.to_string())
            .unwrap_or_else(|| field_name.to_string());

        self.sort = Some(SortState {
            field_name: field_name.to_string(),
            direction,
            label,
        });
    }

    /// Re-run the active sort, if any
    pub fn reapply_sort(&mut self, columns: &[RenderedColumn]) {
        if let Some(sort) = self.sort.clone() {
            self.sort(&sort.field_name, sort.direction, columns);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// The "all" sentinel followed by each distinct type in first-seen order
    pub fn available_sobject_types(&self) -> Vec<SelectOption> {
        let mut seen = HashSet::new();
        let mut options = vec![SelectOption::new(VIEW_ALL, VIEW_ALL)];
        for item in &self.items {
            if seen.insert(item.sobject_type.as_str()) {
                options.push(SelectOption::new(&item.sobject_type, &item.sobject_type));
            }
        }
        options
    }

    pub fn items(&self) -> &[ApprovalItem] {
        &self.items
    }

    /// Items of the derived view, in view order
    pub fn view(&self) -> impl Iterator<Item = &ApprovalItem> + '_ {
        self.view.iter().map(|&idx| &self.items[idx])
    }

    pub fn view_item(&self, position: usize) -> Option<&ApprovalItem> {
        self.view.get(position).map(|&idx| &self.items[idx])
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    pub fn position_in_view(&self, work_item_id: &str) -> Option<usize> {
        self.view
            .iter()
            .position(|&idx| self.items[idx].work_item_id == work_item_id)
    }

    pub fn get(&self, work_item_id: &str) -> Option<&ApprovalItem> {
        self.items.iter().find(|item| item.work_item_id == work_item_id)
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    /// Select an item; unknown ids are ignored
    pub fn select(&mut self, work_item_id: &str) -> bool {
        if self.get(work_item_id).is_none() {
            return false;
        }
        self.selected.insert(work_item_id.to_string())
    }

    pub fn deselect(&mut self, work_item_id: &str) -> bool {
        self.selected.remove(work_item_id)
    }

    pub fn toggle_selected(&mut self, work_item_id: &str) {
        if !self.deselect(work_item_id) {
            self.select(work_item_id);
        }
    }

    pub fn select_all_visible(&mut self) {
        for &idx in &self.view {
            self.selected.insert(self.items[idx].work_item_id.clone());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, work_item_id: &str) -> bool {
        self.selected.contains(work_item_id)
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn selection_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected items in raw-collection order
    pub fn selected_items(&self) -> Vec<&ApprovalItem> {
        self.items
            .iter()
            .filter(|item| self.selected.contains(&item.work_item_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::columns::ColumnLayout;
    use crate::services::storage::MemoryStore;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn columns() -> Vec<RenderedColumn> {
        ColumnLayout::new(Box::new(MemoryStore::new())).rendered_columns()
    }

    fn item(id: &str, name: &str, sobject_type: &str, delegated: bool, date: &str) -> ApprovalItem {
        ApprovalItem {
            work_item_id: id.to_string(),
            related_to_name: name.to_string(),
            related_to_href: format!("/lightning/r/{}/view", id),
            sobject_type: sobject_type.to_string(),
            is_delegated: delegated,
            date_submitted: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            ..Default::default()
        }
    }

    fn two_items() -> Vec<ApprovalItem> {
        vec![
            item("a", "Acct A", "Account", true, "2024-01-02"),
            item("b", "Acct B", "Opportunity", false, "2024-01-01"),
        ]
    }

    fn view_ids(store: &ItemListStore) -> Vec<&str> {
        store.view().map(|i| i.work_item_id.as_str()).collect()
    }

    #[test]
    fn test_replace_sorts_by_date_on_first_population() {
        let mut store = ItemListStore::new();
        store.replace(two_items(), &columns());

        assert_eq!(view_ids(&store), vec!["b", "a"]);
        let sort = store.sort_state().unwrap();
        assert_eq!(sort.field_name, "dateSubmitted");
        assert_eq!(sort.direction, SortDirection::Asc);
        assert_eq!(sort.label, "Date Submitted");
    }

    #[test]
    fn test_replace_keeps_active_sort_and_filter() {
        let cols = columns();
        let mut store = ItemListStore::new();
        store.replace(two_items(), &cols);
        store.sort("relatedToHref", SortDirection::Desc, &cols);
        store.set_view_option(ViewOption::ShowDelegatedToMe);

        let mut refreshed = two_items();
        refreshed.push(item("c", "Acct C", "Account", true, "2023-12-31"));
        store.replace(refreshed, &cols);

        assert_eq!(view_ids(&store), vec!["c", "a"]);
        assert_eq!(store.sort_state().unwrap().field_name, "relatedToHref");
    }

    #[test]
    fn test_replace_with_empty_input_yields_empty_view() {
        let mut store = ItemListStore::new();
        store.replace(two_items(), &columns());
        store.replace(Vec::new(), &columns());
        assert_eq!(store.view_len(), 0);
        assert!(store.items().is_empty());
    }

    #[test]
    fn test_replace_drops_duplicate_ids() {
        let mut store = ItemListStore::new();
        let mut items = two_items();
        items.push(item("a", "Shadow", "Case", false, "2020-01-01"));
        store.replace(items, &columns());

        assert_eq!(store.items().len(), 2);
        assert_eq!(store.get("a").unwrap().related_to_name, "Acct A");
    }

    #[test]
    fn test_assigned_view_then_sort_example() {
        let cols = columns();
        let mut store = ItemListStore::new();
        store.replace(two_items(), &cols);

        store.apply_filter(
            ViewOption::from_value("showAssignedToMe"),
            "",
            SobjectTypeFilter::from_value("View All"),
        );
        store.sort("dateSubmitted", SortDirection::parse("asc"), &cols);

        assert_eq!(store.view_len(), 1);
        assert_eq!(store.view_item(0).unwrap().related_to_name, "Acct B");
    }

    #[test]
    fn test_text_query_is_case_insensitive() {
        let mut store = ItemListStore::new();
        store.replace(two_items(), &columns());

        store.apply_filter(ViewOption::ShowAll, "acct a", SobjectTypeFilter::All);

        assert_eq!(view_ids(&store), vec!["a"]);
    }

    #[test]
    fn test_text_query_searches_type_approver_and_date() {
        let mut items = two_items();
        items[1].most_recent_approver_name = "Pat Quinn".to_string();
        let mut store = ItemListStore::new();
        store.replace(items, &columns());

        store.set_text_query("OPPORT");
        assert_eq!(view_ids(&store), vec!["b"]);

        store.set_text_query("quinn");
        assert_eq!(view_ids(&store), vec!["b"]);

        store.set_text_query("2024-01-02");
        assert_eq!(view_ids(&store), vec!["a"]);

        store.set_text_query("no such thing");
        assert_eq!(store.view_len(), 0);
    }

    #[test]
    fn test_text_query_ignores_unsearched_fields() {
        let mut items = two_items();
        items[0].submitted_by_name = "Zed".to_string();
        let mut store = ItemListStore::new();
        store.replace(items, &columns());

        store.set_text_query("zed");
        assert_eq!(store.view_len(), 0);
    }

    #[test]
    fn test_sobject_type_filter_is_exact() {
        let mut store = ItemListStore::new();
        store.replace(two_items(), &columns());

        store.set_sobject_type_filter(SobjectTypeFilter::from_value("Account"));
        assert_eq!(view_ids(&store), vec!["a"]);

        store.set_sobject_type_filter(SobjectTypeFilter::from_value("account"));
        assert_eq!(store.view_len(), 0);

        store.set_sobject_type_filter(SobjectTypeFilter::All);
        assert_eq!(store.view_len(), 2);
    }

    #[test]
    fn test_stages_narrow_in_sequence() {
        let items = vec![
            item("1", "North", "Account", true, "2024-02-01"),
            item("2", "North", "Account", false, "2024-02-02"),
            item("3", "South", "Account", true, "2024-02-03"),
            item("4", "North", "Case", true, "2024-02-04"),
        ];
        let mut store = ItemListStore::new();
        store.replace(items, &columns());

        store.apply_filter(
            ViewOption::ShowDelegatedToMe,
            "north",
            SobjectTypeFilter::Only("Account".to_string()),
        );
        assert_eq!(view_ids(&store), vec!["1"]);
    }

    #[test]
    fn test_filter_keeps_raw_order_instead_of_sort() {
        let cols = columns();
        let mut store = ItemListStore::new();
        store.replace(two_items(), &cols);
        assert_eq!(view_ids(&store), vec!["b", "a"]);

        store.set_text_query("acct");
        assert_eq!(view_ids(&store), vec!["a", "b"]);

        store.reapply_sort(&cols);
        assert_eq!(view_ids(&store), vec!["b", "a"]);
    }

    #[test]
    fn test_sort_redirects_href_fields_to_names() {
        let mut items = two_items();
        items[0].related_to_href = "/zzz".to_string();
        items[1].related_to_href = "/aaa".to_string();
        let cols = columns();
        let mut store = ItemListStore::new();
        store.replace(items, &cols);

        store.sort("relatedToHref", SortDirection::Asc, &cols);
        assert_eq!(view_ids(&store), vec!["a", "b"]);
        assert_eq!(store.sort_state().unwrap().label, "Related To");
    }

    #[test]
    fn test_sort_unknown_direction_is_descending() {
        let cols = columns();
        let mut store = ItemListStore::new();
        store.replace(two_items(), &cols);

        store.sort("relatedToName", SortDirection::parse("sideways"), &cols);
        assert_eq!(view_ids(&store), vec!["b", "a"]);
    }

    #[test]
    fn test_sort_label_falls_back_to_field_name() {
        let cols = columns();
        let mut store = ItemListStore::new();
        store.replace(two_items(), &cols);

        // Submitted By is hidden by default
        store.sort("submittedByHref", SortDirection::Asc, &cols);
        assert_eq!(store.sort_state().unwrap().label, "submittedByHref");

        store.sort("unknownField", SortDirection::Asc, &cols);
        assert_eq!(view_ids(&store), vec!["b", "a"]);
        assert_eq!(store.sort_state().unwrap().label, "unknownField");
    }

    #[test]
    fn test_sort_missing_values_first_when_ascending() {
        let mut items = two_items();
        items[0].date_submitted = None;
        let cols = columns();
        let mut store = ItemListStore::new();
        store.replace(items, &cols);

        assert_eq!(view_ids(&store), vec!["a", "b"]);
        store.sort("dateSubmitted", SortDirection::Desc, &cols);
        assert_eq!(view_ids(&store), vec!["b", "a"]);
    }

    #[test]
    fn test_sort_by_delegation_flag() {
        let cols = columns();
        let mut store = ItemListStore::new();
        store.replace(two_items(), &cols);

        store.sort("isDelegated", SortDirection::Desc, &cols);
        assert_eq!(view_ids(&store), vec!["a", "b"]);
        assert_eq!(store.sort_state().unwrap().label, "Is Delegated");
    }

    #[test]
    fn test_available_sobject_types_first_seen_order() {
        let items = vec![
            item("1", "x", "Opportunity", false, "2024-01-01"),
            item("2", "x", "Account", false, "2024-01-01"),
            item("3", "x", "Opportunity", false, "2024-01-01"),
            item("4", "x", "Case", false, "2024-01-01"),
        ];
        let mut store = ItemListStore::new();
        store.replace(items, &columns());
        store.set_sobject_type_filter(SobjectTypeFilter::Only("Case".to_string()));

        let values: Vec<String> = store
            .available_sobject_types()
            .into_iter()
            .map(|o| o.value)
            .collect();
        assert_eq!(values, vec!["View All", "Opportunity", "Account", "Case"]);
    }

    #[test]
    fn test_available_sobject_types_empty_store() {
        let store = ItemListStore::new();
        assert_eq!(
            store.available_sobject_types(),
            vec![SelectOption::new("View All", "View All")]
        );
    }

    #[test]
    fn test_selection_set() {
        let mut store = ItemListStore::new();
        store.replace(two_items(), &columns());

        assert!(store.select("b"));
        assert!(!store.select("missing"));
        store.toggle_selected("a");
        assert_eq!(store.selection_count(), 2);

        let selected: Vec<&str> = store
            .selected_items()
            .iter()
            .map(|i| i.work_item_id.as_str())
            .collect();
        assert_eq!(selected, vec!["a", "b"]);

        store.toggle_selected("a");
        assert!(!store.is_selected("a"));
        assert!(store.deselect("b"));
        assert!(!store.has_selection());
    }

    #[test]
    fn test_select_all_visible_respects_filter() {
        let mut store = ItemListStore::new();
        store.replace(two_items(), &columns());
        store.set_view_option(ViewOption::ShowDelegatedToMe);

        store.select_all_visible();
        assert!(store.is_selected("a"));
        assert!(!store.is_selected("b"));
    }

    #[test]
    fn test_replace_prunes_stale_selection() {
        let cols = columns();
        let mut store = ItemListStore::new();
        store.replace(two_items(), &cols);
        store.select("a");
        store.select("b");

        store.replace(vec![item("b", "Acct B", "Opportunity", false, "2024-01-01")], &cols);
        assert!(!store.is_selected("a"));
        assert!(store.is_selected("b"));
    }

    fn arb_items() -> impl Strategy<Value = Vec<ApprovalItem>> {
        prop::collection::vec(
            (
                "[A-C]{0,2}",
                prop::sample::select(vec!["Account", "Case", "Opportunity"]),
                any::<bool>(),
                prop::option::of(0u32..5),
            ),
            0..24,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(idx, (name, sobject_type, delegated, day))| ApprovalItem {
                    work_item_id: format!("w{}", idx),
                    related_to_name: name,
                    sobject_type: sobject_type.to_string(),
                    is_delegated: delegated,
                    date_submitted: day.and_then(|d| NaiveDate::from_ymd_opt(2024, 1, d + 1)),
                    ..Default::default()
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_view_options_partition_items(items in arb_items()) {
            let cols = columns();
            let mut store = ItemListStore::new();
            store.replace(items.clone(), &cols);

            store.set_view_option(ViewOption::ShowDelegatedToMe);
            let delegated: Vec<String> = store.view().map(|i| i.work_item_id.clone()).collect();
            prop_assert!(store.view().all(|i| i.is_delegated));

            store.set_view_option(ViewOption::ShowAssignedToMe);
            let assigned: Vec<String> = store.view().map(|i| i.work_item_id.clone()).collect();
            prop_assert!(store.view().all(|i| !i.is_delegated));

            prop_assert_eq!(delegated.len() + assigned.len(), items.len());

            store.set_view_option(ViewOption::ShowAll);
            let mut all: Vec<String> = store.view().map(|i| i.work_item_id.clone()).collect();
            let mut expected: Vec<String> = items.iter().map(|i| i.work_item_id.clone()).collect();
            all.sort();
            expected.sort();
            prop_assert_eq!(all, expected);
        }

        #[test]
        fn prop_sort_is_stable(items in arb_items()) {
            let cols = columns();
            let mut store = ItemListStore::new();
            store.replace(items, &cols);
            store.apply_filter(ViewOption::ShowAll, "", SobjectTypeFilter::All);

            store.sort("relatedToName", SortDirection::Asc, &cols);
            let sorted: Vec<&ApprovalItem> = store.view().collect();
            for pair in sorted.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                prop_assert!(a.related_to_name <= b.related_to_name);
                if a.related_to_name == b.related_to_name {
                    // ids encode raw order
                    let ia: usize = a.work_item_id[1..].parse().unwrap();
                    let ib: usize = b.work_item_id[1..].parse().unwrap();
                    prop_assert!(ia < ib);
                }
            }
        }

        #[test]
        fn prop_desc_reverses_asc_for_distinct_keys(items in arb_items()) {
            let cols = columns();
            let mut store = ItemListStore::new();
            store.replace(items, &cols);

            store.sort("sobjectType", SortDirection::Asc, &cols);
            let mut asc: Vec<String> = store.view().map(|i| i.sobject_type.clone()).collect();
            store.sort("sobjectType", SortDirection::Desc, &cols);
            let desc: Vec<String> = store.view().map(|i| i.sobject_type.clone()).collect();

            asc.reverse();
            prop_assert_eq!(asc, desc);
        }

        #[test]
        fn prop_filter_is_subsequence_of_raw(items in arb_items(), query in "[a-c]{0,1}") {
            let cols = columns();
            let mut store = ItemListStore::new();
            store.replace(items, &cols);
            store.set_text_query(&query);

            let raw_positions: Vec<usize> = store
                .view()
                .map(|i| store.items().iter().position(|r| r.work_item_id == i.work_item_id).unwrap())
                .collect();
            prop_assert!(raw_positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
