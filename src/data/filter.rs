use std::collections::{BTreeSet, HashSet};

use super::model::{CategoryField, Record, Table};

// ---------------------------------------------------------------------------
// Selector options
// ---------------------------------------------------------------------------

/// Unique values of `field` in first-seen order.
pub fn distinct_values(table: &Table, field: CategoryField) -> Vec<String> {
    unique_in_order(table.records().iter().map(|r| r.category(field)))
}

/// Sources observed among records whose country is selected.
///
/// No selected country → no sources offered.
pub fn cascade_sources(table: &Table, selected_countries: &BTreeSet<String>) -> Vec<String> {
    unique_in_order(
        table
            .records()
            .iter()
            .filter(|r| selected_countries.contains(&r.country))
            .map(|r| r.source.as_str()),
    )
}

fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Carry a source selection across a change of offered sources.
///
/// * selected and still offered → kept
/// * no longer offered → dropped
/// * newly offered → selected (the default for a fresh option)
///
/// Sources the user explicitly deselected stay deselected while they remain
/// offered.
pub fn reconcile_sources(
    previous_options: &[String],
    new_options: &[String],
    selected: &BTreeSet<String>,
) -> BTreeSet<String> {
    new_options
        .iter()
        .filter(|s| selected.contains(*s) || !previous_options.contains(*s))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// FilteredTable
// ---------------------------------------------------------------------------

/// Rows of a [`Table`] passing the current selection, in table order.
#[derive(Debug, Clone)]
pub struct FilteredTable<'a> {
    table: &'a Table,
    indices: Vec<usize>,
}

impl<'a> FilteredTable<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let table = self.table;
        self.indices.iter().filter_map(move |&i| table.get(i))
    }

    /// The first `n` surviving records.
    pub fn head(&self, n: usize) -> Vec<Record> {
        self.iter().take(n).cloned().collect()
    }
}

/// Keep records whose country and source are both selected.
///
/// Selections are inclusive lists: an empty set matches nothing.
pub fn filter<'a>(
    table: &'a Table,
    countries: &BTreeSet<String>,
    sources: &BTreeSet<String>,
) -> FilteredTable<'a> {
    let indices = table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| countries.contains(&r.country) && sources.contains(&r.source))
        .map(|(i, _)| i)
        .collect();
    FilteredTable { table, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Table {
        Table::new(vec![
            record("2023-01-01", "A", "X", 1.0, 1.0, 1.0),
            record("2023-01-01", "A", "Y", 2.0, 1.0, 1.0),
            record("2023-01-02", "B", "X", 3.0, 1.0, 1.0),
            record("2023-01-02", "C", "Z", 4.0, 1.0, 1.0),
        ])
    }

    #[test]
    fn distinct_values_keep_first_seen_order() {
        let table = Table::new(vec![
            record("2023-01-01", "Zambia", "Well", 0.0, 0.0, 0.0),
            record("2023-01-01", "Angola", "River", 0.0, 0.0, 0.0),
            record("2023-01-02", "Zambia", "River", 0.0, 0.0, 0.0),
        ]);
        assert_eq!(
            distinct_values(&table, CategoryField::Country),
            strings(&["Zambia", "Angola"])
        );
        assert_eq!(
            distinct_values(&table, CategoryField::Source),
            strings(&["Well", "River"])
        );
    }

    #[test]
    fn cascade_restricts_sources_to_selected_countries() {
        let table = sample();
        assert_eq!(cascade_sources(&table, &set(&["A"])), strings(&["X", "Y"]));
        assert_eq!(cascade_sources(&table, &set(&["B", "C"])), strings(&["X", "Z"]));
        assert!(cascade_sources(&table, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn filter_is_conjunction_of_memberships() {
        let table = sample();
        let filtered = filter(&table, &set(&["A"]), &set(&["X"]));
        let rows: Vec<_> = filtered.iter().map(|r| (r.country.as_str(), r.source.as_str())).collect();
        assert_eq!(rows, vec![("A", "X")]);
    }

    #[test]
    fn filter_preserves_table_order() {
        let table = sample();
        let filtered = filter(&table, &set(&["C", "A", "B"]), &set(&["Z", "X"]));
        let values: Vec<f64> = filtered.iter().map(|r| r.production_m3).collect();
        assert_eq!(values, vec![1.0, 3.0, 4.0]);
    }

    #[test]
    fn empty_selection_matches_nothing() {
        let table = sample();
        assert!(filter(&table, &BTreeSet::new(), &set(&["X", "Y", "Z"])).is_empty());
        assert!(filter(&table, &set(&["A", "B", "C"]), &BTreeSet::new()).is_empty());
        assert!(filter(&table, &set(&["Nowhere"]), &set(&["X"])).is_empty());
    }

    #[test]
    fn head_is_bounded() {
        let table = sample();
        let filtered = filter(&table, &set(&["A", "B", "C"]), &set(&["X", "Y", "Z"]));
        assert_eq!(filtered.head(2).len(), 2);
        assert_eq!(filtered.head(100).len(), 4);
    }

    #[test]
    fn reconcile_drops_vanished_and_adds_new_sources() {
        let previous = strings(&["X", "Y"]);
        let next = strings(&["Y", "Z"]);
        // user had deselected Y
        let out = reconcile_sources(&previous, &next, &set(&["X"]));
        assert_eq!(out, BTreeSet::from(["Z".to_string()]));

        let out = reconcile_sources(&previous, &next, &set(&["X", "Y"]));
        assert_eq!(out, set(&["Y", "Z"]));
    }
}
