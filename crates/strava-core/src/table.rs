use serde_json::Value;

use crate::api::Activity;

/// Tabular view over untyped activity records.
///
/// Columns are the union of all record keys in first-seen order; a record
/// lacking a column yields `None` in that cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl ActivityTable {
    pub fn from_activities(activities: &[Activity]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for activity in activities {
            for key in activity.keys() {
                if !columns.iter().any(|existing| existing == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = activities
            .iter()
            .map(|activity| {
                columns
                    .iter()
                    .map(|column| activity.get(column).map(render_cell))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        nested => nested.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn activities(value: Value) -> Vec<Activity> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn single_record_yields_one_row() {
        let table = ActivityTable::from_activities(&activities(json!([
            { "id": 1, "name": "Run" }
        ])));
        assert_eq!(table.columns(), ["id", "name"]);
        assert_eq!(
            table.rows(),
            [vec![Some("1".to_string()), Some("Run".to_string())]]
        );
    }

    #[test]
    fn columns_are_union_in_first_seen_order() {
        let table = ActivityTable::from_activities(&activities(json!([
            { "id": 1, "name": "Run" },
            { "id": 2, "distance": 1000.5, "name": "Ride" }
        ])));
        assert_eq!(table.columns(), ["id", "name", "distance"]);
        assert_eq!(table.rows()[0][2], None);
        assert_eq!(table.rows()[1][2].as_deref(), Some("1000.5"));
        assert_eq!(table.rows()[1][1].as_deref(), Some("Ride"));
    }

    #[test]
    fn loose_values_are_rendered() {
        let table = ActivityTable::from_activities(&activities(json!([
            { "private": true, "gear_id": null, "map": { "id": "a1" } }
        ])));
        let row = &table.rows()[0];
        assert_eq!(row[0].as_deref(), Some("true"));
        assert_eq!(row[1].as_deref(), Some(""));
        assert_eq!(row[2].as_deref(), Some(r#"{"id":"a1"}"#));
    }

    #[test]
    fn empty_list_has_no_columns() {
        let table = ActivityTable::from_activities(&[]);
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }
}
