//! Testing utilities for the goalboard workspace
//!
//! Shared fixtures and an in-memory stand-in for the spreadsheet store.

#![allow(missing_docs)]

use async_trait::async_trait;
use goalboard_model::{Field, Goal, GoalDraft, HexColor, RowIndex, Units};
use goalboard_store::{Transport, TransportError};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};

/// First data row of the sheet; row 1 holds the headers
pub const FIRST_ROW: u64 = 2;

/// A request as seen by [`FakeSheet`]
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Read,
    Submit(Value),
}

#[derive(Debug, Default)]
struct SheetState {
    rows: Vec<Map<String, Value>>,
    requests: Vec<Request>,
    raw_body: Option<String>,
    fail_reads: bool,
    fail_submits: usize,
}

/// In-memory spreadsheet endpoint
///
/// Applies submits the way the sheet script does: bodies without `rowIndex`
/// append, bodies with one overwrite that row, and `action: "delete"`
/// removes the row so later rows shift up. Every request is logged.
#[derive(Debug, Default)]
pub struct FakeSheet {
    state: Mutex<SheetState>,
}

impl FakeSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sheet preloaded with raw records (row indexes are assigned on read)
    pub fn with_records(records: Vec<Value>) -> Self {
        let sheet = Self::new();
        for record in records {
            sheet.push_record(record);
        }
        sheet
    }

    pub fn push_record(&self, record: Value) {
        let mut fields = match record {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        fields.remove("rowIndex");
        self.state.lock().rows.push(fields);
    }

    /// Serve `body` verbatim on reads instead of the rows
    pub fn serve_raw(&self, body: impl Into<String>) {
        self.state.lock().raw_body = Some(body.into());
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().fail_reads = fail;
    }

    /// Fail the next `n` submits with a network error
    pub fn fail_submits(&self, n: usize) {
        self.state.lock().fail_submits = n;
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state.lock().requests.clone()
    }

    pub fn reads(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| matches!(r, Request::Read))
            .count()
    }

    pub fn submits(&self) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                Request::Submit(body) => Some(body),
                Request::Read => None,
            })
            .collect()
    }

    pub fn clear_requests(&self) {
        self.state.lock().requests.clear();
    }

    pub fn row_count(&self) -> usize {
        self.state.lock().rows.len()
    }

    /// Current contents as the read endpoint would return them
    pub fn snapshot(&self) -> Value {
        let state = self.state.lock();
        Value::Array(
            state
                .rows
                .iter()
                .zip(FIRST_ROW..)
                .map(|(fields, row)| {
                    let mut record = fields.clone();
                    record.insert("rowIndex".to_string(), json!(row));
                    Value::Object(record)
                })
                .collect(),
        )
    }

    fn apply(state: &mut SheetState, body: &Value) {
        let row = body
            .get("rowIndex")
            .and_then(Value::as_u64)
            .and_then(|row| usize::try_from(row.checked_sub(FIRST_ROW)?).ok());

        if body.get("action").and_then(Value::as_str) == Some("delete") {
            if let Some(idx) = row.filter(|idx| *idx < state.rows.len()) {
                state.rows.remove(idx);
            }
            return;
        }

        let mut fields = body.as_object().cloned().unwrap_or_default();
        fields.remove("rowIndex");
        match row {
            Some(idx) if idx < state.rows.len() => state.rows[idx] = fields,
            Some(_) => {}
            None => state.rows.push(fields),
        }
    }
}

#[async_trait]
impl Transport for FakeSheet {
    async fn read(&self) -> Result<String, TransportError> {
        let body = {
            let mut state = self.state.lock();
            state.requests.push(Request::Read);
            if state.fail_reads {
                return Err(TransportError::Network("sheet unreachable".to_string()));
            }
            state.raw_body.clone()
        };
        Ok(body.unwrap_or_else(|| self.snapshot().to_string()))
    }

    async fn submit(&self, body: Value) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.requests.push(Request::Submit(body.clone()));
        if state.fail_submits > 0 {
            state.fail_submits -= 1;
            return Err(TransportError::Network("sheet unreachable".to_string()));
        }
        Self::apply(&mut state, &body);
        Ok(())
    }
}

/// Raw store record, as the read endpoint returns it
pub fn record(description: &str, category: &str, current: f64, end: f64) -> Value {
    json!({
        "description": description,
        "initialValue": 0,
        "currentValue": current,
        "endValue": end,
        "category": category,
        "units": "mi",
        "bgColor": "#3366ff",
    })
}

/// A complete, valid add form
pub fn sample_draft() -> GoalDraft {
    GoalDraft::new()
        .with(Field::Description, "Run 100 miles")
        .with(Field::InitialValue, "0")
        .with(Field::CurrentValue, "10")
        .with(Field::EndValue, "100")
        .with(Field::Category, "Fitness")
        .with(Field::Units, "mi")
        .with(Field::BgColor, "#3366ff")
}

/// A persisted goal at `row`
pub fn sample_goal(row: u64) -> Goal {
    let goal = Goal::new("Run 100 miles", "Fitness", 0.0, 100.0)
        .with_current(10.0)
        .with_units(Units::Miles)
        .with_color(HexColor::new(0x33, 0x66, 0xff));
    match RowIndex::number(row) {
        Some(row) => goal.with_row(row),
        None => goal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sheet_applies_writes_like_the_script() {
        let sheet = FakeSheet::with_records(vec![
            record("a", "A", 1.0, 2.0),
            record("b", "B", 1.0, 2.0),
        ]);

        sheet.submit(record("c", "C", 1.0, 2.0)).await.unwrap();
        assert_eq!(sheet.row_count(), 3);

        let mut update = record("b2", "B", 2.0, 2.0);
        update["rowIndex"] = json!(3);
        sheet.submit(update).await.unwrap();

        sheet
            .submit(json!({"action": "delete", "rowIndex": 2}))
            .await
            .unwrap();

        let snapshot = sheet.snapshot();
        let rows = snapshot.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["description"], "b2");
        assert_eq!(rows[0]["rowIndex"], 2);
        assert_eq!(rows[1]["description"], "c");
        assert_eq!(sheet.submits().len(), 3);
    }

    #[tokio::test]
    async fn sheet_failure_switches() {
        let sheet = FakeSheet::new();
        sheet.fail_submits(1);
        assert!(sheet.submit(json!({})).await.is_err());
        assert!(sheet.submit(json!({})).await.is_ok());

        sheet.fail_reads(true);
        assert!(sheet.read().await.is_err());
        assert_eq!(sheet.reads(), 1);
    }

    #[test]
    fn fixtures_are_consistent() {
        let input = sample_draft().parse().unwrap();
        assert_eq!(input.into_goal(RowIndex::number(2)), sample_goal(2));
    }
}
