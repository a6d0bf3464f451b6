//! Counter Entity
//!
//! A pattern owns an ordered list of counters of two kinds.

use serde::{Deserialize, Serialize};

use super::row_counter::RowCounter;
use super::shape_counter::ShapeCounter;

/// Counter kind, persisted in the `type` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterKind {
    Row,
    Shape,
}

impl CounterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterKind::Row => "row",
            CounterKind::Shape => "shape",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "row" => Some(CounterKind::Row),
            "shape" => Some(CounterKind::Shape),
            _ => None,
        }
    }
}

/// A row or shape counter, tagged by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Counter {
    Row(RowCounter),
    Shape(ShapeCounter),
}

impl Counter {
    pub fn id_str(&self) -> &str {
        match self {
            Counter::Row(row) => &row.id,
            Counter::Shape(shape) => &shape.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Counter::Row(row) => &row.name,
            Counter::Shape(shape) => &shape.name,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Counter::Row(row) => row.display_name(),
            Counter::Shape(shape) => shape.display_name(),
        }
    }

    pub fn kind(&self) -> CounterKind {
        match self {
            Counter::Row(_) => CounterKind::Row,
            Counter::Shape(_) => CounterKind::Shape,
        }
    }
}

impl From<RowCounter> for Counter {
    fn from(row: RowCounter) -> Self {
        Counter::Row(row)
    }
}

impl From<ShapeCounter> for Counter {
    fn from(shape: ShapeCounter) -> Self {
        Counter::Shape(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_serialization_is_tagged() {
        let row = RowCounter {
            id: "r1".to_string(),
            name: "Body".to_string(),
            current_row: 3,
            start_row: 1,
            end_row: None,
        };
        let json = serde_json::to_value(Counter::from(row.clone())).unwrap();
        assert_eq!(json["type"], "row");
        assert_eq!(json["current_row"], 3);
        assert!(json["end_row"].is_null());

        let back: Counter = serde_json::from_value(json).unwrap();
        assert_eq!(back, Counter::Row(row));
    }

    #[test]
    fn test_shape_defaults_unlinked_when_flag_missing() {
        let json = serde_json::json!({
            "type": "shape",
            "id": "s1",
            "name": "",
            "current_times": 1,
            "max_times": 2,
            "current_rows": 1,
            "max_rows": 3
        });
        let counter: Counter = serde_json::from_value(json).unwrap();
        match counter {
            Counter::Shape(shape) => assert!(!shape.is_linked),
            Counter::Row(_) => panic!("expected a shape counter"),
        }
    }

    #[test]
    fn test_kind_round_trip() {
        assert_eq!(CounterKind::parse(CounterKind::Row.as_str()), Some(CounterKind::Row));
        assert_eq!(CounterKind::parse("shape"), Some(CounterKind::Shape));
        assert_eq!(CounterKind::parse("stitch"), None);
    }
}
