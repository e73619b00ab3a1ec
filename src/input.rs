//! Benchmark order file parsing.
//!
//! The input is one JSON object keyed by order id. Entry order is preserved
//! (`serde_json` with `preserve_order`), which makes the documented
//! "input order = output order" guarantee explicit. Beyond the top-level
//! shape nothing is validated upfront: `properties.target` and the item
//! fields fail at first access.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{BatchError, BatchResult};
use crate::model::ItemSpec;

/// The only order-record entry whose value is read for items.
const ITEM_SEQUENCE_KEY: &str = "item_sequence";

/// All orders of one benchmark file, in file order. Read-only after load.
#[derive(Clone, Debug)]
pub struct OrderBatch {
    orders: Map<String, Value>,
}

/// Loads an order batch from a benchmark JSON file.
///
/// # Errors
/// Unreadable file, malformed JSON, or a top-level value that is not an
/// object.
pub fn load_order_batch(path: &Path) -> BatchResult<OrderBatch> {
    let raw = fs::read_to_string(path).map_err(|source| BatchError::InputUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: Value = serde_json::from_str(&raw).map_err(|source| BatchError::MalformedInput {
        path: path.to_path_buf(),
        source,
    })?;
    match doc {
        Value::Object(orders) => Ok(OrderBatch { orders }),
        _ => Err(BatchError::UnexpectedShape {
            path: path.to_path_buf(),
        }),
    }
}

impl OrderBatch {
    /// Number of orders in the batch.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether the batch contains no orders.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Iterates the orders in input order.
    pub fn iter(&self) -> impl Iterator<Item = OrderRecord<'_>> {
        self.orders.iter().map(|(order_id, value)| OrderRecord { order_id, value })
    }
}

/// Lazy view of one order record.
///
/// Field access returns `BatchError::Field` on missing or mistyped data; a
/// record is never validated as a whole.
#[derive(Clone, Copy, Debug)]
pub struct OrderRecord<'a> {
    order_id: &'a str,
    value: &'a Value,
}

impl<'a> OrderRecord<'a> {
    /// The order's identifier as given in the input file.
    pub fn order_id(&self) -> &'a str {
        self.order_id
    }

    fn as_object(&self) -> BatchResult<&'a Map<String, Value>> {
        self.value.as_object().ok_or_else(|| {
            BatchError::field(self.order_id, "<order>", "order record is not a JSON object")
        })
    }

    /// Reads `properties.target`.
    pub fn target(&self) -> BatchResult<&'a str> {
        let properties = self
            .as_object()?
            .get("properties")
            .ok_or_else(|| BatchError::field(self.order_id, "properties", "missing"))?
            .as_object()
            .ok_or_else(|| {
                BatchError::field(self.order_id, "properties", "expected a JSON object")
            })?;
        properties
            .get("target")
            .ok_or_else(|| BatchError::field(self.order_id, "properties.target", "missing"))?
            .as_str()
            .ok_or_else(|| {
                BatchError::field(self.order_id, "properties.target", "expected a string")
            })
    }

    /// Extracts the item sequence, in entry order.
    ///
    /// Only the entry keyed exactly `item_sequence` is read; every other
    /// top-level key of the record is ignored. An absent `item_sequence`
    /// yields an empty collection.
    pub fn items(&self) -> BatchResult<Vec<ItemSpec>> {
        let mut items = Vec::new();
        for (key, value) in self.as_object()? {
            if key != ITEM_SEQUENCE_KEY {
                continue;
            }
            let sequence = value.as_object().ok_or_else(|| {
                BatchError::field(self.order_id, ITEM_SEQUENCE_KEY, "expected a JSON object")
            })?;
            for (ordinal, (item_key, props)) in sequence.iter().enumerate() {
                items.push(self.item_from_value(item_key, props, ordinal as u64 + 1)?);
            }
        }
        Ok(items)
    }

    fn item_from_value(
        &self,
        item_key: &str,
        props: &Value,
        ordinal: u64,
    ) -> BatchResult<ItemSpec> {
        let props = props.as_object().ok_or_else(|| {
            BatchError::field(self.order_id, item_key, "item is not a JSON object")
        })?;

        let length = self.int_field(props, item_key, "length/mm")?;
        let width = self.int_field(props, item_key, "width/mm")?;
        let height = self.int_field(props, item_key, "height/mm")?;
        let weight = self.number_field(props, item_key, "weight/kg")?;

        let article = props
            .get("article")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                BatchError::field(
                    self.order_id,
                    format!("{item_key}.article"),
                    "expected a string",
                )
            })?
            .to_string();

        // Optional benchmark metadata, carried into the plan document.
        let id = props.get("id").and_then(Value::as_str).map(str::to_string);
        let product_group = props
            .get("product_group")
            .and_then(Value::as_str)
            .map(str::to_string);
        let sequence = props
            .get("sequence")
            .and_then(Value::as_u64)
            .unwrap_or(ordinal);

        Ok(ItemSpec {
            article,
            id,
            product_group,
            length,
            width,
            height,
            weight,
            sequence,
        })
    }

    fn number_field(
        &self,
        props: &Map<String, Value>,
        item_key: &str,
        field: &str,
    ) -> BatchResult<f64> {
        props
            .get(field)
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                BatchError::field(
                    self.order_id,
                    format!("{item_key}.{field}"),
                    "expected a number",
                )
            })
    }

    // mm fields accept any JSON number and truncate toward zero
    fn int_field(
        &self,
        props: &Map<String, Value>,
        item_key: &str,
        field: &str,
    ) -> BatchResult<i64> {
        self.number_field(props, item_key, field).map(|v| v as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn batch_from(json: &str) -> BatchResult<OrderBatch> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        load_order_batch(file.path())
    }

    #[test]
    fn preserves_order_of_entries() {
        let batch = batch_from(
            r#"{"Z9": {"properties": {"target": "euro-pallet"}},
                "A1": {"properties": {"target": "rollcontainer"}},
                "M5": {"properties": {"target": "euro-pallet"}}}"#,
        )
        .unwrap();

        let ids: Vec<_> = batch.iter().map(|o| o.order_id().to_string()).collect();
        assert_eq!(ids, vec!["Z9", "A1", "M5"]);
    }

    #[test]
    fn rejects_non_object_top_level() {
        assert!(matches!(
            batch_from("[1, 2, 3]"),
            Err(BatchError::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            batch_from("{not json"),
            Err(BatchError::MalformedInput { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = load_order_batch(Path::new("/nonexistent/orders.json")).unwrap_err();
        assert!(matches!(err, BatchError::InputUnreadable { .. }));
    }

    #[test]
    fn target_requires_properties() {
        let batch = batch_from(r#"{"O1": {"item_sequence": {}}}"#).unwrap();
        let order = batch.iter().next().unwrap();
        let err = order.target().unwrap_err();
        assert!(matches!(err, BatchError::Field { ref field, .. } if field == "properties"));
    }

    #[test]
    fn target_must_be_a_string() {
        let batch = batch_from(r#"{"O1": {"properties": {"target": 7}}}"#).unwrap();
        let order = batch.iter().next().unwrap();
        assert!(order.target().is_err());
    }

    #[test]
    fn items_come_back_in_sequence_order() {
        let batch = batch_from(
            r#"{"O1": {
                "properties": {"target": "euro-pallet"},
                "item_sequence": {
                    "i2": {"length/mm": 200, "width/mm": 200, "height/mm": 200, "weight/kg": 2.0, "article": "b"},
                    "i1": {"length/mm": 100, "width/mm": 100, "height/mm": 100, "weight/kg": 1.0, "article": "a"}
                },
                "unrelated": {"ignored": true}
            }}"#,
        )
        .unwrap();

        let order = batch.iter().next().unwrap();
        let items = order.items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].article, "b");
        assert_eq!(items[0].sequence, 1);
        assert_eq!(items[1].article, "a");
        assert_eq!(items[1].sequence, 2);
    }

    #[test]
    fn absent_item_sequence_yields_no_items() {
        let batch = batch_from(r#"{"O1": {"properties": {"target": "euro-pallet"}}}"#).unwrap();
        let order = batch.iter().next().unwrap();
        assert!(order.items().unwrap().is_empty());
    }

    #[test]
    fn numeric_mm_fields_truncate() {
        let batch = batch_from(
            r#"{"O1": {
                "properties": {"target": "euro-pallet"},
                "item_sequence": {
                    "i1": {"length/mm": 100.9, "width/mm": 50, "height/mm": 20, "weight/kg": 5, "article": "a"}
                }
            }}"#,
        )
        .unwrap();

        let items = batch.iter().next().unwrap().items().unwrap();
        assert_eq!(items[0].length, 100);
        assert_eq!(items[0].width, 50);
        assert!((items[0].weight - 5.0).abs() < 1e-9);
    }

    #[test]
    fn non_numeric_dimension_is_a_field_error() {
        let batch = batch_from(
            r#"{"O1": {
                "properties": {"target": "euro-pallet"},
                "item_sequence": {
                    "i1": {"length/mm": "wide", "width/mm": 50, "height/mm": 20, "weight/kg": 5, "article": "a"}
                }
            }}"#,
        )
        .unwrap();

        let err = batch.iter().next().unwrap().items().unwrap_err();
        assert!(matches!(err, BatchError::Field { ref field, .. } if field == "i1.length/mm"));
    }

    #[test]
    fn optional_metadata_is_carried() {
        let batch = batch_from(
            r#"{"O1": {
                "properties": {"target": "euro-pallet"},
                "item_sequence": {
                    "c00104295": {
                        "article": "cake-00104295", "id": "c00104295",
                        "product_group": "confectionery",
                        "length/mm": 590, "width/mm": 200, "height/mm": 210,
                        "weight/kg": 7.67, "sequence": 4
                    }
                }
            }}"#,
        )
        .unwrap();

        let items = batch.iter().next().unwrap().items().unwrap();
        assert_eq!(items[0].id.as_deref(), Some("c00104295"));
        assert_eq!(items[0].product_group.as_deref(), Some("confectionery"));
        assert_eq!(items[0].sequence, 4);
    }
}
