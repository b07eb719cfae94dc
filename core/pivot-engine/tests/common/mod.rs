//! FILENAME: tests/common/mod.rs
//! Fixtures for pivot renderer integration tests.

#![allow(dead_code)]

use engine::{Field, FieldValueType, ItemsMap, ResultValue, TableCalculation};
use pivot_engine::{
    AxisValueType, PivotAxisValue, PivotConfig, PivotData, TitleDirection, TitleField,
};

pub const STATUS: &str = "orders_status";
pub const REGION: &str = "orders_region";
pub const REVENUE: &str = "orders_revenue";
pub const ORDER_COUNT: &str = "orders_order_count";
pub const SHARE: &str = "revenue_share";

/// Items known to every fixture.
pub fn items() -> ItemsMap {
    let mut items = ItemsMap::new();
    items.insert(
        Field::dimension("orders", "status", "Status", FieldValueType::String)
            .with_table_label("Orders")
            .with_description("Fulfilment status"),
    );
    items.insert(
        Field::dimension("orders", "region", "Region", FieldValueType::String)
            .with_table_label("Orders"),
    );
    items.insert(
        Field::metric("orders", "revenue", "Revenue", FieldValueType::Sum)
            .with_table_label("Orders")
            .with_description("Sum of order totals"),
    );
    items.insert(
        Field::metric("orders", "order_count", "Order count", FieldValueType::Count)
            .with_table_label("Orders"),
    );
    items.insert(TableCalculation::new(SHARE, "Revenue share", "${orders.revenue} / sum(${orders.revenue})"));
    items
}

fn text(field_id: &str, s: &str) -> PivotAxisValue {
    PivotAxisValue::value(field_id, ResultValue::text(s))
}

fn cell(raw: f64, formatted: &str) -> Option<ResultValue> {
    Some(ResultValue::new(raw, formatted))
}

/// One index column (the revenue label) and two status columns.
pub fn single_row() -> PivotData {
    PivotData {
        header_values: vec![vec![text(STATUS, "open"), text(STATUS, "closed")]],
        index_values: vec![vec![PivotAxisValue::label(REVENUE)]],
        data_values: vec![vec![cell(10.0, "10"), cell(20.0, "20")]],
        title_fields: vec![vec![Some(TitleField::new(STATUS, TitleDirection::Header))]],
        index_value_types: vec![AxisValueType::label()],
        header_value_types: vec![AxisValueType::value(STATUS)],
        pivot_config: PivotConfig {
            pivot_dimensions: vec![STATUS.to_string()],
            metrics_as_rows: false,
        },
    }
}

/// Regions down the side with one row per metric under each region,
/// statuses across the top. The metric is read from the index axis.
pub fn metrics_on_index() -> PivotData {
    let regions = [("EU", [(120.0, "120"), (80.0, "80")], [(3.0, "3"), (2.0, "2")]),
                   ("US", [(300.0, "300"), (0.0, "0")], [(7.0, "7"), (0.0, "0")])];

    let mut index_values = Vec::new();
    let mut data_values: Vec<Vec<Option<ResultValue>>> = Vec::new();
    for (region, revenue, count) in regions.iter() {
        index_values.push(vec![text(REGION, region), PivotAxisValue::label(REVENUE)]);
        data_values.push(revenue.iter().map(|(raw, f)| cell(*raw, f)).collect());
        index_values.push(vec![text(REGION, region), PivotAxisValue::label(ORDER_COUNT)]);
        data_values.push(count.iter().map(|(raw, f)| cell(*raw, f)).collect());
    }

    PivotData {
        header_values: vec![vec![text(STATUS, "open"), text(STATUS, "closed")]],
        index_values,
        data_values,
        title_fields: vec![vec![
            Some(TitleField::new(REGION, TitleDirection::Index)),
            Some(TitleField::new(STATUS, TitleDirection::Header)),
        ]],
        index_value_types: vec![AxisValueType::value(REGION), AxisValueType::label()],
        header_value_types: vec![AxisValueType::value(STATUS)],
        pivot_config: PivotConfig {
            pivot_dimensions: vec![STATUS.to_string()],
            metrics_as_rows: false,
        },
    }
}

/// Metrics across the top under each status, regions down the side.
/// The metric is read from the innermost header row.
pub fn metrics_on_header() -> PivotData {
    PivotData {
        header_values: vec![
            vec![text(STATUS, "open"), text(STATUS, "open"), text(STATUS, "closed"), text(STATUS, "closed")],
            vec![
                PivotAxisValue::label(REVENUE),
                PivotAxisValue::label(SHARE),
                PivotAxisValue::label(REVENUE),
                PivotAxisValue::label(SHARE),
            ],
        ],
        index_values: vec![vec![text(REGION, "EU")], vec![text(REGION, "US")]],
        data_values: vec![
            vec![cell(120.0, "120"), cell(0.3, "30%"), cell(80.0, "80"), cell(0.2, "20%")],
            vec![cell(300.0, "300"), cell(0.75, "75%"), None, None],
        ],
        title_fields: vec![
            vec![Some(TitleField::new(STATUS, TitleDirection::Header))],
            vec![Some(TitleField::new(REGION, TitleDirection::Index))],
        ],
        index_value_types: vec![AxisValueType::value(REGION)],
        header_value_types: vec![AxisValueType::value(STATUS), AxisValueType::label()],
        pivot_config: PivotConfig {
            pivot_dimensions: vec![STATUS.to_string()],
            metrics_as_rows: true,
        },
    }
}

/// Same shape as `single_row`, in the JSON the query layer emits.
pub const SINGLE_ROW_JSON: &str = r#"{
    "headerValues": [[
        {"type": "value", "fieldId": "orders_status", "value": {"raw": "open", "formatted": "open"}},
        {"type": "value", "fieldId": "orders_status", "value": {"raw": "closed", "formatted": "closed"}}
    ]],
    "indexValues": [[{"type": "label", "fieldId": "orders_revenue"}]],
    "dataValues": [[{"raw": 10, "formatted": "10"}, {"raw": 20, "formatted": "20"}]],
    "titleFields": [[{"fieldId": "orders_status", "titleDirection": "header"}]],
    "indexValueTypes": [{"type": "label"}],
    "headerValueTypes": [{"type": "value", "fieldId": "orders_status"}],
    "pivotConfig": {"pivotDimensions": ["orders_status"], "metricsAsRows": false}
}"#;
