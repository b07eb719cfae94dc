//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Render Engine - Turns precomputed pivot data into a table view.
//!
//! This module takes a PivotData (input), a FieldResolver (field lookup) and
//! the caller's conditional formatting configs, and produces a PivotTableView.
//!
//! Algorithm:
//! 1. For every header row: optional corner cell, one title cell per index
//!    column, one header cell per header value
//! 2. For every data row: optional row number, one index cell per index
//!    column, one value cell per data column
//! 3. Each value cell resolves its field from the metric axis, collects its
//!    underlying field values and evaluates conditional formatting
//!
//! Rows and columns are emitted in input order. A render either completes or
//! fails with the first malformed entry it meets.

use engine::{FieldItem, FieldResolver, ResultValue};
use rustc_hash::FxHashMap;

use crate::conditional_formatting::{apply_conditional_formatting, ConditionalFormattingConfig};
use crate::definition::{Axis, PivotAxisValue, PivotData, TitleDirection};
use crate::error::PivotRenderError;
use crate::options::RenderOptions;
use crate::view::{
    HeaderCell, IndexCell, PivotBodyRow, PivotHeaderRow, PivotTableCell, PivotTableView,
    TitleCell, ValueCell,
};

// ============================================================================
// PIVOT TABLE RENDERER
// ============================================================================

/// Renders one PivotData. Holds only borrowed inputs; cheap to construct.
pub struct PivotTableRenderer<'a, R: FieldResolver + ?Sized> {
    data: &'a PivotData,
    resolver: &'a R,
    conditional_formattings: &'a [ConditionalFormattingConfig],
    options: RenderOptions,
}

impl<'a, R: FieldResolver + ?Sized> PivotTableRenderer<'a, R> {
    pub fn new(data: &'a PivotData, resolver: &'a R) -> Self {
        PivotTableRenderer {
            data,
            resolver,
            conditional_formattings: &[],
            options: RenderOptions::default(),
        }
    }

    pub fn with_conditional_formattings(mut self, configs: &'a [ConditionalFormattingConfig]) -> Self {
        self.conditional_formattings = configs;
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolves the field a data position is a value of.
    ///
    /// The metric identity lives on whichever axis carries metrics: the
    /// innermost header row when metrics are laid out as rows, otherwise the
    /// last index column of the row.
    pub fn get_item_from_axis(&self, row: usize, col: usize) -> Result<&'a FieldItem, PivotRenderError> {
        let entry = if self.data.pivot_config.metrics_as_rows {
            self.data.header_values.last().and_then(|hv| hv.get(col))
        } else {
            self.data.index_values.get(row).and_then(|iv| iv.last())
        };

        let field_id = entry
            .and_then(PivotAxisValue::field_id)
            .ok_or(PivotRenderError::InvalidPivotData { row, col })?;

        self.resolver
            .get_field(field_id)
            .ok_or_else(|| PivotRenderError::UnknownField(field_id.to_string()))
    }

    /// Collects every field value that positions a data cell.
    ///
    /// Seeded with the cell's own value keyed by its field id (fields only,
    /// not table calculations). Then every value entry of the row's index
    /// values followed by the column's header values is added. The seed is
    /// never overwritten; among the other entries the last one wins.
    pub fn get_underlying_field_values(
        &self,
        row: usize,
        col: usize,
    ) -> Result<FxHashMap<String, ResultValue>, PivotRenderError> {
        let item = self.get_item_from_axis(row, col)?;
        let mut values: FxHashMap<String, ResultValue> = FxHashMap::default();

        let seed = match (item, self.data.data_value(row, col)) {
            (FieldItem::Field(field), Some(value)) => {
                let id = field.field_id();
                values.insert(id.clone(), value.clone());
                Some(id)
            }
            _ => None,
        };

        let index_values = self.data.index_values.get(row).into_iter().flatten();
        let header_values = self.data.header_values.iter().filter_map(|hv| hv.get(col));

        for axis_value in index_values.chain(header_values) {
            if let PivotAxisValue::Value {
                field_id: Some(field_id),
                value,
            } = axis_value
            {
                if seed.as_deref() == Some(field_id.as_str()) {
                    continue;
                }
                values.insert(field_id.clone(), value.clone());
            }
        }

        Ok(values)
    }

    /// Runs the render pass.
    pub fn render(&self) -> Result<PivotTableView, PivotRenderError> {
        log::debug!(
            "[PivotRender] start: {} header rows, {} index columns, {} data rows, metrics_as_rows={}",
            self.data.header_row_count(),
            self.data.index_column_count(),
            self.data.data_row_count(),
            self.data.pivot_config.metrics_as_rows
        );

        let header_rows = self.render_header_rows()?;
        let body_rows = self.render_body_rows()?;

        log::debug!(
            "[PivotRender] done: {} header rows, {} body rows",
            header_rows.len(),
            body_rows.len()
        );

        Ok(PivotTableView {
            header_rows,
            body_rows,
            show_row_numbers: !self.options.hide_row_numbers,
            index_column_count: self.data.index_column_count(),
        })
    }

    // ------------------------------------------------------------------------
    // HEADER
    // ------------------------------------------------------------------------

    fn render_header_rows(&self) -> Result<Vec<PivotHeaderRow>, PivotRenderError> {
        let header_row_count = self.data.header_row_count();
        let mut rows = Vec::with_capacity(header_row_count);

        for (header_row, header_values) in self.data.header_values.iter().enumerate() {
            let level = header_row_count - header_row;
            let mut cells = Vec::with_capacity(
                1 + self.data.index_column_count() + header_values.len(),
            );

            if !self.options.hide_row_numbers {
                cells.push(PivotTableCell::RowNumberCorner);
            }

            for index_col in 0..self.data.index_column_count() {
                cells.push(PivotTableCell::Title(self.title_cell(header_row, index_col, level)));
            }

            for (header_col, header_value) in header_values.iter().enumerate() {
                let (content, description) =
                    self.axis_content(Axis::Header, header_value, header_row, header_col)?;
                cells.push(PivotTableCell::Header(HeaderCell {
                    content,
                    is_label: header_value.is_label(),
                    description,
                    level,
                }));
            }

            rows.push(PivotHeaderRow { level, cells });
        }

        Ok(rows)
    }

    fn title_cell(&self, header_row: usize, index_col: usize, level: usize) -> TitleCell {
        let title_field = self.data.title_field(header_row, index_col);

        match title_field {
            Some(title) => TitleCell {
                label: self.resolver.get_field_label(&title.field_id),
                is_empty: false,
                is_header_title: title.title_direction == TitleDirection::Header,
                description: self.description_of(&title.field_id),
                level,
            },
            None => TitleCell {
                label: None,
                is_empty: true,
                is_header_title: false,
                description: None,
                level,
            },
        }
    }

    // ------------------------------------------------------------------------
    // BODY
    // ------------------------------------------------------------------------

    fn render_body_rows(&self) -> Result<Vec<PivotBodyRow>, PivotRenderError> {
        let mut rows = Vec::with_capacity(self.data.data_row_count());

        for (row_index, data_row) in self.data.data_values.iter().enumerate() {
            let mut cells =
                Vec::with_capacity(1 + self.data.index_column_count() + data_row.len());

            if !self.options.hide_row_numbers {
                cells.push(PivotTableCell::RowNumber { number: row_index + 1 });
            }

            for index_col in 0..self.data.index_column_count() {
                let index_value = self
                    .data
                    .index_values
                    .get(row_index)
                    .and_then(|iv| iv.get(index_col))
                    .ok_or(PivotRenderError::MissingAxisValue {
                        axis: Axis::Index,
                        row: row_index,
                        col: index_col,
                    })?;
                let (content, description) =
                    self.axis_content(Axis::Index, index_value, row_index, index_col)?;
                cells.push(PivotTableCell::Index(IndexCell {
                    content,
                    is_label: index_value.is_label(),
                    description,
                }));
            }

            for (col_index, value) in data_row.iter().enumerate() {
                cells.push(PivotTableCell::Value(self.value_cell(row_index, col_index, value.as_ref())?));
            }

            rows.push(PivotBodyRow { row_index, cells });
        }

        Ok(rows)
    }

    fn value_cell(
        &self,
        row_index: usize,
        col_index: usize,
        value: Option<&ResultValue>,
    ) -> Result<ValueCell, PivotRenderError> {
        let item = self.get_item_from_axis(row_index, col_index)?;
        let underlying_values = self.get_underlying_field_values(row_index, col_index)?;
        let formatting = apply_conditional_formatting(item, value, self.conditional_formattings);

        Ok(ValueCell {
            row_index,
            col_index,
            item: item.clone(),
            value: value.cloned(),
            underlying_values,
            formatting,
        })
    }

    // ------------------------------------------------------------------------
    // SHARED
    // ------------------------------------------------------------------------

    /// Display content and description of a header or index entry.
    /// Labels must name a field; values display their formatted string.
    fn axis_content(
        &self,
        axis: Axis,
        axis_value: &PivotAxisValue,
        row: usize,
        col: usize,
    ) -> Result<(Option<String>, Option<String>), PivotRenderError> {
        match axis_value {
            PivotAxisValue::Label { field_id } => {
                let field_id = field_id
                    .as_deref()
                    .ok_or(PivotRenderError::MissingLabelField { axis, row, col })?;
                Ok((
                    self.resolver.get_field_label(field_id),
                    self.description_of(field_id),
                ))
            }
            PivotAxisValue::Value { value, .. } => Ok((Some(value.formatted.clone()), None)),
        }
    }

    fn description_of(&self, field_id: &str) -> Option<String> {
        if !self.options.show_descriptions {
            return None;
        }
        self.resolver
            .get_field(field_id)
            .and_then(FieldItem::description)
            .map(str::to_string)
    }
}

/// Renders pivot data into a table view.
pub fn render_pivot_table<R: FieldResolver + ?Sized>(
    data: &PivotData,
    resolver: &R,
    conditional_formattings: &[ConditionalFormattingConfig],
    options: RenderOptions,
) -> Result<PivotTableView, PivotRenderError> {
    PivotTableRenderer::new(data, resolver)
        .with_conditional_formattings(conditional_formattings)
        .with_options(options)
        .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{AxisValueType, PivotConfig, TitleField};
    use engine::{Field, FieldValueType, ItemsMap, TableCalculation};

    fn create_items() -> ItemsMap {
        let mut items = ItemsMap::new();
        items.insert(
            Field::dimension("orders", "status", "Status", FieldValueType::String)
                .with_table_label("Orders"),
        );
        items.insert(
            Field::dimension("orders", "region", "Region", FieldValueType::String)
                .with_table_label("Orders"),
        );
        items.insert(
            Field::metric("orders", "revenue", "Revenue", FieldValueType::Sum)
                .with_table_label("Orders")
                .with_description("Total order value"),
        );
        items.insert(TableCalculation::new("share", "Share", "${orders.revenue} / 100"));
        items
    }

    /// Region and the revenue label on the index, status pivoted across the
    /// header with a revenue label row underneath.
    fn create_metrics_on_index() -> PivotData {
        PivotData {
            header_values: vec![
                vec![
                    PivotAxisValue::value("orders_status", ResultValue::text("open")),
                    PivotAxisValue::value("orders_status", ResultValue::text("closed")),
                ],
                vec![
                    PivotAxisValue::label("orders_revenue"),
                    PivotAxisValue::label("orders_revenue"),
                ],
            ],
            index_values: vec![
                vec![
                    PivotAxisValue::value("orders_region", ResultValue::text("EU")),
                    PivotAxisValue::label("orders_revenue"),
                ],
                vec![
                    PivotAxisValue::value("orders_region", ResultValue::text("US")),
                    PivotAxisValue::label("orders_revenue"),
                ],
            ],
            data_values: vec![
                vec![Some(ResultValue::number(1.0)), Some(ResultValue::number(2.0))],
                vec![Some(ResultValue::number(3.0)), None],
            ],
            title_fields: vec![
                vec![Some(TitleField::new("orders_status", TitleDirection::Header)), None],
                vec![Some(TitleField::new("orders_region", TitleDirection::Index)), None],
            ],
            index_value_types: vec![AxisValueType::value("orders_region"), AxisValueType::label()],
            header_value_types: vec![AxisValueType::value("orders_status"), AxisValueType::label()],
            pivot_config: PivotConfig {
                pivot_dimensions: vec!["orders_status".to_string()],
                metrics_as_rows: false,
            },
        }
    }

    #[test]
    fn test_item_from_index_axis() {
        let items = create_items();
        let data = create_metrics_on_index();
        let renderer = PivotTableRenderer::new(&data, &items);

        let item = renderer.get_item_from_axis(1, 0).unwrap();
        assert_eq!(item.item_id(), "orders_revenue");
    }

    #[test]
    fn test_item_from_header_axis() {
        let items = create_items();
        let mut data = create_metrics_on_index();
        data.pivot_config.metrics_as_rows = true;
        data.header_values[1][1] = PivotAxisValue::label("share");

        let renderer = PivotTableRenderer::new(&data, &items);
        assert_eq!(renderer.get_item_from_axis(0, 0).unwrap().item_id(), "orders_revenue");
        assert_eq!(renderer.get_item_from_axis(0, 1).unwrap().item_id(), "share");
    }

    #[test]
    fn test_item_without_field_id_is_invalid() {
        let items = create_items();
        let mut data = create_metrics_on_index();
        data.index_values[0][1] = PivotAxisValue::Label { field_id: None };

        let renderer = PivotTableRenderer::new(&data, &items);
        let err = renderer.get_item_from_axis(0, 0).unwrap_err();
        assert!(matches!(err, PivotRenderError::InvalidPivotData { row: 0, col: 0 }));

        // Out of range rows have no axis entry at all
        let err = renderer.get_item_from_axis(9, 0).unwrap_err();
        assert!(err.is_invalid_pivot_data());
    }

    #[test]
    fn test_item_unknown_to_resolver() {
        let items = create_items();
        let mut data = create_metrics_on_index();
        data.index_values[0][1] = PivotAxisValue::label("orders_missing");

        let renderer = PivotTableRenderer::new(&data, &items);
        let err = renderer.get_item_from_axis(0, 0).unwrap_err();
        assert!(matches!(err, PivotRenderError::UnknownField(ref id) if id == "orders_missing"));
    }

    #[test]
    fn test_underlying_values_collects_both_axes() {
        let items = create_items();
        let data = create_metrics_on_index();
        let renderer = PivotTableRenderer::new(&data, &items);

        let values = renderer.get_underlying_field_values(0, 1).unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values["orders_revenue"].formatted, "2");
        assert_eq!(values["orders_region"].formatted, "EU");
        assert_eq!(values["orders_status"].formatted, "closed");
    }

    #[test]
    fn test_underlying_values_without_cell_value() {
        let items = create_items();
        let data = create_metrics_on_index();
        let renderer = PivotTableRenderer::new(&data, &items);

        let values = renderer.get_underlying_field_values(1, 1).unwrap();
        assert!(!values.contains_key("orders_revenue"));
        assert_eq!(values["orders_region"].formatted, "US");
    }

    #[test]
    fn test_underlying_values_seed_is_preserved() {
        let items = create_items();
        let mut data = create_metrics_on_index();
        // A value entry for the metric itself must not replace the cell's own value.
        data.header_values[0][0] = PivotAxisValue::value("orders_revenue", ResultValue::number(99.0));

        let renderer = PivotTableRenderer::new(&data, &items);
        let values = renderer.get_underlying_field_values(0, 0).unwrap();
        assert_eq!(values["orders_revenue"].formatted, "1");
    }

    #[test]
    fn test_underlying_values_last_contributor_wins() {
        let items = create_items();
        let mut data = create_metrics_on_index();
        data.header_values[0][0] = PivotAxisValue::value("orders_region", ResultValue::text("APAC"));

        let renderer = PivotTableRenderer::new(&data, &items);
        let values = renderer.get_underlying_field_values(0, 0).unwrap();
        assert_eq!(values["orders_region"].formatted, "APAC");
    }

    #[test]
    fn test_underlying_values_skip_table_calculation_seed() {
        let items = create_items();
        let mut data = create_metrics_on_index();
        data.index_values[0][1] = PivotAxisValue::label("share");

        let renderer = PivotTableRenderer::new(&data, &items);
        let values = renderer.get_underlying_field_values(0, 0).unwrap();
        assert!(!values.contains_key("share"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_basic_render() {
        let items = create_items();
        let data = create_metrics_on_index();

        let view = PivotTableRenderer::new(&data, &items).render().unwrap();

        assert_eq!(view.header_row_count(), 2);
        assert_eq!(view.body_row_count(), 2);
        assert!(view.show_row_numbers);
        assert_eq!(view.header_rows[0].level, 2);
        assert_eq!(view.header_rows[1].level, 1);

        assert_eq!(
            view.header_text(),
            vec![
                vec!["", "Orders Status", "", "open", "closed"],
                vec!["", "Orders Region", "", "Orders Revenue", "Orders Revenue"],
            ]
        );
        assert_eq!(
            view.body_text(),
            vec![
                vec!["1", "EU", "Orders Revenue", "1", "2"],
                vec!["2", "US", "Orders Revenue", "3", ""],
            ]
        );
    }

    #[test]
    fn test_title_cells() {
        let items = create_items();
        let data = create_metrics_on_index();
        let view = PivotTableRenderer::new(&data, &items).render().unwrap();

        match &view.header_rows[0].cells[1] {
            PivotTableCell::Title(title) => {
                assert!(!title.is_empty);
                assert!(title.is_header_title);
                assert_eq!(title.level, 2);
            }
            other => panic!("Expected title cell, got {:?}", other),
        }
        match &view.header_rows[1].cells[2] {
            PivotTableCell::Title(title) => {
                assert!(title.is_empty);
                assert_eq!(title.label, None);
            }
            other => panic!("Expected title cell, got {:?}", other),
        }
    }

    #[test]
    fn test_label_descriptions() {
        let items = create_items();
        let data = create_metrics_on_index();

        let view = PivotTableRenderer::new(&data, &items).render().unwrap();
        assert_eq!(view.header_rows[1].cells[3].description(), Some("Total order value"));
        // Values never carry descriptions
        assert_eq!(view.header_rows[0].cells[3].description(), None);

        let options = RenderOptions::default().with_show_descriptions(false);
        let view = PivotTableRenderer::new(&data, &items).with_options(options).render().unwrap();
        assert_eq!(view.header_rows[1].cells[3].description(), None);
    }

    #[test]
    fn test_label_without_field_id_fails_render() {
        let items = create_items();
        let mut data = create_metrics_on_index();
        data.header_values[1][0] = PivotAxisValue::Label { field_id: None };

        let err = PivotTableRenderer::new(&data, &items).render().unwrap_err();
        assert!(matches!(
            err,
            PivotRenderError::MissingLabelField { axis: Axis::Header, row: 1, col: 0 }
        ));
        assert!(err.is_invalid_pivot_data());
    }

    #[test]
    fn test_value_without_field_id_renders() {
        let items = create_items();
        let mut data = create_metrics_on_index();
        data.index_values[0][0] = PivotAxisValue::Value {
            field_id: None,
            value: ResultValue::text("Other"),
        };

        let view = PivotTableRenderer::new(&data, &items).render().unwrap();
        assert_eq!(view.body_rows[0].cells[1].text(), "Other");
        let values = &view.value_cell(0, 0).unwrap().underlying_values;
        assert!(!values.contains_key("orders_region"));
    }

    #[test]
    fn test_missing_index_entry() {
        let items = create_items();
        let mut data = create_metrics_on_index();
        data.index_values[1].truncate(1);

        // Index cells come before value cells, so the gap is reported as such.
        let err = PivotTableRenderer::new(&data, &items).render().unwrap_err();
        assert!(matches!(
            err,
            PivotRenderError::MissingAxisValue { axis: Axis::Index, row: 1, col: 1 }
        ));
    }
}
