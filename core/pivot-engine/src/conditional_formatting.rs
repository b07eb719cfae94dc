//! FILENAME: core/pivot-engine/src/conditional_formatting.rs
//! PURPOSE: Conditional formatting rules for pivot value cells and their evaluation.
//! CONTEXT: Rules are owned by the caller and read-only here. A config colours
//! a value cell when it targets the cell's field (or every field) and all of
//! its rules match the cell's raw value. The last matching config wins.

use engine::{Color, FieldItem, RawValue, ResultValue};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ============================================================================
// RULES
// ============================================================================

/// Comparison applied by a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionalOperator {
    IsNull,
    NotNull,
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
}

impl ConditionalOperator {
    fn describe(&self) -> &'static str {
        match self {
            ConditionalOperator::IsNull => "is null",
            ConditionalOperator::NotNull => "is not null",
            ConditionalOperator::Equals => "is equal to",
            ConditionalOperator::NotEquals => "is not equal to",
            ConditionalOperator::LessThan => "is less than",
            ConditionalOperator::GreaterThan => "is greater than",
        }
    }

    fn takes_values(&self) -> bool {
        !matches!(self, ConditionalOperator::IsNull | ConditionalOperator::NotNull)
    }
}

/// A single comparison against one or more numeric operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalFormattingRule {
    pub operator: ConditionalOperator,
    #[serde(default)]
    pub values: SmallVec<[f64; 2]>,
}

impl ConditionalFormattingRule {
    pub fn new(operator: ConditionalOperator, values: &[f64]) -> Self {
        ConditionalFormattingRule {
            operator,
            values: SmallVec::from_slice(values),
        }
    }

    /// Evaluates the rule against a raw value. `None` means the cell is empty.
    pub fn matches(&self, raw: Option<&RawValue>) -> bool {
        let raw = match raw {
            Some(raw) if !raw.is_null() => raw,
            _ => return self.operator == ConditionalOperator::IsNull,
        };
        let number = raw.as_number();

        match self.operator {
            ConditionalOperator::IsNull => false,
            ConditionalOperator::NotNull => true,
            ConditionalOperator::Equals => self.values.iter().any(|v| number == Some(*v)),
            ConditionalOperator::NotEquals => self.values.iter().any(|v| number != Some(*v)),
            ConditionalOperator::LessThan => match number {
                Some(n) => self.values.iter().any(|v| n < *v),
                None => false,
            },
            ConditionalOperator::GreaterThan => match number {
                Some(n) => self.values.iter().any(|v| n > *v),
                None => false,
            },
        }
    }

    /// Human-readable form, e.g. "is greater than 5".
    pub fn describe(&self) -> String {
        if !self.operator.takes_values() || self.values.is_empty() {
            return self.operator.describe().to_string();
        }
        let values: Vec<String> = self.values.iter().map(|v| format!("{}", v)).collect();
        format!("{} {}", self.operator.describe(), values.join(", "))
    }
}

// ============================================================================
// CONFIGS
// ============================================================================

/// The field a config is restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTarget {
    pub field_id: String,
}

/// A colour plus the rules that must all hold for it to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalFormattingConfig {
    /// `None` applies to every numeric field.
    #[serde(default)]
    pub target: Option<FieldTarget>,
    /// CSS hex colour.
    pub color: String,
    #[serde(default)]
    pub rules: Vec<ConditionalFormattingRule>,
}

impl ConditionalFormattingConfig {
    pub fn new(color: impl Into<String>) -> Self {
        ConditionalFormattingConfig {
            target: None,
            color: color.into(),
            rules: Vec::new(),
        }
    }

    pub fn with_target(mut self, field_id: impl Into<String>) -> Self {
        self.target = Some(FieldTarget {
            field_id: field_id.into(),
        });
        self
    }

    pub fn with_rule(mut self, operator: ConditionalOperator, values: &[f64]) -> Self {
        self.rules.push(ConditionalFormattingRule::new(operator, values));
        self
    }

    pub fn targets(&self, item_id: &str) -> bool {
        match &self.target {
            Some(target) => target.field_id == item_id,
            None => true,
        }
    }

    pub fn matches(&self, raw: Option<&RawValue>) -> bool {
        self.rules.iter().all(|rule| rule.matches(raw))
    }

    /// All rule descriptions joined with "and".
    pub fn describe(&self) -> String {
        let parts: Vec<String> = self.rules.iter().map(|r| r.describe()).collect();
        parts.join(" and ")
    }
}

/// Formatting resolved for one value cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFormatting {
    pub background_color: String,
    /// Absent when the background colour could not be parsed.
    pub font_color: Option<String>,
    pub description: String,
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Finds the config that applies to a value cell. Only numeric items are
/// eligible; when several configs apply the last one wins.
pub fn find_conditional_formatting<'a>(
    item: &FieldItem,
    value: Option<&ResultValue>,
    configs: &'a [ConditionalFormattingConfig],
) -> Option<&'a ConditionalFormattingConfig> {
    if configs.is_empty() || !item.is_numeric() {
        return None;
    }
    let item_id = item.item_id();
    let raw = value.map(|v| &v.raw);

    configs
        .iter()
        .rev()
        .find(|config| config.targets(&item_id) && config.matches(raw))
}

/// Resolves background colour, readable font colour and description for a value cell.
pub fn apply_conditional_formatting(
    item: &FieldItem,
    value: Option<&ResultValue>,
    configs: &[ConditionalFormattingConfig],
) -> Option<AppliedFormatting> {
    let config = find_conditional_formatting(item, value, configs)?;

    let font_color = match Color::from_hex(&config.color) {
        Some(color) => Some(color.readable_text_color().to_css()),
        None => {
            log::warn!(
                "[ConditionalFormatting] unparseable colour '{}', leaving font colour unset",
                config.color
            );
            None
        }
    };

    Some(AppliedFormatting {
        background_color: config.color.clone(),
        font_color,
        description: config.describe(),
    })
}
