use bella_core::{AppError, AppResult, NonEmptyString};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::display::stringify;

/// One selectable entry of a select or radio field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    value: Value,
    label: String,
}

impl FieldOption {
    /// Creates an option from a value and its visible label.
    #[must_use]
    pub fn new(value: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Returns the submitted value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the visible label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns whether a form value selects this option.
    ///
    /// Browser inputs submit strings, so `"true"` selects an option whose
    /// value is the boolean `true`.
    #[must_use]
    pub fn matches(&self, candidate: &Value) -> bool {
        &self.value == candidate || stringify(Some(&self.value)) == stringify(Some(candidate))
    }
}

/// Length and pattern constraints for text-like inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRules {
    /// Minimum number of characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Maximum number of characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regular expression the whole value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl TextRules {
    /// Sets the minimum length.
    #[must_use]
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    /// Sets the maximum length.
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Sets the pattern.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    fn check(&self, field_name: &str) -> AppResult<()> {
        if let (Some(min), Some(max)) = (self.min_length, self.max_length)
            && min > max
        {
            return Err(AppError::Configuration(format!(
                "field '{field_name}' has min_length {min} greater than max_length {max}"
            )));
        }

        if let Some(pattern) = &self.pattern {
            compile_pattern(field_name, pattern)?;
        }

        Ok(())
    }
}

/// Range constraints for numeric inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberRules {
    /// Smallest accepted value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Largest accepted value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Input step hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl NumberRules {
    /// Sets the minimum.
    #[must_use]
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the maximum.
    #[must_use]
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Sets the step hint.
    #[must_use]
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    fn check(&self, field_name: &str) -> AppResult<()> {
        if let (Some(min), Some(max)) = (self.min, self.max)
            && min > max
        {
            return Err(AppError::Configuration(format!(
                "field '{field_name}' has min {min} greater than max {max}"
            )));
        }

        if let Some(step) = self.step
            && step <= 0.0
        {
            return Err(AppError::Configuration(format!(
                "field '{field_name}' step must be greater than zero"
            )));
        }

        Ok(())
    }
}

/// Structured sub-object edited by a single composite field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeKind {
    /// Seven-day working-hours schedule.
    WeeklyHours,
}

/// Input kind of a form field, with the constraints each kind supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line text.
    Text(TextRules),
    /// Email address.
    Email(TextRules),
    /// Telephone number.
    Tel(TextRules),
    /// Masked secret.
    Password(TextRules),
    /// Number input.
    Number(NumberRules),
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Multi-line text.
    Textarea {
        /// Visible rows.
        rows: u16,
        /// Length and pattern constraints.
        #[serde(default)]
        rules: TextRules,
    },
    /// Dropdown with one selected option.
    Select {
        /// Selectable options, possibly filled in after construction.
        #[serde(default)]
        options: Vec<FieldOption>,
    },
    /// Boolean toggle.
    Checkbox,
    /// Radio group with one selected option.
    Radio {
        /// Selectable options.
        #[serde(default)]
        options: Vec<FieldOption>,
    },
    /// Structured sub-object.
    Composite {
        /// Shape of the sub-object.
        shape: CompositeKind,
    },
}

impl FieldKind {
    /// Returns stable kind name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Email(_) => "email",
            Self::Tel(_) => "tel",
            Self::Password(_) => "password",
            Self::Number(_) => "number",
            Self::Date => "date",
            Self::Time => "time",
            Self::Textarea { .. } => "textarea",
            Self::Select { .. } => "select",
            Self::Checkbox => "checkbox",
            Self::Radio { .. } => "radio",
            Self::Composite { .. } => "composite",
        }
    }

    /// Returns the value a field of this kind holds when nothing was entered.
    #[must_use]
    pub fn empty_value(&self) -> Value {
        match self {
            Self::Text(_)
            | Self::Email(_)
            | Self::Tel(_)
            | Self::Password(_)
            | Self::Textarea { .. }
            | Self::Select { .. }
            | Self::Radio { .. } => Value::String(String::new()),
            Self::Checkbox => Value::Bool(false),
            Self::Number(_) | Self::Date | Self::Time | Self::Composite { .. } => Value::Null,
        }
    }

    /// Returns text constraints for text-like kinds.
    #[must_use]
    pub fn text_rules(&self) -> Option<&TextRules> {
        match self {
            Self::Text(rules)
            | Self::Email(rules)
            | Self::Tel(rules)
            | Self::Password(rules)
            | Self::Textarea { rules, .. } => Some(rules),
            _ => None,
        }
    }

    /// Returns numeric constraints for number fields.
    #[must_use]
    pub fn number_rules(&self) -> Option<&NumberRules> {
        match self {
            Self::Number(rules) => Some(rules),
            _ => None,
        }
    }

    /// Returns options for select and radio kinds.
    #[must_use]
    pub fn options(&self) -> Option<&[FieldOption]> {
        match self {
            Self::Select { options } | Self::Radio { options } => Some(options),
            _ => None,
        }
    }

    pub(crate) fn options_mut(&mut self) -> Option<&mut Vec<FieldOption>> {
        match self {
            Self::Select { options } | Self::Radio { options } => Some(options),
            _ => None,
        }
    }
}

/// Declarative description of one form input.
///
/// Deserialized descriptors go through the same checks as [`FieldDescriptor::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldDescriptor")]
pub struct FieldDescriptor {
    name: NonEmptyString,
    label: String,
    #[serde(flatten)]
    kind: FieldKind,
    #[serde(default)]
    required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
    #[serde(default)]
    read_only: bool,
    #[serde(default)]
    disabled: bool,
}

#[derive(Deserialize)]
struct RawFieldDescriptor {
    name: String,
    #[serde(default)]
    label: String,
    #[serde(flatten)]
    kind: FieldKind,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    default_value: Option<Value>,
    #[serde(default)]
    placeholder: Option<String>,
    #[serde(default)]
    read_only: bool,
    #[serde(default)]
    disabled: bool,
}

impl TryFrom<RawFieldDescriptor> for FieldDescriptor {
    type Error = AppError;

    fn try_from(raw: RawFieldDescriptor) -> Result<Self, Self::Error> {
        let mut descriptor = Self::new(raw.name, raw.label, raw.kind)?;
        descriptor.required = raw.required;
        descriptor.default_value = raw.default_value;
        descriptor.placeholder = raw.placeholder;
        descriptor.read_only = raw.read_only;
        descriptor.disabled = raw.disabled;
        Ok(descriptor)
    }
}

impl FieldDescriptor {
    /// Creates a validated field descriptor.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        kind: FieldKind,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name).map_err(|_| {
            AppError::Configuration("field names must not be empty".to_owned())
        })?;

        if let Some(rules) = kind.text_rules() {
            rules.check(name.as_str())?;
        }
        if let Some(rules) = kind.number_rules() {
            rules.check(name.as_str())?;
        }

        Ok(Self {
            name,
            label: label.into(),
            kind,
            required: false,
            default_value: None,
            placeholder: None,
            read_only: false,
            disabled: false,
        })
    }

    /// Creates a plain text field.
    pub fn text(name: impl Into<String>, label: impl Into<String>) -> AppResult<Self> {
        Self::new(name, label, FieldKind::Text(TextRules::default()))
    }

    /// Creates an email field.
    pub fn email(name: impl Into<String>, label: impl Into<String>) -> AppResult<Self> {
        Self::new(name, label, FieldKind::Email(TextRules::default()))
    }

    /// Creates a number field.
    pub fn number(
        name: impl Into<String>,
        label: impl Into<String>,
        rules: NumberRules,
    ) -> AppResult<Self> {
        Self::new(name, label, FieldKind::Number(rules))
    }

    /// Creates a select field.
    pub fn select(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<FieldOption>,
    ) -> AppResult<Self> {
        Self::new(name, label, FieldKind::Select { options })
    }

    /// Creates a textarea field.
    pub fn textarea(
        name: impl Into<String>,
        label: impl Into<String>,
        rows: u16,
    ) -> AppResult<Self> {
        Self::new(
            name,
            label,
            FieldKind::Textarea {
                rows,
                rules: TextRules::default(),
            },
        )
    }

    /// Marks the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the value seeded on build and reset.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets the placeholder text.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Marks the field read-only. Read-only values are still validated.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Marks the field disabled. Disabled fields skip validation and are
    /// left out of submitted payloads.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Returns the unique field name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the visible label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the input kind.
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut FieldKind {
        &mut self.kind
    }

    /// Returns whether a value is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the declared default value.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Returns the value seeded on build and reset.
    #[must_use]
    pub fn seed_value(&self) -> Value {
        self.default_value
            .clone()
            .unwrap_or_else(|| self.kind.empty_value())
    }

    /// Returns the placeholder text.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Returns whether the field is read-only.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Returns whether the field is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// Compiles a field pattern anchored to the whole value.
pub(crate) fn compile_pattern(field_name: &str, pattern: &str) -> AppResult<Regex> {
    let inner = pattern.strip_prefix('^').unwrap_or(pattern);
    let inner = strip_end_anchor(inner);
    let anchored = format!("^(?:{inner})$");

    Regex::new(anchored.as_str()).map_err(|error| {
        AppError::Configuration(format!(
            "field '{field_name}' has an invalid pattern: {error}"
        ))
    })
}

/// Drops a trailing `$` unless it is escaped as a literal dollar.
fn strip_end_anchor(pattern: &str) -> &str {
    let Some(inner) = pattern.strip_suffix('$') else {
        return pattern;
    };

    let escapes = inner.chars().rev().take_while(|c| *c == '\\').count();
    if escapes % 2 == 0 { inner } else { pattern }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use bella_core::AppError;

    use super::{
        FieldDescriptor, FieldKind, FieldOption, NumberRules, TextRules, compile_pattern,
    };

    #[test]
    fn empty_field_names_are_configuration_errors() {
        let result = FieldDescriptor::text("  ", "Name");
        assert!(matches!(
            result,
            Err(bella_core::AppError::Configuration(_))
        ));
    }

    #[test]
    fn contradictory_length_rules_are_rejected() {
        let rules = TextRules::default().with_min_length(5).with_max_length(2);
        assert!(FieldDescriptor::new("sku", "SKU", FieldKind::Text(rules)).is_err());
    }

    #[test]
    fn invalid_patterns_fail_at_construction() {
        let rules = TextRules::default().with_pattern("[0-9");
        assert!(FieldDescriptor::new("phone", "Phone", FieldKind::Tel(rules)).is_err());
    }

    #[test]
    fn non_positive_step_is_rejected() {
        let rules = NumberRules::default().with_step(0.0);
        assert!(FieldDescriptor::number("price", "Price", rules).is_err());
    }

    #[test]
    fn seed_value_depends_on_kind() {
        let text = FieldDescriptor::text("name", "Name").unwrap_or_else(|_| unreachable!());
        let checkbox = FieldDescriptor::new("active", "Active", FieldKind::Checkbox)
            .unwrap_or_else(|_| unreachable!());
        let date = FieldDescriptor::new("date", "Date", FieldKind::Date)
            .unwrap_or_else(|_| unreachable!());
        let status = FieldDescriptor::select("status", "Status", Vec::new())
            .unwrap_or_else(|_| unreachable!())
            .with_default("pending");

        assert_eq!(text.seed_value(), json!(""));
        assert_eq!(checkbox.seed_value(), json!(false));
        assert_eq!(date.seed_value(), json!(null));
        assert_eq!(status.seed_value(), json!("pending"));
    }

    #[test]
    fn options_match_stringified_values() {
        let option = FieldOption::new(true, "Active");
        assert!(option.matches(&json!("true")));
        assert!(!option.matches(&json!("false")));
    }

    #[test]
    fn descriptors_deserialize_from_tagged_json() {
        let descriptor: FieldDescriptor = serde_json::from_value(json!({
            "name": "status",
            "label": "Status",
            "type": "select",
            "required": true,
            "default_value": "pending",
            "options": [
                {"value": "pending", "label": "Pending"},
                {"value": "confirmed", "label": "Confirmed"}
            ]
        }))
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(descriptor.name(), "status");
        assert!(descriptor.is_required());
        assert_eq!(descriptor.kind().options().map(<[FieldOption]>::len), Some(2));
    }

    #[test]
    fn deserialized_descriptors_are_checked_like_constructed_ones() {
        let empty_name = serde_json::from_value::<FieldDescriptor>(json!({
            "name": "",
            "type": "text"
        }));
        assert!(empty_name.is_err());

        let inverted_lengths = serde_json::from_value::<FieldDescriptor>(json!({
            "name": "code",
            "type": "text",
            "min_length": 5,
            "max_length": 2
        }));
        assert!(inverted_lengths.is_err());

        let inverted_range = serde_json::from_value::<FieldDescriptor>(json!({
            "name": "price",
            "type": "number",
            "min": 10.0,
            "max": 1.0
        }));
        assert!(inverted_range.is_err());

        let bad_pattern = serde_json::from_value::<FieldDescriptor>(json!({
            "name": "phone",
            "type": "tel",
            "pattern": "[0-9"
        }));
        assert!(bad_pattern.is_err());
    }

    #[test]
    fn deserialized_flags_survive_validation() {
        let descriptor: FieldDescriptor = serde_json::from_value(json!({
            "name": "notes",
            "label": "Notes",
            "type": "textarea",
            "rows": 3,
            "placeholder": "Anything else?",
            "read_only": true,
            "disabled": true
        }))
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(descriptor.placeholder(), Some("Anything else?"));
        assert!(descriptor.is_read_only());
        assert!(descriptor.is_disabled());
        assert!(!descriptor.is_required());
    }

    #[test]
    fn escaped_trailing_dollar_stays_literal() {
        let price = compile_pattern("price", r"^[0-9]+\$").unwrap_or_else(|_| unreachable!());
        assert!(price.is_match("12$"));
        assert!(!price.is_match("12"));

        let anchored = compile_pattern("code", r"^[A-Z]{2}$").unwrap_or_else(|_| unreachable!());
        assert!(anchored.is_match("AB"));
        assert!(!anchored.is_match("ABC"));

        let escaped_backslash =
            compile_pattern("path", r"[a-z]+\\$").unwrap_or_else(|_| unreachable!());
        assert!(escaped_backslash.is_match(r"dir\"));
        assert!(!escaped_backslash.is_match(r"dir\$"));
    }

    #[test]
    fn configuration_errors_name_the_field() {
        let result = FieldDescriptor::new(
            "sku",
            "SKU",
            FieldKind::Text(TextRules::default().with_pattern("(")),
        );
        assert!(matches!(result, Err(AppError::Configuration(message)) if message.contains("sku")));
    }
}
