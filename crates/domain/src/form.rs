use std::collections::{BTreeMap, BTreeSet, HashMap};

use bella_core::{AppError, AppResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::display::stringify;
use crate::field::{CompositeKind, FieldDescriptor, FieldKind, FieldOption, compile_pattern};
use crate::working_hours::WeeklyHours;

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";
const EMAIL_MAX_LENGTH: usize = 254;
const EMAIL_LOCAL_MAX_LENGTH: usize = 64;

/// Kind of a per-field validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Value is missing.
    Required,
    /// Value is not an email address.
    Email,
    /// Value is shorter than `min_length`.
    MinLength,
    /// Value is longer than `max_length`.
    MaxLength,
    /// Value does not match `pattern`.
    Pattern,
    /// Value is below `min`.
    Min,
    /// Value is above `max`.
    Max,
    /// Value of a number field is not numeric.
    Number,
    /// Select or radio field has no options to choose from.
    NoOptions,
    /// Value is not one of the field's options.
    UnknownOption,
    /// Composite schedule is malformed.
    Schedule,
}

/// Set of validation failures of one field.
pub type FieldErrors = BTreeSet<FieldErrorKind>;

/// Read-only validation snapshot of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    valid: bool,
    errors_by_field: BTreeMap<String, FieldErrors>,
}

impl ValidationReport {
    fn new(errors_by_field: BTreeMap<String, FieldErrors>) -> Self {
        let valid = errors_by_field.values().all(BTreeSet::is_empty);
        Self {
            valid,
            errors_by_field,
        }
    }

    /// Returns whether every field's error set is empty.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns errors keyed by field name. Every field has an entry.
    #[must_use]
    pub fn errors_by_field(&self) -> &BTreeMap<String, FieldErrors> {
        &self.errors_by_field
    }

    /// Returns the errors of one field.
    #[must_use]
    pub fn field_errors(&self, name: &str) -> Option<&FieldErrors> {
        self.errors_by_field.get(name)
    }
}

#[derive(Debug, Clone)]
struct FieldSlot {
    descriptor: FieldDescriptor,
    pattern: Option<Regex>,
    email: Option<Regex>,
    value: Value,
    touched: bool,
    dirty: bool,
    errors: FieldErrors,
}

impl FieldSlot {
    fn compile(descriptor: FieldDescriptor) -> AppResult<Self> {
        let pattern = descriptor
            .kind()
            .text_rules()
            .and_then(|rules| rules.pattern.as_deref())
            .map(|pattern| compile_pattern(descriptor.name(), pattern))
            .transpose()?;

        let email = match descriptor.kind() {
            FieldKind::Email(_) => Some(Regex::new(EMAIL_PATTERN).map_err(|error| {
                AppError::Internal(format!("email pattern failed to compile: {error}"))
            })?),
            _ => None,
        };

        let value = descriptor.seed_value();
        let mut slot = Self {
            descriptor,
            pattern,
            email,
            value,
            touched: false,
            dirty: false,
            errors: FieldErrors::new(),
        };
        slot.revalidate();
        Ok(slot)
    }

    fn revalidate(&mut self) {
        self.errors = field_errors(self);
    }
}

/// Mutable, validated value bag built from field descriptors.
///
/// The form owns its working copy of the descriptors; select options that
/// arrive later are applied through [`FormState::update_options`].
#[derive(Debug, Clone)]
pub struct FormState {
    slots: Vec<FieldSlot>,
    index: HashMap<String, usize>,
}

impl FormState {
    /// Builds a form with every field seeded from its descriptor.
    pub fn build(fields: Vec<FieldDescriptor>) -> AppResult<Self> {
        let mut slots = Vec::with_capacity(fields.len());
        let mut index = HashMap::with_capacity(fields.len());

        for descriptor in fields {
            let name = descriptor.name().to_owned();
            if index.contains_key(&name) {
                return Err(AppError::Configuration(format!(
                    "duplicate field name '{name}' in form"
                )));
            }

            index.insert(name, slots.len());
            slots.push(FieldSlot::compile(descriptor)?);
        }

        Ok(Self { slots, index })
    }

    fn slot(&self, name: &str) -> Option<&FieldSlot> {
        self.index.get(name).map(|position| &self.slots[*position])
    }

    fn slot_mut(&mut self, name: &str) -> AppResult<&mut FieldSlot> {
        match self.index.get(name) {
            Some(position) => Ok(&mut self.slots[*position]),
            None => Err(AppError::Configuration(format!(
                "form has no field named '{name}'"
            ))),
        }
    }

    /// Returns the descriptors in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.slots.iter().map(|slot| &slot.descriptor)
    }

    /// Returns one descriptor.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.slot(name).map(|slot| &slot.descriptor)
    }

    /// Returns the current value of a field.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.slot(name).map(|slot| &slot.value)
    }

    /// Returns all current values keyed by field name.
    #[must_use]
    pub fn values(&self) -> Map<String, Value> {
        self.slots
            .iter()
            .map(|slot| (slot.descriptor.name().to_owned(), slot.value.clone()))
            .collect()
    }

    /// Returns the values submitted to the API, leaving out disabled fields.
    #[must_use]
    pub fn payload(&self) -> Map<String, Value> {
        self.slots
            .iter()
            .filter(|slot| !slot.descriptor.is_disabled())
            .map(|slot| (slot.descriptor.name().to_owned(), slot.value.clone()))
            .collect()
    }

    /// Returns whether the user changed the field.
    #[must_use]
    pub fn is_dirty(&self, name: &str) -> bool {
        self.slot(name).is_some_and(|slot| slot.dirty)
    }

    /// Returns whether the field was interacted with or revealed on submit.
    #[must_use]
    pub fn is_touched(&self, name: &str) -> bool {
        self.slot(name).is_some_and(|slot| slot.touched)
    }

    /// Returns the current errors of a field.
    #[must_use]
    pub fn errors(&self, name: &str) -> Option<&FieldErrors> {
        self.slot(name).map(|slot| &slot.errors)
    }

    /// Returns whether every field's error set is empty.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.slots.iter().all(|slot| slot.errors.is_empty())
    }

    /// Overwrites the named fields without touching dirty or touched flags.
    ///
    /// Names that are not fields of this form are ignored, so a raw API
    /// record can be passed as is.
    pub fn patch(&mut self, values: &Map<String, Value>) {
        for slot in &mut self.slots {
            if let Some(value) = values.get(slot.descriptor.name()) {
                slot.value = value.clone();
                slot.revalidate();
            }
        }
    }

    /// Records user input for one field.
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> AppResult<()> {
        let slot = self.slot_mut(name)?;
        slot.value = value.into();
        slot.dirty = true;
        slot.touched = true;
        slot.revalidate();
        Ok(())
    }

    /// Marks one field touched, as on blur.
    pub fn mark_touched(&mut self, name: &str) -> AppResult<()> {
        self.slot_mut(name)?.touched = true;
        Ok(())
    }

    /// Marks every field touched so all errors become visible at once.
    pub fn mark_all_touched(&mut self) {
        for slot in &mut self.slots {
            slot.touched = true;
        }
    }

    /// Re-seeds every field from its descriptor and clears interaction flags.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.value = slot.descriptor.seed_value();
            slot.touched = false;
            slot.dirty = false;
            slot.revalidate();
        }
    }

    /// Replaces the options of a select or radio field.
    pub fn update_options(&mut self, name: &str, options: Vec<FieldOption>) -> AppResult<()> {
        let slot = self.slot_mut(name)?;
        let Some(current) = slot.descriptor.kind_mut().options_mut() else {
            return Err(AppError::Configuration(format!(
                "field '{name}' does not take options"
            )));
        };

        *current = options;
        slot.revalidate();
        Ok(())
    }

    /// Returns a validation snapshot without mutating the form.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        ValidationReport::new(
            self.slots
                .iter()
                .map(|slot| (slot.descriptor.name().to_owned(), slot.errors.clone()))
                .collect(),
        )
    }

    /// Returns the message for the field's first error once it is touched.
    #[must_use]
    pub fn visible_error(&self, name: &str) -> Option<String> {
        let slot = self.slot(name)?;
        if !slot.touched {
            return None;
        }

        let kind = slot.errors.iter().next()?;
        Some(error_message(&slot.descriptor, *kind))
    }
}

/// Renders the inline message shown next to a field for an error kind.
#[must_use]
pub fn error_message(descriptor: &FieldDescriptor, kind: FieldErrorKind) -> String {
    let label = descriptor.label();
    let text_rules = descriptor.kind().text_rules();
    let number_rules = descriptor.kind().number_rules();

    match kind {
        FieldErrorKind::Required => format!("{label} is required"),
        FieldErrorKind::Email => "Please enter a valid email address".to_owned(),
        FieldErrorKind::MinLength => format!(
            "{label} must be at least {} characters",
            text_rules.and_then(|rules| rules.min_length).unwrap_or(0)
        ),
        FieldErrorKind::MaxLength => format!(
            "{label} must be no more than {} characters",
            text_rules.and_then(|rules| rules.max_length).unwrap_or(0)
        ),
        FieldErrorKind::Pattern => format!("Please enter a valid {}", label.to_lowercase()),
        FieldErrorKind::Min => format!(
            "{label} must be at least {}",
            number_rules.and_then(|rules| rules.min).unwrap_or(0.0)
        ),
        FieldErrorKind::Max => format!(
            "{label} must be no more than {}",
            number_rules.and_then(|rules| rules.max).unwrap_or(0.0)
        ),
        FieldErrorKind::Number => format!("{label} must be a number"),
        FieldErrorKind::NoOptions => format!("{label} has no options available"),
        FieldErrorKind::UnknownOption => format!("Please select a valid {}", label.to_lowercase()),
        FieldErrorKind::Schedule => format!("{label} has an invalid schedule"),
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|parsed| parsed.is_finite()),
        _ => None,
    }
}

fn field_errors(slot: &FieldSlot) -> FieldErrors {
    let descriptor = &slot.descriptor;
    let value = &slot.value;
    let mut errors = FieldErrors::new();
    if descriptor.is_disabled() {
        return errors;
    }

    let empty = is_empty_value(value);
    if descriptor.is_required() && empty {
        errors.insert(FieldErrorKind::Required);
    }

    if let Some(options) = descriptor.kind().options() {
        if options.is_empty() {
            errors.insert(FieldErrorKind::NoOptions);
        } else if !empty && !options.iter().any(|option| option.matches(value)) {
            errors.insert(FieldErrorKind::UnknownOption);
        }
    }

    if empty {
        return errors;
    }

    if let Some(rules) = descriptor.kind().text_rules() {
        let text = stringify(Some(value));
        let length = text.chars().count();

        if rules.min_length.is_some_and(|min| length < min) {
            errors.insert(FieldErrorKind::MinLength);
        }
        if rules.max_length.is_some_and(|max| length > max) {
            errors.insert(FieldErrorKind::MaxLength);
        }
        if slot
            .pattern
            .as_ref()
            .is_some_and(|pattern| !pattern.is_match(text.as_str()))
        {
            errors.insert(FieldErrorKind::Pattern);
        }
        if let Some(email) = &slot.email
            && !is_email(email, text.as_str())
        {
            errors.insert(FieldErrorKind::Email);
        }
    }

    if let Some(rules) = descriptor.kind().number_rules() {
        match numeric_value(value) {
            Some(number) => {
                if rules.min.is_some_and(|min| number < min) {
                    errors.insert(FieldErrorKind::Min);
                }
                if rules.max.is_some_and(|max| number > max) {
                    errors.insert(FieldErrorKind::Max);
                }
            }
            None => {
                errors.insert(FieldErrorKind::Number);
            }
        }
    }

    if let FieldKind::Composite {
        shape: CompositeKind::WeeklyHours,
    } = descriptor.kind()
    {
        let schedule_is_valid = serde_json::from_value::<WeeklyHours>(value.clone())
            .map(|hours| hours.invalid_days().is_empty())
            .unwrap_or(false);
        if !schedule_is_valid {
            errors.insert(FieldErrorKind::Schedule);
        }
    }

    errors
}

fn is_email(pattern: &Regex, text: &str) -> bool {
    let Some((local, _)) = text.rsplit_once('@') else {
        return false;
    };

    text.len() <= EMAIL_MAX_LENGTH
        && local.len() <= EMAIL_LOCAL_MAX_LENGTH
        && pattern.is_match(text)
}
