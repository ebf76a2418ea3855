//! Typed attribute record for layout components.
//!
//! Recognized attributes get an explicit optional field each; everything else
//! lands in a residual insertion-ordered map and is passed through
//! serialization untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{LayoutError, LayoutResult};

/// Recognized attribute keys, as they appear in the layout mapping.
pub mod keys {
    pub const COMPONENT: &str = "component";
    pub const CONFIG: &str = "config";
    pub const DATA_SCOPE: &str = "dataScope";
    pub const DISPLAY_AREA: &str = "displayArea";
    pub const LABEL: &str = "label";
    pub const PROVIDER: &str = "provider";
    pub const SORT_ORDER: &str = "sortOrder";
    pub const VALIDATION: &str = "validation";
    pub const VALUE: &str = "value";
    pub const FILTER_BY: &str = "filterBy";
    pub const VISIBLE: &str = "visible";
    pub const REQUIRED: &str = "required";

    /// Structural key, split out of the attribute map during parsing and
    /// re-attached during serialization.
    pub const CHILDREN: &str = "children";
}

/// Attribute bag of a single component.
///
/// Absent fields stay absent through a round trip; defaults (`visible`,
/// `required`) only apply at read time and never materialize in output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    component: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    config: Option<Map<String, Value>>,

    #[serde(rename = "dataScope", default, skip_serializing_if = "Option::is_none")]
    data_scope: Option<String>,

    #[serde(rename = "displayArea", default, skip_serializing_if = "Option::is_none")]
    display_area: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    provider: Option<String>,

    #[serde(rename = "sortOrder", default, skip_serializing_if = "Option::is_none")]
    sort_order: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    validation: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,

    #[serde(rename = "filterBy", default, skip_serializing_if = "Option::is_none")]
    filter_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    visible: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    required: Option<bool>,

    /// Unrecognized attributes, preserved in encounter order.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Attributes {
    /// Parse an attribute mapping (without the `children` key) into a typed
    /// record. Recognized keys are type-checked; unrecognized keys are kept
    /// verbatim.
    pub fn from_map(map: Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(map))
    }

    /// Serialize back to a mapping: recognized fields in declaration order,
    /// then residual keys in their original order.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(component) = &self.component {
            map.insert(keys::COMPONENT.into(), Value::String(component.clone()));
        }
        if let Some(config) = &self.config {
            map.insert(keys::CONFIG.into(), Value::Object(config.clone()));
        }
        if let Some(data_scope) = &self.data_scope {
            map.insert(keys::DATA_SCOPE.into(), Value::String(data_scope.clone()));
        }
        if let Some(display_area) = &self.display_area {
            map.insert(keys::DISPLAY_AREA.into(), Value::String(display_area.clone()));
        }
        if let Some(label) = &self.label {
            map.insert(keys::LABEL.into(), label.clone());
        }
        if let Some(provider) = &self.provider {
            map.insert(keys::PROVIDER.into(), Value::String(provider.clone()));
        }
        if let Some(sort_order) = &self.sort_order {
            map.insert(keys::SORT_ORDER.into(), Value::String(sort_order.clone()));
        }
        if let Some(validation) = &self.validation {
            map.insert(keys::VALIDATION.into(), Value::Object(validation.clone()));
        }
        if let Some(value) = &self.value {
            map.insert(keys::VALUE.into(), value.clone());
        }
        if let Some(filter_by) = &self.filter_by {
            map.insert(keys::FILTER_BY.into(), Value::String(filter_by.clone()));
        }
        if let Some(visible) = self.visible {
            map.insert(keys::VISIBLE.into(), Value::Bool(visible));
        }
        if let Some(required) = self.required {
            map.insert(keys::REQUIRED.into(), Value::Bool(required));
        }
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
        map
    }

    /// Generic attribute read. Recognized keys report their typed field;
    /// everything else is looked up in the residual map. Absence is `None`,
    /// never an error.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            keys::COMPONENT => self.component.clone().map(Value::String),
            keys::CONFIG => self.config.clone().map(Value::Object),
            keys::DATA_SCOPE => self.data_scope.clone().map(Value::String),
            keys::DISPLAY_AREA => self.display_area.clone().map(Value::String),
            keys::LABEL => self.label.clone(),
            keys::PROVIDER => self.provider.clone().map(Value::String),
            keys::SORT_ORDER => self.sort_order.clone().map(Value::String),
            keys::VALIDATION => self.validation.clone().map(Value::Object),
            keys::VALUE => self.value.clone(),
            keys::FILTER_BY => self.filter_by.clone().map(Value::String),
            keys::VISIBLE => self.visible.map(Value::Bool),
            keys::REQUIRED => self.required.map(Value::Bool),
            _ => self.extra.get(key).cloned(),
        }
    }

    /// Generic attribute write. Recognized keys are routed to their typed
    /// field and type-checked; everything else goes to the residual map.
    pub fn set(&mut self, key: &str, value: Value) -> LayoutResult<&mut Self> {
        match key {
            keys::COMPONENT => self.component = Some(expect_string(key, value)?),
            keys::CONFIG => self.config = Some(expect_object(key, value)?),
            keys::DATA_SCOPE => self.data_scope = Some(expect_string(key, value)?),
            keys::DISPLAY_AREA => self.display_area = Some(expect_string(key, value)?),
            keys::LABEL => self.label = Some(value),
            keys::PROVIDER => self.provider = Some(expect_string(key, value)?),
            keys::SORT_ORDER => self.sort_order = Some(expect_string(key, value)?),
            keys::VALIDATION => self.validation = Some(expect_object(key, value)?),
            keys::VALUE => self.value = Some(value),
            keys::FILTER_BY => self.filter_by = Some(expect_string(key, value)?),
            keys::VISIBLE => self.visible = Some(expect_bool(key, value)?),
            keys::REQUIRED => self.required = Some(expect_bool(key, value)?),
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
        Ok(self)
    }

    pub fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }

    pub fn set_component(&mut self, component: impl Into<String>) -> &mut Self {
        self.component = Some(component.into());
        self
    }

    /// Component configuration block. Absent means empty.
    pub fn config(&self) -> Option<&Map<String, Value>> {
        self.config.as_ref()
    }

    pub fn set_config(&mut self, config: Map<String, Value>) -> &mut Self {
        self.config = Some(config);
        self
    }

    pub fn data_scope(&self) -> Option<&str> {
        self.data_scope.as_deref()
    }

    pub fn set_data_scope(&mut self, data_scope: impl Into<String>) -> &mut Self {
        self.data_scope = Some(data_scope.into());
        self
    }

    pub fn display_area(&self) -> Option<&str> {
        self.display_area.as_deref()
    }

    pub fn set_display_area(&mut self, display_area: impl Into<String>) -> &mut Self {
        self.display_area = Some(display_area.into());
        self
    }

    pub fn label(&self) -> Option<&Value> {
        self.label.as_ref()
    }

    pub fn set_label(&mut self, label: impl Into<Value>) -> &mut Self {
        self.label = Some(label.into());
        self
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    pub fn set_provider(&mut self, provider: impl Into<String>) -> &mut Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn sort_order(&self) -> Option<&str> {
        self.sort_order.as_deref()
    }

    pub fn set_sort_order(&mut self, sort_order: impl Into<String>) -> &mut Self {
        self.sort_order = Some(sort_order.into());
        self
    }

    /// Validation rules keyed by rule name. Absent means empty.
    pub fn validation(&self) -> Option<&Map<String, Value>> {
        self.validation.as_ref()
    }

    pub fn set_validation(&mut self, validation: Map<String, Value>) -> &mut Self {
        self.validation = Some(validation);
        self
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.value = Some(value.into());
        self
    }

    pub fn filter_by(&self) -> Option<&str> {
        self.filter_by.as_deref()
    }

    pub fn set_filter_by(&mut self, filter_by: impl Into<String>) -> &mut Self {
        self.filter_by = Some(filter_by.into());
        self
    }

    /// Visibility flag, `true` when absent.
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.visible = Some(visible);
        self
    }

    /// Required flag, `false` when absent.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    pub fn set_required(&mut self, required: bool) -> &mut Self {
        self.required = Some(required);
        self
    }

    /// Unrecognized attributes in their original order.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// JSON type name for error messages.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expect_string(key: &str, value: Value) -> LayoutResult<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(mismatch(key, "a string", &other)),
    }
}

fn expect_object(key: &str, value: Value) -> LayoutResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(mismatch(key, "an object", &other)),
    }
}

fn expect_bool(key: &str, value: Value) -> LayoutResult<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(mismatch(key, "a boolean", &other)),
    }
}

fn mismatch(key: &str, expected: &'static str, actual: &Value) -> LayoutError {
    LayoutError::TypeMismatch {
        key: key.to_string(),
        expected,
        actual: json_type(actual).to_string(),
    }
}
