//! Generic property-bag document shared by scenes and movies.
//!
//! A [`PropertyContainer`] owns an insertion-ordered JSON object. Only the
//! properties of its [`PropertySet`] may be written through [`set`], while
//! structural keys (`elements`, `scenes`, `transition`) are managed by the
//! dedicated operations.
//!
//! [`set`]: PropertyContainer::set

use std::marker::PhantomData;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::property::PropertySet;

/// Key under which attached elements are stored.
pub const ELEMENTS_KEY: &str = "elements";

/// A JSON object whose settable keys are restricted to `P`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyContainer<P: PropertySet> {
    object: Map<String, Value>,
    _properties: PhantomData<P>,
}

impl<P: PropertySet> Default for PropertyContainer<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PropertySet> PropertyContainer<P> {
    /// Create an empty container.
    pub fn new() -> Self {
        Self {
            object: Map::new(),
            _properties: PhantomData,
        }
    }

    /// Set a property by name.
    ///
    /// The name is normalized (see [`crate::property::normalize_name`])
    /// before the lookup. Unknown names fail with
    /// [`CoreError::InvalidProperty`] and leave the container unchanged.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), CoreError> {
        let property = P::parse(name)?;
        self.set_property(property, value);
        Ok(())
    }

    /// Set a property through its typed name. Cannot fail.
    pub fn set_property(&mut self, property: P, value: impl Into<Value>) {
        self.object.insert(property.name().to_string(), value.into());
    }

    /// Current value of a property, if it has been set.
    pub fn get(&self, property: P) -> Option<&Value> {
        self.object.get(property.name())
    }

    /// Append an element.
    ///
    /// Only structured values (objects and arrays) are accepted. Returns
    /// `false` and leaves the container untouched for anything else; this
    /// is not treated as an error.
    pub fn add_element(&mut self, element: Value) -> bool {
        if !(element.is_object() || element.is_array()) {
            return false;
        }
        self.push_to(ELEMENTS_KEY, element);
        true
    }

    /// Elements attached so far, in insertion order.
    pub fn elements(&self) -> &[Value] {
        self.list(ELEMENTS_KEY)
    }

    /// Pretty-printed JSON of the document, keys in insertion order.
    pub fn export_json(&self) -> String {
        // A map of `Value`s with string keys always serializes.
        serde_json::to_string_pretty(&self.object).unwrap_or_default()
    }

    /// The plain document, for embedding into a parent container.
    pub fn export_object(&self) -> &Map<String, Value> {
        &self.object
    }

    /// Consume the container and return its document.
    pub fn into_object(self) -> Map<String, Value> {
        self.object
    }

    // ---- crate-internal helpers ----

    /// Append `value` to the array stored at `key`, creating it on first use.
    pub(crate) fn push_to(&mut self, key: &str, value: Value) {
        let slot = self
            .object
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match slot {
            Value::Array(items) => items.push(value),
            other => *other = Value::Array(vec![value]),
        }
    }

    /// The array stored at `key`, or an empty slice.
    pub(crate) fn list(&self, key: &str) -> &[Value] {
        self.object
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Modify the nested object at `key`, creating it on first use. A
    /// non-object value at `key` is replaced; the key keeps its position.
    pub(crate) fn update_object(
        &mut self,
        key: &str,
        update: impl FnOnce(&mut Map<String, Value>),
    ) {
        let slot = self.object.entry(key.to_string()).or_insert(Value::Null);
        let mut map = match slot.take() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        update(&mut map);
        *slot = Value::Object(map);
    }

    /// Insert a raw key without whitelist checks.
    pub(crate) fn insert_raw(&mut self, key: &str, value: Value) {
        self.object.insert(key.to_string(), value);
    }

    /// Rebuild the property and `elements` keys of a document.
    ///
    /// `structural` is called for every key other than `elements` before it
    /// is treated as a property; it hands the value back when it does not
    /// recognise the key.
    pub(crate) fn load(
        document: Value,
        mut structural: impl FnMut(&mut Self, &str, Value) -> Result<Option<Value>, CoreError>,
    ) -> Result<Self, CoreError> {
        let map = match document {
            Value::Object(map) => map,
            other => {
                return Err(CoreError::InvalidDocument(format!(
                    "expected a JSON object, got {}",
                    kind_of(&other)
                )))
            }
        };

        let mut container = Self::new();
        for (key, value) in map {
            if key == ELEMENTS_KEY {
                let items = match value {
                    Value::Array(items) => items,
                    other => {
                        return Err(CoreError::InvalidElement(format!(
                            "`elements` must be an array, got {}",
                            kind_of(&other)
                        )))
                    }
                };
                container.insert_raw(ELEMENTS_KEY, Value::Array(Vec::new()));
                for (index, item) in items.into_iter().enumerate() {
                    let kind = kind_of(&item);
                    if !container.add_element(item) {
                        return Err(CoreError::InvalidElement(format!(
                            "element {index} must be an object, got {kind}"
                        )));
                    }
                }
                continue;
            }
            if let Some(value) = structural(&mut container, key.as_str(), value)? {
                container.set(&key, value)?;
            }
        }
        Ok(container)
    }
}

impl<P: PropertySet> Serialize for PropertyContainer<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.object.serialize(serializer)
    }
}

/// Short JSON type name used in error messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
