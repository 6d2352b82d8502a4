/// Value of a named annotation field.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

/// A declarative annotation attached to a procedure.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub fields: Vec<(String, AttributeValue)>,
}

impl Attribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn field(&self, name: &str) -> Option<&AttributeValue> {
        self.fields
            .iter()
            .rev()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, value)| value)
    }

    /// Reads a boolean field, falling back to `default` when the field is absent or not a bool.
    pub fn bool_field(&self, name: &str, default: bool) -> bool {
        match self.field(name) {
            Some(AttributeValue::Bool(value)) => *value,
            _ => default,
        }
    }
}
