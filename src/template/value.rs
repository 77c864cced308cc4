// ABOUTME: Dynamic values and the accessor capability walked by path expressions
// ABOUTME: Domain objects expose named read accessors that yield borrowed Values

use std::borrow::Cow;
use std::fmt;

/// Read-only accessor interface over one object of the process graph.
///
/// `access` receives the accessor name with its first character lower-cased,
/// so `Standort` and `standort` reach the same accessor.
pub trait Accessible {
    /// Invoke the accessor `name`, or `None` when this type has no such accessor
    fn access(&self, name: &str) -> Option<Value<'_>>;

    /// Short type name used in error messages
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// String form used when this object is the last segment of a path
    fn render(&self) -> String;
}

/// Result of a single accessor call.
#[derive(Clone)]
pub enum Value<'a> {
    Null,
    Text(Cow<'a, str>),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Object(&'a dyn Accessible),
    List(Vec<Value<'a>>),
}

impl<'a> Value<'a> {
    pub fn text(text: &'a str) -> Self {
        Value::Text(Cow::Borrowed(text))
    }

    pub fn owned_text(text: String) -> Self {
        Value::Text(Cow::Owned(text))
    }

    pub fn object<T: Accessible + 'a>(object: &'a T) -> Self {
        Value::Object(object)
    }

    /// Object accessor whose target may be unset
    pub fn optional_object<T: Accessible + 'a>(object: Option<&'a T>) -> Self {
        object.map_or(Value::Null, Value::object)
    }

    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value<'a>>,
    {
        Value::List(items.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Kind label for error messages
    pub fn kind(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Text(_) => "text".to_string(),
            Value::Integer(_) => "integer".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Bool(_) => "boolean".to_string(),
            Value::Object(object) => object.type_name().to_string(),
            Value::List(_) => "list".to_string(),
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(text: &'a str) -> Self {
        Value::text(text)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(text: &'a String) -> Self {
        Value::text(text.as_str())
    }
}

impl From<i64> for Value<'_> {
    fn from(number: i64) -> Self {
        Value::Integer(number)
    }
}

impl From<i32> for Value<'_> {
    fn from(number: i32) -> Self {
        Value::Integer(i64::from(number))
    }
}

impl From<u32> for Value<'_> {
    fn from(number: u32) -> Self {
        Value::Integer(i64::from(number))
    }
}

impl From<f64> for Value<'_> {
    fn from(number: f64) -> Self {
        Value::Float(number)
    }
}

impl From<bool> for Value<'_> {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

impl<'a, T> From<Option<T>> for Value<'a>
where
    T: Into<Value<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Text(text) => write!(f, "{}", text),
            Value::Integer(number) => write!(f, "{}", number),
            Value::Float(number) => write!(f, "{}", number),
            Value::Bool(flag) => write!(f, "{}", flag),
            Value::Object(object) => write!(f, "{}", object.render()),
            Value::List(items) => {
                write!(f, "[")?;
                for (position, item) in items.iter().enumerate() {
                    if position > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Value::Integer(number) => f.debug_tuple("Integer").field(number).finish(),
            Value::Float(number) => f.debug_tuple("Float").field(number).finish(),
            Value::Bool(flag) => f.debug_tuple("Bool").field(flag).finish(),
            Value::Object(object) => f.debug_tuple("Object").field(&object.type_name()).finish(),
            Value::List(items) => f.debug_list().entries(items).finish(),
        }
    }
}

/// Normalizes an accessor name the way getter lookup treats it: first character lower-cased.
pub fn accessor_key(name: &str) -> Cow<'_, str> {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            Cow::Owned(first.to_lowercase().chain(chars).collect())
        }
        _ => Cow::Borrowed(name),
    }
}

// String-keyed accessor table for untyped YAML snapshots.
impl Accessible for serde_yaml::Mapping {
    fn access(&self, name: &str) -> Option<Value<'_>> {
        self.iter().find_map(|(key, value)| {
            let key = key.as_str()?;
            (accessor_key(key) == name).then(|| yaml_value(value))
        })
    }

    fn type_name(&self) -> &'static str {
        "mapping"
    }

    fn render(&self) -> String {
        let entries: Vec<String> = self
            .iter()
            .map(|(key, value)| format!("{}={}", yaml_value(key), yaml_value(value)))
            .collect();
        format!("{{{}}}", entries.join(", "))
    }
}

/// Borrow a YAML node as a Value
pub fn yaml_value(value: &serde_yaml::Value) -> Value<'_> {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(flag) => Value::Bool(*flag),
        serde_yaml::Value::Number(number) => match number.as_i64() {
            Some(integer) => Value::Integer(integer),
            None => number.as_f64().map_or(Value::Null, Value::Float),
        },
        serde_yaml::Value::String(text) => Value::text(text),
        serde_yaml::Value::Sequence(items) => Value::list(items.iter().map(yaml_value)),
        serde_yaml::Value::Mapping(mapping) => Value::object(mapping),
        serde_yaml::Value::Tagged(tagged) => yaml_value(&tagged.value),
    }
}
