//! Run configuration tree and deterministic identifier rendering.

use crate::common::*;

/// A configuration field value: a scalar leaf, an ordered sequence, or a
/// nested configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<Value>),
    Config(RunConfig),
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<RunConfig> for Value {
    fn from(value: RunConfig) -> Self {
        Self::Config(value)
    }
}

impl<V> From<Vec<V>> for Value
where
    V: Into<Value>,
{
    fn from(values: Vec<V>) -> Self {
        Self::Seq(values.into_iter().map(Into::into).collect())
    }
}

/// A tree of named configuration fields.
///
/// Only a config carrying a scope name exposes an identifier: the scope
/// followed by every leaf value of the tree, fields visited in ascending
/// name order at every level, joined by underscores. The identifier is a
/// stable key for caches and run tracking.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<String>,
    #[serde(flatten)]
    fields: BTreeMap<String, Value>,
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scoped(scope: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Renders the deterministic identifier of a scoped config.
    pub fn identifier(&self) -> Result<String> {
        let scope = self
            .scope
            .as_ref()
            .ok_or_else(|| format_err!("there is no field 'scope' in this config"))?;

        let mut parts = vec![];
        collect_fields(&self.fields, &mut parts)?;
        Ok(format!("{}_{}", scope, parts.join("_")))
    }
}

fn collect_fields(fields: &BTreeMap<String, Value>, parts: &mut Vec<String>) -> Result<()> {
    for (name, value) in fields {
        match value {
            Value::Config(config) => collect_fields(&config.fields, parts)
                .with_context(|| format!("in nested config '{}'", name))?,
            scalar => parts.push(
                render_scalar(scalar).with_context(|| format!("in field '{}'", name))?,
            ),
        }
    }
    Ok(())
}

fn render_scalar(value: &Value) -> Result<String> {
    let text = match value {
        Value::Int(value) => value.to_string(),
        Value::Float(value) => value.to_string(),
        Value::Str(value) => value.clone(),
        Value::Bool(true) => format!("YES{}", true),
        Value::Bool(false) => format!("NO{}", false),
        Value::Seq(values) => {
            let rendered: Vec<_> = values
                .iter()
                .map(|element| match element {
                    Value::Int(value) => Ok(value.to_string()),
                    Value::Float(value) => Ok(value.to_string()),
                    Value::Str(value) => Ok(value.clone()),
                    Value::Bool(value) => Ok(value.to_string()),
                    _ => bail!("wrong dtype in sequence"),
                })
                .try_collect()?;
            rendered.join("x")
        }
        Value::Config(_) => bail!("wrong dtype"),
    };
    Ok(text)
}
