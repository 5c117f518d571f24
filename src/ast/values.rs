//! Value nodes and constants.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{from_payload, node_list, single_tag, Node};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StringValue {
    #[serde(alias = "str")]
    pub sval: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IntegerValue {
    pub ival: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FloatValue {
    #[serde(alias = "str")]
    pub fval: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BooleanValue {
    pub boolval: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BitStringValue {
    #[serde(alias = "str")]
    pub bsval: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NullValue {}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AStar {}

/// An explicit node sequence.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct List {
    #[serde(deserialize_with = "node_list")]
    pub items: Vec<Node>,
}

/// The literal carried by an `A_Const`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    Integer(i64),
    /// Numeric text exactly as written.
    Float(String),
    String(String),
    Boolean(bool),
    /// Bit-string body including its `b`/`x` prefix.
    BitString(String),
    Null,
}

/// A literal constant.
///
/// Accepted shapes:
/// - `{"ival": {"ival": 1}}`, `{"sval": {"sval": "x"}}`, `{"isnull": true}`, ...
/// - the same with a tagged inner value: `{"ival": {"Integer": {"ival": 1}}}`
/// - legacy `{"val": {"Integer": {"ival": 1}}}`
#[derive(Debug, Clone, PartialEq)]
pub struct AConst {
    pub value: ConstValue,
}

impl Default for AConst {
    fn default() -> Self {
        Self {
            value: ConstValue::Null,
        }
    }
}

impl AConst {
    pub fn integer(ival: i64) -> Self {
        Self {
            value: ConstValue::Integer(ival),
        }
    }

    pub fn string(sval: impl Into<String>) -> Self {
        Self {
            value: ConstValue::String(sval.into()),
        }
    }

    pub fn is_null(&self) -> bool {
        self.value == ConstValue::Null
    }

    fn from_map(mut map: Map<String, Value>) -> Result<Self, String> {
        if map.get("isnull").and_then(Value::as_bool) == Some(true) {
            return Ok(Self::default());
        }
        for key in ["ival", "fval", "sval", "boolval", "bsval"] {
            if let Some(inner) = map.remove(key) {
                return const_value(key, inner).map(|value| Self { value });
            }
        }
        if let Some(val) = map.remove("val") {
            return value_node(val).map(|value| Self { value });
        }
        Err("A_Const without a value".to_string())
    }
}

impl<'de> Deserialize<'de> for AConst {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(map) => AConst::from_map(map).map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "expected an A_Const payload, found {other}"
            ))),
        }
    }
}

fn const_value(key: &str, inner: Value) -> Result<ConstValue, String> {
    if let Value::Object(map) = &inner {
        if single_tag(map).is_some() {
            return value_node(inner);
        }
    }
    let inner = if inner.is_null() {
        Value::Object(Map::new())
    } else {
        inner
    };
    let parsed = match key {
        "ival" => from_payload::<IntegerValue>(inner).map(|v| ConstValue::Integer(v.ival)),
        "fval" => from_payload::<FloatValue>(inner).map(|v| ConstValue::Float(v.fval)),
        "sval" => from_payload::<StringValue>(inner).map(|v| ConstValue::String(v.sval)),
        "boolval" => {
            from_payload::<BooleanValue>(inner).map(|v| ConstValue::Boolean(v.boolval))
        }
        _ => from_payload::<BitStringValue>(inner)
            .map(|v| ConstValue::BitString(v.bsval)),
    };
    parsed.map_err(|e| format!("A_Const.{key}: {e}"))
}

fn value_node(value: Value) -> Result<ConstValue, String> {
    let node = Node::from_json(value).map_err(|e| e.to_string())?;
    Ok(match node {
        Node::Integer(v) => ConstValue::Integer(v.ival),
        Node::Float(v) => ConstValue::Float(v.fval),
        Node::String(v) => ConstValue::String(v.sval),
        Node::Boolean(v) => ConstValue::Boolean(v.boolval),
        Node::BitString(v) => ConstValue::BitString(v.bsval),
        Node::Null(_) => ConstValue::Null,
        other => return Err(format!("A_Const cannot hold a {} node", other.kind())),
    })
}
