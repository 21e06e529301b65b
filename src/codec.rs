//! Value Coercion Module
//!
//! Translates application values to and from the text stored remotely.
//!
//! Each [`ValueKind`] has one encode/decode rule. The built-in kinds work for
//! any serde-capable value whose serialized shape matches the kind (a
//! `String` for [`ValueKind::Text`], an integer for [`ValueKind::Int`] and so
//! on). [`ValueKind::Custom`] takes caller-supplied functions and places no
//! bound on the value type.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Number, Value};

use crate::error::{CacheError, Result};

const TRUE_LITERAL: &str = "true";
const FALSE_LITERAL: &str = "false";

// == Value Kind ==
/// Coercion rule selected once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Raw text, stored unchanged
    Text,
    /// Decimal integer
    Int,
    /// Decimal floating-point number
    Float,
    /// `true` / `false`, decoded case-sensitively
    Bool,
    /// Compact JSON document
    Json,
    /// Caller-supplied encoder and decoder
    Custom,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Text => "text",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::Json => "json",
            ValueKind::Custom => "custom",
        };
        f.write_str(name)
    }
}

type EncodeFn<V> = Arc<dyn Fn(&V) -> std::result::Result<String, String> + Send + Sync>;
type DecodeFn<V> = Arc<dyn Fn(&str) -> std::result::Result<V, String> + Send + Sync>;

// == Codec ==
/// Encode/decode pair for one value type under one [`ValueKind`].
pub struct Codec<V> {
    kind: ValueKind,
    encode: EncodeFn<V>,
    decode: DecodeFn<V>,
}

impl<V> Clone for Codec<V> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            encode: Arc::clone(&self.encode),
            decode: Arc::clone(&self.decode),
        }
    }
}

impl<V> fmt::Debug for Codec<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec").field("kind", &self.kind).finish()
    }
}

impl<V> Codec<V> {
    /// Builds a custom codec from an encoder and a decoder.
    ///
    /// Round-tripping is the caller's responsibility; decoder errors are
    /// reported as [`CacheError::Decode`].
    pub fn custom<E, D, DE>(encoder: E, decoder: D) -> Self
    where
        V: 'static,
        E: Fn(&V) -> String + Send + Sync + 'static,
        D: Fn(&str) -> std::result::Result<V, DE> + Send + Sync + 'static,
        DE: fmt::Display,
    {
        Self {
            kind: ValueKind::Custom,
            encode: Arc::new(move |value: &V| Ok(encoder(value))),
            decode: Arc::new(move |raw: &str| decoder(raw).map_err(|e| e.to_string())),
        }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    // == Encode ==
    /// Converts a value to its wire text.
    pub fn encode(&self, value: &V) -> Result<String> {
        (self.encode)(value).map_err(|message| {
            CacheError::Encode(format!("{} value: {}", self.kind, message))
        })
    }

    // == Decode ==
    /// Parses wire text read from `key`.
    pub fn decode(&self, key: &str, raw: &str) -> Result<V> {
        (self.decode)(raw).map_err(|message| CacheError::Decode {
            key: key.to_string(),
            message: format!("{} value: {}", self.kind, message),
        })
    }
}

impl<V> Codec<V>
where
    V: Serialize + DeserializeOwned + 'static,
{
    /// Returns the built-in codec for `kind`.
    ///
    /// Fails with [`CacheError::Config`] for [`ValueKind::Custom`], which
    /// needs explicit functions.
    pub fn builtin(kind: ValueKind) -> Result<Self> {
        match kind {
            ValueKind::Text => Ok(Self::text()),
            ValueKind::Int => Ok(Self::int()),
            ValueKind::Float => Ok(Self::float()),
            ValueKind::Bool => Ok(Self::boolean()),
            ValueKind::Json => Ok(Self::json()),
            ValueKind::Custom => Err(CacheError::Config(
                "value_encoder and value_decoder must be passed when value_type is custom"
                    .to_string(),
            )),
        }
    }

    pub fn text() -> Self {
        Self::scalar(ValueKind::Text, encode_text, |raw| Ok(Value::String(raw.to_string())))
    }

    pub fn int() -> Self {
        Self::scalar(ValueKind::Int, encode_int, decode_int)
    }

    pub fn float() -> Self {
        Self::scalar(ValueKind::Float, encode_float, decode_float)
    }

    pub fn boolean() -> Self {
        Self::scalar(ValueKind::Bool, encode_bool, decode_bool)
    }

    pub fn json() -> Self {
        Self {
            kind: ValueKind::Json,
            encode: Arc::new(|value: &V| serde_json::to_string(value).map_err(|e| e.to_string())),
            decode: Arc::new(|raw: &str| {
                serde_json::from_str::<V>(raw).map_err(|e| e.to_string())
            }),
        }
    }

    // Scalar kinds go through a serde_json::Value so any type with a matching
    // serialized shape (i32, u64, f32, newtypes...) can use them.
    fn scalar(
        kind: ValueKind,
        to_wire: fn(Value) -> std::result::Result<String, String>,
        from_wire: fn(&str) -> std::result::Result<Value, String>,
    ) -> Self {
        Self {
            kind,
            encode: Arc::new(move |value: &V| {
                let value = serde_json::to_value(value).map_err(|e| e.to_string())?;
                to_wire(value)
            }),
            decode: Arc::new(move |raw: &str| {
                let value = from_wire(raw)?;
                serde_json::from_value(value).map_err(|e| e.to_string())
            }),
        }
    }
}

// == Wire Rules ==
fn encode_text(value: Value) -> std::result::Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(format!("expected a string, got {}", other)),
    }
}

fn encode_int(value: Value) -> std::result::Result<String, String> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        other => Err(format!("expected an integer, got {}", other)),
    }
}

fn decode_int(raw: &str) -> std::result::Result<Value, String> {
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(Value::from(n));
    }
    raw.parse::<u64>()
        .map(Value::from)
        .map_err(|e| format!("{:?} is not an integer: {}", raw, e))
}

fn encode_float(value: Value) -> std::result::Result<String, String> {
    match value.as_f64() {
        Some(f) => Ok(f.to_string()),
        None => Err(format!("expected a finite number, got {}", value)),
    }
}

fn decode_float(raw: &str) -> std::result::Result<Value, String> {
    let f = raw
        .parse::<f64>()
        .map_err(|e| format!("{:?} is not a number: {}", raw, e))?;
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| format!("{:?} is not a finite number", raw))
}

fn encode_bool(value: Value) -> std::result::Result<String, String> {
    match value {
        Value::Bool(true) => Ok(TRUE_LITERAL.to_string()),
        Value::Bool(false) => Ok(FALSE_LITERAL.to_string()),
        other => Err(format!("expected a boolean, got {}", other)),
    }
}

fn decode_bool(raw: &str) -> std::result::Result<Value, String> {
    match raw {
        TRUE_LITERAL => Ok(Value::Bool(true)),
        FALSE_LITERAL => Ok(Value::Bool(false)),
        _ => Err(format!("{:?} is not {:?} or {:?}", raw, TRUE_LITERAL, FALSE_LITERAL)),
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn roundtrip<V>(codec: &Codec<V>, value: V) -> V {
        let wire = codec.encode(&value).unwrap();
        codec.decode("test:key", &wire).unwrap()
    }

    #[test]
    fn test_text_roundtrip() {
        let codec = Codec::<String>::text();
        assert_eq!(codec.encode(&"hello world".to_string()).unwrap(), "hello world");
        assert_eq!(roundtrip(&codec, String::new()), "");
        assert_eq!(roundtrip(&codec, "ünïcødé | 42".to_string()), "ünïcødé | 42");
    }

    #[test]
    fn test_int_roundtrip() {
        let codec = Codec::<i64>::int();
        assert_eq!(codec.encode(&-17).unwrap(), "-17");
        assert_eq!(roundtrip(&codec, 0), 0);
        assert_eq!(roundtrip(&codec, -42), -42);
        assert_eq!(roundtrip(&codec, i64::MAX), i64::MAX);

        let unsigned = Codec::<u64>::int();
        assert_eq!(roundtrip(&unsigned, u64::MAX), u64::MAX);
    }

    #[test]
    fn test_float_roundtrip() {
        let codec = Codec::<f64>::float();
        assert_eq!(roundtrip(&codec, 3.25), 3.25);
        assert_eq!(roundtrip(&codec, -0.1), -0.1);
        assert_eq!(roundtrip(&codec, 2.0), 2.0);
    }

    #[test]
    fn test_bool_roundtrip_and_literals() {
        let codec = Codec::<bool>::boolean();
        assert_eq!(codec.encode(&true).unwrap(), "true");
        assert_eq!(codec.encode(&false).unwrap(), "false");
        assert!(roundtrip(&codec, true));
        assert!(!roundtrip(&codec, false));
    }

    #[test]
    fn test_bool_decode_is_case_sensitive() {
        let codec = Codec::<bool>::boolean();
        let err = codec.decode("flags:1", "True").unwrap_err();
        assert!(matches!(err, CacheError::Decode { ref key, .. } if key == "flags:1"));
    }

    #[test]
    fn test_json_roundtrip_nested() {
        let codec = Codec::<serde_json::Value>::json();
        let data = json!({
            "state": 1,
            "orders": [1, 2, 3, 4],
            "items": {"foo": 1, "bar": true, "baz": []}
        });
        assert_eq!(roundtrip(&codec, data.clone()), data);
    }

    #[test]
    fn test_json_roundtrip_struct() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Profile {
            name: String,
            tags: Vec<String>,
            active: bool,
        }

        let codec = Codec::<Profile>::json();
        let profile = Profile {
            name: "ada".to_string(),
            tags: vec!["admin".to_string()],
            active: true,
        };
        let wire = codec.encode(&profile).unwrap();
        assert_eq!(wire, r#"{"name":"ada","tags":["admin"],"active":true}"#);
        assert_eq!(codec.decode("k", &wire).unwrap(), profile);
    }

    #[test]
    fn test_int_decode_failure() {
        let codec = Codec::<i32>::int();
        let err = codec.decode("counts:a", "abc").unwrap_err();
        assert!(matches!(err, CacheError::Decode { .. }));

        // Parses as an integer but does not fit the target type
        let err = codec.decode("counts:a", "9999999999").unwrap_err();
        assert!(matches!(err, CacheError::Decode { .. }));
    }

    #[test]
    fn test_kind_mismatch_is_encode_error() {
        let codec = Codec::<i64>::text();
        assert!(matches!(codec.encode(&5), Err(CacheError::Encode(_))));

        let codec = Codec::<String>::int();
        assert!(matches!(codec.encode(&"5".to_string()), Err(CacheError::Encode(_))));
    }

    #[test]
    fn test_float_rejects_nan() {
        let codec = Codec::<f64>::float();
        assert!(matches!(codec.encode(&f64::NAN), Err(CacheError::Encode(_))));
        assert!(codec.decode("k", "inf").is_err());
    }

    #[test]
    fn test_builtin_custom_is_config_error() {
        let result = Codec::<String>::builtin(ValueKind::Custom);
        assert!(matches!(result, Err(CacheError::Config(_))));

        let codec = Codec::<String>::builtin(ValueKind::Json).unwrap();
        assert_eq!(codec.kind(), ValueKind::Json);
    }

    #[test]
    fn test_custom_codec() {
        let codec = Codec::<i64>::custom(
            |value| format!("A|{}", value),
            |raw| {
                raw.split('|')
                    .nth(1)
                    .ok_or_else(|| "missing separator".to_string())
                    .and_then(|n| n.parse::<i64>().map_err(|e| e.to_string()))
            },
        );

        assert_eq!(codec.kind(), ValueKind::Custom);
        assert_eq!(codec.encode(&5).unwrap(), "A|5");
        assert_eq!(codec.decode("k", "A|5").unwrap(), 5);
        assert!(matches!(codec.decode("k", "A5"), Err(CacheError::Decode { .. })));
    }
}
