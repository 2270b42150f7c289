//! Boxed preference values
//!
//! [`PrefValue`] is the type-erased form of a preference value, shared by
//! containers and the merge engine. [`PreferenceValue`] ties a concrete Rust
//! type to it. Every dispatch over boxed values is an exhaustive `match` on
//! [`ValueKind`] or [`PrefValue`].

use std::fmt::{self, Debug, Display, Formatter};

use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

/// Declared kind of a preference value
///
/// `Custom` carries the type tag used to find a decoder for custom types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `bool`
    Bool,
    /// Signed integers
    Integer,
    /// Unsigned integers
    Unsigned,
    /// Floating point numbers
    Float,
    /// A single `char`
    Char,
    /// `String`
    Text,
    /// User-defined type, identified by its tag
    Custom(&'static str),
}

impl ValueKind {
    /// Human-readable name of the kind
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Unsigned => "unsigned",
            Self::Float => "float",
            Self::Char => "char",
            Self::Text => "text",
            Self::Custom(tag) => *tag,
        }
    }

    /// Whether this is one of the built-in scalar kinds
    #[inline]
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ValueKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Payload of a custom-typed value
///
/// The payload is kept as a JSON value; custom types move in and out of it
/// through serde.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomValue {
    tag: &'static str,
    data: JsonValue,
}

impl CustomValue {
    /// Wrap an already-encoded payload
    #[inline]
    #[must_use]
    pub fn new(tag: &'static str, data: JsonValue) -> Self {
        Self { tag, data }
    }

    /// Encode a serializable value under `tag`
    ///
    /// # Errors
    /// Returns error if the value cannot be serialized
    pub fn encode<T: Serialize>(tag: &'static str, value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(tag, serde_json::to_value(value)?))
    }

    /// Decode the payload into a typed value
    ///
    /// # Errors
    /// Returns error if the payload does not match `T`
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.clone())
    }

    /// Type tag
    #[inline]
    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Encoded payload
    #[inline]
    #[must_use]
    pub fn data(&self) -> &JsonValue {
        &self.data
    }
}

/// Type-erased preference value
#[derive(Debug, Clone, PartialEq)]
pub enum PrefValue {
    /// Boolean
    Bool(bool),
    /// Signed integer, widened to 64 bits
    Integer(i64),
    /// Unsigned integer, widened to 64 bits
    Unsigned(u64),
    /// Floating point number
    Float(f64),
    /// Single character
    Char(char),
    /// Text
    Text(String),
    /// Custom-typed value
    Custom(CustomValue),
}

impl PrefValue {
    /// Kind of this value
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Integer(_) => ValueKind::Integer,
            Self::Unsigned(_) => ValueKind::Unsigned,
            Self::Float(_) => ValueKind::Float,
            Self::Char(_) => ValueKind::Char,
            Self::Text(_) => ValueKind::Text,
            Self::Custom(custom) => ValueKind::Custom(custom.tag),
        }
    }

    /// Read a JSON scalar into its natural boxed form
    ///
    /// Numbers become `Integer` when they fit an `i64`, then `Unsigned`,
    /// then `Float`. Returns `None` for null, arrays and objects.
    #[must_use]
    pub fn from_json_scalar(node: &JsonValue) -> Option<Self> {
        match node {
            JsonValue::Bool(b) => Some(Self::Bool(*b)),
            JsonValue::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_u64().map(Self::Unsigned))
                .or_else(|| n.as_f64().map(Self::Float)),
            JsonValue::String(s) => Some(Self::Text(s.clone())),
            JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
        }
    }

    /// Render as a JSON value
    ///
    /// Non-finite floats have no JSON form and render as `null`.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Integer(i) => JsonValue::from(*i),
            Self::Unsigned(u) => JsonValue::from(*u),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
            Self::Char(c) => JsonValue::String(c.to_string()),
            Self::Text(s) => JsonValue::String(s.clone()),
            Self::Custom(custom) => custom.data.clone(),
        }
    }

    /// Render as text, honoring `format` where the kind supports one
    ///
    /// # Formats
    /// - integers: `x`, `X`, `o`, `b`, `d`, and zero-padded width `0N`
    /// - floats: precision `.N`, `e`, `E`
    ///
    /// Unknown formats, and widths or precisions above `u16::MAX`, fall back
    /// to the default rendering.
    #[must_use]
    pub fn render(&self, format: Option<&str>) -> String {
        match (self, format) {
            (Self::Integer(i), Some(spec)) => render_integer(*i, spec),
            (Self::Unsigned(u), Some(spec)) => render_integer(*u, spec),
            (Self::Float(v), Some(spec)) => render_float(*v, spec),
            _ => self.to_string(),
        }
    }
}

fn render_integer<I>(value: I, spec: &str) -> String
where
    I: Display + fmt::LowerHex + fmt::UpperHex + fmt::Octal + fmt::Binary,
{
    match spec {
        "x" => format!("{value:x}"),
        "X" => format!("{value:X}"),
        "o" => format!("{value:o}"),
        "b" => format!("{value:b}"),
        _ => match spec.strip_prefix('0').and_then(|w| w.parse::<u16>().ok()) {
            Some(width) => format!("{value:0width$}", width = usize::from(width)),
            None => value.to_string(),
        },
    }
}

fn render_float(value: f64, spec: &str) -> String {
    match spec {
        "e" => format!("{value:e}"),
        "E" => format!("{value:E}"),
        _ => match spec.strip_prefix('.').and_then(|p| p.parse::<u16>().ok()) {
            Some(precision) => format!("{value:.precision$}", precision = usize::from(precision)),
            None => value.to_string(),
        },
    }
}

impl Display for PrefValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Unsigned(u) => write!(f, "{u}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Char(c) => write!(f, "{c}"),
            Self::Text(s) => f.write_str(s),
            Self::Custom(custom) => write!(f, "{}", custom.data),
        }
    }
}

/// Failure to turn a boxed value into a declared type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// The boxed kind can never become the declared kind
    #[error("cannot cast {actual} to {expected}")]
    Casting {
        expected: ValueKind,
        actual: ValueKind,
    },

    /// The kinds are compatible but this particular value is not
    #[error("cannot convert {value:?} to {expected}: {reason}")]
    Converting {
        expected: ValueKind,
        value: String,
        reason: String,
    },
}

impl ConversionError {
    /// Create a casting error
    #[inline]
    #[must_use]
    pub fn casting(expected: ValueKind, actual: &PrefValue) -> Self {
        Self::Casting {
            expected,
            actual: actual.kind(),
        }
    }

    /// Create a converting error
    #[inline]
    #[must_use]
    pub fn converting(expected: ValueKind, value: &PrefValue, reason: impl Display) -> Self {
        Self::Converting {
            expected,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// A Rust type usable as a preference value
///
/// Implemented for `bool`, `char`, `String`, `f32`, `f64` and the signed and
/// unsigned integers up to 64 bits. Custom types implement it with
/// [`ValueKind::Custom`] and move through [`encode_custom`]/[`decode_custom`].
///
/// # Contract
/// - `from_boxed(x.to_boxed()) == Ok(x)`
/// - `from_boxed` never coerces silently across incompatible kinds: it
///   returns [`ConversionError::Casting`] instead
/// - `to_boxed` is infallible; a custom payload that fails to serialize is
///   boxed as `null` by [`encode_custom`]
pub trait PreferenceValue: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// Declared kind
    fn kind() -> ValueKind;

    /// Box this value
    fn to_boxed(&self) -> PrefValue;

    /// Unbox a value of this type
    ///
    /// # Errors
    /// Returns [`ConversionError`] when the boxed value cannot become `Self`
    fn from_boxed(value: PrefValue) -> Result<Self, ConversionError>;

    /// Render as text
    ///
    /// Default delegates to [`PrefValue::render`].
    fn render(&self, format: Option<&str>) -> String {
        self.to_boxed().render(format)
    }
}

/// Box a custom value under `tag`
///
/// Serialization failures of the payload render as `null`.
#[must_use]
pub fn encode_custom<T: Serialize>(tag: &'static str, value: &T) -> PrefValue {
    let custom = CustomValue::encode(tag, value).unwrap_or_else(|e| {
        tracing::debug!("Encoding custom value '{}' failed, boxing null: {}", tag, e);
        CustomValue::new(tag, JsonValue::Null)
    });
    PrefValue::Custom(custom)
}

/// Unbox a custom value expected under `tag`
///
/// A custom value with another tag is a casting error. A built-in scalar is
/// decoded from its JSON form, so a string may stand in for a string-encoded
/// custom type.
///
/// # Errors
/// Returns [`ConversionError`] when the payload does not decode into `T`
pub fn decode_custom<T: DeserializeOwned>(
    tag: &'static str,
    value: PrefValue,
) -> Result<T, ConversionError> {
    let expected = ValueKind::Custom(tag);
    let data = match &value {
        PrefValue::Custom(custom) if custom.tag == tag => custom.data.clone(),
        PrefValue::Custom(_) => return Err(ConversionError::casting(expected, &value)),
        _ => value.to_json(),
    };
    serde_json::from_value(data).map_err(|e| ConversionError::converting(expected, &value, e))
}

/// Widen any numeric or textual value to `i128`
#[allow(clippy::cast_possible_truncation)]
fn integral(expected: ValueKind, value: &PrefValue) -> Result<i128, ConversionError> {
    match value {
        PrefValue::Integer(i) => Ok(i128::from(*i)),
        PrefValue::Unsigned(u) => Ok(i128::from(*u)),
        PrefValue::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 1.0e38 {
                Ok(*f as i128)
            } else {
                Err(ConversionError::converting(expected, value, "not a whole number"))
            }
        }
        PrefValue::Text(s) => s
            .trim()
            .parse::<i128>()
            .map_err(|e| ConversionError::converting(expected, value, e)),
        PrefValue::Bool(_) | PrefValue::Char(_) | PrefValue::Custom(_) => {
            Err(ConversionError::casting(expected, value))
        }
    }
}

/// Widen any numeric or textual value to `f64`
#[allow(clippy::cast_precision_loss)]
fn floating(expected: ValueKind, value: &PrefValue) -> Result<f64, ConversionError> {
    match value {
        PrefValue::Float(f) => Ok(*f),
        PrefValue::Integer(i) => Ok(*i as f64),
        PrefValue::Unsigned(u) => Ok(*u as f64),
        PrefValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| ConversionError::converting(expected, value, e)),
        PrefValue::Bool(_) | PrefValue::Char(_) | PrefValue::Custom(_) => {
            Err(ConversionError::casting(expected, value))
        }
    }
}

macro_rules! integer_value {
    ($kind:ident, $variant:ident, $wide:ty, $($ty:ty),+) => {$(
        impl PreferenceValue for $ty {
            #[inline]
            fn kind() -> ValueKind {
                ValueKind::$kind
            }

            #[inline]
            fn to_boxed(&self) -> PrefValue {
                PrefValue::$variant(<$wide>::from(*self))
            }

            fn from_boxed(value: PrefValue) -> Result<Self, ConversionError> {
                let wide = integral(Self::kind(), &value)?;
                <$ty>::try_from(wide).map_err(|_| {
                    ConversionError::converting(Self::kind(), &value, "out of range")
                })
            }
        }
    )+};
}

integer_value!(Integer, Integer, i64, i8, i16, i32, i64);
integer_value!(Unsigned, Unsigned, u64, u8, u16, u32, u64);

impl PreferenceValue for f64 {
    #[inline]
    fn kind() -> ValueKind {
        ValueKind::Float
    }

    #[inline]
    fn to_boxed(&self) -> PrefValue {
        PrefValue::Float(*self)
    }

    fn from_boxed(value: PrefValue) -> Result<Self, ConversionError> {
        floating(Self::kind(), &value)
    }
}

impl PreferenceValue for f32 {
    #[inline]
    fn kind() -> ValueKind {
        ValueKind::Float
    }

    #[inline]
    fn to_boxed(&self) -> PrefValue {
        PrefValue::Float(f64::from(*self))
    }

    fn from_boxed(value: PrefValue) -> Result<Self, ConversionError> {
        let wide = floating(Self::kind(), &value)?;
        #[allow(clippy::cast_possible_truncation)]
        let narrow = wide as f32;
        if wide.is_finite() && !narrow.is_finite() {
            return Err(ConversionError::converting(Self::kind(), &value, "out of range"));
        }
        Ok(narrow)
    }
}

impl PreferenceValue for bool {
    #[inline]
    fn kind() -> ValueKind {
        ValueKind::Bool
    }

    #[inline]
    fn to_boxed(&self) -> PrefValue {
        PrefValue::Bool(*self)
    }

    fn from_boxed(value: PrefValue) -> Result<Self, ConversionError> {
        match &value {
            PrefValue::Bool(b) => Ok(*b),
            PrefValue::Text(s) => s
                .trim()
                .parse::<bool>()
                .map_err(|e| ConversionError::converting(Self::kind(), &value, e)),
            _ => Err(ConversionError::casting(Self::kind(), &value)),
        }
    }
}

impl PreferenceValue for char {
    #[inline]
    fn kind() -> ValueKind {
        ValueKind::Char
    }

    #[inline]
    fn to_boxed(&self) -> PrefValue {
        PrefValue::Char(*self)
    }

    fn from_boxed(value: PrefValue) -> Result<Self, ConversionError> {
        match &value {
            PrefValue::Char(c) => Ok(*c),
            PrefValue::Text(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(ConversionError::converting(
                        Self::kind(),
                        &value,
                        "expected exactly one character",
                    )),
                }
            }
            _ => Err(ConversionError::casting(Self::kind(), &value)),
        }
    }
}

impl PreferenceValue for String {
    #[inline]
    fn kind() -> ValueKind {
        ValueKind::Text
    }

    #[inline]
    fn to_boxed(&self) -> PrefValue {
        PrefValue::Text(self.clone())
    }

    fn from_boxed(value: PrefValue) -> Result<Self, ConversionError> {
        match value {
            PrefValue::Text(s) => Ok(s),
            custom @ PrefValue::Custom(_) => Err(ConversionError::casting(Self::kind(), &custom)),
            scalar => Ok(scalar.to_string()),
        }
    }
}
