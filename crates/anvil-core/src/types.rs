// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core OPC UA data types.
//!
//! This module provides the value and identifier types that flow through
//! the server dispatch layer:
//!
//! - **NodeId**: all four OPC UA node identifier kinds with parsing and validation
//! - **Variant**: scalar and array values exchanged with clients
//! - **DataValue**: a variant together with status and timestamps
//! - **NumericRange**: index ranges for partial array reads and writes
//! - **LocalizedText**: locale-tagged display strings

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ParseError;
use crate::status::StatusCode;

// =============================================================================
// NodeId
// =============================================================================

/// OPC UA Node Identifier.
///
/// A NodeId uniquely identifies a node within an OPC UA server. It consists
/// of a namespace index and an identifier which can be numeric, string,
/// GUID, or opaque (byte string).
///
/// # Examples
///
/// ```
/// use anvil_core::NodeId;
///
/// let numeric = NodeId::numeric(2, 1001);
/// let string = NodeId::string(2, "Device.Temperature");
///
/// let parsed: NodeId = "ns=2;s=Device.Temperature".parse().unwrap();
/// assert_eq!(parsed, string);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    /// Namespace index (0 = OPC UA standard namespace).
    pub namespace_index: u16,

    /// The node identifier.
    pub identifier: NodeIdentifier,
}

impl NodeId {
    /// Creates a numeric node ID.
    #[inline]
    pub fn numeric(namespace_index: u16, value: u32) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Numeric(value),
        }
    }

    /// Creates a string node ID.
    #[inline]
    pub fn string(namespace_index: u16, value: impl Into<String>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::String(value.into()),
        }
    }

    /// Creates a GUID node ID.
    #[inline]
    pub fn guid(namespace_index: u16, value: Uuid) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Guid(value),
        }
    }

    /// Creates an opaque (byte string) node ID.
    #[inline]
    pub fn opaque(namespace_index: u16, value: Vec<u8>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Opaque(value),
        }
    }

    /// Returns the null node ID (ns=0, i=0).
    #[inline]
    pub const fn null() -> Self {
        Self {
            namespace_index: 0,
            identifier: NodeIdentifier::Numeric(0),
        }
    }

    /// Returns `true` if this is the null node ID (ns=0, i=0).
    #[inline]
    pub fn is_null(&self) -> bool {
        self.namespace_index == 0 && matches!(self.identifier, NodeIdentifier::Numeric(0))
    }

    /// Returns `true` if this is in the standard namespace (ns=0).
    #[inline]
    pub const fn is_standard(&self) -> bool {
        self.namespace_index == 0
    }

    /// Returns the numeric value if this is a numeric identifier.
    #[inline]
    pub fn as_numeric(&self) -> Option<u32> {
        match &self.identifier {
            NodeIdentifier::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string value if this is a string identifier.
    #[inline]
    pub fn as_string(&self) -> Option<&str> {
        match &self.identifier {
            NodeIdentifier::String(v) => Some(v),
            _ => None,
        }
    }

    /// Converts to the OPC UA string format.
    ///
    /// Format: `ns=<namespace>;{i|s|g|b}=<identifier>`; the `ns=` prefix is
    /// omitted for the standard namespace.
    pub fn to_opc_string(&self) -> String {
        if self.namespace_index == 0 {
            self.identifier.to_string()
        } else {
            format!("ns={};{}", self.namespace_index, self.identifier)
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_opc_string())
    }
}

impl FromStr for NodeId {
    type Err = ParseError;

    /// Parses a NodeId from OPC UA string format.
    ///
    /// Supported formats:
    /// - `ns=2;i=1001` (numeric)
    /// - `ns=2;s=MyNode` (string)
    /// - `ns=2;g=550e8400-e29b-41d4-a716-446655440000` (GUID)
    /// - `ns=2;b=SGVsbG8=` (opaque, base64 encoded)
    /// - `i=1001`, `s=MyNode`, ... (namespace 0)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (namespace_index, identifier_part) = match s.strip_prefix("ns=") {
            Some(rest) => {
                let (ns_str, identifier_part) = rest
                    .split_once(';')
                    .ok_or_else(|| ParseError::invalid_node_id(s, "Missing identifier after namespace"))?;
                let ns: u16 = ns_str
                    .parse()
                    .map_err(|_| ParseError::invalid_node_id(s, "Invalid namespace index"))?;
                (ns, identifier_part)
            }
            None => (0, s),
        };

        let identifier = if let Some(id) = identifier_part.strip_prefix("i=") {
            let value: u32 = id
                .parse()
                .map_err(|_| ParseError::invalid_node_id(s, "Invalid numeric identifier"))?;
            NodeIdentifier::Numeric(value)
        } else if let Some(id) = identifier_part.strip_prefix("s=") {
            NodeIdentifier::String(id.to_string())
        } else if let Some(id) = identifier_part.strip_prefix("g=") {
            let uuid = Uuid::parse_str(id)
                .map_err(|e| ParseError::invalid_node_id(s, format!("Invalid GUID: {}", e)))?;
            NodeIdentifier::Guid(uuid)
        } else if let Some(id) = identifier_part.strip_prefix("b=") {
            let bytes = BASE64
                .decode(id)
                .map_err(|e| ParseError::invalid_node_id(s, format!("Invalid base64: {}", e)))?;
            NodeIdentifier::Opaque(bytes)
        } else {
            return Err(ParseError::invalid_node_id(
                s,
                "Unknown identifier type. Expected i=, s=, g=, or b=",
            ));
        };

        Ok(Self {
            namespace_index,
            identifier,
        })
    }
}

// =============================================================================
// NodeIdentifier
// =============================================================================

/// OPC UA node identifier kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum NodeIdentifier {
    /// Numeric identifier (most efficient, used for standard nodes).
    Numeric(u32),

    /// String identifier (human-readable, used for custom nodes).
    String(String),

    /// GUID identifier (globally unique).
    Guid(Uuid),

    /// Opaque identifier (application-specific byte array).
    Opaque(Vec<u8>),
}

impl fmt::Display for NodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "i={}", v),
            Self::String(v) => write!(f, "s={}", v),
            Self::Guid(v) => write!(f, "g={}", v),
            Self::Opaque(v) => write!(f, "b={}", BASE64.encode(v)),
        }
    }
}

// =============================================================================
// LocalizedText
// =============================================================================

/// A locale-tagged text value, used for display names and descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct LocalizedText {
    /// Locale tag, e.g. `en-US`. Absent when no locale applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// The text itself.
    pub text: String,
}

impl LocalizedText {
    /// Creates a text value with a locale.
    pub fn new(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locale: Some(locale.into()),
            text: text.into(),
        }
    }

    /// Creates a text value without a locale.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            locale: None,
            text: text.into(),
        }
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

// =============================================================================
// Variant
// =============================================================================

/// An OPC UA value.
///
/// This enum covers the scalar types exchanged over attribute and method
/// services, plus homogeneous arrays of them.
///
/// # Examples
///
/// ```
/// use anvil_core::Variant;
///
/// let temp = Variant::Double(25.5);
/// assert_eq!(temp.as_f64(), Some(25.5));
///
/// let status = Variant::Bool(true);
/// assert_eq!(status.as_bool(), Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Variant {
    /// Boolean value
    Bool(bool),

    /// Signed 8-bit integer
    SByte(i8),

    /// Unsigned 8-bit integer
    Byte(u8),

    /// Signed 16-bit integer
    Int16(i16),

    /// Unsigned 16-bit integer
    UInt16(u16),

    /// Signed 32-bit integer
    Int32(i32),

    /// Unsigned 32-bit integer
    UInt32(u32),

    /// Signed 64-bit integer
    Int64(i64),

    /// Unsigned 64-bit integer
    UInt64(u64),

    /// 32-bit floating point
    Float(f32),

    /// 64-bit floating point
    Double(f64),

    /// UTF-8 string
    String(String),

    /// Raw bytes
    ByteString(Vec<u8>),

    /// Node identifier
    NodeId(NodeId),

    /// Locale-tagged text
    LocalizedText(LocalizedText),

    /// Homogeneous array of variants
    Array(Vec<Variant>),
}

impl Variant {
    /// Returns the value as a boolean, if it is one.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Variant::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as an `i64` if it is any signed or unsigned
    /// integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Variant::SByte(v) => Some(*v as i64),
            Variant::Byte(v) => Some(*v as i64),
            Variant::Int16(v) => Some(*v as i64),
            Variant::UInt16(v) => Some(*v as i64),
            Variant::Int32(v) => Some(*v as i64),
            Variant::UInt32(v) => Some(*v as i64),
            Variant::Int64(v) => Some(*v),
            Variant::UInt64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Returns the value as an `f64` if it is a floating point number.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Variant::Float(v) => Some(*v as f64),
            Variant::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a string slice, if it is a string.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the contained array, if this is an array variant.
    #[inline]
    pub fn as_array(&self) -> Option<&[Variant]> {
        match self {
            Variant::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the OPC UA type name of this value.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Variant::Bool(_) => "Boolean",
            Variant::SByte(_) => "SByte",
            Variant::Byte(_) => "Byte",
            Variant::Int16(_) => "Int16",
            Variant::UInt16(_) => "UInt16",
            Variant::Int32(_) => "Int32",
            Variant::UInt32(_) => "UInt32",
            Variant::Int64(_) => "Int64",
            Variant::UInt64(_) => "UInt64",
            Variant::Float(_) => "Float",
            Variant::Double(_) => "Double",
            Variant::String(_) => "String",
            Variant::ByteString(_) => "ByteString",
            Variant::NodeId(_) => "NodeId",
            Variant::LocalizedText(_) => "LocalizedText",
            Variant::Array(_) => "Array",
        }
    }
}

// =============================================================================
// DataValue
// =============================================================================

/// A value together with its quality and timestamps.
///
/// This is the unit read from and written to variable nodes. The status
/// code qualifies the value; timestamps record when the value was produced
/// at its source and when the server observed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DataValue {
    /// The value itself, absent when only a status is reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Variant>,

    /// Status qualifying the value.
    pub status: StatusCode,

    /// Timestamp assigned by the data source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_timestamp: Option<DateTime<Utc>>,

    /// Timestamp assigned by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_timestamp: Option<DateTime<Utc>>,
}

impl DataValue {
    /// Creates a good-quality value stamped with the current server time.
    pub fn good(value: Variant) -> Self {
        Self {
            value: Some(value),
            status: StatusCode::GOOD,
            source_timestamp: None,
            server_timestamp: Some(Utc::now()),
        }
    }

    /// Creates a value-less result carrying only a status.
    pub fn bad(status: StatusCode) -> Self {
        Self {
            value: None,
            status,
            source_timestamp: None,
            server_timestamp: Some(Utc::now()),
        }
    }

    /// Sets the source timestamp.
    pub fn with_source_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.source_timestamp = Some(timestamp);
        self
    }

    /// Returns `true` if the status severity is good.
    #[inline]
    pub fn is_good(&self) -> bool {
        self.status.is_good()
    }
}

// =============================================================================
// NumericRange
// =============================================================================

/// An OPC UA numeric range, selecting a sub-range of an array value.
///
/// The textual form is a comma-separated list of dimensions, each either a
/// single index (`5`) or an inclusive range (`1:3`).
///
/// # Examples
///
/// ```
/// use anvil_core::NumericRange;
///
/// let range = NumericRange::parse("1:2,0:3").unwrap();
/// assert_eq!(range.dimensions().len(), 2);
/// assert_eq!(range.to_string(), "1:2,0:3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NumericRange {
    dimensions: Vec<(u32, u32)>,
}

impl NumericRange {
    /// Creates a single-dimension range selecting one index.
    pub fn index(index: u32) -> Self {
        Self {
            dimensions: vec![(index, index)],
        }
    }

    /// Creates a single-dimension inclusive range.
    ///
    /// # Errors
    ///
    /// Fails when `min > max`.
    pub fn bounds(min: u32, max: u32) -> Result<Self, ParseError> {
        if min > max {
            return Err(ParseError::invalid_numeric_range(
                format!("{}:{}", min, max),
                "Range bounds must be ascending",
            ));
        }
        Ok(Self {
            dimensions: vec![(min, max)],
        })
    }

    /// Parses a numeric range from its textual form.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseError::invalid_numeric_range(s, "Range must not be empty"));
        }

        let mut dimensions = Vec::new();
        for part in s.split(',') {
            let (min, max) = match part.split_once(':') {
                Some((min_str, max_str)) => {
                    let min: u32 = min_str.parse().map_err(|_| {
                        ParseError::invalid_numeric_range(s, "Invalid lower bound")
                    })?;
                    let max: u32 = max_str.parse().map_err(|_| {
                        ParseError::invalid_numeric_range(s, "Invalid upper bound")
                    })?;
                    if min > max {
                        return Err(ParseError::invalid_numeric_range(
                            s,
                            "Range bounds must be ascending",
                        ));
                    }
                    (min, max)
                }
                None => {
                    let index: u32 = part
                        .parse()
                        .map_err(|_| ParseError::invalid_numeric_range(s, "Invalid index"))?;
                    (index, index)
                }
            };
            dimensions.push((min, max));
        }

        Ok(Self { dimensions })
    }

    /// Returns the `(min, max)` bounds per dimension.
    pub fn dimensions(&self) -> &[(u32, u32)] {
        &self.dimensions
    }
}

impl fmt::Display for NumericRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (min, max)) in self.dimensions.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            if min == max {
                write!(f, "{}", min)?;
            } else {
                write!(f, "{}:{}", min, max)?;
            }
        }
        Ok(())
    }
}

impl FromStr for NumericRange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_constructors() {
        let node = NodeId::numeric(2, 1001);
        assert_eq!(node.namespace_index, 2);
        assert_eq!(node.as_numeric(), Some(1001));
        assert!(!node.is_null());

        let node = NodeId::string(3, "Device.Pressure");
        assert_eq!(node.as_string(), Some("Device.Pressure"));
        assert_eq!(node.as_numeric(), None);
    }

    #[test]
    fn test_node_id_null_sentinel() {
        assert!(NodeId::null().is_null());
        assert!(NodeId::default().is_null());
        assert!(!NodeId::numeric(0, 1).is_null());
        assert!(!NodeId::numeric(1, 0).is_null());
        assert_ne!(NodeId::null(), NodeId::numeric(2, 7));
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId::numeric(0, 84).to_string(), "i=84");
        assert_eq!(NodeId::numeric(2, 1001).to_string(), "ns=2;i=1001");
        assert_eq!(NodeId::string(2, "A.B").to_string(), "ns=2;s=A.B");
        assert_eq!(
            NodeId::opaque(1, b"Hello".to_vec()).to_string(),
            "ns=1;b=SGVsbG8="
        );
    }

    #[test]
    fn test_node_id_parse_round_trip() {
        let ids = [
            NodeId::numeric(0, 84),
            NodeId::numeric(2, 1001),
            NodeId::string(2, "Device.Temperature"),
            NodeId::guid(4, Uuid::from_u128(0x550e8400_e29b_41d4_a716_446655440000)),
            NodeId::opaque(1, vec![1, 2, 3, 4]),
        ];
        for id in ids {
            let parsed: NodeId = id.to_string().parse().unwrap();
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn test_node_id_parse_errors() {
        assert!("ns=2".parse::<NodeId>().is_err());
        assert!("ns=abc;i=1".parse::<NodeId>().is_err());
        assert!("x=5".parse::<NodeId>().is_err());
        assert!("i=notanumber".parse::<NodeId>().is_err());
        assert!("g=not-a-guid".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_variant_accessors() {
        assert_eq!(Variant::Bool(true).as_bool(), Some(true));
        assert_eq!(Variant::Int32(-5).as_i64(), Some(-5));
        assert_eq!(Variant::UInt64(7).as_i64(), Some(7));
        assert_eq!(Variant::UInt64(u64::MAX).as_i64(), None);
        assert_eq!(Variant::Float(1.5).as_f64(), Some(1.5));
        assert_eq!(Variant::String("x".into()).as_str(), Some("x"));
        assert_eq!(Variant::Double(1.0).as_bool(), None);

        let array = Variant::Array(vec![Variant::Byte(1), Variant::Byte(2)]);
        assert_eq!(array.as_array().unwrap().len(), 2);
        assert_eq!(array.type_name(), "Array");
    }

    #[test]
    fn test_data_value() {
        let value = DataValue::good(Variant::Double(21.5));
        assert!(value.is_good());
        assert!(value.server_timestamp.is_some());
        assert!(value.source_timestamp.is_none());

        let stamped = value.with_source_timestamp(Utc::now());
        assert!(stamped.source_timestamp.is_some());

        let bad = DataValue::bad(StatusCode::BAD_NOT_READABLE);
        assert!(!bad.is_good());
        assert!(bad.value.is_none());
    }

    #[test]
    fn test_numeric_range_parse() {
        let range = NumericRange::parse("5").unwrap();
        assert_eq!(range.dimensions(), &[(5, 5)]);

        let range = NumericRange::parse("1:2,0:3").unwrap();
        assert_eq!(range.dimensions(), &[(1, 2), (0, 3)]);
        assert_eq!(range.to_string(), "1:2,0:3");

        assert!(NumericRange::parse("").is_err());
        assert!(NumericRange::parse("3:1").is_err());
        assert!(NumericRange::parse("a:b").is_err());
        assert!(NumericRange::bounds(4, 2).is_err());
        assert_eq!(NumericRange::index(9).to_string(), "9");
    }

    #[test]
    fn test_localized_text() {
        let text = LocalizedText::new("en-US", "Temperature");
        assert_eq!(text.locale.as_deref(), Some("en-US"));
        assert_eq!(text.to_string(), "Temperature");

        let plain = LocalizedText::plain("Druck");
        assert_eq!(plain.locale, None);
    }
}
