//! JSON-Cadence values exchanged with the access node.
//!
//! Every value is `{"type": .., "value": ..}`. Integers and fixed-point
//! numbers travel as strings, composites as `{"id", "fields"}`.

use crate::error::GatewayError;
use crate::utils::units::{format_ufix64, parse_ufix64};
use serde_json::{json, Value};

const INTEGER_TYPES: [&str; 22] = [
    "Int", "Int8", "Int16", "Int32", "Int64", "Int128", "Int256", "UInt", "UInt8", "UInt16",
    "UInt32", "UInt64", "UInt128", "UInt256", "Word8", "Word16", "Word32", "Word64", "Word128",
    "Word256", "Fix64", "UFix64",
];
const COMPOSITE_TYPES: [&str; 5] = ["Struct", "Resource", "Event", "Contract", "Enum"];

#[derive(Debug, Clone, PartialEq)]
pub enum CadenceValue {
    Void,
    Optional(Option<Box<CadenceValue>>),
    Bool(bool),
    String(String),
    Address(String),
    /// Any integer or fixed-point number, kept in its textual form.
    Number { kind: String, value: String },
    Array(Vec<CadenceValue>),
    Dictionary(Vec<(CadenceValue, CadenceValue)>),
    Composite {
        kind: String,
        id: String,
        fields: Vec<(String, CadenceValue)>,
    },
}

impl CadenceValue {
    pub fn address(address: &str) -> Self {
        let address = if address.starts_with("0x") {
            address.to_string()
        } else {
            format!("0x{}", address)
        };
        Self::Address(address)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn uint32(value: u32) -> Self {
        Self::Number {
            kind: "UInt32".to_string(),
            value: value.to_string(),
        }
    }

    pub fn ufix64(units: u64) -> Self {
        Self::Number {
            kind: "UFix64".to_string(),
            value: format_ufix64(units),
        }
    }

    pub fn optional(value: Option<CadenceValue>) -> Self {
        Self::Optional(value.map(Box::new))
    }

    pub fn from_json(json: &Value) -> Result<Self, GatewayError> {
        let kind = json["type"]
            .as_str()
            .ok_or_else(|| unexpected("value without a type", json))?;
        let value = &json["value"];

        match kind {
            "Void" => Ok(Self::Void),
            "Optional" => {
                if value.is_null() {
                    Ok(Self::Optional(None))
                } else {
                    Ok(Self::Optional(Some(Box::new(Self::from_json(value)?))))
                }
            }
            "Bool" => value
                .as_bool()
                .map(Self::Bool)
                .ok_or_else(|| unexpected("Bool", json)),
            "String" | "Character" => value
                .as_str()
                .map(|s| Self::String(s.to_string()))
                .ok_or_else(|| unexpected("String", json)),
            "Address" => value
                .as_str()
                .map(|s| Self::Address(s.to_string()))
                .ok_or_else(|| unexpected("Address", json)),
            kind if INTEGER_TYPES.contains(&kind) => value
                .as_str()
                .map(|s| Self::Number {
                    kind: kind.to_string(),
                    value: s.to_string(),
                })
                .ok_or_else(|| unexpected(kind, json)),
            "Array" => value
                .as_array()
                .ok_or_else(|| unexpected("Array", json))?
                .iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Array),
            "Dictionary" => value
                .as_array()
                .ok_or_else(|| unexpected("Dictionary", json))?
                .iter()
                .map(|entry| {
                    Ok((
                        Self::from_json(&entry["key"])?,
                        Self::from_json(&entry["value"])?,
                    ))
                })
                .collect::<Result<Vec<_>, GatewayError>>()
                .map(Self::Dictionary),
            kind if COMPOSITE_TYPES.contains(&kind) => {
                let id = value["id"]
                    .as_str()
                    .ok_or_else(|| unexpected("composite without id", json))?;
                let fields = value["fields"]
                    .as_array()
                    .ok_or_else(|| unexpected("composite without fields", json))?
                    .iter()
                    .map(|field| {
                        let name = field["name"]
                            .as_str()
                            .ok_or_else(|| unexpected("field without name", field))?;
                        Ok((name.to_string(), Self::from_json(&field["value"])?))
                    })
                    .collect::<Result<Vec<_>, GatewayError>>()?;
                Ok(Self::Composite {
                    kind: kind.to_string(),
                    id: id.to_string(),
                    fields,
                })
            }
            other => Err(unexpected(&format!("unsupported type {}", other), json)),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Void => json!({ "type": "Void" }),
            Self::Optional(inner) => json!({
                "type": "Optional",
                "value": inner.as_ref().map(|v| v.to_json()),
            }),
            Self::Bool(b) => json!({ "type": "Bool", "value": b }),
            Self::String(s) => json!({ "type": "String", "value": s }),
            Self::Address(a) => json!({ "type": "Address", "value": a }),
            Self::Number { kind, value } => json!({ "type": kind, "value": value }),
            Self::Array(items) => json!({
                "type": "Array",
                "value": items.iter().map(|v| v.to_json()).collect::<Vec<_>>(),
            }),
            Self::Dictionary(entries) => json!({
                "type": "Dictionary",
                "value": entries
                    .iter()
                    .map(|(k, v)| json!({ "key": k.to_json(), "value": v.to_json() }))
                    .collect::<Vec<_>>(),
            }),
            Self::Composite { kind, id, fields } => json!({
                "type": kind,
                "value": {
                    "id": id,
                    "fields": fields
                        .iter()
                        .map(|(name, v)| json!({ "name": name, "value": v.to_json() }))
                        .collect::<Vec<_>>(),
                },
            }),
        }
    }

    /// Looks through any `Optional` wrappers; `None` for an empty optional.
    pub fn unwrap_optional(&self) -> Option<&CadenceValue> {
        match self {
            Self::Optional(Some(inner)) => inner.unwrap_optional(),
            Self::Optional(None) => None,
            other => Some(other),
        }
    }

    pub fn as_bool(&self) -> Result<bool, GatewayError> {
        match self.unwrap_optional() {
            Some(Self::Bool(b)) => Ok(*b),
            _ => Err(self.mismatch("Bool")),
        }
    }

    pub fn as_str(&self) -> Result<&str, GatewayError> {
        match self.unwrap_optional() {
            Some(Self::String(s)) | Some(Self::Address(s)) => Ok(s.as_str()),
            _ => Err(self.mismatch("String")),
        }
    }

    pub fn as_array(&self) -> Result<&[CadenceValue], GatewayError> {
        match self.unwrap_optional() {
            Some(Self::Array(items)) => Ok(items.as_slice()),
            _ => Err(self.mismatch("Array")),
        }
    }

    /// Integer value of any non-fractional number type.
    pub fn as_u64(&self) -> Result<u64, GatewayError> {
        match self.unwrap_optional() {
            Some(Self::Number { kind, value }) if !kind.ends_with("Fix64") => value
                .parse()
                .map_err(|_| self.mismatch("unsigned integer")),
            _ => Err(self.mismatch("unsigned integer")),
        }
    }

    /// Smallest-unit amount of a `UFix64`.
    pub fn as_ufix64_units(&self) -> Result<u64, GatewayError> {
        match self.unwrap_optional() {
            Some(Self::Number { kind, value }) if kind == "UFix64" => Ok(parse_ufix64(value)?),
            _ => Err(self.mismatch("UFix64")),
        }
    }

    pub fn field(&self, name: &str) -> Result<&CadenceValue, GatewayError> {
        match self.unwrap_optional() {
            Some(Self::Composite { fields, .. }) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value)
                .ok_or_else(|| GatewayError::UnexpectedValue(format!("missing field {}", name))),
            _ => Err(self.mismatch("Struct")),
        }
    }

    fn mismatch(&self, expected: &str) -> GatewayError {
        GatewayError::UnexpectedValue(format!("expected {}, got {:?}", expected, self))
    }
}

fn unexpected(what: &str, json: &Value) -> GatewayError {
    GatewayError::UnexpectedValue(format!("{}: {}", what, json))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_delegator_info() {
        let json = json!({
            "type": "Array",
            "value": [{
                "type": "Struct",
                "value": {
                    "id": "A.95e019a17d0e23d7.FlowIDTableStaking.DelegatorInfo",
                    "fields": [
                        { "name": "id", "value": { "type": "UInt32", "value": "7" } },
                        { "name": "nodeID", "value": { "type": "String", "value": "abc123" } },
                        {
                            "name": "tokensStaked",
                            "value": { "type": "UFix64", "value": "120.50000000" }
                        }
                    ]
                }
            }]
        });

        let value = CadenceValue::from_json(&json).unwrap();
        let infos = value.as_array().unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].field("id").unwrap().as_u64().unwrap(), 7);
        assert_eq!(infos[0].field("nodeID").unwrap().as_str().unwrap(), "abc123");
        assert_eq!(
            infos[0].field("tokensStaked").unwrap().as_ufix64_units().unwrap(),
            12_050_000_000
        );
        assert!(infos[0].field("missing").is_err());
    }

    #[test]
    fn test_optionals() {
        let none = CadenceValue::from_json(&json!({ "type": "Optional", "value": null })).unwrap();
        assert_eq!(none, CadenceValue::Optional(None));
        assert_eq!(none.unwrap_optional(), None);
        assert!(none.as_bool().is_err());

        let some = CadenceValue::from_json(&json!({
            "type": "Optional",
            "value": { "type": "Bool", "value": true }
        }))
        .unwrap();
        assert!(some.as_bool().unwrap());
    }

    #[test]
    fn test_encode_arguments() {
        assert_eq!(
            CadenceValue::address("f8d6e0586b0a20c7").to_json(),
            json!({ "type": "Address", "value": "0xf8d6e0586b0a20c7" })
        );
        assert_eq!(
            CadenceValue::optional(Some(CadenceValue::uint32(3))).to_json(),
            json!({ "type": "Optional", "value": { "type": "UInt32", "value": "3" } })
        );
        assert_eq!(
            CadenceValue::optional(None).to_json(),
            json!({ "type": "Optional", "value": null })
        );
        assert_eq!(
            CadenceValue::ufix64(5_000_000_000).to_json(),
            json!({ "type": "UFix64", "value": "50.00000000" })
        );
    }

    #[test]
    fn test_dictionary_and_composite_survive_encoding() {
        let value = CadenceValue::Dictionary(vec![(
            CadenceValue::string("node"),
            CadenceValue::Composite {
                kind: "Struct".to_string(),
                id: "A.1.C.S".to_string(),
                fields: vec![("x".to_string(), CadenceValue::Bool(false))],
            },
        )]);
        assert_eq!(CadenceValue::from_json(&value.to_json()).unwrap(), value);
    }

    #[test]
    fn test_type_mismatches() {
        let number = CadenceValue::ufix64(1);
        assert!(number.as_u64().is_err());
        assert!(number.as_str().is_err());
        assert!(CadenceValue::uint32(1).as_ufix64_units().is_err());
        assert!(CadenceValue::from_json(&json!({ "value": "x" })).is_err());
        assert!(CadenceValue::from_json(&json!({ "type": "Path", "value": {} })).is_err());
    }
}
