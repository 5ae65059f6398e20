//! Request parameters and their canonical encoding.
//!
//! The CMS API verifies signatures against the exact JSON text it receives, so
//! everything that ends up inside a signed value goes through [`encode_json`].

use std::io;

use cofecms_core::time::{format_date, DateTime};
use cofecms_core::{Error, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::ser::Formatter;
use serde_json::{Map, Value};

use super::constants::*;

/// Fields to return, per resource.
///
/// Resources and their field lists keep insertion order when encoded:
///
/// ```
/// use cofecms::Fields;
///
/// let fields = Fields::new().with("contact", ["forenames", "surname"]);
/// assert_eq!(
///     cofecms::encode_json(&fields).unwrap(),
///     r#"{"contact": ["forenames", "surname"]}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(Vec<(String, Vec<String>)>);

impl Fields {
    /// Create an empty field selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `fields` of `resource`, replacing an earlier selection of the same resource.
    pub fn with<I, S>(mut self, resource: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resource = resource.into();
        let fields = fields.into_iter().map(Into::into).collect();
        match self.0.iter_mut().find(|(r, _)| *r == resource) {
            Some((_, existing)) => *existing = fields,
            None => self.0.push((resource, fields)),
        }
        self
    }

    /// Check if no resource is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (resource, fields) in &self.0 {
            map.serialize_entry(resource, fields)?;
        }
        map.end()
    }
}

/// Value of a basic parameter before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Absent value, dropped during normalization.
    Null,
    /// Integer, sent as plain decimal.
    Int(u64),
    /// Text, sent verbatim.
    Text(String),
    /// Date time, only valid for `start_date` and `end_date`.
    DateTime(DateTime),
    /// Field selection, only valid for `fields`.
    Fields(Fields),
}

impl ParamValue {
    fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Null => "null",
            ParamValue::Int(_) => "integer",
            ParamValue::Text(_) => "text",
            ParamValue::DateTime(_) => "date time",
            ParamValue::Fields(_) => "fields",
        }
    }
}

impl From<u64> for ParamValue {
    fn from(v: u64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<DateTime> for ParamValue {
    fn from(v: DateTime) -> Self {
        ParamValue::DateTime(v)
    }
}

impl From<Fields> for ParamValue {
    fn from(v: Fields) -> Self {
        ParamValue::Fields(v)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ParamValue::Null, Into::into)
    }
}

/// Search criteria, sent inside the signed `data` parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams(Vec<(String, String)>);

impl SearchParams {
    /// Create empty search criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a criterion. Setting a key twice keeps its first position.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((key, value)),
        }
        self
    }

    /// Iterate criteria in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check if no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Basic parameters, sent as individual query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasicParams {
    /// Index of the first record to return.
    pub offset: Option<u64>,
    /// Number of records per page.
    pub limit: Option<u64>,
    /// Only records changed at or after this time.
    pub start_date: Option<DateTime>,
    /// Only records changed at or before this time.
    pub end_date: Option<DateTime>,
    /// Fields to return.
    pub fields: Option<Fields>,
    /// Any other parameter the endpoint accepts, in order.
    pub extra: Vec<(String, ParamValue)>,
}

impl BasicParams {
    /// Create empty basic params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set offset
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set limit
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set start_date
    pub fn with_start_date(mut self, start_date: DateTime) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Set end_date
    pub fn with_end_date(mut self, end_date: DateTime) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Set fields
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Append an extra parameter.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// The same params with offset and limit removed.
    pub fn without_paging(&self) -> Self {
        Self {
            offset: None,
            limit: None,
            ..self.clone()
        }
    }

    /// Flatten into `(key, value)` pairs: the named params first, then extras.
    pub fn to_pairs(&self) -> Vec<(String, ParamValue)> {
        let named = [
            (OFFSET, ParamValue::from(self.offset)),
            (LIMIT, ParamValue::from(self.limit)),
            (START_DATE, ParamValue::from(self.start_date)),
            (END_DATE, ParamValue::from(self.end_date)),
            (FIELDS, ParamValue::from(self.fields.clone())),
        ];

        named
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .chain(self.extra.iter().cloned())
            .collect()
    }
}

/// Everything a caller can pass to one API call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Per-call diocese, overrides the client default.
    pub diocese_id: Option<u64>,
    /// Search criteria.
    pub search: SearchParams,
    /// Basic params.
    pub params: BasicParams,
}

impl Query {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set diocese_id for this call.
    pub fn with_diocese_id(mut self, diocese_id: u64) -> Self {
        self.diocese_id = Some(diocese_id);
        self
    }

    /// Add a search criterion.
    pub fn with_search(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.search = self.search.with(key, value);
        self
    }

    /// Replace the basic params.
    pub fn with_params(mut self, params: BasicParams) -> Self {
        self.params = params;
        self
    }

    /// Set offset
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.params.offset = Some(offset);
        self
    }

    /// Set limit
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.params.limit = Some(limit);
        self
    }

    /// Set fields
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.params.fields = Some(fields);
        self
    }
}

/// Normalize basic params into the strings that are signed and sent.
///
/// - `Null` values are dropped, as is an empty field selection.
/// - `start_date` / `end_date` must be date times and are rendered with [`format_date`].
/// - `fields` must be a field selection and is rendered with [`encode_json`].
/// - Reserved (`api_id`, `data`, `sig`) and repeated keys are rejected.
pub fn prepare_basic_params(pairs: Vec<(String, ParamValue)>) -> Result<Vec<(String, String)>> {
    let mut prepared: Vec<(String, String)> = Vec::with_capacity(pairs.len());

    for (key, value) in pairs {
        if matches!(key.as_str(), API_ID | DATA | SIG) {
            return Err(Error::request_invalid(format!(
                "{key} is reserved and can't be used as a parameter"
            )));
        }

        let value = match (key.as_str(), value) {
            (_, ParamValue::Null) => continue,
            (START_DATE | END_DATE, ParamValue::DateTime(t)) => format_date(t),
            (FIELDS, ParamValue::Fields(f)) if f.is_empty() => continue,
            (FIELDS, ParamValue::Fields(f)) => encode_json(&f)?,
            (START_DATE | END_DATE | FIELDS, v) => {
                return Err(Error::request_invalid(format!(
                    "{key} doesn't accept a {} value",
                    v.type_name()
                )))
            }
            (_, v @ (ParamValue::DateTime(_) | ParamValue::Fields(_))) => {
                return Err(Error::request_invalid(format!(
                    "{key} doesn't accept a {} value",
                    v.type_name()
                )))
            }
            (_, ParamValue::Int(v)) => v.to_string(),
            (_, ParamValue::Text(v)) => v,
        };

        if prepared.iter().any(|(k, _)| *k == key) {
            return Err(Error::request_invalid(format!(
                "{key} is given more than once"
            )));
        }
        prepared.push((key, value));
    }

    Ok(prepared)
}

/// Build the search criteria object: the caller's criteria in order, `diocese_id` last.
pub fn prepare_search_params(search: &SearchParams, diocese_id: u64) -> Result<Map<String, Value>> {
    let mut prepared = Map::new();
    for (key, value) in search.iter() {
        if key == DIOCESE_ID {
            return Err(Error::request_invalid(
                "diocese_id must be set on the query or client, not as a search criterion",
            ));
        }
        prepared.insert(key.to_string(), Value::String(value.to_string()));
    }
    prepared.insert(DIOCESE_ID.to_string(), Value::from(diocese_id));

    Ok(prepared)
}

/// Encode `value` as the JSON text the CMS API expects.
///
/// Items are separated by `", "` and keys by `": "`, every character outside
/// printable ASCII is written as a `\uXXXX` escape.
///
/// ```
/// let data = serde_json::json!({"diocese_id": 123});
/// assert_eq!(cofecms::encode_json(&data).unwrap(), r#"{"diocese_id": 123}"#);
/// ```
pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, CmsFormatter);
    value
        .serialize(&mut ser)
        .map_err(|e| Error::request_invalid("failed to encode json").with_source(e))?;

    String::from_utf8(buf)
        .map_err(|e| Error::unexpected("encoded json is not utf-8").with_source(e))
}

struct CmsFormatter;

impl Formatter for CmsFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (idx, c) in fragment.char_indices() {
            if (' '..='~').contains(&c) {
                continue;
            }

            writer.write_all(fragment[start..idx].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = idx + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}
