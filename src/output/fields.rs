//! Field allow-list and the flattened record shape every format renders from.

use crate::error::FieldError;
use crate::model::Vulnerability;
use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Fields shown when `--fields` is not given.
pub const DEFAULT_FIELDS: &str = "package_type,package_slug,title,vuln_type,fixed_in";

/// Placeholder for a missing timestamp (and any other empty table cell).
pub const UNKNOWN: &str = "UNKNOWN";

/// Placeholder for a vulnerability with no released fix.
pub const NOT_FIXED: &str = "NOT FIXED YET";

const DATE_FORMAT: &str = "%d %B %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    PackageSlug,
    PackageType,
    PackageVersion,
    Id,
    Title,
    CreatedAt,
    UpdatedAt,
    PublishedDate,
    VulnType,
    FixedIn,
}

impl Field {
    pub const COUNT: usize = 10;

    /// Every allow-listed field, in record order.
    pub const ALL: [Field; Field::COUNT] = [
        Field::PackageSlug,
        Field::PackageType,
        Field::PackageVersion,
        Field::Id,
        Field::Title,
        Field::CreatedAt,
        Field::UpdatedAt,
        Field::PublishedDate,
        Field::VulnType,
        Field::FixedIn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::PackageSlug => "package_slug",
            Field::PackageType => "package_type",
            Field::PackageVersion => "package_version",
            Field::Id => "id",
            Field::Title => "title",
            Field::CreatedAt => "created_at",
            Field::UpdatedAt => "updated_at",
            Field::PublishedDate => "published_date",
            Field::VulnType => "vuln_type",
            Field::FixedIn => "fixed_in",
        }
    }

    pub fn parse(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.as_str() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, ordered selection of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet(Vec<Field>);

impl FieldSet {
    /// Parses a comma separated field list.
    ///
    /// Every unknown name is collected so the error can report all of them at once.
    pub fn parse(list: &str) -> Result<Self, FieldError> {
        let names: Vec<&str> = list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();

        if names.is_empty() {
            return Err(FieldError::Empty);
        }

        let mut fields = Vec::with_capacity(names.len());
        let mut invalid = Vec::new();

        for name in names {
            match Field::parse(name) {
                Some(field) => fields.push(field),
                None => invalid.push(name.to_string()),
            }
        }

        if !invalid.is_empty() {
            return Err(FieldError::Invalid(invalid));
        }

        Ok(Self(fields))
    }

    pub fn as_slice(&self) -> &[Field] {
        &self.0
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(Field::as_str).collect()
    }
}

impl Default for FieldSet {
    fn default() -> Self {
        Self(vec![
            Field::PackageType,
            Field::PackageSlug,
            Field::Title,
            Field::VulnType,
            Field::FixedIn,
        ])
    }
}

/// One cell of a flattened record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Timestamp(DateTime<Utc>),
    Null,
}

impl Value {
    /// Plain-text form used by the table and CSV renderers.
    pub fn to_cell(&self) -> String {
        match self {
            Value::Text(text) => text.clone(),
            Value::Int(n) => n.to_string(),
            Value::Timestamp(at) => at.timestamp().to_string(),
            Value::Null => String::new(),
        }
    }

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(text) => serializer.serialize_str(text),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Timestamp(at) => serializer.serialize_i64(at.timestamp()),
            Value::Null => serializer.serialize_none(),
        }
    }
}

/// A vulnerability flattened into exactly the allow-listed keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Record([Value; Field::COUNT]);

impl Record {
    pub fn flatten(vulnerability: &Vulnerability) -> Self {
        Self(Field::ALL.map(|field| extract(vulnerability, field)))
    }

    pub fn get(&self, field: Field) -> &Value {
        &self.0[field.index()]
    }

    /// Human form: calendar dates and placeholders, so every cell has text.
    pub fn for_table(self) -> Self {
        self.map_values(|field, value| match (field, value) {
            (_, Value::Timestamp(at)) => Value::Text(at.format(DATE_FORMAT).to_string()),
            (Field::FixedIn, Value::Null) => Value::text(NOT_FIXED),
            (_, Value::Null) => Value::text(UNKNOWN),
            (_, value) => value,
        })
    }

    /// Machine form: timestamps as Unix epoch seconds, absent values left null.
    pub fn for_machine(self) -> Self {
        self.map_values(|_, value| match value {
            Value::Timestamp(at) => Value::Int(at.timestamp()),
            value => value,
        })
    }

    /// Restricts the record to `fields`, in the order given.
    pub fn project<'a>(&'a self, fields: &'a FieldSet) -> Projection<'a> {
        Projection {
            record: self,
            fields,
        }
    }

    fn map_values<F>(self, mut f: F) -> Self
    where
        F: FnMut(Field, Value) -> Value,
    {
        let mut values = self.0;
        for field in Field::ALL {
            let value = std::mem::replace(&mut values[field.index()], Value::Null);
            values[field.index()] = f(field, value);
        }
        Self(values)
    }
}

fn extract(vulnerability: &Vulnerability, field: Field) -> Value {
    let package = &vulnerability.package;
    let optional_text = |value: &Option<String>| match value {
        Some(text) => Value::Text(text.clone()),
        None => Value::Null,
    };
    let optional_time = |value: &Option<DateTime<Utc>>| match value {
        Some(at) => Value::Timestamp(*at),
        None => Value::Null,
    };

    match field {
        Field::PackageSlug => Value::Text(package.slug.clone()),
        Field::PackageType => Value::text(package.package_type.as_str()),
        Field::PackageVersion => optional_text(&package.version),
        Field::Id => match vulnerability.id {
            Some(id) => Value::Int(id as i64),
            None => Value::Null,
        },
        Field::Title => Value::Text(vulnerability.title.clone()),
        Field::CreatedAt => optional_time(&vulnerability.created_at),
        Field::UpdatedAt => optional_time(&vulnerability.updated_at),
        Field::PublishedDate => optional_time(&vulnerability.published_date),
        Field::VulnType => Value::Text(vulnerability.vuln_type.clone()),
        Field::FixedIn => optional_text(&vulnerability.fixed_in),
    }
}

/// Serializes as a map holding only the selected fields, in selection order.
pub struct Projection<'a> {
    record: &'a Record,
    fields: &'a FieldSet,
}

impl Serialize for Projection<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.fields.as_slice();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for field in fields {
            map.serialize_entry(field.as_str(), self.record.get(*field))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Package;
    use chrono::TimeZone;

    fn sample() -> Vulnerability {
        Vulnerability::new(8215, "Akismet XSS", Package::plugin("akismet").with_version("3.1.4"))
            .with_vuln_type("XSS")
            .with_created_at(Utc.with_ymd_and_hms(2024, 7, 4, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::parse(field.as_str()), Some(field));
        }
        assert_eq!(Field::parse("severity"), None);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let fields = FieldSet::parse(" id , title,fixed_in ").unwrap();
        assert_eq!(fields.names(), vec!["id", "title", "fixed_in"]);
    }

    #[test]
    fn test_parse_reports_every_invalid_field() {
        let err = FieldSet::parse("foo,id,bar").unwrap_err();
        assert_eq!(err, FieldError::Invalid(vec!["foo".to_string(), "bar".to_string()]));
        assert_eq!(err.to_string(), "foo, bar are not valid fields");
    }

    #[test]
    fn test_parse_single_invalid_field() {
        let err = FieldSet::parse("severity").unwrap_err();
        assert_eq!(err.to_string(), "severity is not a valid field");
    }

    #[test]
    fn test_parse_empty_list() {
        assert_eq!(FieldSet::parse(" , "), Err(FieldError::Empty));
    }

    #[test]
    fn test_default_fields_match_constant() {
        assert_eq!(FieldSet::default(), FieldSet::parse(DEFAULT_FIELDS).unwrap());
    }

    #[test]
    fn test_flatten_injects_package_fields() {
        let record = Record::flatten(&sample());
        assert_eq!(record.get(Field::PackageSlug), &Value::Text("akismet".into()));
        assert_eq!(record.get(Field::PackageType), &Value::Text("plugin".into()));
        assert_eq!(record.get(Field::PackageVersion), &Value::Text("3.1.4".into()));
        assert_eq!(record.get(Field::Id), &Value::Int(8215));
    }

    #[test]
    fn test_for_table_fills_placeholders() {
        let record = Record::flatten(&sample()).for_table();
        assert_eq!(record.get(Field::CreatedAt), &Value::Text("04 July 2024".into()));
        assert_eq!(record.get(Field::UpdatedAt), &Value::Text(UNKNOWN.into()));
        assert_eq!(record.get(Field::FixedIn), &Value::Text(NOT_FIXED.into()));
    }

    #[test]
    fn test_every_timestamp_has_both_forms() {
        let day = |d| Utc.with_ymd_and_hms(2024, 7, d, 12, 0, 0).unwrap();
        let vuln = Vulnerability {
            updated_at: Some(day(5)),
            published_date: Some(day(1)),
            ..sample()
        };

        let table = Record::flatten(&vuln).for_table();
        assert_eq!(table.get(Field::CreatedAt), &Value::Text("04 July 2024".into()));
        assert_eq!(table.get(Field::UpdatedAt), &Value::Text("05 July 2024".into()));
        assert_eq!(table.get(Field::PublishedDate), &Value::Text("01 July 2024".into()));

        let machine = Record::flatten(&vuln).for_machine();
        assert_eq!(machine.get(Field::CreatedAt), &Value::Int(1_720_094_400));
        assert_eq!(machine.get(Field::UpdatedAt), &Value::Int(1_720_180_800));
        assert_eq!(machine.get(Field::PublishedDate), &Value::Int(1_719_835_200));
    }

    #[test]
    fn test_for_machine_uses_epoch_and_null() {
        let record = Record::flatten(&sample()).for_machine();
        assert_eq!(record.get(Field::CreatedAt), &Value::Int(1_720_094_400));
        assert_eq!(record.get(Field::UpdatedAt), &Value::Null);
        assert_eq!(record.get(Field::FixedIn), &Value::Null);
    }
}
