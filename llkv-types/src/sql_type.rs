//! Semantic SQL types as reported by the target engine.
//!
//! A [`SqlType`] pairs a coarse [`TypeFamily`] (the semantic category used by
//! the function filter) with the engine's [`TypeOid`] (the identifier used as
//! the key of the operator and function catalogs). Several OIDs can share one
//! family: `INT2`, `INT4` and `INT8` are all [`TypeFamily::Int`].

use std::fmt;

use llkv_result::{Error, Result};

/// Semantic category of a SQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeFamily {
    Bool,
    Int,
    Float,
    Decimal,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Interval,
    String,
    Bytes,
    Uuid,
    INet,
    Jsonb,
    Oid,
    Array,
    Tuple,
    /// Placeholder for argument-dependent return types.
    Any,
    Unknown,
}

/// PostgreSQL-compatible type OID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeOid(pub u32);

impl fmt::Display for TypeOid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A concrete SQL type: semantic family, OID and canonical display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SqlType {
    pub family: TypeFamily,
    pub oid: TypeOid,
    pub name: &'static str,
}

impl SqlType {
    const fn new(family: TypeFamily, oid: u32, name: &'static str) -> Self {
        Self {
            family,
            oid: TypeOid(oid),
            name,
        }
    }

    pub const BOOL: SqlType = SqlType::new(TypeFamily::Bool, 16, "BOOL");
    pub const BYTES: SqlType = SqlType::new(TypeFamily::Bytes, 17, "BYTES");
    pub const NAME: SqlType = SqlType::new(TypeFamily::String, 19, "NAME");
    pub const INT: SqlType = SqlType::new(TypeFamily::Int, 20, "INT8");
    pub const INT2: SqlType = SqlType::new(TypeFamily::Int, 21, "INT2");
    pub const INT4: SqlType = SqlType::new(TypeFamily::Int, 23, "INT4");
    pub const STRING: SqlType = SqlType::new(TypeFamily::String, 25, "STRING");
    pub const OID: SqlType = SqlType::new(TypeFamily::Oid, 26, "OID");
    pub const FLOAT4: SqlType = SqlType::new(TypeFamily::Float, 700, "FLOAT4");
    pub const FLOAT: SqlType = SqlType::new(TypeFamily::Float, 701, "FLOAT8");
    pub const UNKNOWN: SqlType = SqlType::new(TypeFamily::Unknown, 705, "UNKNOWN");
    pub const INET: SqlType = SqlType::new(TypeFamily::INet, 869, "INET");
    pub const CHAR: SqlType = SqlType::new(TypeFamily::String, 1042, "CHAR");
    pub const VARCHAR: SqlType = SqlType::new(TypeFamily::String, 1043, "VARCHAR");
    pub const DATE: SqlType = SqlType::new(TypeFamily::Date, 1082, "DATE");
    pub const TIME: SqlType = SqlType::new(TypeFamily::Time, 1083, "TIME");
    pub const TIMESTAMP: SqlType = SqlType::new(TypeFamily::Timestamp, 1114, "TIMESTAMP");
    pub const TIMESTAMPTZ: SqlType = SqlType::new(TypeFamily::TimestampTz, 1184, "TIMESTAMPTZ");
    pub const INTERVAL: SqlType = SqlType::new(TypeFamily::Interval, 1186, "INTERVAL");
    pub const DECIMAL: SqlType = SqlType::new(TypeFamily::Decimal, 1700, "DECIMAL");
    pub const TUPLE: SqlType = SqlType::new(TypeFamily::Tuple, 2249, "RECORD");
    pub const ANY: SqlType = SqlType::new(TypeFamily::Any, 2276, "ANY");
    pub const UUID: SqlType = SqlType::new(TypeFamily::Uuid, 2950, "UUID");
    pub const JSONB: SqlType = SqlType::new(TypeFamily::Jsonb, 3802, "JSONB");

    pub const BOOL_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 1000, "BOOL[]");
    pub const BYTES_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 1001, "BYTES[]");
    pub const INT2_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 1005, "INT2[]");
    pub const INT4_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 1007, "INT4[]");
    pub const STRING_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 1009, "STRING[]");
    pub const VARCHAR_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 1015, "VARCHAR[]");
    pub const INT_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 1016, "INT8[]");
    pub const FLOAT4_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 1021, "FLOAT4[]");
    pub const FLOAT_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 1022, "FLOAT8[]");
    pub const OID_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 1028, "OID[]");
    pub const INET_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 1041, "INET[]");
    pub const TIMESTAMP_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 1115, "TIMESTAMP[]");
    pub const DATE_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 1182, "DATE[]");
    pub const TIME_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 1183, "TIME[]");
    pub const TIMESTAMPTZ_ARRAY: SqlType =
        SqlType::new(TypeFamily::Array, 1185, "TIMESTAMPTZ[]");
    pub const INTERVAL_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 1187, "INTERVAL[]");
    pub const DECIMAL_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 1231, "DECIMAL[]");
    pub const UUID_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 2951, "UUID[]");
    pub const JSONB_ARRAY: SqlType = SqlType::new(TypeFamily::Array, 3807, "JSONB[]");

    /// Whether this is an array type.
    #[inline]
    pub fn is_array(&self) -> bool {
        self.family == TypeFamily::Array
    }

    /// The array type whose elements are `self`, if the engine has one.
    pub fn array_type(&self) -> Option<SqlType> {
        let array = match self.oid.0 {
            16 => Self::BOOL_ARRAY,
            17 => Self::BYTES_ARRAY,
            20 => Self::INT_ARRAY,
            21 => Self::INT2_ARRAY,
            23 => Self::INT4_ARRAY,
            19 | 25 | 1042 => Self::STRING_ARRAY,
            26 => Self::OID_ARRAY,
            700 => Self::FLOAT4_ARRAY,
            701 => Self::FLOAT_ARRAY,
            869 => Self::INET_ARRAY,
            1043 => Self::VARCHAR_ARRAY,
            1082 => Self::DATE_ARRAY,
            1083 => Self::TIME_ARRAY,
            1114 => Self::TIMESTAMP_ARRAY,
            1184 => Self::TIMESTAMPTZ_ARRAY,
            1186 => Self::INTERVAL_ARRAY,
            1700 => Self::DECIMAL_ARRAY,
            2950 => Self::UUID_ARRAY,
            3802 => Self::JSONB_ARRAY,
            _ => return None,
        };
        Some(array)
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Every non-array type a generated expression may produce.
///
/// Function overloads whose fixed return type falls outside these families
/// are excluded from the function catalog.
pub const ANY_NON_ARRAY: &[SqlType] = &[
    SqlType::BOOL,
    SqlType::INT,
    SqlType::FLOAT,
    SqlType::DECIMAL,
    SqlType::DATE,
    SqlType::TIMESTAMP,
    SqlType::INTERVAL,
    SqlType::STRING,
    SqlType::BYTES,
    SqlType::TIMESTAMPTZ,
    SqlType::OID,
    SqlType::UUID,
    SqlType::INET,
    SqlType::TIME,
    SqlType::JSONB,
];

/// Whether `family` is one of the [`ANY_NON_ARRAY`] families.
pub fn is_non_array_family(family: TypeFamily) -> bool {
    ANY_NON_ARRAY.iter().any(|ty| ty.family == family)
}

/// Resolve an introspected type name such as `INT8`, `text` or
/// `VARCHAR(10)[]` to its [`SqlType`].
///
/// Lookup is case-insensitive and ignores width/precision modifiers. A
/// trailing `[]` resolves to the array of the element type.
///
/// # Errors
///
/// Returns [`Error::UnknownTypeName`] when the name is not in the lookup
/// table. That indicates the introspection query and this table disagree.
pub fn type_from_name(name: &str) -> Result<SqlType> {
    let trimmed = name.trim();
    if let Some(element) = trimmed.strip_suffix("[]") {
        return type_from_name(element)?
            .array_type()
            .ok_or_else(|| Error::UnknownTypeName(name.to_string()));
    }

    let normalized = strip_type_modifiers(trimmed).to_ascii_lowercase();
    let ty = match normalized.as_str() {
        "bool" | "boolean" => SqlType::BOOL,
        "int2" | "smallint" => SqlType::INT2,
        "int4" | "integer" => SqlType::INT4,
        "int" | "int8" | "int64" | "bigint" => SqlType::INT,
        "float4" | "real" => SqlType::FLOAT4,
        "float" | "float8" | "double precision" => SqlType::FLOAT,
        "decimal" | "numeric" | "dec" => SqlType::DECIMAL,
        "date" => SqlType::DATE,
        "time" | "time without time zone" => SqlType::TIME,
        "timestamp" | "timestamp without time zone" => SqlType::TIMESTAMP,
        "timestamptz" | "timestamp with time zone" => SqlType::TIMESTAMPTZ,
        "interval" => SqlType::INTERVAL,
        "string" | "text" => SqlType::STRING,
        "varchar" | "character varying" => SqlType::VARCHAR,
        "char" | "character" | "bpchar" => SqlType::CHAR,
        "name" => SqlType::NAME,
        "bytes" | "bytea" | "blob" => SqlType::BYTES,
        "uuid" => SqlType::UUID,
        "inet" => SqlType::INET,
        "json" | "jsonb" => SqlType::JSONB,
        "oid" => SqlType::OID,
        _ => return Err(Error::UnknownTypeName(name.to_string())),
    };
    Ok(ty)
}

/// Drop parenthesized modifiers and collapse whitespace:
/// `TIMESTAMP(6) WITH TIME ZONE` becomes `TIMESTAMP WITH TIME ZONE`.
fn strip_type_modifiers(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    for ch in name.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_cockroach_and_postgres_spellings() {
        assert_eq!(type_from_name("INT8").unwrap(), SqlType::INT);
        assert_eq!(type_from_name("bigint").unwrap(), SqlType::INT);
        assert_eq!(type_from_name("int4").unwrap(), SqlType::INT4);
        assert_eq!(type_from_name("STRING").unwrap(), SqlType::STRING);
        assert_eq!(type_from_name("text").unwrap(), SqlType::STRING);
        assert_eq!(type_from_name("bytea").unwrap(), SqlType::BYTES);
        assert_eq!(type_from_name("bool").unwrap(), SqlType::BOOL);
    }

    #[test]
    fn ignores_width_and_precision_modifiers() {
        assert_eq!(type_from_name("VARCHAR(10)").unwrap(), SqlType::VARCHAR);
        assert_eq!(type_from_name("DECIMAL(10,2)").unwrap(), SqlType::DECIMAL);
        assert_eq!(
            type_from_name("TIMESTAMP(6) WITH TIME ZONE").unwrap(),
            SqlType::TIMESTAMPTZ
        );
    }

    #[test]
    fn resolves_array_suffix() {
        let ty = type_from_name("STRING[]").unwrap();
        assert_eq!(ty, SqlType::STRING_ARRAY);
        assert!(ty.is_array());
        assert_eq!(type_from_name("int8[]").unwrap(), SqlType::INT_ARRAY);
    }

    #[test]
    fn unknown_name_fails_fast() {
        let err = type_from_name("GEOGRAPHY").unwrap_err();
        assert!(matches!(err, Error::UnknownTypeName(name) if name == "GEOGRAPHY"));
        assert!(matches!(
            type_from_name("JSONB[][]"),
            Err(Error::UnknownTypeName(_))
        ));
    }

    #[test]
    fn integer_widths_share_a_family() {
        assert_eq!(SqlType::INT2.family, SqlType::INT.family);
        assert_ne!(SqlType::INT2.oid, SqlType::INT.oid);
        assert!(is_non_array_family(SqlType::INT4.family));
        assert!(!is_non_array_family(SqlType::INT_ARRAY.family));
        assert!(!is_non_array_family(SqlType::ANY.family));
    }
}
