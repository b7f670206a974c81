//! Function definition registry.

use std::fmt;

use crate::sql_type::SqlType;

/// Category of definitions that are partially implemented compatibility shims.
pub const CATEGORY_COMPATIBILITY: &str = "Compatibility";

/// How a callable is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunctionClass {
    /// Scalar function, one output per input row.
    Normal,
    Aggregate,
    Window,
    /// Set-returning function.
    Generator,
}

impl fmt::Display for FunctionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FunctionClass::Normal => "normal",
            FunctionClass::Aggregate => "aggregate",
            FunctionClass::Window => "window",
            FunctionClass::Generator => "generator",
        };
        f.write_str(name)
    }
}

/// Return type of an overload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnType {
    Fixed(SqlType),
    /// Same type as the argument at this position; only known once the
    /// arguments are typed.
    SameAsArg(usize),
}

/// One concrete signature of a named callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Overload {
    pub args: &'static [SqlType],
    pub return_type: ReturnType,
    /// User-facing documentation for this overload.
    pub info: &'static str,
}

impl Overload {
    /// The return type when it does not depend on the arguments, otherwise
    /// [`SqlType::ANY`].
    pub fn fixed_return_type(&self) -> SqlType {
        match self.return_type {
            ReturnType::Fixed(ty) => ty,
            ReturnType::SameAsArg(_) => SqlType::ANY,
        }
    }
}

/// A named callable with all of its overloads.
#[derive(Debug, Clone, Copy)]
pub struct FunctionDefinition {
    pub name: &'static str,
    pub category: &'static str,
    pub class: FunctionClass,
    /// Private definitions are internal to the engine and never generated.
    pub private: bool,
    pub overloads: &'static [Overload],
}

/// Every function definition the engine exposes, in registration order.
pub fn function_definitions() -> &'static [FunctionDefinition] {
    FUNCTION_DEFINITIONS
}

// Registry entries are written as struct literals so the nested slices live
// in static memory.
macro_rules! overload {
    ([$($arg:expr),*] -> same_as_arg($idx:expr), $info:expr $(,)?) => {
        Overload {
            args: &[$($arg),*],
            return_type: ReturnType::SameAsArg($idx),
            info: $info,
        }
    };
    ([$($arg:expr),*] -> $ret:expr, $info:expr $(,)?) => {
        Overload {
            args: &[$($arg),*],
            return_type: ReturnType::Fixed($ret),
            info: $info,
        }
    };
}

macro_rules! public {
    ($name:expr, $category:expr, $class:expr, [$($overload:expr),* $(,)?] $(,)?) => {
        FunctionDefinition {
            name: $name,
            category: $category,
            class: $class,
            private: false,
            overloads: &[$($overload),*],
        }
    };
}

use FunctionClass::{Aggregate, Generator, Normal, Window};
use crate::sql_type::SqlType as T;

const MATH: &str = "Math and Numeric";
const STRING: &str = "String and Byte";
const DATETIME: &str = "Date and Time";
const ID: &str = "ID Generation";
const JSON: &str = "JSONB";
const ARRAY: &str = "Array";
const SYSTEM: &str = "System info";

static FUNCTION_DEFINITIONS: &[FunctionDefinition] = &[
    public!(
        "abs",
        MATH,
        Normal,
        [
            overload!([T::INT] -> T::INT, "Calculates the absolute value of `val`."),
            overload!([T::FLOAT] -> T::FLOAT, "Calculates the absolute value of `val`."),
            overload!([T::DECIMAL] -> T::DECIMAL, "Calculates the absolute value of `val`."),
        ],
    ),
    public!(
        "sqrt",
        MATH,
        Normal,
        [
            overload!([T::FLOAT] -> T::FLOAT, "Calculates the square root of `val`."),
            overload!([T::DECIMAL] -> T::DECIMAL, "Calculates the square root of `val`."),
        ],
    ),
    public!(
        "greatest",
        MATH,
        Normal,
        [overload!([T::ANY, T::ANY] -> same_as_arg(0), "Returns the element with the greatest value.",
        )],
    ),
    public!(
        "length",
        STRING,
        Normal,
        [
            overload!([T::STRING] -> T::INT, "Calculates the number of characters in `val`."),
            overload!([T::BYTES] -> T::INT, "Calculates the number of bytes in `val`."),
        ],
    ),
    public!(
        "lower",
        STRING,
        Normal,
        [overload!([T::STRING] -> T::STRING, "Converts all characters in `val` to lower case.")],
    ),
    public!(
        "upper",
        STRING,
        Normal,
        [overload!([T::STRING] -> T::STRING, "Converts all characters in `val` to upper case.")],
    ),
    public!(
        "substring",
        STRING,
        Normal,
        [
            overload!([T::STRING, T::INT] -> T::STRING, "Returns a substring of `input` starting at `start_pos`."),
            overload!([T::STRING, T::INT, T::INT] -> T::STRING,
                "Returns a substring of `input` starting at `start_pos` of length `length`.",
            ),
        ],
    ),
    public!(
        "to_hex",
        STRING,
        Normal,
        [
            overload!([T::INT] -> T::STRING, "Converts `val` to its hexadecimal representation."),
            overload!([T::BYTES] -> T::STRING, "Converts `val` to its hexadecimal representation."),
        ],
    ),
    public!(
        "string_to_array",
        ARRAY,
        Normal,
        [overload!([T::STRING, T::STRING] -> T::STRING_ARRAY,
            "Split a string into an array on `delimiter`.",
        )],
    ),
    public!(
        "array_length",
        ARRAY,
        Normal,
        [overload!([T::STRING_ARRAY, T::INT] -> T::INT,
            "Calculates the length of `input` on the provided `array_dimension`.",
        )],
    ),
    public!(
        "now",
        DATETIME,
        Normal,
        [overload!([] -> T::TIMESTAMPTZ, "Returns the time of the current transaction.")],
    ),
    public!(
        "date_trunc",
        DATETIME,
        Normal,
        [
            overload!([T::STRING, T::TIMESTAMP] -> T::TIMESTAMP, "Truncates `input` to precision `element`."),
            overload!([T::STRING, T::TIMESTAMPTZ] -> T::TIMESTAMPTZ, "Truncates `input` to precision `element`."),
        ],
    ),
    public!(
        "extract",
        DATETIME,
        Normal,
        [overload!([T::STRING, T::TIMESTAMP] -> T::FLOAT, "Extracts `element` from `input`.")],
    ),
    public!(
        "to_timestamp",
        DATETIME,
        Normal,
        [
            overload!([T::FLOAT] -> T::TIMESTAMPTZ, "Converts Unix epoch seconds to a timestamp."),
            overload!([T::STRING] -> T::TIMESTAMPTZ,
                "Not usable; parses `input` with a fixed layout that rejects most strings.",
            ),
        ],
    ),
    public!(
        "gen_random_uuid",
        ID,
        Normal,
        [overload!([] -> T::UUID, "Generates a random UUID and returns it as a value of UUID type.")],
    ),
    public!(
        "jsonb_typeof",
        JSON,
        Normal,
        [overload!([T::JSONB] -> T::STRING, "Returns the type of the outermost JSON value as a text string.")],
    ),
    public!(
        "pg_sleep",
        SYSTEM,
        Normal,
        [overload!([T::FLOAT] -> T::BOOL, "Makes the current session's process sleep until `seconds` have elapsed.")],
    ),
    public!(
        "crdb_internal.force_error",
        SYSTEM,
        Normal,
        [overload!([T::STRING, T::STRING] -> T::INT, "This function is used only by CockroachDB's developers for testing purposes.")],
    ),
    public!(
        "crdb_internal.force_retry",
        SYSTEM,
        Normal,
        [overload!([T::INTERVAL] -> T::INT, "This function is used only by CockroachDB's developers for testing purposes.")],
    ),
    FunctionDefinition {
        name: "crdb_internal.cluster_setting_encoded_default",
        category: SYSTEM,
        class: Normal,
        private: true,
        overloads: &[overload!([T::STRING] -> T::STRING, "Returns the encoded default value of the given cluster setting.")],
    },
    public!(
        "pg_get_userbyid",
        CATEGORY_COMPATIBILITY,
        Normal,
        [overload!([T::OID] -> T::STRING, "Returns the role name with the given OID.")],
    ),
    public!(
        "has_table_privilege",
        CATEGORY_COMPATIBILITY,
        Normal,
        [overload!([T::STRING, T::STRING] -> T::BOOL, "Returns whether the current user has privileges for the table.")],
    ),
    public!(
        "format_type",
        CATEGORY_COMPATIBILITY,
        Normal,
        [overload!([T::OID, T::INT] -> T::STRING, "Returns the SQL name of a data type.")],
    ),
    public!(
        "count",
        "",
        Aggregate,
        [overload!([T::ANY] -> T::INT, "Calculates the number of selected elements.")],
    ),
    public!(
        "count_rows",
        "",
        Aggregate,
        [overload!([] -> T::INT, "Calculates the number of rows.")],
    ),
    public!(
        "sum",
        "",
        Aggregate,
        [
            overload!([T::INT] -> T::DECIMAL, "Calculates the sum of the selected values."),
            overload!([T::FLOAT] -> T::FLOAT, "Calculates the sum of the selected values."),
            overload!([T::DECIMAL] -> T::DECIMAL, "Calculates the sum of the selected values."),
            overload!([T::INTERVAL] -> T::INTERVAL, "Calculates the sum of the selected values."),
        ],
    ),
    public!(
        "avg",
        "",
        Aggregate,
        [
            overload!([T::INT] -> T::DECIMAL, "Calculates the average of the selected values."),
            overload!([T::FLOAT] -> T::FLOAT, "Calculates the average of the selected values."),
            overload!([T::DECIMAL] -> T::DECIMAL, "Calculates the average of the selected values."),
        ],
    ),
    public!(
        "max",
        "",
        Aggregate,
        [
            overload!([T::INT] -> T::INT, "Identifies the maximum selected value."),
            overload!([T::FLOAT] -> T::FLOAT, "Identifies the maximum selected value."),
            overload!([T::DECIMAL] -> T::DECIMAL, "Identifies the maximum selected value."),
            overload!([T::STRING] -> T::STRING, "Identifies the maximum selected value."),
            overload!([T::DATE] -> T::DATE, "Identifies the maximum selected value."),
            overload!([T::TIMESTAMP] -> T::TIMESTAMP, "Identifies the maximum selected value."),
        ],
    ),
    public!(
        "min",
        "",
        Aggregate,
        [
            overload!([T::INT] -> T::INT, "Identifies the minimum selected value."),
            overload!([T::FLOAT] -> T::FLOAT, "Identifies the minimum selected value."),
            overload!([T::DECIMAL] -> T::DECIMAL, "Identifies the minimum selected value."),
            overload!([T::STRING] -> T::STRING, "Identifies the minimum selected value."),
            overload!([T::DATE] -> T::DATE, "Identifies the minimum selected value."),
            overload!([T::TIMESTAMP] -> T::TIMESTAMP, "Identifies the minimum selected value."),
        ],
    ),
    public!(
        "bool_and",
        "",
        Aggregate,
        [overload!([T::BOOL] -> T::BOOL, "Calculates the boolean value of `AND`ing all selected values.")],
    ),
    public!(
        "bool_or",
        "",
        Aggregate,
        [overload!([T::BOOL] -> T::BOOL, "Calculates the boolean value of `OR`ing all selected values.")],
    ),
    public!(
        "string_agg",
        "",
        Aggregate,
        [
            overload!([T::STRING, T::STRING] -> T::STRING, "Concatenates all selected values using the provided delimiter."),
            overload!([T::BYTES, T::BYTES] -> T::BYTES, "Concatenates all selected values using the provided delimiter."),
        ],
    ),
    public!(
        "array_agg",
        "",
        Aggregate,
        [
            overload!([T::INT] -> T::INT_ARRAY, "Aggregates the selected values into an array."),
            overload!([T::STRING] -> T::STRING_ARRAY, "Aggregates the selected values into an array."),
        ],
    ),
    public!(
        "row_number",
        "",
        Window,
        [overload!([] -> T::INT, "Calculates the number of the current row within its partition, counting from 1.")],
    ),
    public!(
        "rank",
        "",
        Window,
        [overload!([] -> T::INT, "Calculates the rank of the current row with gaps.")],
    ),
    public!(
        "dense_rank",
        "",
        Window,
        [overload!([] -> T::INT, "Calculates the rank of the current row without gaps.")],
    ),
    public!(
        "percent_rank",
        "",
        Window,
        [overload!([] -> T::FLOAT, "Calculates the relative rank of the current row: (rank - 1) / (total rows - 1).")],
    ),
    public!(
        "ntile",
        "",
        Window,
        [overload!([T::INT] -> T::INT, "Calculates an integer ranging from 1 to `n`, dividing the partition as equally as possible.")],
    ),
    public!(
        "first_value",
        "",
        Window,
        [overload!([T::ANY] -> same_as_arg(0), "Returns `val` evaluated at the row that is the first row of the window frame.")],
    ),
    public!(
        "generate_series",
        "Set-returning",
        Generator,
        [
            overload!([T::INT, T::INT] -> T::INT, "Produces a virtual table containing the integer values from `start` to `end`, inclusive."),
            overload!([T::INT, T::INT, T::INT] -> T::INT,
                "Produces a virtual table containing the integer values from `start` to `end`, inclusive, by increment of `step`.",
            ),
            overload!([T::TIMESTAMP, T::TIMESTAMP, T::INTERVAL] -> T::TIMESTAMP,
                "Produces a virtual table containing the timestamp values from `start` to `end`, inclusive, by increment of `step`.",
            ),
        ],
    ),
    public!(
        "unnest",
        "Set-returning",
        Generator,
        [overload!([T::ANY] -> same_as_arg(0), "Returns the input array as a set of rows.")],
    ),
];
