//! Binary operator registry.

use std::fmt;

use crate::sql_type::SqlType;

/// Infix operator symbols understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BinaryOperator {
    Bitand,
    Bitor,
    Bitxor,
    Plus,
    Minus,
    Mult,
    Div,
    FloorDiv,
    Mod,
    Pow,
    Concat,
    LShift,
    RShift,
    JsonFetchVal,
    JsonFetchText,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Bitand => "&",
            BinaryOperator::Bitor => "|",
            BinaryOperator::Bitxor => "#",
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Mult => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::FloorDiv => "//",
            BinaryOperator::Mod => "%",
            BinaryOperator::Pow => "^",
            BinaryOperator::Concat => "||",
            BinaryOperator::LShift => "<<",
            BinaryOperator::RShift => ">>",
            BinaryOperator::JsonFetchVal => "->",
            BinaryOperator::JsonFetchText => "->>",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One concrete signature of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinaryOverload {
    pub left: SqlType,
    pub right: SqlType,
    pub return_type: SqlType,
}

const fn binop(left: SqlType, right: SqlType, return_type: SqlType) -> BinaryOverload {
    BinaryOverload {
        left,
        right,
        return_type,
    }
}

/// An operator symbol together with all of its overloads.
#[derive(Debug, Clone, Copy)]
pub struct BinaryOperatorDef {
    pub operator: BinaryOperator,
    pub overloads: &'static [BinaryOverload],
}

/// Every binary operator overload the engine exposes.
pub fn binary_operators() -> &'static [BinaryOperatorDef] {
    BINARY_OPERATORS
}

use crate::sql_type::SqlType as T;

static BINARY_OPERATORS: &[BinaryOperatorDef] = &[
    BinaryOperatorDef {
        operator: BinaryOperator::Bitand,
        overloads: &[
            binop(T::INT, T::INT, T::INT),
            binop(T::INET, T::INET, T::INET),
        ],
    },
    BinaryOperatorDef {
        operator: BinaryOperator::Bitor,
        overloads: &[
            binop(T::INT, T::INT, T::INT),
            binop(T::INET, T::INET, T::INET),
        ],
    },
    BinaryOperatorDef {
        operator: BinaryOperator::Bitxor,
        overloads: &[binop(T::INT, T::INT, T::INT)],
    },
    BinaryOperatorDef {
        operator: BinaryOperator::Plus,
        overloads: &[
            binop(T::INT, T::INT, T::INT),
            binop(T::FLOAT, T::FLOAT, T::FLOAT),
            binop(T::DECIMAL, T::DECIMAL, T::DECIMAL),
            binop(T::DECIMAL, T::INT, T::DECIMAL),
            binop(T::INT, T::DECIMAL, T::DECIMAL),
            binop(T::DATE, T::INT, T::DATE),
            binop(T::INT, T::DATE, T::DATE),
            binop(T::DATE, T::TIME, T::TIMESTAMP),
            binop(T::DATE, T::INTERVAL, T::TIMESTAMP),
            binop(T::TIME, T::INTERVAL, T::TIME),
            binop(T::TIMESTAMP, T::INTERVAL, T::TIMESTAMP),
            binop(T::TIMESTAMPTZ, T::INTERVAL, T::TIMESTAMPTZ),
            binop(T::INTERVAL, T::INTERVAL, T::INTERVAL),
            binop(T::INET, T::INT, T::INET),
        ],
    },
    BinaryOperatorDef {
        operator: BinaryOperator::Minus,
        overloads: &[
            binop(T::INT, T::INT, T::INT),
            binop(T::FLOAT, T::FLOAT, T::FLOAT),
            binop(T::DECIMAL, T::DECIMAL, T::DECIMAL),
            binop(T::DATE, T::INT, T::DATE),
            binop(T::DATE, T::DATE, T::INT),
            binop(T::TIMESTAMP, T::TIMESTAMP, T::INTERVAL),
            binop(T::TIMESTAMPTZ, T::TIMESTAMPTZ, T::INTERVAL),
            binop(T::TIMESTAMP, T::INTERVAL, T::TIMESTAMP),
            binop(T::INTERVAL, T::INTERVAL, T::INTERVAL),
            binop(T::JSONB, T::STRING, T::JSONB),
            binop(T::INET, T::INET, T::INT),
        ],
    },
    BinaryOperatorDef {
        operator: BinaryOperator::Mult,
        overloads: &[
            binop(T::INT, T::INT, T::INT),
            binop(T::FLOAT, T::FLOAT, T::FLOAT),
            binop(T::DECIMAL, T::DECIMAL, T::DECIMAL),
            binop(T::INT, T::INTERVAL, T::INTERVAL),
            binop(T::INTERVAL, T::INT, T::INTERVAL),
            binop(T::INTERVAL, T::FLOAT, T::INTERVAL),
        ],
    },
    BinaryOperatorDef {
        operator: BinaryOperator::Div,
        overloads: &[
            binop(T::INT, T::INT, T::DECIMAL),
            binop(T::FLOAT, T::FLOAT, T::FLOAT),
            binop(T::DECIMAL, T::DECIMAL, T::DECIMAL),
            binop(T::INTERVAL, T::INT, T::INTERVAL),
        ],
    },
    BinaryOperatorDef {
        operator: BinaryOperator::FloorDiv,
        overloads: &[
            binop(T::INT, T::INT, T::INT),
            binop(T::FLOAT, T::FLOAT, T::FLOAT),
            binop(T::DECIMAL, T::DECIMAL, T::DECIMAL),
        ],
    },
    BinaryOperatorDef {
        operator: BinaryOperator::Mod,
        overloads: &[
            binop(T::INT, T::INT, T::INT),
            binop(T::FLOAT, T::FLOAT, T::FLOAT),
            binop(T::DECIMAL, T::DECIMAL, T::DECIMAL),
        ],
    },
    BinaryOperatorDef {
        operator: BinaryOperator::Pow,
        overloads: &[
            binop(T::INT, T::INT, T::INT),
            binop(T::FLOAT, T::FLOAT, T::FLOAT),
            binop(T::DECIMAL, T::DECIMAL, T::DECIMAL),
        ],
    },
    BinaryOperatorDef {
        operator: BinaryOperator::Concat,
        overloads: &[
            binop(T::STRING, T::STRING, T::STRING),
            binop(T::BYTES, T::BYTES, T::BYTES),
            binop(T::JSONB, T::JSONB, T::JSONB),
            binop(T::INT_ARRAY, T::INT, T::INT_ARRAY),
            binop(T::STRING_ARRAY, T::STRING_ARRAY, T::STRING_ARRAY),
        ],
    },
    BinaryOperatorDef {
        operator: BinaryOperator::LShift,
        overloads: &[
            binop(T::INT, T::INT, T::INT),
            binop(T::INET, T::INET, T::BOOL),
        ],
    },
    BinaryOperatorDef {
        operator: BinaryOperator::RShift,
        overloads: &[
            binop(T::INT, T::INT, T::INT),
            binop(T::INET, T::INET, T::BOOL),
        ],
    },
    BinaryOperatorDef {
        operator: BinaryOperator::JsonFetchVal,
        overloads: &[
            binop(T::JSONB, T::STRING, T::JSONB),
            binop(T::JSONB, T::INT, T::JSONB),
        ],
    },
    BinaryOperatorDef {
        operator: BinaryOperator::JsonFetchText,
        overloads: &[
            binop(T::JSONB, T::STRING, T::STRING),
            binop(T::JSONB, T::INT, T::STRING),
        ],
    },
];
