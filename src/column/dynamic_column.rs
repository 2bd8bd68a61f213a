use std::net::Ipv6Addr;

use super::{BytesColumn, Column, ColumnType, StrColumn};

/// A column of any type.
#[derive(Clone, Debug)]
pub enum DynamicColumn {
    /// Boolean column.
    Bool(Column<bool>),
    /// Signed integer column.
    I64(Column<i64>),
    /// Unsigned integer column.
    U64(Column<u64>),
    /// Floating point column.
    F64(Column<f64>),
    /// Ip address column.
    IpAddr(Column<Ipv6Addr>),
    /// Raw terms column.
    Bytes(BytesColumn),
    /// Dictionary encoded string column.
    Str(StrColumn),
}

impl DynamicColumn {
    /// Returns the type of the column.
    pub fn column_type(&self) -> ColumnType {
        match self {
            DynamicColumn::Bool(_) => ColumnType::Bool,
            DynamicColumn::I64(_) => ColumnType::I64,
            DynamicColumn::U64(_) => ColumnType::U64,
            DynamicColumn::F64(_) => ColumnType::F64,
            DynamicColumn::IpAddr(_) => ColumnType::IpAddr,
            DynamicColumn::Bytes(_) => ColumnType::Bytes,
            DynamicColumn::Str(_) => ColumnType::Str,
        }
    }

    /// Total number of values stored in the column.
    pub fn num_vals(&self) -> u32 {
        match self {
            DynamicColumn::Bool(c) => c.num_vals(),
            DynamicColumn::I64(c) => c.num_vals(),
            DynamicColumn::U64(c) => c.num_vals(),
            DynamicColumn::F64(c) => c.num_vals(),
            DynamicColumn::IpAddr(c) => c.num_vals(),
            DynamicColumn::Bytes(c) => c.num_vals(),
            DynamicColumn::Str(c) => c.ords().num_vals(),
        }
    }
}

macro_rules! static_dynamic_conversions {
    ($typ:ty, $enum_name:ident) => {
        impl From<$typ> for DynamicColumn {
            fn from(typ: $typ) -> Self {
                DynamicColumn::$enum_name(typ)
            }
        }
    };
}

static_dynamic_conversions!(Column<bool>, Bool);
static_dynamic_conversions!(Column<i64>, I64);
static_dynamic_conversions!(Column<u64>, U64);
static_dynamic_conversions!(Column<f64>, F64);
static_dynamic_conversions!(Column<Ipv6Addr>, IpAddr);
static_dynamic_conversions!(BytesColumn, Bytes);
static_dynamic_conversions!(StrColumn, Str);
