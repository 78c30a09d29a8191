//! Runtime entry points as seen by a code generator.
//!
//! Overloads on the receiver or argument type resolve through [`TypeTag`]
//! instead of an encoded naming scheme: a backend asks for the symbol of an
//! operation on a type and gets its link name and machine signature.

use AbiType::{F64, I8, I64, Ptr};

/// Source-level type of a value passed to the runtime.
///
/// Discriminants follow [`TypeTag::ALL`] and index the print table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    Char,
    Int,
    Float,
    Unit,
    String,
    IntArray,
}

impl TypeTag {
    pub const ALL: [TypeTag; 7] = [
        TypeTag::Bool,
        TypeTag::Char,
        TypeTag::Int,
        TypeTag::Float,
        TypeTag::Unit,
        TypeTag::String,
        TypeTag::IntArray,
    ];

    /// How a value of this type is passed; `None` for unit, which has no
    /// runtime representation.
    pub fn abi_type(self) -> Option<AbiType> {
        match self {
            TypeTag::Bool | TypeTag::Char => Some(AbiType::I8),
            TypeTag::Int => Some(AbiType::I64),
            TypeTag::Float => Some(AbiType::F64),
            TypeTag::Unit => None,
            TypeTag::String | TypeTag::IntArray => Some(AbiType::Ptr),
        }
    }
}

/// Machine-level parameter or return type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AbiType {
    I8,
    I64,
    F64,
    Ptr,
}

/// Link name and signature of one entry point.
///
/// Value-producing operations take the output slot as their first `Ptr`
/// parameter and return nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RuntimeSymbol {
    pub name: &'static str,
    pub params: &'static [AbiType],
    pub returns: Option<AbiType>,
}

impl RuntimeSymbol {
    const fn new(name: &'static str, params: &'static [AbiType], returns: Option<AbiType>) -> Self {
        Self {
            name,
            params,
            returns,
        }
    }
}

pub const INIT: RuntimeSymbol = RuntimeSymbol::new("__tern_init", &[], None);

pub const STRING_NEW: RuntimeSymbol = RuntimeSymbol::new("__tern_string_new", &[Ptr, Ptr, I64], None);
pub const STRING_FREE: RuntimeSymbol = RuntimeSymbol::new("__tern_string_free", &[Ptr], None);
pub const STRING_SIZE: RuntimeSymbol = RuntimeSymbol::new("__tern_string_size", &[Ptr], Some(I64));
pub const STRING_CHAR_AT: RuntimeSymbol =
    RuntimeSymbol::new("__tern_string_char_at", &[Ptr, I64], Some(I8));
pub const STRING_REVERSE: RuntimeSymbol =
    RuntimeSymbol::new("__tern_string_reverse", &[Ptr, Ptr], None);
pub const STRING_CONCAT: RuntimeSymbol =
    RuntimeSymbol::new("__tern_string_concat", &[Ptr, Ptr, Ptr], None);
pub const STRING_SUBSTRING: RuntimeSymbol =
    RuntimeSymbol::new("__tern_string_substring", &[Ptr, Ptr, I64, I64], None);

pub const INT_ARRAY_NEW: RuntimeSymbol = RuntimeSymbol::new("__tern_int_array_new", &[Ptr, I64], None);
pub const INT_ARRAY_FREE: RuntimeSymbol = RuntimeSymbol::new("__tern_int_array_free", &[Ptr], None);
pub const INT_ARRAY_SIZE: RuntimeSymbol =
    RuntimeSymbol::new("__tern_int_array_size", &[Ptr], Some(I64));
pub const INT_ARRAY_CAPACITY: RuntimeSymbol =
    RuntimeSymbol::new("__tern_int_array_capacity", &[Ptr], Some(I64));
pub const INT_ARRAY_GET: RuntimeSymbol =
    RuntimeSymbol::new("__tern_int_array_get", &[Ptr, I64], Some(I64));
pub const INT_ARRAY_SET: RuntimeSymbol =
    RuntimeSymbol::new("__tern_int_array_set", &[Ptr, I64, I64], None);
pub const INT_ARRAY_RESIZE: RuntimeSymbol =
    RuntimeSymbol::new("__tern_int_array_resize", &[Ptr, I64], None);
pub const INT_ARRAY_APPEND: RuntimeSymbol =
    RuntimeSymbol::new("__tern_int_array_append", &[Ptr, I64], None);
pub const INT_ARRAY_APPEND_ALL: RuntimeSymbol =
    RuntimeSymbol::new("__tern_int_array_append_all", &[Ptr, Ptr], None);
pub const INT_ARRAY_CLEAR: RuntimeSymbol = RuntimeSymbol::new("__tern_int_array_clear", &[Ptr], None);

pub const READ_LINE: RuntimeSymbol = RuntimeSymbol::new("__tern_read_line", &[Ptr], None);
pub const READ_INT: RuntimeSymbol = RuntimeSymbol::new("__tern_read_int", &[], Some(I64));
pub const RANDOM: RuntimeSymbol = RuntimeSymbol::new("__tern_random", &[I64, I64], Some(I64));
pub const RANDOM_SEED: RuntimeSymbol = RuntimeSymbol::new("__tern_random_seed", &[I64], None);

/// `(print, println)` per type, in [`TypeTag::ALL`] order.
const PRINT: [(RuntimeSymbol, RuntimeSymbol); 7] = [
    (
        RuntimeSymbol::new("__tern_print_bool", &[I8], None),
        RuntimeSymbol::new("__tern_println_bool", &[I8], None),
    ),
    (
        RuntimeSymbol::new("__tern_print_char", &[I8], None),
        RuntimeSymbol::new("__tern_println_char", &[I8], None),
    ),
    (
        RuntimeSymbol::new("__tern_print_int", &[I64], None),
        RuntimeSymbol::new("__tern_println_int", &[I64], None),
    ),
    (
        RuntimeSymbol::new("__tern_print_float", &[F64], None),
        RuntimeSymbol::new("__tern_println_float", &[F64], None),
    ),
    (
        RuntimeSymbol::new("__tern_print_unit", &[], None),
        RuntimeSymbol::new("__tern_println_unit", &[], None),
    ),
    (
        RuntimeSymbol::new("__tern_print_string", &[Ptr], None),
        RuntimeSymbol::new("__tern_println_string", &[Ptr], None),
    ),
    (
        RuntimeSymbol::new("__tern_print_int_array", &[Ptr], None),
        RuntimeSymbol::new("__tern_println_int_array", &[Ptr], None),
    ),
];

/// The print entry point for values of type `tag`.
pub fn print_symbol(tag: TypeTag, newline: bool) -> RuntimeSymbol {
    let (print, println) = PRINT[tag as usize];
    if newline { println } else { print }
}

/// Every entry point exported by the runtime.
pub const ALL: &[RuntimeSymbol] = &[
    INIT,
    STRING_NEW,
    STRING_FREE,
    STRING_SIZE,
    STRING_CHAR_AT,
    STRING_REVERSE,
    STRING_CONCAT,
    STRING_SUBSTRING,
    INT_ARRAY_NEW,
    INT_ARRAY_FREE,
    INT_ARRAY_SIZE,
    INT_ARRAY_CAPACITY,
    INT_ARRAY_GET,
    INT_ARRAY_SET,
    INT_ARRAY_RESIZE,
    INT_ARRAY_APPEND,
    INT_ARRAY_APPEND_ALL,
    INT_ARRAY_CLEAR,
    PRINT[0].0,
    PRINT[0].1,
    PRINT[1].0,
    PRINT[1].1,
    PRINT[2].0,
    PRINT[2].1,
    PRINT[3].0,
    PRINT[3].1,
    PRINT[4].0,
    PRINT[4].1,
    PRINT[5].0,
    PRINT[5].1,
    PRINT[6].0,
    PRINT[6].1,
    READ_LINE,
    READ_INT,
    RANDOM,
    RANDOM_SEED,
];

/// Find an entry point by link name.
pub fn lookup(name: &str) -> Option<RuntimeSymbol> {
    ALL.iter().copied().find(|symbol| symbol.name == name)
}
