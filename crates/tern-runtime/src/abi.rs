//! C ABI entry points called by compiled Tern code.
//!
//! Strings and arrays cross the boundary as owning pointers. Operations that
//! produce a value write the new pointer into a caller-supplied `out` slot;
//! scalar observers (`size`, `capacity`, `get`, `char_at`) return directly.
//! Every pointer handed out must be released exactly once with the matching
//! `free` function.
//!
//! Precondition violations never return. They always exit the process with
//! [`EXIT_VIOLATION`](crate::fail_fast::EXIT_VIOLATION), whatever the
//! installed policy: a panic cannot unwind through these functions.

use crate::error::{RuntimeError, check_size};
use crate::fail_fast::{OnViolation, OrFailFast, escalate_with};
use crate::int_array::IntArray;
use crate::io::{self, RuntimePrint};
use crate::random;
use crate::string::TernString;

/// # Safety
///
/// `out` must be valid for a pointer-sized write.
unsafe fn write_out<T>(out: *mut *mut T, value: T) {
    unsafe { out.write(Box::into_raw(Box::new(value))) }
}

/// # Safety
///
/// `ptr` must be null or point to a live value.
unsafe fn value_ref<'a, T>(op: &'static str, ptr: *const T) -> &'a T {
    match unsafe { ptr.as_ref() } {
        Some(value) => value,
        None => null_value(op),
    }
}

/// # Safety
///
/// `ptr` must be null or point to a live value with no other live reference.
unsafe fn value_mut<'a, T>(op: &'static str, ptr: *mut T) -> &'a mut T {
    match unsafe { ptr.as_mut() } {
        Some(value) => value,
        None => null_value(op),
    }
}

#[cold]
fn null_value(op: &'static str) -> ! {
    escalate_with(OnViolation::Exit, &RuntimeError::NullValue { op })
}

/// # Safety
///
/// `ptr` must be null or come from this module's `out` slots, and must not
/// be used afterwards.
unsafe fn free_value<T>(ptr: *mut T) {
    if !ptr.is_null() {
        drop(unsafe { Box::from_raw(ptr) });
    }
}

// =============================================================================
// String
// =============================================================================

/// Create a string from `len` characters at `chars` (a literal).
///
/// # Safety
///
/// `out` must be writable; `chars` must be readable for `len` bytes
/// (it may be null when `len` is 0).
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_string_new(out: *mut *mut TernString, chars: *const u8, len: i64) {
    let len = check_size("String::new", len).or_exit();
    let chars = if len == 0 {
        &[][..]
    } else if chars.is_null() {
        null_value("String::new")
    } else {
        unsafe { std::slice::from_raw_parts(chars, len) }
    };
    unsafe { write_out(out, TernString::new(chars)) }
}

/// # Safety
///
/// `s` must be null or a string produced by this runtime, not yet freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_string_free(s: *mut TernString) {
    unsafe { free_value(s) }
}

/// # Safety
///
/// `s` must be a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_string_size(s: *const TernString) -> i64 {
    unsafe { value_ref("String::size", s) }.size()
}

/// # Safety
///
/// `s` must be a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_string_char_at(s: *const TernString, index: i64) -> u8 {
    unsafe { value_ref("String::char_at", s) }.try_char_at(index).or_exit()
}

/// # Safety
///
/// `out` must be writable and `s` a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_string_reverse(out: *mut *mut TernString, s: *const TernString) {
    let reversed = unsafe { value_ref("String::reverse", s) }.reverse();
    unsafe { write_out(out, reversed) }
}

/// # Safety
///
/// `out` must be writable; `s` and `other` must be live strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_string_concat(
    out: *mut *mut TernString,
    s: *const TernString,
    other: *const TernString,
) {
    let s = unsafe { value_ref("String::concat", s) };
    let other = unsafe { value_ref("String::concat", other) };
    unsafe { write_out(out, s.concat(other)) }
}

/// # Safety
///
/// `out` must be writable and `s` a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_string_substring(
    out: *mut *mut TernString,
    s: *const TernString,
    from: i64,
    to: i64,
) {
    let substring = unsafe { value_ref("String::substring", s) }
        .try_substring(from, to)
        .or_exit();
    unsafe { write_out(out, substring) }
}

// =============================================================================
// IntArray
// =============================================================================

/// # Safety
///
/// `out` must be writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_int_array_new(out: *mut *mut IntArray, size: i64) {
    unsafe { write_out(out, IntArray::try_new(size).or_exit()) }
}

/// # Safety
///
/// `array` must be null or an array produced by this runtime, not yet freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_int_array_free(array: *mut IntArray) {
    unsafe { free_value(array) }
}

/// # Safety
///
/// `array` must be a live array.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_int_array_size(array: *const IntArray) -> i64 {
    unsafe { value_ref("IntArray::size", array) }.size()
}

/// # Safety
///
/// `array` must be a live array.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_int_array_capacity(array: *const IntArray) -> i64 {
    unsafe { value_ref("IntArray::capacity", array) }.capacity()
}

/// # Safety
///
/// `array` must be a live array.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_int_array_get(array: *const IntArray, index: i64) -> i64 {
    unsafe { value_ref("IntArray::get", array) }.try_get(index).or_exit()
}

/// # Safety
///
/// `array` must be a live array.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_int_array_set(array: *mut IntArray, index: i64, value: i64) {
    unsafe { value_mut("IntArray::set", array) }.try_set(index, value).or_exit()
}

/// # Safety
///
/// `array` must be a live array.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_int_array_resize(array: *mut IntArray, new_size: i64) {
    unsafe { value_mut("IntArray::resize", array) }.try_resize(new_size).or_exit()
}

/// # Safety
///
/// `array` must be a live array.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_int_array_append(array: *mut IntArray, value: i64) {
    unsafe { value_mut("IntArray::append", array) }.append(value)
}

/// Append every element of `other`; `other` may be `array` itself.
///
/// # Safety
///
/// `array` and `other` must be live arrays.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_int_array_append_all(array: *mut IntArray, other: *const IntArray) {
    if std::ptr::eq(array, other) {
        let copy = unsafe { value_ref("IntArray::append_all", other) }.clone();
        unsafe { value_mut("IntArray::append_all", array) }.append_all(&copy);
        return;
    }
    let other = unsafe { value_ref("IntArray::append_all", other) };
    unsafe { value_mut("IntArray::append_all", array) }.append_all(other)
}

/// # Safety
///
/// `array` must be a live array.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_int_array_clear(array: *mut IntArray) {
    unsafe { value_mut("IntArray::clear", array) }.clear()
}

// =============================================================================
// Printing
// =============================================================================

fn print_value<T: RuntimePrint + ?Sized>(value: &T, newline: bool) {
    io::try_print(value, newline).or_exit()
}

/// Booleans arrive as a byte; any nonzero value is `true`.
#[unsafe(no_mangle)]
pub extern "C" fn __tern_print_bool(value: u8) {
    print_value(&(value != 0), false)
}

#[unsafe(no_mangle)]
pub extern "C" fn __tern_println_bool(value: u8) {
    print_value(&(value != 0), true)
}

macro_rules! scalar_print_entry_points {
    ($($print:ident, $println:ident: $ty:ty;)*) => {
        $(
            #[unsafe(no_mangle)]
            pub extern "C" fn $print(value: $ty) {
                print_value(&value, false)
            }

            #[unsafe(no_mangle)]
            pub extern "C" fn $println(value: $ty) {
                print_value(&value, true)
            }
        )*
    };
}

scalar_print_entry_points! {
    __tern_print_char, __tern_println_char: u8;
    __tern_print_int, __tern_println_int: i64;
    __tern_print_float, __tern_println_float: f64;
}

#[unsafe(no_mangle)]
pub extern "C" fn __tern_print_unit() {
    print_value(&(), false)
}

#[unsafe(no_mangle)]
pub extern "C" fn __tern_println_unit() {
    print_value(&(), true)
}

/// # Safety
///
/// `s` must be a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_print_string(s: *const TernString) {
    print_value(unsafe { value_ref("print", s) }, false)
}

/// # Safety
///
/// `s` must be a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_println_string(s: *const TernString) {
    print_value(unsafe { value_ref("print", s) }, true)
}

/// # Safety
///
/// `array` must be a live array.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_print_int_array(array: *const IntArray) {
    print_value(unsafe { value_ref("print", array) }, false)
}

/// # Safety
///
/// `array` must be a live array.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_println_int_array(array: *const IntArray) {
    print_value(unsafe { value_ref("print", array) }, true)
}

// =============================================================================
// Input and random numbers
// =============================================================================

/// Block until a full line (or end of input) is available on stdin.
///
/// # Safety
///
/// `out` must be writable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __tern_read_line(out: *mut *mut TernString) {
    unsafe { write_out(out, io::try_read_line().or_exit()) }
}

#[unsafe(no_mangle)]
pub extern "C" fn __tern_read_int() -> i64 {
    io::try_read_int().or_exit()
}

#[unsafe(no_mangle)]
pub extern "C" fn __tern_random(from: i64, to: i64) -> i64 {
    random::try_random(from, to).or_exit()
}

#[unsafe(no_mangle)]
pub extern "C" fn __tern_random_seed(seed: u64) {
    random::seed(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols;
    use std::collections::BTreeSet;
    use std::ptr;

    /// Address of every exported entry point, keyed by symbol name.
    fn exported() -> Vec<(&'static str, usize)> {
        vec![
            ("__tern_init", crate::__tern_init as usize),
            ("__tern_string_new", __tern_string_new as usize),
            ("__tern_string_free", __tern_string_free as usize),
            ("__tern_string_size", __tern_string_size as usize),
            ("__tern_string_char_at", __tern_string_char_at as usize),
            ("__tern_string_reverse", __tern_string_reverse as usize),
            ("__tern_string_concat", __tern_string_concat as usize),
            ("__tern_string_substring", __tern_string_substring as usize),
            ("__tern_int_array_new", __tern_int_array_new as usize),
            ("__tern_int_array_free", __tern_int_array_free as usize),
            ("__tern_int_array_size", __tern_int_array_size as usize),
            ("__tern_int_array_capacity", __tern_int_array_capacity as usize),
            ("__tern_int_array_get", __tern_int_array_get as usize),
            ("__tern_int_array_set", __tern_int_array_set as usize),
            ("__tern_int_array_resize", __tern_int_array_resize as usize),
            ("__tern_int_array_append", __tern_int_array_append as usize),
            ("__tern_int_array_append_all", __tern_int_array_append_all as usize),
            ("__tern_int_array_clear", __tern_int_array_clear as usize),
            ("__tern_print_bool", __tern_print_bool as usize),
            ("__tern_println_bool", __tern_println_bool as usize),
            ("__tern_print_char", __tern_print_char as usize),
            ("__tern_println_char", __tern_println_char as usize),
            ("__tern_print_int", __tern_print_int as usize),
            ("__tern_println_int", __tern_println_int as usize),
            ("__tern_print_float", __tern_print_float as usize),
            ("__tern_println_float", __tern_println_float as usize),
            ("__tern_print_unit", __tern_print_unit as usize),
            ("__tern_println_unit", __tern_println_unit as usize),
            ("__tern_print_string", __tern_print_string as usize),
            ("__tern_println_string", __tern_println_string as usize),
            ("__tern_print_int_array", __tern_print_int_array as usize),
            ("__tern_println_int_array", __tern_println_int_array as usize),
            ("__tern_read_line", __tern_read_line as usize),
            ("__tern_read_int", __tern_read_int as usize),
            ("__tern_random", __tern_random as usize),
            ("__tern_random_seed", __tern_random_seed as usize),
        ]
    }

    #[test]
    fn test_symbol_table_matches_entry_points() {
        let exported: BTreeSet<_> = exported().into_iter().map(|(name, _)| name).collect();
        let declared: BTreeSet<_> = symbols::ALL.iter().map(|symbol| symbol.name).collect();
        assert_eq!(exported, declared);
    }

    #[test]
    fn test_append_all_with_itself() {
        unsafe {
            let mut array: *mut IntArray = ptr::null_mut();
            __tern_int_array_new(&mut array, 0);
            __tern_int_array_append(array, 1);
            __tern_int_array_append(array, 2);

            __tern_int_array_append_all(array, array);
            assert_eq!((*array).as_slice(), &[1, 2, 1, 2]);

            __tern_int_array_free(array);
        }
    }

    #[test]
    fn test_empty_literal_accepts_null_chars() {
        unsafe {
            let mut s: *mut TernString = ptr::null_mut();
            __tern_string_new(&mut s, ptr::null(), 0);
            assert_eq!(__tern_string_size(s), 0);
            __tern_string_free(s);
        }
    }
}
