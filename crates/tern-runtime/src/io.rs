//! Built-in I/O for compiled programs
//!
//! Printing is overloaded per value kind through [`RuntimePrint`]; reading
//! goes through any [`BufRead`] so the parsing rules can be exercised
//! without a real stdin.

use std::io::{self, BufRead, ErrorKind, Write};

use crate::buffer::Buffer;
use crate::error::{RuntimeError, RuntimeResult};
use crate::fail_fast::OrFailFast;
use crate::int_array::IntArray;
use crate::string::TernString;

/// Starting capacity of the `read_line` accumulation buffer.
pub const LINE_BUFFER_CAPACITY: usize = 256;

/// Textual form of a runtime value on standard output.
pub trait RuntimePrint {
    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()>;
}

impl RuntimePrint for bool {
    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(if *self { b"true" } else { b"false" })
    }
}

/// Characters are single bytes.
impl RuntimePrint for u8 {
    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&[*self])
    }
}

impl RuntimePrint for i64 {
    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }
}

impl RuntimePrint for f64 {
    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        if self.is_nan() {
            out.write_all(b"nan")
        } else {
            write!(out, "{self:.5}")
        }
    }
}

impl RuntimePrint for () {
    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(b"()")
    }
}

impl RuntimePrint for TernString {
    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.as_bytes())
    }
}

impl RuntimePrint for IntArray {
    fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(b"IntArray(")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                out.write_all(b", ")?;
            }
            write!(out, "{value}")?;
        }
        out.write_all(b")")
    }
}

/// Write `value`, optionally followed by a newline.
pub fn write_value<W, T>(out: &mut W, value: &T, newline: bool) -> io::Result<()>
where
    W: Write + ?Sized,
    T: RuntimePrint + ?Sized,
{
    value.write_to(out)?;
    if newline {
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Write `value` to `out`, reporting failures as a `print` violation.
pub fn print_to<W, T>(out: &mut W, value: &T, newline: bool) -> RuntimeResult<()>
where
    W: Write + ?Sized,
    T: RuntimePrint + ?Sized,
{
    write_value(out, value, newline).map_err(|e| RuntimeError::io("print", &e))
}

/// Print a value to stdout, optionally followed by a newline.
pub fn try_print<T: RuntimePrint + ?Sized>(value: &T, newline: bool) -> RuntimeResult<()> {
    print_to(&mut io::stdout().lock(), value, newline)
}

/// Print a value without a newline
pub fn print<T: RuntimePrint + ?Sized>(value: &T) {
    try_print(value, false).or_fail_fast()
}

/// Print a value followed by a newline
pub fn println<T: RuntimePrint + ?Sized>(value: &T) {
    try_print(value, true).or_fail_fast()
}

/// Next unread byte, or `None` at end of input.
fn peek_byte<R: BufRead + ?Sized>(input: &mut R, op: &'static str) -> RuntimeResult<Option<u8>> {
    loop {
        match input.fill_buf() {
            Ok(available) => return Ok(available.first().copied()),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(RuntimeError::io(op, &e)),
        }
    }
}

/// Read characters up to (not including) `\n` or end of input.
pub fn read_line_from<R: BufRead + ?Sized>(input: &mut R) -> RuntimeResult<TernString> {
    let mut line = Buffer::<u8>::with_capacity(LINE_BUFFER_CAPACITY);
    loop {
        let available = match input.fill_buf() {
            Ok(available) => available,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(RuntimeError::io("readLine", &e)),
        };
        if available.is_empty() {
            break;
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(end) => {
                line.extend_from_slice(&available[..end]);
                input.consume(end + 1);
                break;
            }
            None => {
                let consumed = available.len();
                line.extend_from_slice(available);
                input.consume(consumed);
            }
        }
    }
    tracing::trace!(len = line.len(), "read line");
    Ok(TernString::new(line.as_slice()))
}

/// Parse a signed decimal integer after skipping leading whitespace.
///
/// Reading stops at the first byte that is not a digit; that byte stays
/// unread.
pub fn read_int_from<R: BufRead + ?Sized>(input: &mut R) -> RuntimeResult<i64> {
    const OP: &str = "readInt";

    while let Some(byte) = peek_byte(input, OP)? {
        if !byte.is_ascii_whitespace() {
            break;
        }
        input.consume(1);
    }

    let negative = match peek_byte(input, OP)? {
        None => {
            return Err(RuntimeError::InvalidInteger {
                reason: "unexpected end of input",
            });
        }
        Some(sign @ (b'-' | b'+')) => {
            input.consume(1);
            sign == b'-'
        }
        Some(_) => false,
    };

    // Accumulate towards negative so that i64::MIN is representable.
    let mut value: i64 = 0;
    let mut digits = 0usize;
    while let Some(byte) = peek_byte(input, OP)? {
        if !byte.is_ascii_digit() {
            break;
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_sub(i64::from(byte - b'0')))
            .ok_or(RuntimeError::InvalidInteger {
                reason: "integer out of range",
            })?;
        digits += 1;
        input.consume(1);
    }

    if digits == 0 {
        return Err(RuntimeError::InvalidInteger {
            reason: "expected a decimal integer",
        });
    }

    let value = if negative {
        value
    } else {
        value.checked_neg().ok_or(RuntimeError::InvalidInteger {
            reason: "integer out of range",
        })?
    };
    tracing::trace!(value, "read int");
    Ok(value)
}

pub fn try_read_line() -> RuntimeResult<TernString> {
    read_line_from(&mut io::stdin().lock())
}

pub fn try_read_int() -> RuntimeResult<i64> {
    read_int_from(&mut io::stdin().lock())
}

/// Read a line of input from stdin
pub fn read_line() -> TernString {
    try_read_line().or_fail_fast()
}

/// Read an integer from stdin
pub fn read_int() -> i64 {
    try_read_int().or_fail_fast()
}
