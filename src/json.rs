use std::io::Write;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

const INDENT: &[u8] = b"    ";

/// Serialize `value` as JSON indented with four spaces, followed by a newline
pub fn write_pretty<W: Write, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> serde_json::Result<()> {
    let mut serializer = serde_json::Serializer::with_formatter(&mut *writer, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    writer.write_all(b"\n").map_err(serde_json::Error::io)
}

pub fn to_pretty_string<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    write_pretty(&mut buf, value)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
