//! Range facet results.
//!
//! A range facet buckets documents whose field value falls inside each
//! requested range, accumulating a hit count and a running total per bucket.
//! This module holds the computed result shape: a compact wire codec for
//! shipping partial results between nodes and a JSON rendering for clients.
//!
//! ## Wire format
//!
//! ```text
//! name  key_field  value_field          (vint-length-prefixed strings)
//! num_entries (vint)
//! per entry: from(f64) to(f64) from_str? to_str? count(vint) total(f64)
//! ```
//!
//! Optional strings carry a one-byte presence flag before the string.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// One bucket of a range facet.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFacetEntry {
    /// Lower bound, `f64::NEG_INFINITY` when unbounded below.
    pub from: f64,
    /// Upper bound, `f64::INFINITY` when unbounded above.
    pub to: f64,
    /// Original bound spellings, kept for date-style ranges.
    pub from_str: Option<String>,
    pub to_str: Option<String>,
    /// Documents whose value fell inside the range.
    pub count: u64,
    /// Sum of the aggregated values inside the range.
    pub total: f64,
}

impl RangeFacetEntry {
    /// Average aggregated value inside the range, 0 for an empty bucket.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

impl Serialize for RangeFacetEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Unbounded ends are omitted from the client rendering
        let mut s = serializer.serialize_struct("RangeFacetEntry", 7)?;
        if !self.from.is_infinite() {
            s.serialize_field("from", &self.from)?;
        }
        if let Some(from_str) = &self.from_str {
            s.serialize_field("from_str", from_str)?;
        }
        if !self.to.is_infinite() {
            s.serialize_field("to", &self.to)?;
        }
        if let Some(to_str) = &self.to_str {
            s.serialize_field("to_str", to_str)?;
        }
        s.serialize_field("count", &self.count)?;
        s.serialize_field("total", &self.total)?;
        s.serialize_field("mean", &self.mean())?;
        s.end()
    }
}

/// Computed range facet for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFacet {
    /// Facet name from the request, keys the client rendering.
    pub name: String,
    /// Field the range bounds were matched against.
    pub key_field: String,
    /// Field the totals were aggregated from.
    pub value_field: String,
    pub entries: Vec<RangeFacetEntry>,
}

impl RangeFacet {
    /// Serialize for node-to-node transport.
    pub fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_string(writer, &self.name)?;
        write_string(writer, &self.key_field)?;
        write_string(writer, &self.value_field)?;
        write_vint(writer, self.entries.len() as u64)?;
        for entry in &self.entries {
            writer.write_f64::<LittleEndian>(entry.from)?;
            writer.write_f64::<LittleEndian>(entry.to)?;
            write_opt_string(writer, entry.from_str.as_deref())?;
            write_opt_string(writer, entry.to_str.as_deref())?;
            write_vint(writer, entry.count)?;
            writer.write_f64::<LittleEndian>(entry.total)?;
        }
        Ok(())
    }

    /// Deserialize from node-to-node transport.
    pub fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
        let name = read_string(reader)?;
        let key_field = read_string(reader)?;
        let value_field = read_string(reader)?;
        let num_entries = read_vint(reader)? as usize;
        let mut entries = Vec::with_capacity(num_entries);
        for _ in 0..num_entries {
            let from = reader.read_f64::<LittleEndian>()?;
            let to = reader.read_f64::<LittleEndian>()?;
            let from_str = read_opt_string(reader)?;
            let to_str = read_opt_string(reader)?;
            let count = read_vint(reader)?;
            let total = reader.read_f64::<LittleEndian>()?;
            entries.push(RangeFacetEntry {
                from,
                to,
                from_str,
                to_str,
                count,
                total,
            });
        }
        Ok(Self {
            name,
            key_field,
            value_field,
            entries,
        })
    }

    /// Client-facing JSON object, keyed by the facet name.
    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        obj.insert(
            self.name.clone(),
            serde_json::to_value(self).unwrap_or(serde_json::Value::Null),
        );
        serde_json::Value::Object(obj)
    }
}

impl Serialize for RangeFacet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("RangeFacet", 4)?;
        s.serialize_field("_type", "range")?;
        s.serialize_field("_key_field", &self.key_field)?;
        s.serialize_field("_value_field", &self.value_field)?;
        s.serialize_field("ranges", &self.entries)?;
        s.end()
    }
}

/// Write variable-length integer (1-10 bytes)
fn write_vint<W: Write>(writer: &mut W, mut value: u64) -> io::Result<()> {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            writer.write_u8(byte)?;
            return Ok(());
        } else {
            writer.write_u8(byte | 0x80)?;
        }
    }
}

/// Read variable-length integer
fn read_vint<R: Read>(reader: &mut R) -> io::Result<u64> {
    let mut result = 0u64;
    let mut shift = 0;

    loop {
        let byte = reader.read_u8()?;
        result |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
        if shift >= 64 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "varint too long",
            ));
        }
    }
}

fn write_string<W: Write>(writer: &mut W, s: &str) -> io::Result<()> {
    write_vint(writer, s.len() as u64)?;
    writer.write_all(s.as_bytes())
}

fn read_string<R: Read>(reader: &mut R) -> io::Result<String> {
    let len = read_vint(reader)? as usize;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("invalid utf8: {}", e)))
}

fn write_opt_string<W: Write>(writer: &mut W, s: Option<&str>) -> io::Result<()> {
    match s {
        Some(s) => {
            writer.write_u8(1)?;
            write_string(writer, s)
        }
        None => writer.write_u8(0),
    }
}

fn read_opt_string<R: Read>(reader: &mut R) -> io::Result<Option<String>> {
    if reader.read_u8()? == 0 {
        Ok(None)
    } else {
        read_string(reader).map(Some)
    }
}
