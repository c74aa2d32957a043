//! Result of a single-document write operation.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};

/// Acknowledgment returned once a single-document write has been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResponse {
    /// Index the document was written into.
    pub index: String,
    /// Id of the written document.
    pub id: String,
    /// Version of the document after the write.
    pub version: u64,
}

impl IndexResponse {
    pub fn new(index: impl Into<String>, id: impl Into<String>, version: u64) -> Self {
        Self {
            index: index.into(),
            id: id.into(),
            version,
        }
    }

    /// Serialize for node-to-node transport.
    pub fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        write_string(writer, &self.index)?;
        write_string(writer, &self.id)?;
        writer.write_u64::<LittleEndian>(self.version)?;
        Ok(())
    }

    /// Deserialize from node-to-node transport.
    pub fn deserialize<R: Read>(reader: &mut R) -> io::Result<Self> {
        let index = read_string(reader)?;
        let id = read_string(reader)?;
        let version = reader.read_u64::<LittleEndian>()?;
        Ok(Self { index, id, version })
    }
}

fn write_string<W: Write>(writer: &mut W, s: &str) -> io::Result<()> {
    writer.write_u32::<LittleEndian>(s.len() as u32)?;
    writer.write_all(s.as_bytes())
}

fn read_string<R: Read>(reader: &mut R) -> io::Result<String> {
    let len = reader.read_u32::<LittleEndian>()? as usize;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("invalid utf8: {}", e)))
}
