use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use anyhow::anyhow;
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexHeader {
    pub marker: String,
    pub version: u32,
    pub entries_count: u32,
}

impl IndexHeader {
    pub fn with_count(entries_count: u32) -> Self {
        IndexHeader::new(String::from(SIGNATURE), VERSION, entries_count)
    }
}

impl Packable for IndexHeader {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);
        bytes.write_all(self.marker.as_bytes())?;
        bytes.write_u32::<byteorder::NetworkEndian>(self.version)?;
        bytes.write_u32::<byteorder::NetworkEndian>(self.entries_count)?;

        Ok(Bytes::from(bytes))
    }
}

impl Unpackable for IndexHeader {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut bytes = [0u8; HEADER_SIZE];
        reader
            .read_exact(&mut bytes)
            .map_err(|_| anyhow!("Invalid header size"))?;

        let marker = String::from_utf8(bytes[0..4].to_vec())
            .map_err(|_| anyhow!("Invalid marker in index header"))?;
        let version = byteorder::NetworkEndian::read_u32(&bytes[4..8]);
        let entries_count = byteorder::NetworkEndian::read_u32(&bytes[8..12]);

        Ok(IndexHeader {
            marker,
            version,
            entries_count,
        })
    }
}
