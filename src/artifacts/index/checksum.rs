use crate::artifacts::index::CHECKSUM_SIZE;
use anyhow::anyhow;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{Read, Write};

/// Reader/writer that hashes every byte passing through it
///
/// The index file ends with the SHA-1 of everything before it; `write_checksum` appends it
/// and `verify` checks it after the last read.
#[derive(Debug)]
pub struct Checksum<F> {
    file: F,
    digest: Sha1,
}

impl<F> Checksum<F> {
    pub fn new(file: F) -> Self {
        Checksum {
            file,
            digest: Sha1::new(),
        }
    }

    pub fn into_inner(self) -> F {
        self.file
    }
}

impl<F: Read> Checksum<F> {
    pub fn read(&mut self, size: usize) -> anyhow::Result<Bytes> {
        let mut buffer = vec![0; size];
        self.file
            .read_exact(&mut buffer)
            .map_err(|_| anyhow!("Unexpected end-of-file while reading index"))?;

        self.digest.update(&buffer);
        Ok(Bytes::from(buffer))
    }

    pub fn verify(&mut self) -> anyhow::Result<()> {
        let mut expected_checksum = [0u8; CHECKSUM_SIZE];
        self.file
            .read_exact(&mut expected_checksum)
            .map_err(|_| anyhow!("Index file is missing its checksum"))?;

        let actual_checksum = self.digest.clone().finalize();
        if expected_checksum != actual_checksum.as_slice() {
            return Err(anyhow!("Checksum does not match value stored on disk"));
        }

        let mut trailing = [0u8; 1];
        if self.file.read(&mut trailing)? != 0 {
            return Err(anyhow!("Unexpected data after index checksum"));
        }

        Ok(())
    }
}

impl<F: Write> Checksum<F> {
    pub fn write(&mut self, data: &[u8]) -> anyhow::Result<()> {
        self.file.write_all(data)?;
        self.digest.update(data);
        Ok(())
    }

    pub fn write_checksum(&mut self) -> anyhow::Result<()> {
        let checksum = self.digest.clone().finalize();
        self.file
            .write_all(checksum.as_slice())
            .map_err(|_| anyhow!("Failed to write checksum to index file"))?;

        Ok(())
    }
}
