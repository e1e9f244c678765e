use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "Blob",
            ObjectType::Tree => "Tree",
            ObjectType::Commit => "Commit",
        }
    }

    /// Consume the `<type>[ <size>]\0` header and return the object type
    ///
    /// Blobs and trees carry a size after the type, commits do not.
    pub fn parse_object_type(data_reader: &mut impl BufRead) -> anyhow::Result<ObjectType> {
        let mut header = Vec::new();
        data_reader.read_until(b'\0', &mut header)?;

        if header.pop() != Some(b'\0') {
            anyhow::bail!("Invalid object header: missing NUL terminator");
        }

        let header = String::from_utf8(header)?;
        let object_type = header.split(' ').next().unwrap_or_default();

        ObjectType::try_from(object_type)
    }
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "Blob" => Ok(ObjectType::Blob),
            "Tree" => Ok(ObjectType::Tree),
            "Commit" => Ok(ObjectType::Commit),
            _ => Err(anyhow::anyhow!("Invalid object type: {value}")),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_with_size_is_parsed() {
        let mut reader = Cursor::new(b"Blob 3\0abc".to_vec());
        assert_eq!(
            ObjectType::parse_object_type(&mut reader).unwrap(),
            ObjectType::Blob
        );
    }

    #[test]
    fn header_without_size_is_parsed() {
        let mut reader = Cursor::new(b"Commit\0TimeStamp x\n".to_vec());
        assert_eq!(
            ObjectType::parse_object_type(&mut reader).unwrap(),
            ObjectType::Commit
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        let mut reader = Cursor::new(b"blob 3\0abc".to_vec());
        assert!(ObjectType::parse_object_type(&mut reader).is_err());
    }
}
