use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use std::io::BufRead;

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    const OBJECT_TYPE: ObjectType;

    fn object_type(&self) -> ObjectType {
        Self::OBJECT_TYPE
    }

    /// Bytes the object ID is computed from
    ///
    /// Defaults to the serialized form. Commits persist fields that are not part of their
    /// identity and override this.
    fn hashed_content(&self) -> Result<Bytes> {
        self.serialize()
    }

    fn object_id(&self) -> Result<ObjectId> {
        let content = self.hashed_content()?;
        Ok(ObjectId::hash_of(&content))
    }
}
