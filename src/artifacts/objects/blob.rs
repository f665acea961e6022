//! Blob object
//!
//! Blobs hold raw artifact content: a dataset file, a serialized model, a
//! notebook. They carry no metadata at all; the path lives in the staging
//! index and the tree, never in the blob.
//!
//! ## Format
//!
//! On disk: `blob <size>\0<bytes>`

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

/// Raw file content object
///
/// Content is kept as bytes, not text: model binaries and array dumps are
/// first-class citizens here.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut blob_bytes = Vec::with_capacity(self.content.len() + 16);
        let header = format!("{} {}\0", self.object_type().as_str(), self.content.len());
        blob_bytes.write_all(header.as_bytes())?;
        blob_bytes.write_all(&self.content)?;

        Ok(Bytes::from(blob_bytes))
    }
}

impl Unpackable for Blob {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        // the envelope header has already been consumed
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        Ok(Self::new(Bytes::from(content)))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn serialization_round_trip() {
        let blob = Blob::new(Bytes::from_static(b"a,b\n1,2\n"));
        let bytes = blob.serialize().unwrap();

        let mut reader = Cursor::new(bytes);
        let kind = ObjectType::parse_object_type(&mut reader).unwrap();
        let parsed = Blob::deserialize(reader).unwrap();

        assert_eq!(kind, ObjectType::Blob);
        assert_eq!(parsed, blob);
    }

    #[test]
    fn binary_content_survives_round_trip() {
        let payload = vec![0u8, 159, 146, 150, 255, 0, 7];
        let blob = Blob::new(Bytes::from(payload.clone()));
        let bytes = blob.serialize().unwrap();

        let mut reader = Cursor::new(bytes);
        ObjectType::parse_object_type(&mut reader).unwrap();
        let parsed = Blob::deserialize(reader).unwrap();

        assert_eq!(parsed.content().as_ref(), payload.as_slice());
    }
}
