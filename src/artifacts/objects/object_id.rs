//! Object identifier (SHA-256 digest)
//!
//! Identities are 64-character hexadecimal strings. They are both the name
//! of an object in the database and its integrity proof: the database
//! recomputes the digest on read and rejects objects whose bytes no longer
//! match their identity.
//!
//! ## Storage
//!
//! Objects live at `.ait/objects/<first-2-chars>/<remaining-62-chars>` so
//! no single directory grows unbounded.

use crate::artifacts::objects::{OBJECT_ID_LENGTH, SHORT_OID_LENGTH};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;

/// SHA-256 object identifier in hexadecimal form
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object id from a string
    ///
    /// Uppercase hex is accepted and normalized, since storage paths are
    /// derived from the lowercase form.
    ///
    /// # Errors
    ///
    /// Fails when the string is not exactly 64 hex characters.
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object id length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid object id characters: {}", id));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Build an object id from a raw 32-byte digest
    pub fn from_digest(digest: &[u8]) -> anyhow::Result<Self> {
        Self::try_parse(hex::encode(digest))
    }

    /// Write the id in binary form (32 bytes)
    ///
    /// Used inside the canonical tree encoding, where child identities are
    /// stored raw rather than as hex text.
    pub fn write_raw_to<W: io::Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        let raw = hex::decode(&self.0)?;
        writer.write_all(&raw)?;
        Ok(())
    }

    /// Read an id from its binary form (32 bytes)
    pub fn read_raw_from<R: io::Read + ?Sized>(reader: &mut R) -> anyhow::Result<Self> {
        let mut raw = [0u8; OBJECT_ID_LENGTH / 2];
        reader.read_exact(&mut raw)?;
        Self::try_parse(hex::encode(raw))
    }

    /// Convert to the sharded database path `xx/yyyy…`
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// Abbreviated form used in porcelain output
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(SHORT_OID_LENGTH).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
