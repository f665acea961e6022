//! Commit object
//!
//! A commit pins a tree, its single parent (absent for the root commit),
//! the author/committer identities, and a free-text message. Because the
//! encoding embeds the tree and parent identities, a commit id commits to
//! the entire reachable history.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>          (omitted for the root commit)
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::io::{BufRead, Write};

/// Author or committer identity with timestamp
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Author {
    /// Identity stamped with the current local time
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// `Name <email@example.com>`
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// `Name <email> <unix-timestamp> <timezone>`, the canonical form
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    /// Read the identity from `AIT_AUTHOR_NAME` / `AIT_AUTHOR_EMAIL`
    ///
    /// `AIT_AUTHOR_DATE` (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`) pins the
    /// timestamp for reproducible commits; otherwise the clock is used.
    /// Returns `None` when the variables are not set, so the caller can
    /// fall back to the repository configuration.
    pub fn load_from_env() -> Option<Self> {
        let name = std::env::var("AIT_AUTHOR_NAME").ok()?;
        let email = std::env::var("AIT_AUTHOR_EMAIL").ok()?;
        let timestamp = std::env::var("AIT_AUTHOR_DATE").ok().and_then(|date_str| {
            chrono::DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match timestamp {
            Some(ts) => Some(Author::new_with_timestamp(name, email, ts)),
            None => Some(Author::new(name, email)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// `Mon Jan 1 12:34:56 2024 +0000`
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.timestamp
    }
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Format: "name <email> timestamp timezone"
        // Split from the right so names containing spaces survive
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(anyhow::anyhow!("Invalid author format"));
        }

        let timezone = parts[0];
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("Invalid timestamp"))?;
        let name_email_part = parts[2];

        let email_start = name_email_part
            .find('<')
            .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '<'"))?;
        let email_end = name_email_part
            .find('>')
            .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '>'"))?;

        let name = name_email_part[..email_start].trim().to_string();
        let email = name_email_part[email_start + 1..email_end].to_string();

        // reattach the offset without touching the instant, so the
        // canonical form round-trips byte-identically
        let offset = parse_timezone_offset(timezone)?;
        let datetime = chrono::DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid timestamp"))?
            .with_timezone(&offset);

        Ok(Author {
            name,
            email,
            timestamp: datetime,
        })
    }
}

/// Parse a `+HHMM` / `-HHMM` offset into a `FixedOffset`
fn parse_timezone_offset(value: &str) -> anyhow::Result<chrono::FixedOffset> {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || !bytes[1..].iter().all(u8::is_ascii_digit) {
        return Err(anyhow::anyhow!("Invalid timezone: {value}"));
    }
    let sign = match bytes[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return Err(anyhow::anyhow!("Invalid timezone: {value}")),
    };

    let hours: i32 = value[1..3].parse()?;
    let minutes: i32 = value[3..5].parse()?;
    chrono::FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| anyhow::anyhow!("Invalid timezone: {value}"))
}

/// Historical snapshot object
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit id; `None` only for the root commit
    parent: Option<ObjectId>,
    /// Tree id pinning the snapshot contents
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    /// Create a commit where the author also committed it
    ///
    /// The common porcelain path. Amend-style flows where the two
    /// identities diverge go through [`Commit::new_with_committer`].
    pub fn new(
        parent: Option<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        message: String,
    ) -> Self {
        Commit {
            parent,
            tree_oid,
            author: author.clone(),
            committer: author,
            message,
        }
    }

    pub fn new_with_committer(
        parent: Option<ObjectId>,
        tree_oid: ObjectId,
        author: Author,
        committer: Author,
        message: String,
    ) -> Self {
        Commit {
            parent,
            tree_oid,
            author,
            committer,
            message,
        }
    }

    /// First line of the message, for one-line log formats
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.author.timestamp()
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut object_content = vec![];

        object_content.push(format!("tree {}", self.tree_oid.as_ref()));
        if let Some(parent) = &self.parent {
            object_content.push(format!("parent {}", parent.as_ref()));
        }
        object_content.push(format!("author {}", self.author.display()));
        object_content.push(format!("committer {}", self.committer.display()));
        object_content.push(String::new());
        object_content.push(self.message.to_string());

        let object_content = object_content.join("\n");
        let content_bytes = object_content.as_bytes();

        let mut commit_bytes = Vec::with_capacity(content_bytes.len() + 16);
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        commit_bytes.write_all(header.as_bytes())?;
        commit_bytes.write_all(content_bytes)?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)?;
        let mut lines = content.lines();

        let tree_line = lines
            .next()
            .context("Invalid commit object: missing tree line")?;
        let tree_oid = tree_line
            .strip_prefix("tree ")
            .context("Invalid commit object: invalid tree line")?
            .to_string();
        let tree_oid = ObjectId::try_parse(tree_oid)?;

        let mut next_line = lines
            .next()
            .context("Invalid commit object: missing author line")?;

        // single-parent history: at most one parent line
        let mut parent = None;
        if let Some(parent_oid) = next_line.strip_prefix("parent ") {
            parent = Some(ObjectId::try_parse(parent_oid.to_string())?);
            next_line = lines
                .next()
                .context("Invalid commit object: missing author line")?;
        }

        let author = next_line
            .strip_prefix("author ")
            .context("Invalid commit object: invalid author line")?;
        let author = Author::try_from(author)?;

        let committer_line = lines
            .next()
            .context("Invalid commit object: missing committer line")?;
        let committer = committer_line
            .strip_prefix("committer ")
            .context("Invalid commit object: invalid committer line")?;
        let committer = Author::try_from(committer)?;

        // skip the separator line
        lines.next();

        let message = lines.collect::<Vec<&str>>().join("\n");
        Ok(Self::new_with_committer(
            parent, tree_oid, author, committer, message,
        ))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        let mut lines = vec![];

        lines.push(format!("tree {}", self.tree_oid.as_ref()));
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {}", parent.as_ref()));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object::hash_blob_bytes;
    use std::io::Cursor;

    fn fixed_author() -> Author {
        let ts = chrono::DateTime::parse_from_rfc3339("2024-03-01T10:00:00+02:00").unwrap();
        Author::new_with_timestamp("Ada".to_string(), "ada@example.com".to_string(), ts)
    }

    fn round_trip(commit: &Commit) -> Commit {
        let bytes = commit.serialize().unwrap();
        let mut reader = Cursor::new(bytes);
        ObjectType::parse_object_type(&mut reader).unwrap();
        Commit::deserialize(reader).unwrap()
    }

    #[test]
    fn root_commit_round_trip() {
        let commit = Commit::new(
            None,
            hash_blob_bytes(b"tree").unwrap(),
            fixed_author(),
            "first".to_string(),
        );

        assert_eq!(round_trip(&commit), commit);
    }

    #[test]
    fn child_commit_round_trip_keeps_parent() {
        let parent_oid = hash_blob_bytes(b"parent").unwrap();
        let commit = Commit::new(
            Some(parent_oid.clone()),
            hash_blob_bytes(b"tree").unwrap(),
            fixed_author(),
            "second\n\nwith body".to_string(),
        );

        let parsed = round_trip(&commit);
        assert_eq!(parsed.parent(), Some(&parent_oid));
        assert_eq!(parsed.message(), "second\n\nwith body");
    }

    #[test]
    fn committer_is_preserved_independently_of_author() {
        let ts = chrono::DateTime::parse_from_rfc3339("2024-03-02T09:30:00+00:00").unwrap();
        let committer =
            Author::new_with_timestamp("Bot".to_string(), "bot@ci.example".to_string(), ts);
        let commit = Commit::new_with_committer(
            None,
            hash_blob_bytes(b"tree").unwrap(),
            fixed_author(),
            committer.clone(),
            "automated".to_string(),
        );

        let parsed = round_trip(&commit);
        assert_eq!(parsed.committer(), &committer);
        assert_ne!(parsed.author(), parsed.committer());
    }

    #[test]
    fn author_parse_handles_spaces_in_name() {
        let author = Author::try_from("Grace Hopper <grace@navy.mil> 1709280000 +0000").unwrap();
        assert_eq!(author.name(), "Grace Hopper");
        assert_eq!(author.email(), "grace@navy.mil");
    }

    #[test]
    fn author_parse_preserves_the_instant_for_non_utc_offsets() {
        let author = Author::try_from("Ada <ada@example.com> 1709280000 +0200").unwrap();

        assert_eq!(author.timestamp().timestamp(), 1709280000);
        assert_eq!(author.display(), "Ada <ada@example.com> 1709280000 +0200");
    }

    #[test]
    fn author_parse_rejects_malformed_offsets() {
        assert!(Author::try_from("Ada <ada@example.com> 1709280000 0200").is_err());
        assert!(Author::try_from("Ada <ada@example.com> 1709280000 +02:00").is_err());
    }
}
