use crate::areas::repository::Repository;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

/// Shortest prefix accepted for object lookup
const MIN_PREFIX_LENGTH: usize = 4;

impl Repository {
    /// Print a stored object in its textual form
    ///
    /// Accepts a full id or an unambiguous hex prefix of at least four
    /// characters.
    pub async fn cat_file(&mut self, spec: &str) -> anyhow::Result<()> {
        let oid = self.resolve_object_spec(spec)?;
        let object = self.get_object(&oid)?;

        write!(self.writer(), "{}", object.display())?;

        Ok(())
    }

    fn resolve_object_spec(&self, spec: &str) -> anyhow::Result<ObjectId> {
        // ids are stored lowercase, so match prefixes the same way
        let spec = spec.to_ascii_lowercase();
        let spec = spec.as_str();

        if spec.len() == OBJECT_ID_LENGTH {
            return ObjectId::try_parse(spec.to_string());
        }

        if spec.len() < MIN_PREFIX_LENGTH {
            anyhow::bail!(
                "object prefix '{spec}' is too short, need at least {MIN_PREFIX_LENGTH} characters"
            );
        }

        let mut matches = self.database().find_objects_by_prefix(spec)?;
        match matches.len() {
            0 => anyhow::bail!("no object matches prefix '{spec}'"),
            1 => Ok(matches.remove(0)),
            n => anyhow::bail!("object prefix '{spec}' is ambiguous ({n} candidates)"),
        }
    }
}
