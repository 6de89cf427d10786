use chrono::{DateTime, Utc};
use rehab_shared::{ImageBlob, ImageId, ImageMime};
use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::ImageRecord;

impl Database {
    /// Insert an image, replacing any record with the same id.
    pub fn insert_image(&self, id: &ImageId, blob: &ImageBlob, file_name: Option<&str>) -> Result<()> {
        let hash = blake3::hash(blob.data()).to_hex().to_string();
        self.conn().execute(
            "INSERT OR REPLACE INTO images (id, mime, data, blake3_hash, file_name, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id.as_str(),
                blob.mime().as_str(),
                &blob.data()[..],
                hash,
                file_name,
                Utc::now().to_rfc3339(),
            ],
        )?;
        tracing::debug!(image_id = %id, mime = %blob.mime(), size = blob.len(), "image stored");
        Ok(())
    }

    /// Fetch one image, verifying its content hash.
    pub fn get_image(&self, id: &ImageId) -> Result<ImageRecord> {
        let record = self
            .conn()
            .query_row(
                "SELECT id, mime, data, blake3_hash, file_name, created_at
                 FROM images
                 WHERE id = ?1",
                params![id.as_str()],
                row_to_image,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })?;

        let actual = blake3::hash(record.blob.data()).to_hex().to_string();
        if actual != record.blake3_hash {
            tracing::warn!(image_id = %id, "image content hash mismatch");
            return Err(StoreError::Corrupt {
                id: id.to_string(),
            });
        }
        Ok(record)
    }

    pub fn list_image_ids(&self) -> Result<Vec<ImageId>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT id FROM images ORDER BY created_at, id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(ImageId::from(row?));
        }
        Ok(ids)
    }

    pub fn delete_image(&self, id: &ImageId) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM images WHERE id = ?1", params![id.as_str()])?;
        Ok(affected > 0)
    }
}

fn row_to_image(row: &rusqlite::Row<'_>) -> rusqlite::Result<ImageRecord> {
    let id: String = row.get(0)?;
    let mime_str: String = row.get(1)?;
    let data: Vec<u8> = row.get(2)?;
    let blake3_hash: String = row.get(3)?;
    let file_name: Option<String> = row.get(4)?;
    let created_str: String = row.get(5)?;

    let mime = ImageMime::parse(&mime_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e)))?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e)))?;

    Ok(ImageRecord {
        id: ImageId::from(id),
        blob: ImageBlob::new(data, mime),
        blake3_hash,
        file_name,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

    #[test]
    fn insert_get_delete() {
        let db = Database::open_in_memory().unwrap();
        let id = ImageId::generate();
        let blob = ImageBlob::new(PNG.to_vec(), ImageMime::Png);

        db.insert_image(&id, &blob, Some("スクワット")).unwrap();
        let record = db.get_image(&id).unwrap();
        assert_eq!(record.blob, blob);
        assert_eq!(record.file_name.as_deref(), Some("スクワット"));
        assert_eq!(db.list_image_ids().unwrap(), vec![id.clone()]);

        assert!(db.delete_image(&id).unwrap());
        assert!(!db.delete_image(&id).unwrap());
        assert!(matches!(db.get_image(&id), Err(StoreError::NotFound)));
    }

    #[test]
    fn tampered_bytes_are_reported_corrupt() {
        let db = Database::open_in_memory().unwrap();
        let id = ImageId::from("img-1");
        db.insert_image(&id, &ImageBlob::new(PNG.to_vec(), ImageMime::Png), None)
            .unwrap();
        db.conn()
            .execute(
                "UPDATE images SET data = ?1 WHERE id = ?2",
                params![b"\x89PNG\r\n\x1a\nXX".to_vec(), "img-1"],
            )
            .unwrap();
        assert!(matches!(db.get_image(&id), Err(StoreError::Corrupt { .. })));
    }
}
