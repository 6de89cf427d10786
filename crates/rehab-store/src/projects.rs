use chrono::{DateTime, Utc};
use rehab_shared::constants::CURRENT_PROJECT_ID;
use rehab_shared::Project;
use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::ProjectRecord;

impl Database {
    /// Insert or fully replace the project row.
    pub fn upsert_project(&self, project: &Project) -> Result<()> {
        let data = serde_json::to_string(project)?;
        self.conn().execute(
            "INSERT INTO projects (id, title, data, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                 title = excluded.title,
                 data = excluded.data,
                 updated_at = excluded.updated_at",
            params![
                CURRENT_PROJECT_ID,
                project.meta.title,
                data,
                project.meta.updated_at.to_rfc3339(),
            ],
        )?;
        tracing::debug!(
            title = %project.meta.title,
            items = project.items.len(),
            "project row written"
        );
        Ok(())
    }

    pub fn get_project(&self) -> Result<ProjectRecord> {
        let (id, title, data, updated): (String, String, String, String) = self
            .conn()
            .query_row(
                "SELECT id, title, data, updated_at FROM projects WHERE id = ?1",
                params![CURRENT_PROJECT_ID],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })?;

        let project: Project = serde_json::from_str(&data)?;
        let updated_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&updated)?.with_timezone(&Utc);

        Ok(ProjectRecord {
            id,
            title,
            project,
            updated_at,
        })
    }

    pub fn delete_project(&self) -> Result<bool> {
        let affected = self.conn().execute(
            "DELETE FROM projects WHERE id = ?1",
            params![CURRENT_PROJECT_ID],
        )?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use rehab_shared::{ExerciseItem, ImageRef};

    use super::*;

    #[test]
    fn upsert_replaces_previous_record() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.get_project(), Err(StoreError::NotFound)));

        let mut project = Project::new("一つ目");
        project
            .items
            .push(ExerciseItem::new(0, "ブリッジ", ImageRef::None));
        db.upsert_project(&project).unwrap();

        let second = Project::new("二つ目");
        db.upsert_project(&second).unwrap();

        let record = db.get_project().unwrap();
        assert_eq!(record.id, CURRENT_PROJECT_ID);
        assert_eq!(record.title, "二つ目");
        assert!(record.project.items.is_empty());

        let rows: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn delete_reports_whether_a_row_existed() {
        let db = Database::open_in_memory().unwrap();
        assert!(!db.delete_project().unwrap());
        db.upsert_project(&Project::default()).unwrap();
        assert!(db.delete_project().unwrap());
        assert!(matches!(db.get_project(), Err(StoreError::NotFound)));
    }
}
