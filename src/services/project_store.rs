// src/services/project_store.rs
use crate::models::project::{NewProject, Project, ProjectStatus};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct ProjectStore;

impl ProjectStore {
    /// Insert a freshly uploaded project; the id is generated here
    pub async fn insert(pool: &SqlitePool, new: NewProject) -> Result<Project, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                id, product_image_path, person_media_path, person_media_type,
                product_name, product_description, product_category, product_price,
                generated_script, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&new.product_image_path)
        .bind(&new.person_media_path)
        .bind(new.person_media_type)
        .bind(&new.details.name)
        .bind(&new.details.description)
        .bind(&new.details.category)
        .bind(&new.details.price)
        .bind(&new.generated_script)
        .bind(ProjectStatus::Uploaded)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All projects, newest first
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Project>, sqlx::Error> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY created_at DESC")
            .fetch_all(pool)
            .await
    }

    /// Write every mutable column back (last write wins) and bump `updated_at`
    pub async fn save(pool: &SqlitePool, project: &mut Project) -> Result<(), sqlx::Error> {
        project.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE projects SET
                product_image_path = ?1, person_media_path = ?2, person_media_type = ?3,
                product_name = ?4, product_description = ?5, product_category = ?6,
                product_price = ?7, generated_script = ?8, generated_video_path = ?9,
                website_path = ?10, website_url = ?11, instagram_post_id = ?12,
                instagram_post_url = ?13, status = ?14, updated_at = ?15
            WHERE id = ?16
            "#,
        )
        .bind(&project.product_image_path)
        .bind(&project.person_media_path)
        .bind(project.person_media_type)
        .bind(&project.product_name)
        .bind(&project.product_description)
        .bind(&project.product_category)
        .bind(&project.product_price)
        .bind(&project.generated_script)
        .bind(&project.generated_video_path)
        .bind(&project.website_path)
        .bind(&project.website_url)
        .bind(&project.instagram_post_id)
        .bind(&project.instagram_post_url)
        .bind(project.status)
        .bind(project.updated_at)
        .bind(&project.id)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn set_status(
        pool: &SqlitePool,
        id: &str,
        status: ProjectStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE projects SET status = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::{PersonMediaType, ProductDetails};

    async fn memory_pool() -> SqlitePool {
        crate::db::connect("sqlite::memory:", 1).await.unwrap()
    }

    fn new_project(name: &str) -> NewProject {
        NewProject {
            product_image_path: "uploads/a_product_image.png".to_string(),
            person_media_path: "uploads/b_person_media.jpg".to_string(),
            person_media_type: PersonMediaType::Image,
            details: ProductDetails {
                name: name.to_string(),
                description: "Keeps drinks cold".to_string(),
                category: "Outdoors".to_string(),
                price: "$29".to_string(),
            },
            generated_script: "Wait for it! Cold drinks all day.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let pool = memory_pool().await;
        let project = ProjectStore::insert(&pool, new_project("Aero Bottle")).await.unwrap();

        assert_eq!(project.status, ProjectStatus::Uploaded);
        assert_eq!(project.id.len(), 36);
        assert_eq!(project.person_media_type, PersonMediaType::Image);
        assert!(project.generated_video_path.is_none());

        let fetched = ProjectStore::get(&pool, &project.id).await.unwrap().unwrap();
        assert_eq!(fetched.product_name, "Aero Bottle");
        assert_eq!(fetched.script(), Some("Wait for it! Cold drinks all day."));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let pool = memory_pool().await;
        assert!(ProjectStore::get(&pool, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let pool = memory_pool().await;
        let first = ProjectStore::insert(&pool, new_project("First")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = ProjectStore::insert(&pool, new_project("Second")).await.unwrap();

        let projects = ProjectStore::list(&pool).await.unwrap();
        let ids: Vec<_> = projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    }

    #[tokio::test]
    async fn test_save_and_set_status() {
        let pool = memory_pool().await;
        let mut project = ProjectStore::insert(&pool, new_project("Aero Bottle")).await.unwrap();
        let created = project.updated_at;

        project.generated_video_path = Some("generated/videos/x.mp4".to_string());
        project.status = ProjectStatus::VideoComplete;
        ProjectStore::save(&pool, &mut project).await.unwrap();
        assert!(project.updated_at >= created);

        ProjectStore::set_status(&pool, &project.id, ProjectStatus::WebsiteGenerating)
            .await
            .unwrap();

        let fetched = ProjectStore::get(&pool, &project.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, ProjectStatus::WebsiteGenerating);
        assert_eq!(fetched.generated_video_path.as_deref(), Some("generated/videos/x.mp4"));
    }
}
