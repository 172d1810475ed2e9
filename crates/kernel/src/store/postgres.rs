//! PostgreSQL repositories.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{AdminRepository, Repository, StoreError};
use crate::models::{Admin, Bird, Product};

async fn ping(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

async fn delete_from(pool: &PgPool, table: &str, id: Uuid) -> Result<bool, StoreError> {
    let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Birds table.
#[derive(Clone)]
pub struct PgBirdRepository {
    pool: PgPool,
}

impl PgBirdRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Bird> for PgBirdRepository {
    async fn find_all(&self) -> Result<Vec<Bird>, StoreError> {
        let birds = sqlx::query_as::<_, Bird>("SELECT * FROM birds ORDER BY breed")
            .fetch_all(&self.pool)
            .await?;
        Ok(birds)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Bird>, StoreError> {
        let bird = sqlx::query_as::<_, Bird>("SELECT * FROM birds WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(bird)
    }

    async fn save(&self, bird: &Bird) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO birds (id, breed, name, price, description, images, created, changed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                breed = EXCLUDED.breed,
                name = EXCLUDED.name,
                price = EXCLUDED.price,
                description = EXCLUDED.description,
                images = EXCLUDED.images,
                changed = EXCLUDED.changed
            "#,
        )
        .bind(bird.id)
        .bind(&bird.breed)
        .bind(&bird.name)
        .bind(bird.price)
        .bind(&bird.description)
        .bind(&bird.images)
        .bind(bird.created)
        .bind(bird.changed)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        delete_from(&self.pool, "birds", id).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        ping(&self.pool).await
    }
}

/// Products table.
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Product> for PgProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn save(&self, product: &Product) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, category, price, description, created, changed)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                category = EXCLUDED.category,
                price = EXCLUDED.price,
                description = EXCLUDED.description,
                changed = EXCLUDED.changed
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price)
        .bind(&product.description)
        .bind(product.created)
        .bind(product.changed)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        delete_from(&self.pool, "products", id).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        ping(&self.pool).await
    }
}

/// Admins table. `username` carries a unique constraint.
#[derive(Clone)]
pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Admin> for PgAdminRepository {
    async fn find_all(&self) -> Result<Vec<Admin>, StoreError> {
        let admins = sqlx::query_as::<_, Admin>("SELECT * FROM admins ORDER BY username")
            .fetch_all(&self.pool)
            .await?;
        Ok(admins)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>, StoreError> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(admin)
    }

    async fn save(&self, admin: &Admin) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO admins (id, username, pass, added_by, updated_by, created, changed)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                username = EXCLUDED.username,
                pass = EXCLUDED.pass,
                updated_by = EXCLUDED.updated_by,
                changed = EXCLUDED.changed
            "#,
        )
        .bind(admin.id)
        .bind(&admin.username)
        .bind(&admin.pass)
        .bind(&admin.added_by)
        .bind(&admin.updated_by)
        .bind(admin.created)
        .bind(admin.changed)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        delete_from(&self.pool, "admins", id).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        ping(&self.pool).await
    }
}

#[async_trait]
impl AdminRepository for PgAdminRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, StoreError> {
        let admin = sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(admin)
    }
}
