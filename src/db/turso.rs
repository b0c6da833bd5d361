use crate::db::traits::{NewUser, UserRepository};
use crate::types::{AppError, PublicUser, Result, Role};
use async_trait::async_trait;
use chrono::Utc;
use libsql::{Builder, Connection, Database, Row};

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, role, created_at, updated_at";

/// libsql-backed user store (local file, in-memory, or remote Turso).
pub struct TursoClient {
    // Keeps the database handle alive for the shared connection.
    _db: Database,
    conn: Connection,
}

impl TursoClient {
    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Turso: {}", e)))?;

        Self::from_database(db).await
    }

    pub async fn new_local(path: &str) -> Result<Self> {
        if path != ":memory:" {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::Database(format!(
                            "Failed to create database directory {}: {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }
            }
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database {}: {}", path, e)))?;

        Self::from_database(db).await
    }

    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    async fn from_database(db: Database) -> Result<Self> {
        // A single shared connection; an in-memory database lives only as long as it does.
        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let client = Self { _db: db, conn };
        client.initialize_schema().await?;

        Ok(client)
    }

    pub fn connection(&self) -> Result<Connection> {
        Ok(self.conn.clone())
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                role TEXT NOT NULL CHECK (role IN ('CLIENT', 'LAWYER')),
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        Ok(())
    }

    async fn query_one(&self, sql: &str, param: &str) -> Result<Option<User>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(sql, [param])
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Some(row) => Ok(Some(User::from_row(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserRepository for TursoClient {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.query_one(
            &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
            email,
        )
        .await
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<PublicUser>> {
        Ok(self
            .query_one(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS), id)
            .await?
            .map(PublicUser::from))
    }

    async fn create_user(&self, user: NewUser) -> Result<PublicUser> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO users (id, email, password_hash, first_name, last_name, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            (
                user.id.as_str(),
                user.email.as_str(),
                user.password_hash.as_str(),
                user.first_name.as_str(),
                user.last_name.as_str(),
                user.role.as_str(),
                now,
                now,
            ),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create user: {}", e)))?;

        Ok(PublicUser {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        })
    }
}

/// Full `users` row. Carries the password hash, so it never leaves the
/// repository and auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    fn from_row(row: &Row) -> Result<Self> {
        let role: String = row.get(5).map_err(|e| AppError::Database(e.to_string()))?;

        Ok(User {
            id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
            email: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
            password_hash: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
            first_name: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
            last_name: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
            role: role
                .parse()
                .map_err(|_| AppError::Database(format!("Unknown role in users table: {}", role)))?,
            created_at: row.get(6).map_err(|e| AppError::Database(e.to_string()))?,
            updated_at: row.get(7).map_err(|e| AppError::Database(e.to_string()))?,
        })
    }
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        }
    }
}
