/// Database models for Task Manager
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and credentials
/// - `status`: Named task statuses
/// - `label`: Named task labels (many-to-many with tasks)
/// - `task`: Tasks with author, status, optional performer and labels
///
/// Every foreign key between these tables is `ON DELETE RESTRICT`, so the
/// restriction policy in [`crate::restriction`] runs before any delete and
/// the database rejects deletes that race past it.
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::models::status::{CreateStatus, Status};
/// use taskmanager_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let status = Status::create(&pool, CreateStatus { name: "In progress".to_string() }).await?;
/// println!("Created status {}", status.id);
/// # Ok(())
/// # }
/// ```

pub mod label;
pub mod status;
pub mod task;
pub mod user;
