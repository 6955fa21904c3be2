use sea_orm::{Database, DatabaseConnection};

use crate::config::db::{db_url, DbOwner, DbProfile};
use crate::AppError;

/// Unified database connector that supports different profiles and owners.
/// This function does NOT run any migrations.
pub async fn connect_db(
    profile: DbProfile,
    owner: DbOwner,
) -> Result<DatabaseConnection, AppError> {
    let database_url = db_url(profile, owner)?;

    let conn = Database::connect(&database_url).await?;
    Ok(conn)
}
