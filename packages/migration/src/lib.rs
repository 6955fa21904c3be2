pub use sea_orm_migration::prelude::*;
pub use sea_orm_migration::sea_orm;
pub use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseConnection};

mod m20260823_000001_init; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260823_000001_init::Migration)]
    }
}

#[derive(Debug)]
pub enum MigrationCommand {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

/// Migration runner that bypasses environment parsing.
/// Used by both the CLI and tests.
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    let applied_before = count_applied_migrations(db).await.unwrap_or(0);
    let defined = Migrator::migrations().len();

    tracing::info!("cmd={command:?}: {defined} migration(s) defined, {applied_before} applied");

    let result = match command {
        MigrationCommand::Up => Migrator::up(db, None).await,
        MigrationCommand::Down => Migrator::down(db, None).await,
        MigrationCommand::Fresh => Migrator::fresh(db).await,
        MigrationCommand::Reset => Migrator::reset(db).await,
        MigrationCommand::Refresh => Migrator::refresh(db).await,
        MigrationCommand::Status => Migrator::status(db).await,
    };

    match result {
        Ok(()) => {
            if !matches!(command, MigrationCommand::Status) {
                let applied_after = count_applied_migrations(db).await.unwrap_or(0);
                tracing::info!("{command:?} OK, {applied_after} migration(s) now applied");
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("{command:?} failed: {e}");
            Err(e)
        }
    }
}

/// Count the number of migrations that have been applied to the database.
/// Returns 0 if the migration table doesn't exist yet.
pub async fn count_applied_migrations(db: &DatabaseConnection) -> Result<usize, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.len()),
        Err(DbErr::Exec(_)) => Ok(0), // Migration table doesn't exist yet
        Err(e) => Err(e),
    }
}

/// Get the version string of the latest applied migration.
/// Returns None if no migrations have been applied or the migration table doesn't exist.
pub async fn get_latest_migration_version(
    db: &DatabaseConnection,
) -> Result<Option<String>, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.last().map(|m| m.name().to_string())),
        Err(DbErr::Exec(_)) => Ok(None), // Migration table doesn't exist yet
        Err(e) => Err(e),
    }
}
