//! Database migrations for the contacts service

use sea_orm_migration::prelude::*;

mod m20241101_000001_create_users;
mod m20241101_000002_create_contacts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241101_000001_create_users::Migration),
            Box::new(m20241101_000002_create_contacts::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectOptions, ConnectionTrait, Database, Statement};

    #[test]
    fn migration_names_are_unique() {
        let names: Vec<String> = Migrator::migrations().iter().map(|m| m.name().to_string()).collect();
        assert_eq!(
            names,
            vec!["m20241101_000001_create_users", "m20241101_000002_create_contacts"]
        );
    }

    #[tokio::test]
    async fn fresh_database_records_every_migration() {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();

        Migrator::up(&db, None).await.unwrap();

        let rows = db
            .query_all(Statement::from_string(
                db.get_database_backend(),
                "SELECT version FROM seaql_migrations ORDER BY version",
            ))
            .await
            .unwrap();
        let versions: Vec<String> = rows
            .iter()
            .map(|row| row.try_get::<String>("", "version").unwrap())
            .collect();
        assert_eq!(
            versions,
            vec!["m20241101_000001_create_users", "m20241101_000002_create_contacts"]
        );
        assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());
    }
}
