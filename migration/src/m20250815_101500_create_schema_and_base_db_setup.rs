use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create the board's schema
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS noticeboard;")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("SET search_path TO noticeboard, public;")
            .await?;

        // Grant the application's DB user access to everything in the schema
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    GRANT ALL ON SCHEMA noticeboard TO noticeboard;

                    ALTER DEFAULT PRIVILEGES IN SCHEMA noticeboard GRANT ALL ON TABLES TO noticeboard;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA noticeboard GRANT ALL ON SEQUENCES TO noticeboard;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA noticeboard GRANT ALL ON FUNCTIONS TO noticeboard;
                END $$;
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Revoke default privileges first
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    ALTER DEFAULT PRIVILEGES IN SCHEMA noticeboard REVOKE ALL ON FUNCTIONS FROM noticeboard;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA noticeboard REVOKE ALL ON SEQUENCES FROM noticeboard;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA noticeboard REVOKE ALL ON TABLES FROM noticeboard;
                    REVOKE ALL ON SCHEMA noticeboard FROM noticeboard;
                END $$;
            "#,
            )
            .await?;

        // Drop the schema (CASCADE will remove all objects in it)
        manager
            .get_connection()
            .execute_unprepared("DROP SCHEMA IF EXISTS noticeboard CASCADE;")
            .await?;

        Ok(())
    }
}
