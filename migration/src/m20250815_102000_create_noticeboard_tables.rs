use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Enum types backing the entity active enums. The string values must
        // stay in lockstep with entity/src/{users,announcements,timetable_entries}.rs.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE noticeboard.role AS ENUM (
                    'student',
                    'staff',
                    'admin'
                )",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE noticeboard.priority AS ENUM (
                    'low',
                    'normal',
                    'high',
                    'urgent'
                )",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE noticeboard.day_of_week AS ENUM (
                    'Monday',
                    'Tuesday',
                    'Wednesday',
                    'Thursday',
                    'Friday',
                    'Saturday',
                    'Sunday'
                )",
            )
            .await?;

        let create_users_sql = r#"
            CREATE TABLE IF NOT EXISTS noticeboard.users (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL UNIQUE,
                password VARCHAR(255) NOT NULL,
                role noticeboard.role NOT NULL DEFAULT 'student',
                department VARCHAR(255),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_users_sql)
            .await?;

        let create_announcements_sql = r#"
            CREATE TABLE IF NOT EXISTS noticeboard.announcements (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                title VARCHAR(255) NOT NULL,
                content TEXT NOT NULL,
                author_id UUID NOT NULL
                    REFERENCES noticeboard.users(id),
                image TEXT,
                department VARCHAR(255) NOT NULL DEFAULT 'General',
                priority noticeboard.priority NOT NULL DEFAULT 'normal',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_announcements_sql)
            .await?;

        let create_campus_events_sql = r#"
            CREATE TABLE IF NOT EXISTS noticeboard.campus_events (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                title VARCHAR(255) NOT NULL,
                description TEXT NOT NULL,
                start_date TIMESTAMPTZ NOT NULL,
                end_date TIMESTAMPTZ NOT NULL,
                venue VARCHAR(255) NOT NULL,
                organizer_id UUID NOT NULL
                    REFERENCES noticeboard.users(id),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_campus_events_sql)
            .await?;

        let create_timetable_entries_sql = r#"
            CREATE TABLE IF NOT EXISTS noticeboard.timetable_entries (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                course_code VARCHAR(50) NOT NULL,
                course_title VARCHAR(255) NOT NULL,
                day_of_week noticeboard.day_of_week NOT NULL,
                start_time VARCHAR(5) NOT NULL,
                end_time VARCHAR(5) NOT NULL,
                venue VARCHAR(255) NOT NULL,
                lecturer VARCHAR(255),
                department VARCHAR(255) NOT NULL DEFAULT 'General',
                level INTEGER NOT NULL,
                created_by UUID NOT NULL
                    REFERENCES noticeboard.users(id),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_timetable_entries_sql)
            .await?;

        // Indexes matching each collection's index query ordering
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_announcements_created_at
                    ON noticeboard.announcements (created_at DESC)",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_campus_events_start_date
                    ON noticeboard.campus_events (start_date ASC)",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_timetable_entries_day_start
                    ON noticeboard.timetable_entries (day_of_week ASC, start_time ASC)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Tables first (they depend on the enum types), children before users
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS noticeboard.timetable_entries")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS noticeboard.campus_events")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS noticeboard.announcements")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS noticeboard.users")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS noticeboard.day_of_week")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS noticeboard.priority")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS noticeboard.role")
            .await?;

        Ok(())
    }
}
