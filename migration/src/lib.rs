pub use sea_orm_migration::prelude::*;

mod m20250815_101500_create_schema_and_base_db_setup;
mod m20250815_102000_create_noticeboard_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250815_101500_create_schema_and_base_db_setup::Migration),
            Box::new(m20250815_102000_create_noticeboard_tables::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_setup_runs_before_table_creation() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        assert_eq!(
            names,
            vec![
                "m20250815_101500_create_schema_and_base_db_setup".to_string(),
                "m20250815_102000_create_noticeboard_tables".to_string(),
            ]
        );
    }
}
