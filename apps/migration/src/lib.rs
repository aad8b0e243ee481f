//! Schema migrations for the blog database.

pub use sea_orm_migration::prelude::*;

mod m20250127_000001_create_users_table;
mod m20250127_000002_create_categories_table;
mod m20250127_000003_create_posts_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250127_000001_create_users_table::Migration),
            Box::new(m20250127_000002_create_categories_table::Migration),
            Box::new(m20250127_000003_create_posts_table::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posts_run_after_their_parent_table() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        assert_eq!(
            names,
            [
                "m20250127_000001_create_users_table",
                "m20250127_000002_create_categories_table",
                "m20250127_000003_create_posts_table",
            ]
        );
    }
}
