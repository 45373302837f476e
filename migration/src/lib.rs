pub use sea_orm_migration::prelude::*;

mod m20261015_000001_employee;
mod m20261015_000002_compensation;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261015_000001_employee::Migration),
            Box::new(m20261015_000002_compensation::Migration),
        ]
    }
}
