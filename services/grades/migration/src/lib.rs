use sea_orm_migration::prelude::*;

mod m20261001_000001_create_users;
mod m20261001_000002_create_courses;
mod m20261001_000003_create_enrollments;
mod m20261001_000004_create_feedbacks;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_users::Migration),
            Box::new(m20261001_000002_create_courses::Migration),
            Box::new(m20261001_000003_create_enrollments::Migration),
            Box::new(m20261001_000004_create_feedbacks::Migration),
        ]
    }
}
