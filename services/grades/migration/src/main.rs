use sea_orm_migration::prelude::*;

use gradebook_grades_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
