use sea_orm_migration::prelude::*;

use crate::m20261015_000001_employee::Employee;

#[derive(DeriveIden)]
enum Compensation {
    Table,
    EmployeeId,
    Salary,
    EffectiveDate,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Compensation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Compensation::EmployeeId)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Compensation::Salary).double().not_null())
                    .col(
                        ColumnDef::new(Compensation::EffectiveDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Compensation::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_compensation_employee")
                            .from(Compensation::Table, Compensation::EmployeeId)
                            .to(Employee::Table, Employee::EmployeeId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Compensation::Table).to_owned())
            .await
    }
}
