use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub(crate) enum Employee {
    Table,
    EmployeeId,
    FirstName,
    LastName,
    Position,
    Department,
    DirectReports,
    CreatedAt,
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
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employee::EmployeeId)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employee::FirstName).string_len(128).not_null())
                    .col(ColumnDef::new(Employee::LastName).string_len(128).not_null())
                    .col(ColumnDef::new(Employee::Position).string_len(128).not_null())
                    .col(ColumnDef::new(Employee::Department).string_len(128).not_null())
                    .col(ColumnDef::new(Employee::DirectReports).json().not_null())
                    .col(
                        ColumnDef::new(Employee::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employee::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employee_department")
                    .table(Employee::Table)
                    .col(Employee::Department)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employee::Table).to_owned())
            .await
    }
}
