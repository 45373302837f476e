use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    #[sea_orm(indexed)]
    pub department: String,
    /// JSON array of report identifiers, unresolved.
    pub direct_reports: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::compensation::Entity")]
    Compensation,
}

impl Related<super::compensation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Compensation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
