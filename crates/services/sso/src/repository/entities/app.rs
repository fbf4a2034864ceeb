//! Application database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::App;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "apps")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub secret: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for App {
    fn from(model: Model) -> Self {
        App {
            id: model.id,
            name: model.name,
            secret: model.secret,
        }
    }
}
