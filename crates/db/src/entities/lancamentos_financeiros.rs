//! `SeaORM` Entity for lancamentos_financeiros table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lancamentos_financeiros")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    pub tipo: String,
    pub descricao: String,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub valor: Decimal,
    pub data_lancamento: Date,
    pub data_vencimento: Option<Date>,
    pub status: String,
    pub entidade_id: Option<i64>,
    pub categoria_id: Option<i64>,
    pub subtipo: Option<String>,
    pub conta_financeira_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lancamentos_contabeis::Entity")]
    LancamentosContabeis,
}

impl Related<super::lancamentos_contabeis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LancamentosContabeis.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
