//! `SeaORM` Entity for plano_contas table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plano_contas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    pub codigo: String,
    pub nome: String,
    pub tipo_conta: String,
    pub ativo: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lancamentos_contabeis_linhas::Entity")]
    LancamentosContabeisLinhas,
}

impl Related<super::lancamentos_contabeis_linhas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LancamentosContabeisLinhas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
