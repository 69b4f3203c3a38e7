//! `SeaORM` Entity for regras_contabeis table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "regras_contabeis")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    pub origem: String,
    pub categoria_financeira_id: Option<i64>,
    pub subtipo: Option<String>,
    pub conta_debito_id: i64,
    pub conta_credito_id: i64,
    pub descricao: Option<String>,
    pub automatico: bool,
    pub ativo: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
