//! `SeaORM` Entity for lancamentos_contabeis_linhas table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lancamentos_contabeis_linhas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub lancamento_id: i64,
    pub conta_id: i64,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub debito: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub credito: Decimal,
    pub historico: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lancamentos_contabeis::Entity",
        from = "Column::LancamentoId",
        to = "super::lancamentos_contabeis::Column::Id",
        on_delete = "Cascade"
    )]
    LancamentosContabeis,
    #[sea_orm(
        belongs_to = "super::plano_contas::Entity",
        from = "Column::ContaId",
        to = "super::plano_contas::Column::Id"
    )]
    PlanoContas,
}

impl Related<super::lancamentos_contabeis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LancamentosContabeis.def()
    }
}

impl Related<super::plano_contas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanoContas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
