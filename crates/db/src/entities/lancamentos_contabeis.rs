//! `SeaORM` Entity for lancamentos_contabeis table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lancamentos_contabeis")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: i64,
    pub data_lancamento: Date,
    pub historico: String,
    pub cliente_id: Option<i64>,
    pub fornecedor_id: Option<i64>,
    pub conta_financeira_id: Option<i64>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub total_debitos: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub total_creditos: Decimal,
    pub lancamento_financeiro_id: Option<i64>,
    pub criado_em: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lancamentos_contabeis_linhas::Entity")]
    LancamentosContabeisLinhas,
    #[sea_orm(
        belongs_to = "super::lancamentos_financeiros::Entity",
        from = "Column::LancamentoFinanceiroId",
        to = "super::lancamentos_financeiros::Column::Id"
    )]
    LancamentosFinanceiros,
}

impl Related<super::lancamentos_contabeis_linhas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LancamentosContabeisLinhas.def()
    }
}

impl Related<super::lancamentos_financeiros::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LancamentosFinanceiros.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
