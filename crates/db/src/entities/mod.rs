//! `SeaORM` entity definitions.
//!
//! One module per table. Column names follow the stored schema.

pub mod lancamentos_contabeis;
pub mod lancamentos_contabeis_linhas;
pub mod lancamentos_financeiros;
pub mod plano_contas;
pub mod regras_contabeis;
