//! Posting schema: chart of accounts, financial entries, accounting rules and
//! the journal.
//!
//! Built with the schema builder so the same migration runs on PostgreSQL and
//! on the SQLite databases used by tests.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ====================================================================
        // CHART OF ACCOUNTS
        // ====================================================================
        manager
            .create_table(
                Table::create()
                    .table(PlanoContas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlanoContas::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlanoContas::TenantId).big_integer().not_null())
                    .col(ColumnDef::new(PlanoContas::Codigo).string_len(30).not_null())
                    .col(ColumnDef::new(PlanoContas::Nome).string_len(200).not_null())
                    .col(ColumnDef::new(PlanoContas::TipoConta).string_len(30).not_null())
                    .col(
                        ColumnDef::new(PlanoContas::Ativo)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_plano_contas_tenant_codigo")
                    .table(PlanoContas::Table)
                    .col(PlanoContas::TenantId)
                    .col(PlanoContas::Codigo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ====================================================================
        // FINANCIAL ENTRIES
        // ====================================================================
        manager
            .create_table(
                Table::create()
                    .table(LancamentosFinanceiros::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LancamentosFinanceiros::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LancamentosFinanceiros::TenantId).big_integer().not_null())
                    .col(ColumnDef::new(LancamentosFinanceiros::Tipo).string_len(30).not_null())
                    .col(ColumnDef::new(LancamentosFinanceiros::Descricao).text().not_null())
                    .col(
                        ColumnDef::new(LancamentosFinanceiros::Valor)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(LancamentosFinanceiros::DataLancamento).date().not_null())
                    .col(ColumnDef::new(LancamentosFinanceiros::DataVencimento).date().null())
                    .col(
                        ColumnDef::new(LancamentosFinanceiros::Status)
                            .string_len(20)
                            .not_null()
                            .default("pendente"),
                    )
                    .col(ColumnDef::new(LancamentosFinanceiros::EntidadeId).big_integer().null())
                    .col(ColumnDef::new(LancamentosFinanceiros::CategoriaId).big_integer().null())
                    .col(ColumnDef::new(LancamentosFinanceiros::Subtipo).string_len(50).null())
                    .col(
                        ColumnDef::new(LancamentosFinanceiros::ContaFinanceiraId)
                            .big_integer()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_lancamentos_financeiros_tenant")
                    .table(LancamentosFinanceiros::Table)
                    .col(LancamentosFinanceiros::TenantId)
                    .col(LancamentosFinanceiros::DataLancamento)
                    .to_owned(),
            )
            .await?;

        // ====================================================================
        // ACCOUNTING RULES
        // ====================================================================
        // Rule accounts are not foreign keys: a rule may be configured before
        // its accounts exist, and the journal lines enforce the reference.
        manager
            .create_table(
                Table::create()
                    .table(RegrasContabeis::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RegrasContabeis::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RegrasContabeis::TenantId).big_integer().not_null())
                    .col(ColumnDef::new(RegrasContabeis::Origem).string_len(30).not_null())
                    .col(
                        ColumnDef::new(RegrasContabeis::CategoriaFinanceiraId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(RegrasContabeis::Subtipo).string_len(50).null())
                    .col(ColumnDef::new(RegrasContabeis::ContaDebitoId).big_integer().not_null())
                    .col(ColumnDef::new(RegrasContabeis::ContaCreditoId).big_integer().not_null())
                    .col(ColumnDef::new(RegrasContabeis::Descricao).text().null())
                    .col(
                        ColumnDef::new(RegrasContabeis::Automatico)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(RegrasContabeis::Ativo)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_regras_contabeis_lookup")
                    .table(RegrasContabeis::Table)
                    .col(RegrasContabeis::TenantId)
                    .col(RegrasContabeis::Origem)
                    .to_owned(),
            )
            .await?;

        // ====================================================================
        // JOURNAL
        // ====================================================================
        manager
            .create_table(
                Table::create()
                    .table(LancamentosContabeis::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LancamentosContabeis::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LancamentosContabeis::TenantId).big_integer().not_null())
                    .col(ColumnDef::new(LancamentosContabeis::DataLancamento).date().not_null())
                    .col(ColumnDef::new(LancamentosContabeis::Historico).text().not_null())
                    .col(ColumnDef::new(LancamentosContabeis::ClienteId).big_integer().null())
                    .col(ColumnDef::new(LancamentosContabeis::FornecedorId).big_integer().null())
                    .col(
                        ColumnDef::new(LancamentosContabeis::ContaFinanceiraId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LancamentosContabeis::TotalDebitos)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LancamentosContabeis::TotalCreditos)
                            .decimal_len(15, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LancamentosContabeis::LancamentoFinanceiroId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LancamentosContabeis::CriadoEm)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lancamentos_contabeis_origem")
                            .from(
                                LancamentosContabeis::Table,
                                LancamentosContabeis::LancamentoFinanceiroId,
                            )
                            .to(LancamentosFinanceiros::Table, LancamentosFinanceiros::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    // Headers must balance
                    .check(
                        Expr::col(LancamentosContabeis::TotalDebitos)
                            .eq(Expr::col(LancamentosContabeis::TotalCreditos)),
                    )
                    .to_owned(),
            )
            .await?;

        // One journal entry per financial entry
        manager
            .create_index(
                Index::create()
                    .name("uq_lancamentos_contabeis_origem")
                    .table(LancamentosContabeis::Table)
                    .col(LancamentosContabeis::TenantId)
                    .col(LancamentosContabeis::LancamentoFinanceiroId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LancamentosContabeisLinhas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LancamentosContabeisLinhas::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LancamentosContabeisLinhas::LancamentoId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LancamentosContabeisLinhas::ContaId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LancamentosContabeisLinhas::Debito)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LancamentosContabeisLinhas::Credito)
                            .decimal_len(15, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(LancamentosContabeisLinhas::Historico).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_linhas_lancamento")
                            .from(
                                LancamentosContabeisLinhas::Table,
                                LancamentosContabeisLinhas::LancamentoId,
                            )
                            .to(LancamentosContabeis::Table, LancamentosContabeis::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_linhas_conta")
                            .from(
                                LancamentosContabeisLinhas::Table,
                                LancamentosContabeisLinhas::ContaId,
                            )
                            .to(PlanoContas::Table, PlanoContas::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_linhas_lancamento")
                    .table(LancamentosContabeisLinhas::Table)
                    .col(LancamentosContabeisLinhas::LancamentoId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LancamentosContabeisLinhas::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LancamentosContabeis::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RegrasContabeis::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LancamentosFinanceiros::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlanoContas::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum PlanoContas {
    Table,
    Id,
    TenantId,
    Codigo,
    Nome,
    TipoConta,
    Ativo,
}

#[derive(DeriveIden)]
enum LancamentosFinanceiros {
    Table,
    Id,
    TenantId,
    Tipo,
    Descricao,
    Valor,
    DataLancamento,
    DataVencimento,
    Status,
    EntidadeId,
    CategoriaId,
    Subtipo,
    ContaFinanceiraId,
}

#[derive(DeriveIden)]
enum RegrasContabeis {
    Table,
    Id,
    TenantId,
    Origem,
    CategoriaFinanceiraId,
    Subtipo,
    ContaDebitoId,
    ContaCreditoId,
    Descricao,
    Automatico,
    Ativo,
}

#[derive(DeriveIden)]
enum LancamentosContabeis {
    Table,
    Id,
    TenantId,
    DataLancamento,
    Historico,
    ClienteId,
    FornecedorId,
    ContaFinanceiraId,
    TotalDebitos,
    TotalCreditos,
    LancamentoFinanceiroId,
    CriadoEm,
}

#[derive(DeriveIden)]
enum LancamentosContabeisLinhas {
    Table,
    Id,
    LancamentoId,
    ContaId,
    Debito,
    Credito,
    Historico,
}
