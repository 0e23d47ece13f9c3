//! Initial schema migration - creates all tables from scratch.
//!
//! This is a consolidated migration that creates the complete schema for
//! Obolo:
//!
//! - `profiles`: people acting on the ledger (admin/treasurer/viewer)
//! - `accounts`: money locations with denormalized balances
//! - `ledger_entries`: the append-only journal of balance changes
//! - `pledges`: promised member contributions to projects
//! - `debts`: amounts owed to the organization
//! - `debt_payments`: immutable audit rows for debt repayments
//! - `products`: sellable stock items
//! - `sales` / `sale_items`: point-of-sale records

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
    Name,
    Role,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Name,
    OwnerProfileId,
    CurrentBalanceMinor,
    InitialBalanceMinor,
    CanReceivePayments,
}

#[derive(Iden)]
enum LedgerEntries {
    Table,
    Id,
    Kind,
    AccountId,
    AmountMinor,
    OccurredAt,
    Label,
    CreatedBy,
    InitMarker,
    PledgeId,
    DebtId,
    SaleId,
}

#[derive(Iden)]
enum Pledges {
    Table,
    Id,
    MemberId,
    ProjectId,
    OriginalAmountMinor,
    PaidAmountMinor,
    DueDate,
    Status,
    Comments,
    CreatedBy,
    LastPaymentAccountId,
}

#[derive(Iden)]
enum Debts {
    Table,
    Id,
    DebtorMemberId,
    CustomerName,
    SaleId,
    Description,
    OriginalAmountMinor,
    AmountDueMinor,
    DueDate,
    Status,
    Notes,
    CreatedBy,
}

#[derive(Iden)]
enum DebtPayments {
    Table,
    Id,
    DebtId,
    AmountMinor,
    PaidAt,
    Method,
    AccountId,
    Notes,
    CreatedBy,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    Name,
    PriceMinor,
    CurrentStock,
    ReorderPoint,
}

#[derive(Iden)]
enum Sales {
    Table,
    Id,
    CustomerName,
    OccurredAt,
    PaymentMethod,
    AccountId,
    Notes,
    TotalMinor,
    Settled,
    CreatedBy,
}

#[derive(Iden)]
enum SaleItems {
    Table,
    Id,
    SaleId,
    ProductId,
    Quantity,
    UnitPriceMinor,
    SubtotalMinor,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Profiles
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::Name).string().not_null())
                    .col(ColumnDef::new(Profiles::Role).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Accounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::Name).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::OwnerProfileId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::CurrentBalanceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::InitialBalanceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::CanReceivePayments)
                            .boolean()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-accounts-owner_profile_id")
                            .from(Accounts::Table, Accounts::OwnerProfileId)
                            .to(Profiles::Table, Profiles::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Ledger entries
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerEntries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LedgerEntries::Kind).string().not_null())
                    .col(
                        ColumnDef::new(LedgerEntries::AccountId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::OccurredAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LedgerEntries::Label).string().not_null())
                    .col(
                        ColumnDef::new(LedgerEntries::CreatedBy)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::InitMarker)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LedgerEntries::PledgeId).string())
                    .col(ColumnDef::new(LedgerEntries::DebtId).string())
                    .col(ColumnDef::new(LedgerEntries::SaleId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-ledger_entries-account_id")
                            .from(LedgerEntries::Table, LedgerEntries::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-account_id-occurred_at")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::AccountId)
                    .col(LedgerEntries::OccurredAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-pledge_id")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::PledgeId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Pledges
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Pledges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pledges::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pledges::MemberId).string().not_null())
                    .col(ColumnDef::new(Pledges::ProjectId).string().not_null())
                    .col(
                        ColumnDef::new(Pledges::OriginalAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Pledges::PaidAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Pledges::DueDate).date().not_null())
                    .col(ColumnDef::new(Pledges::Status).string().not_null())
                    .col(ColumnDef::new(Pledges::Comments).string())
                    .col(ColumnDef::new(Pledges::CreatedBy).string().not_null())
                    .col(ColumnDef::new(Pledges::LastPaymentAccountId).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-pledges-member_id")
                    .table(Pledges::Table)
                    .col(Pledges::MemberId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Debts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Debts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Debts::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Debts::DebtorMemberId).string())
                    .col(ColumnDef::new(Debts::CustomerName).string())
                    .col(ColumnDef::new(Debts::SaleId).string())
                    .col(ColumnDef::new(Debts::Description).string().not_null())
                    .col(
                        ColumnDef::new(Debts::OriginalAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Debts::AmountDueMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Debts::DueDate).date().not_null())
                    .col(ColumnDef::new(Debts::Status).string().not_null())
                    .col(ColumnDef::new(Debts::Notes).string())
                    .col(ColumnDef::new(Debts::CreatedBy).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Debt payments
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DebtPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DebtPayments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DebtPayments::DebtId).string().not_null())
                    .col(
                        ColumnDef::new(DebtPayments::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DebtPayments::PaidAt).timestamp().not_null())
                    .col(ColumnDef::new(DebtPayments::Method).string().not_null())
                    .col(ColumnDef::new(DebtPayments::AccountId).string().not_null())
                    .col(ColumnDef::new(DebtPayments::Notes).string())
                    .col(ColumnDef::new(DebtPayments::CreatedBy).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-debt_payments-debt_id")
                            .from(DebtPayments::Table, DebtPayments::DebtId)
                            .to(Debts::Table, Debts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-debt_payments-debt_id")
                    .table(DebtPayments::Table)
                    .col(DebtPayments::DebtId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Products
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Name).string().not_null())
                    .col(ColumnDef::new(Products::PriceMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Products::CurrentStock)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Products::ReorderPoint)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Sales
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sales::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Sales::CustomerName).string())
                    .col(ColumnDef::new(Sales::OccurredAt).timestamp().not_null())
                    .col(ColumnDef::new(Sales::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(Sales::AccountId).string().not_null())
                    .col(ColumnDef::new(Sales::Notes).string())
                    .col(ColumnDef::new(Sales::TotalMinor).big_integer().not_null())
                    .col(ColumnDef::new(Sales::Settled).boolean().not_null())
                    .col(ColumnDef::new(Sales::CreatedBy).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sales-account_id")
                            .from(Sales::Table, Sales::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 9. Sale items
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SaleItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SaleItems::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SaleItems::SaleId).string().not_null())
                    .col(ColumnDef::new(SaleItems::ProductId).string().not_null())
                    .col(ColumnDef::new(SaleItems::Quantity).big_integer().not_null())
                    .col(
                        ColumnDef::new(SaleItems::UnitPriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SaleItems::SubtotalMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sale_items-sale_id")
                            .from(SaleItems::Table, SaleItems::SaleId)
                            .to(Sales::Table, Sales::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sale_items-product_id")
                            .from(SaleItems::Table, SaleItems::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sale_items-sale_id")
                    .table(SaleItems::Table)
                    .col(SaleItems::SaleId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(SaleItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DebtPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Debts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Pledges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;
        Ok(())
    }
}
