use std::error::Error;

use clap::{Args, Parser, Subcommand};
use ledger::{Ledger, Money, ProfileRole};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "obolo_admin")]
#[command(about = "Admin utilities for Obolo (bootstrap profiles/accounts, audit balances)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./obolo.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Profile(Profile),
    Account(Account),
    Product(Product),
    /// Compare stored balances against the ledger and report drift.
    Audit,
    /// Rewrite every stored balance from the ledger.
    Recompute,
}

#[derive(Args, Debug)]
struct Profile {
    #[command(subcommand)]
    command: ProfileCommand,
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    Create(ProfileCreateArgs),
}

#[derive(Args, Debug)]
struct ProfileCreateArgs {
    #[arg(long)]
    name: String,
    /// One of: admin, treasurer, viewer.
    #[arg(long, default_value = "treasurer")]
    role: String,
}

#[derive(Args, Debug)]
struct Account {
    #[command(subcommand)]
    command: AccountCommand,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    Create(AccountCreateArgs),
}

#[derive(Args, Debug)]
struct AccountCreateArgs {
    /// Profile id acting as the owner.
    #[arg(long)]
    actor: Uuid,
    #[arg(long)]
    name: String,
    /// Opening balance, e.g. "1250.00".
    #[arg(long, default_value = "0")]
    balance: Money,
    #[arg(long)]
    receives_payments: bool,
}

#[derive(Args, Debug)]
struct Product {
    #[command(subcommand)]
    command: ProductCommand,
}

#[derive(Subcommand, Debug)]
enum ProductCommand {
    Create(ProductCreateArgs),
}

#[derive(Args, Debug)]
struct ProductCreateArgs {
    #[arg(long)]
    actor: Uuid,
    #[arg(long)]
    name: String,
    /// Unit price, e.g. "3.50".
    #[arg(long)]
    price: Money,
    #[arg(long, default_value_t = 0)]
    stock: i64,
    #[arg(long, default_value_t = 0)]
    reorder_point: i64,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let ledger = Ledger::builder().database(db).build();

    match cli.command {
        Command::Profile(Profile {
            command: ProfileCommand::Create(args),
        }) => {
            let role = match ProfileRole::try_from(args.role.as_str()) {
                Ok(role) => role,
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
            };
            let id = ledger.create_profile(&args.name, role).await?;
            println!("created profile: {} ({id})", args.name);
        }
        Command::Account(Account {
            command: AccountCommand::Create(args),
        }) => {
            let id = ledger
                .create_account(
                    &args.name,
                    args.balance.minor(),
                    args.receives_payments,
                    args.actor,
                )
                .await?;
            println!("created account: {} ({id})", args.name);
        }
        Command::Product(Product {
            command: ProductCommand::Create(args),
        }) => {
            let id = ledger
                .create_product(
                    &args.name,
                    args.price.minor(),
                    args.stock,
                    args.reorder_point,
                    args.actor,
                )
                .await?;
            println!("created product: {} ({id})", args.name);
        }
        Command::Audit => {
            let drifted = ledger.audit_balances().await?;
            if drifted.is_empty() {
                println!("all balances match the ledger");
            } else {
                for drift in drifted {
                    let stored = Money::from_minor(drift.stored_minor);
                    let computed = Money::from_minor(drift.computed_minor);
                    println!(
                        "{} ({}): stored {} vs computed {} (off by {})",
                        drift.name,
                        drift.account_id,
                        stored,
                        computed,
                        stored - computed,
                    );
                }
                std::process::exit(1);
            }
        }
        Command::Recompute => {
            ledger.recompute_balances().await?;
            println!("balances recomputed from the ledger");
        }
    }

    Ok(())
}
