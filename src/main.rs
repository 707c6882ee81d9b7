// bank - command-line front-end over a sled-backed ledger
//
// Account creation happens here (mint instantiates missing accounts):
// the ledger core itself never creates accounts.

use chainbank::account::{Account, AccountStore, Address, SledAccountStore};
use chainbank::coin::{Coin, Coins};
use chainbank::invariant::{nonnegative_balances, InvariantRegistry, NONNEGATIVE_BALANCES_ROUTE};
use chainbank::keeper::{Input, Output};
use chainbank::msg::{DispatchOutcome, Msg, MsgSend, MsgVerifyInvariant, Router};
use chainbank::params::Params;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bank", about = "Deterministic multi-asset ledger")]
struct Cli {
    /// Data directory for the ledger store
    #[arg(long, default_value = "./bankdata")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the store and persist the ledger params
    Init {
        /// Constant fee charged for invariant verification, e.g. 1000stake
        #[arg(long, default_value = "1000stake")]
        fee: String,
    },
    /// Print a fresh random address
    Keygen,
    /// Show the balance of an address
    Balance { address: String },
    /// Credit coins to an address, creating the account if needed
    Mint { address: String, coins: String },
    /// Transfer coins between two addresses
    Send {
        from: String,
        to: String,
        coins: String,
    },
    /// Multiparty transfer; legs are <address>:<coins>
    Multisend {
        #[arg(long = "input", required = true)]
        inputs: Vec<String>,
        #[arg(long = "output", required = true)]
        outputs: Vec<String>,
    },
    /// Charge the constant fee and run a registered invariant
    Verify {
        route: String,
        #[arg(long)]
        sender: String,
    },
    /// List registered invariant routes
    Invariants,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn build_registry() -> InvariantRegistry {
    let mut registry = InvariantRegistry::new();
    registry
        .register(NONNEGATIVE_BALANCES_ROUTE, nonnegative_balances)
        .unwrap_or_else(|err| error!(%err, "failed to register built-in invariant"));
    registry
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut store = SledAccountStore::open(&cli.data_dir)?;
    let params = store.load_params()?.unwrap_or_default();
    let router = Router::new(build_registry(), params);

    match cli.command {
        Command::Init { fee } => {
            let fee = Coin::parse(&fee)?;
            store.save_params(&Params::new(fee.clone()))?;
            store.flush()?;
            info!(%fee, "ledger initialized");
            println!("initialized ledger with constant fee {fee}");
        }
        Command::Keygen => {
            println!("{}", Address::generate());
        }
        Command::Balance { address } => {
            let addr = Address::parse(&address)?;
            let coins = router.keeper().coins(&store, &addr)?;
            if coins.is_empty() {
                println!("(empty)");
            } else {
                println!("{coins}");
            }
        }
        Command::Mint { address, coins } => {
            let addr = Address::parse(&address)?;
            let coins = Coins::parse(&coins)?;
            if store.account(&addr)?.is_none() {
                store.set_account(Account::new(addr))?;
            }
            router.keeper().add_coins(&mut store, &addr, &coins)?;
            store.flush()?;
            println!("minted {coins} to {addr}");
        }
        Command::Send { from, to, coins } => {
            let from = Address::parse(&from)?;
            let to = Address::parse(&to)?;
            let coins = Coins::parse(&coins)?;
            let msg = Msg::Send(MsgSend::new(
                vec![Input::new(from, coins.clone())],
                vec![Output::new(to, coins)],
            ));
            let outcome = router.dispatch(&mut store, &msg);
            return finish(&mut store, outcome);
        }
        Command::Multisend { inputs, outputs } => {
            let inputs = inputs
                .iter()
                .map(|leg| parse_leg(leg).map(|(addr, coins)| Input::new(addr, coins)))
                .collect::<Result<Vec<_>, _>>()?;
            let outputs = outputs
                .iter()
                .map(|leg| parse_leg(leg).map(|(addr, coins)| Output::new(addr, coins)))
                .collect::<Result<Vec<_>, _>>()?;
            let msg = Msg::Send(MsgSend::new(inputs, outputs));
            let outcome = router.dispatch(&mut store, &msg);
            return finish(&mut store, outcome);
        }
        Command::Verify { route, sender } => {
            let sender = Address::parse(&sender)?;
            let msg = Msg::VerifyInvariant(MsgVerifyInvariant::new(sender, route));
            let outcome = router.dispatch(&mut store, &msg);
            return finish(&mut store, outcome);
        }
        Command::Invariants => {
            for route in router.registry().routes() {
                println!("{route}");
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn finish(
    store: &mut SledAccountStore,
    outcome: DispatchOutcome,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match outcome {
        DispatchOutcome::Committed { tags } => {
            store.flush()?;
            for tag in &tags {
                println!("{}={}", tag.key(), tag.value());
            }
            Ok(ExitCode::SUCCESS)
        }
        DispatchOutcome::Rejected(err) => {
            eprintln!("rejected: {err}");
            Ok(ExitCode::FAILURE)
        }
        DispatchOutcome::Halted(halt) => {
            // Fatal: report and stop with a distinct exit code.
            error!(%halt, "ledger halted");
            eprintln!("HALT: {halt}");
            Ok(ExitCode::from(2))
        }
    }
}

fn parse_leg(leg: &str) -> Result<(Address, Coins), Box<dyn std::error::Error>> {
    let (addr_part, coins_part) = leg
        .split_once(':')
        .ok_or_else(|| format!("invalid leg '{leg}': expected <address>:<coins>"))?;
    Ok((Address::parse(addr_part)?, Coins::parse(coins_part)?))
}
