use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "dapp-cli")]
#[command(about = "Command-line client for the XRPL EVM dApp service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Network status and session assessment
    Status,
    /// Connected address and balance
    Account,
    /// Report a provider login for an address
    Connect {
        #[arg(long)]
        address: String,
    },
    /// Log out of the session provider
    Disconnect,
    /// Ask the wallet to switch networks (mainnet or testnet)
    Switch {
        #[arg(long)]
        network: String,
    },
    /// Submit a native-value transfer
    Send {
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: String,
    },
    /// Show the current transfer form and record
    Transfer,
    /// Start a new transfer after the last one finished
    Reset,
    /// Open a provider view (Connect, Account, Networks)
    Open {
        #[arg(long)]
        view: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Status => client.get(format!("{}/api/status", base)),
        Commands::Account => client.get(format!("{}/api/account", base)),
        Commands::Connect { address } => client
            .post(format!("{}/api/session/connect", base))
            .json(&json!({ "address": address })),
        Commands::Disconnect => client.post(format!("{}/api/session/disconnect", base)),
        Commands::Switch { network } => client
            .post(format!("{}/api/network/switch", base))
            .json(&json!({ "network": network })),
        Commands::Send { to, amount } => client
            .post(format!("{}/api/transfer", base))
            .json(&json!({ "recipient": to, "amount": amount })),
        Commands::Transfer => client.get(format!("{}/api/transfer", base)),
        Commands::Reset => client.post(format!("{}/api/transfer/reset", base)),
        Commands::Open { view } => client
            .post(format!("{}/api/modal", base))
            .json(&json!({ "view": view })),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
