use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hdtag::{parse_network, Bip44Path};

mod commands;

use commands::{CommandResult, KeySource};

#[derive(Parser)]
#[command(name = "hdtag")]
#[command(about = "hdtag - tag-based and BIP-32/BIP-44 key derivation on secp256k1", long_about = None)]
struct Cli {
    /// BIP-39 mnemonic (English)
    #[arg(long, global = true, env = "HDTAG_MNEMONIC", hide_env_values = true)]
    mnemonic: Option<String>,

    /// BIP-39 passphrase
    #[arg(
        long,
        global = true,
        env = "HDTAG_PASSPHRASE",
        hide_env_values = true,
        default_value = ""
    )]
    passphrase: String,

    /// Network for addresses and WIF (mainnet, testnet, signet, regtest)
    #[arg(long, global = true, env = "HDTAG_NETWORK", default_value = "mainnet")]
    network: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the master key for the mnemonic
    Master {
        /// Include the WIF private key
        #[arg(long, default_value = "false")]
        show_secret: bool,
    },

    /// Derive a child key from a UTF-8 tag
    Tag {
        /// Tag (e.g. an email address or service name)
        #[arg(long)]
        tag: String,

        /// Derive from the master public key only
        #[arg(long, default_value = "false", conflicts_with = "show_secret")]
        public: bool,

        /// Include the WIF private key
        #[arg(long, default_value = "false")]
        show_secret: bool,
    },

    /// Derive the BIP-44 key m/44'/coin'/account'/channel/index
    Bip44 {
        /// Coin type (0 = Bitcoin)
        #[arg(long, default_value = "0")]
        coin: u32,

        #[arg(long, default_value = "0")]
        account: u32,

        /// 0 = receive, 1 = change
        #[arg(long, default_value = "0")]
        channel: u32,

        #[arg(long, default_value = "0")]
        index: u32,

        /// Include the WIF private key
        #[arg(long, default_value = "false")]
        show_secret: bool,
    },

    /// Derive a key at an arbitrary path (e.g. m/0'/1/2')
    Path {
        #[arg(long)]
        path: String,

        /// Include the WIF private key
        #[arg(long, default_value = "false")]
        show_secret: bool,
    },

    /// List receive addresses of a BIP-44 account
    Addresses {
        #[arg(long, default_value = "0")]
        coin: u32,

        #[arg(long, default_value = "0")]
        account: u32,

        /// Number of addresses (at most 1000)
        #[arg(long, default_value = "5")]
        count: u32,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_result(cmd_result: CommandResult) {
    eprintln!("{}", cmd_result.output);
    println!("{}", cmd_result.result);
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mnemonic = cli
        .mnemonic
        .ok_or_else(|| anyhow::anyhow!("No mnemonic given. Use --mnemonic or HDTAG_MNEMONIC."))?;
    let source = KeySource {
        mnemonic: &mnemonic,
        passphrase: &cli.passphrase,
        network: parse_network(&cli.network)?,
    };

    let cmd_result = match cli.command {
        Commands::Master { show_secret } => commands::master_core(&source, show_secret)?,
        Commands::Tag {
            tag,
            public,
            show_secret,
        } => commands::tag_core(&source, &tag, public, show_secret)?,
        Commands::Bip44 {
            coin,
            account,
            channel,
            index,
            show_secret,
        } => {
            let path = Bip44Path::new(coin, account, channel, index);
            commands::bip44_core(&source, &path, show_secret)?
        }
        Commands::Path { path, show_secret } => {
            commands::path_core(&source, &path, show_secret)?
        }
        Commands::Addresses {
            coin,
            account,
            count,
        } => commands::addresses_core(&source, coin, account, count)?,
    };

    print_result(cmd_result);
    Ok(())
}
