use clap::{Args, Parser, Subcommand};
use msig_core::application::{LoggingObserver, MessageSigningCoordinator, SignatureVerifier};
use msig_core::domain::{content_hash, safe_message_hash, RawMessage};
use msig_core::foundation::util::result_ext::ResultExt;
use msig_core::foundation::{ContentHash, SignatureBytes, SigningError, WalletScopedHash};
use msig_core::infrastructure::collection::{HttpCollectionService, SignatureCollectionService};
use msig_core::infrastructure::config::{load_app_config, load_app_config_from_path, AppConfig};
use msig_core::infrastructure::logging::init_logger;
use msig_core::infrastructure::rpc::{EvmWalletContract, WalletContract};
use msig_core::infrastructure::transport::LocalKeyTransport;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "msig")]
#[command(about = "Collect and verify multi-owner wallet signatures for off-chain messages")]
struct Cli {
    /// Config file path (defaults to `$MSIG_DATA_DIR/msig.toml`).
    #[arg(long, env = "MSIG_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Log filter expression, overriding `logging.filters` (e.g. `debug`, `msig_core=trace,reqwest=info`).
    #[arg(long)]
    log_filters: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the content hash and wallet-scoped hash of a message.
    Hash {
        #[command(flatten)]
        input: MessageInput,

        /// Compute the wallet-scoped hash locally instead of calling the wallet contract.
        #[arg(long)]
        offline: bool,
    },
    /// Show the collection record for a wallet-scoped hash.
    Status { hash: WalletScopedHash },
    /// Sign a message with the local owner key, wait for the threshold and verify the result.
    Sign {
        #[command(flatten)]
        input: MessageInput,
    },
    /// Check an aggregate signature against a content hash with `isValidSignature`.
    Verify {
        #[arg(long)]
        hash: ContentHash,

        #[arg(long)]
        signature: SignatureBytes,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct MessageInput {
    /// Plain text message.
    #[arg(long)]
    text: Option<String>,

    /// Path to an EIP-712 typed data JSON file.
    #[arg(long)]
    typed_data: Option<PathBuf>,
}

impl MessageInput {
    fn load(&self) -> Result<RawMessage, SigningError> {
        match (&self.text, &self.typed_data) {
            (Some(text), _) => Ok(RawMessage::text(text.clone())),
            (None, Some(path)) => RawMessage::typed_data_from_json(&std::fs::read_to_string(path)?),
            (None, None) => Err(SigningError::MalformedMessage("either --text or --typed-data is required".to_string())),
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig, SigningError> {
    match &cli.config {
        Some(path) => load_app_config_from_path(path),
        None => load_app_config(),
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), SigningError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    match run(&cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            let context = err.context();
            log::error!("msig failed code={:?} error={}", context.code, context.message);
            eprintln!("error[{:?}]: {}", context.code, context.message);
            std::process::exit(2);
        }
    }
}

/// Returns `Ok(false)` when a signature check completed but did not verify.
async fn run(cli: &Cli) -> Result<bool, SigningError> {
    let config = load_config(cli)?;
    let filters = cli.log_filters.clone().unwrap_or_else(|| config.logging.filters.clone());
    init_logger(config.logging.dir.as_deref(), &filters)?;

    log::info!("msig starting chain_id={} command={:?}", config.wallet.chain_id, cli.command);

    match &cli.command {
        Command::Hash { input, offline } => {
            let wallet = config.wallet_address()?;
            let message = input.load()?;
            let hash = content_hash(&message)?;
            let scoped = if *offline {
                safe_message_hash(config.wallet.chain_id, &wallet, &hash)
            } else {
                EvmWalletContract::connect_http(&config.wallet.rpc_url)?.message_hash(&wallet, &hash).await?
            };
            print_json(&json!({ "contentHash": hash, "walletScopedHash": scoped }))?;
        }
        Command::Status { hash } => {
            let service = HttpCollectionService::new(&config.collection)?;
            let state = service.get_message(hash).await.required(|| SigningError::NotFound { hash: hash.to_string() })?;
            print_json(&serde_json::to_value(&state)?)?;
        }
        Command::Sign { input } => {
            let wallet = config.wallet_address()?;
            let message = input.load()?;
            let contract = Arc::new(EvmWalletContract::connect_http(&config.wallet.rpc_url)?);
            let service = Arc::new(HttpCollectionService::new(&config.collection)?);
            let transport =
                Arc::new(LocalKeyTransport::from_env(&config.transport.owner_key_env, config.wallet.chain_id, service.clone())?);
            let coordinator = MessageSigningCoordinator::new(wallet, contract, service, transport, config.polling)
                .with_observer(Arc::new(LoggingObserver));

            let signed = coordinator.sign_and_verify(message).await?;
            print_json(&json!({
                "contentHash": signed.content_hash,
                "walletScopedHash": signed.wallet_scoped_hash,
                "confirmationsSubmitted": signed.state.confirmations_submitted,
                "confirmationsRequired": signed.state.confirmations_required,
                "signature": signed.state.final_signature,
                "verified": signed.verified,
            }))?;
            return Ok(signed.verified);
        }
        Command::Verify { hash, signature } => {
            let wallet = config.wallet_address()?;
            let contract = Arc::new(EvmWalletContract::connect_http(&config.wallet.rpc_url)?);
            let verified = SignatureVerifier::new(contract).verify(&wallet, hash, signature.as_bytes()).await?;
            print_json(&json!({ "contentHash": hash, "verified": verified }))?;
            return Ok(verified);
        }
    }
    Ok(true)
}
