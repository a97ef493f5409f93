use clap::Parser;

mod commands;

/// hashlock: build and redeem SHA-256 hash-locked P2WSH outputs
#[derive(Parser)]
#[command(name = "hashlock", version, about)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Generate a fresh signing key
    Keygen(commands::KeygenArgs),
    /// Derive the witness script, output script and address of a lock
    Lock(commands::LockArgs),
    /// Check a secret against the commitment in a witness script
    CheckSecret(commands::CheckSecretArgs),
    /// Sign a transaction spending a locked output
    Redeem(commands::RedeemArgs),
    /// Print the structure of a raw transaction
    Decode(commands::DecodeArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Keygen(args) => commands::keygen(args),
        Commands::Lock(args) => commands::lock(args),
        Commands::CheckSecret(args) => commands::check_secret(args),
        Commands::Redeem(args) => commands::redeem(args),
        Commands::Decode(args) => commands::decode(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
