use mkcrypt::{identify, CryptBackend, Crypter, DefaultBackend, Method, PortableCrypt, RoundsValue};

use std::error::Error;
use std::io;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
#[command(infer_subcommands = true)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    generate: GenerateArgs,

    /// Use the built-in hash implementations instead of the system library
    #[arg(long, global = true, env = "MKCRYPT_PORTABLE")]
    portable: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hash a password
    Generate(GenerateArgs),
    /// Print a new salt string
    Salt(SaltArgs),
    /// Check a password against a hash
    Validate(ValidateArgs),
    /// List supported methods, weakest first
    Methods,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scheme {
    Crypt,
    Md5,
    Blowfish,
    Sha256,
    Sha512,
}

impl Scheme {
    fn name(self) -> &'static str {
	match self {
	    Scheme::Crypt => "CRYPT",
	    Scheme::Md5 => "MD5",
	    Scheme::Blowfish => "BLOWFISH",
	    Scheme::Sha256 => "SHA256",
	    Scheme::Sha512 => "SHA512",
	}
    }
}

#[derive(Clone, Debug, Args)]
struct GenerateArgs {
    #[arg(long, short)]
    password: Option<String>,
    #[command(flatten)]
    salt: SaltArgs,
}

#[derive(Clone, Debug, Args)]
struct SaltArgs {
    /// Hashing method; the strongest supported one if not given
    #[arg(long, short, value_enum, env = "MKCRYPT_METHOD")]
    method: Option<Scheme>,
    /// Number of rounds, for methods which have them
    #[arg(long, short)]
    rounds: Option<RoundsValue>,
}

#[derive(Clone, Debug, Args)]
struct ValidateArgs {
    #[arg(long, short)]
    password: Option<String>,
    hash: String
}

// Prefer the revision the backend supports, e.g. for Blowfish.
fn resolve_method<B: CryptBackend>(crypter: &Crypter<B>, scheme: Option<Scheme>) -> Option<Method> {
    let name = scheme?.name();
    crypter.capabilities().by_name(name).or_else(|| name.parse().ok())
}

fn make_salt<B: CryptBackend>(crypter: &Crypter<B>, SaltArgs{ method, rounds }: SaltArgs) -> Result<String, Box<dyn Error>> {
    let method = resolve_method(crypter, method);
    Ok(crypter.mksalt(method, rounds)?)
}

fn generate<B: CryptBackend>(crypter: &Crypter<B>, GenerateArgs{ password, salt }: GenerateArgs) -> Result<(), Box<dyn Error>> {
    let salt = make_salt(crypter, salt)?;
    let pw = prompt_password(password, true)?;
    match crypter.crypt(pw, &salt) {
	Some(hash) => println!("{}", hash),
	None => {
	    let method = identify(&salt).map_or_else(|| salt.clone(), |m| m.to_string());
	    return Err(format!("hashing backend can't compute {} hashes", method).into());
	},
    }
    Ok(())
}

fn validate<B: CryptBackend>(crypter: &Crypter<B>, ValidateArgs{ password, hash }: ValidateArgs) -> io::Result<()> {
    let pw = prompt_password(password, false)?;
    if crypter.crypt(pw, &hash).as_deref() == Some(hash.as_str()) {
	println!("valid");
    } else {
	println!("not valid");
    }
    Ok(())
}

fn list_methods<B: CryptBackend>(crypter: &Crypter<B>) {
    for m in crypter.methods() {
	println!("{:<9} {:<3} salt={:<2} size={}", m.name(), m.ident().unwrap_or("-"), m.salt_chars(), m.total_size());
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
	.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
	.with_writer(io::stderr)
	.init();
    let backend: Box<dyn CryptBackend> = if cli.portable {
	Box::new(PortableCrypt)
    } else {
	Box::new(DefaultBackend::default())
    };
    let crypter = Crypter::new(backend);
    let cmd = cli.command.unwrap_or(Commands::Generate(cli.generate));
    match cmd {
	Commands::Generate(args) => generate(&crypter, args)?,
	Commands::Salt(args) => println!("{}", make_salt(&crypter, args)?),
	Commands::Validate(args) => validate(&crypter, args)?,
	Commands::Methods => list_methods(&crypter),
    };
    Ok(())
}

fn prompt_password(password: Option<String>, confirm: bool) -> io::Result<String> {
    match password {
	Some(pw) => Ok(pw),
	None if !confirm => rpassword::prompt_password("Password: "),
	None => loop {
	    let pw = rpassword::prompt_password("Enter new password: ")?;
	    let confirmed = rpassword::prompt_password("Retype new password: ")?;
	    if pw == confirmed {
		return Ok(pw)
	    }
	    println!("Error: Passwords don't match!")
	}
    }
}
