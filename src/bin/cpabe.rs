//! A thin dispatcher over the four BSW algorithms, reading and writing
//! files at the fixed paths from `spec.md` S:6. No flags beyond the
//! subcommand itself.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::error;

use cpabe::codec;
use cpabe::envelope::{self, EnvelopeMode};
use cpabe::error::Result;
use cpabe::policy::Policy;
use cpabe::schemes::bsw;

const PUBLIC_KEY_PATH: &str = "out/utils/public_key";
const MASTER_SECRET_KEY_PATH: &str = "out/utils/master_secret_key";
const ATTRIBUTES_PATH: &str = "in/utils/attributes";
const USER_PRIVATE_KEY_PATH: &str = "out/utils/user_private_key";
const ACCESS_POLICY_PATH: &str = "in/utils/access_policy";
const INPUT_FILE_PATH: &str = "in/files/input_file.txt";
const ENCRYPTED_FILE_PATH: &str = "out/files/encrypted_input.bin";
const CIPHERTEXT_PATH: &str = "out/utils/ciphertext";
const DECRYPTED_FILE_PATH: &str = "out/files/decrypted_file.txt";

#[derive(Parser)]
#[command(name = "cpabe", about = "Ciphertext-Policy Attribute-Based Encryption")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a fresh public key and master secret key.
    Setup,
    /// Generate a user private key for the attributes in `in/utils/attributes`.
    Keygen,
    /// Encrypt `in/files/input_file.txt` under `in/utils/access_policy`.
    Encrypt,
    /// Decrypt `out/files/encrypted_input.bin` with the user's private key.
    Decrypt,
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn run_setup() -> Result<()> {
    let (pk, msk) = bsw::setup();
    let pk_path = PathBuf::from(PUBLIC_KEY_PATH);
    let msk_path = PathBuf::from(MASTER_SECRET_KEY_PATH);
    ensure_parent_dir(&pk_path)?;
    ensure_parent_dir(&msk_path)?;
    codec::export(&pk, &pk_path)?;
    codec::export(&msk, &msk_path)?;
    Ok(())
}

fn run_keygen() -> Result<()> {
    let pk: bsw::PublicKey = codec::import(Path::new(PUBLIC_KEY_PATH))?;
    let msk: bsw::MasterKey = codec::import(Path::new(MASTER_SECRET_KEY_PATH))?;
    let attributes: Vec<String> = codec::import(Path::new(ATTRIBUTES_PATH))?;
    let uk = bsw::keygen(&pk, &msk, &attributes)?;
    let uk_path = PathBuf::from(USER_PRIVATE_KEY_PATH);
    ensure_parent_dir(&uk_path)?;
    codec::export(&uk, &uk_path)?;
    Ok(())
}

fn run_encrypt() -> Result<()> {
    let pk: bsw::PublicKey = codec::import(Path::new(PUBLIC_KEY_PATH))?;
    let policy: Policy = codec::import(Path::new(ACCESS_POLICY_PATH))?;

    let encrypted_path = PathBuf::from(ENCRYPTED_FILE_PATH);
    ensure_parent_dir(&encrypted_path)?;
    let m = envelope::encrypt_file(
        Path::new(INPUT_FILE_PATH),
        &encrypted_path,
        EnvelopeMode::Random,
        pk.g1,
        pk.g2,
    )?;

    let ciphertext = bsw::encrypt(&pk, m, &policy)?;
    let ct_path = PathBuf::from(CIPHERTEXT_PATH);
    ensure_parent_dir(&ct_path)?;
    codec::export(&ciphertext, &ct_path)?;
    Ok(())
}

fn run_decrypt() -> Result<()> {
    let pk: bsw::PublicKey = codec::import(Path::new(PUBLIC_KEY_PATH))?;
    let uk: bsw::UserKey = codec::import(Path::new(USER_PRIVATE_KEY_PATH))?;
    let ciphertext = codec::import_ciphertext(Path::new(CIPHERTEXT_PATH))?;

    let m = bsw::decrypt(&pk, &uk, &ciphertext)?;

    let decrypted_path = PathBuf::from(DECRYPTED_FILE_PATH);
    ensure_parent_dir(&decrypted_path)?;
    envelope::decrypt_file(Path::new(ENCRYPTED_FILE_PATH), &decrypted_path, &m)?;
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Setup => run_setup(),
        Command::Keygen => run_keygen(),
        Command::Encrypt => run_encrypt(),
        Command::Decrypt => run_decrypt(),
    };

    if let Err(err) = result {
        error!("{err}");
        eprintln!("cpabe: {err}");
        std::process::exit(1);
    }
}
