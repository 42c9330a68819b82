// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use altinn_test_tokens::certificates::{thumbprint_of, PemDirectoryStore};
use anyhow::{Context, Result};
use clap::Parser;
use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};

/// Generate an RSA signing key for one environment
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Environment the key signs tokens for, e.g. tt02
    #[clap(long)]
    env: String,

    /// Directory the <env>.pem file is written to
    #[clap(long, default_value = "./certificates")]
    out_dir: PathBuf,

    /// Also write the public key as <env>.pub.pem
    #[clap(long)]
    with_public_key: bool,

    /// RSA key length in bits
    #[clap(long, default_value = "2048")]
    length: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.env.is_empty() || args.env.contains(&['/', '\\'][..]) || args.env.contains("..") {
        anyhow::bail!("Invalid environment name: {:?}", args.env);
    }

    println!("Generating RSA key pair with {} bits...", args.length);

    let mut rng = rsa::rand_core::OsRng;
    let private_key =
        RsaPrivateKey::new(&mut rng, args.length).context("Failed to generate RSA private key")?;
    let public_key = RsaPublicKey::from(&private_key);

    let private_pem = private_key
        .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
        .context("Failed to encode private key to PEM")?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create directory {:?}", args.out_dir))?;

    let store = PemDirectoryStore::new(&args.out_dir);
    let private_path = store.key_path(&args.env);
    let mut private_file = File::create(&private_path)
        .with_context(|| format!("Failed to create private key file at {:?}", private_path))?;
    private_file
        .write_all(private_pem.as_bytes())
        .context("Failed to write private key to file")?;
    println!("Private key written to: {:?}", private_path);

    if args.with_public_key {
        let public_pem = public_key
            .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
            .context("Failed to encode public key to PEM")?;
        let public_path = args.out_dir.join(format!("{}.pub.pem", args.env));
        fs::write(&public_path, public_pem.as_bytes())
            .with_context(|| format!("Failed to write public key to {:?}", public_path))?;
        println!("Public key written to: {:?}", public_path);
    }

    let thumbprint = thumbprint_of(&public_key).context("Failed to compute thumbprint")?;
    println!();
    println!("Thumbprint (kid / x5c): {}", thumbprint);

    Ok(())
}
