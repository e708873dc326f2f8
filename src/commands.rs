//! CLI command bodies.
//!
//! Each `*_core` function returns a [`CommandResult`]: a human-readable
//! summary plus a single-line JSON result. The wrappers in `main.rs` print
//! the summary to stderr and the JSON to stdout.

use anyhow::{Context, Result};
use bitcoin::Network;
use serde::Serialize;

use hdtag::{
    derive_private_path, derive_private_tagged, derive_public_tagged, list_receive_addresses,
    Bip44Path, DerivationPath, MasterKey, PrivateDerivationKey, PublicDerivationKey,
};

/// Result from a command, separating the readable summary from the JSON result
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Readable summary for the terminal
    pub output: String,
    /// Single-line JSON result
    pub result: String,
}

/// A derived key as printed by `master`, `tag`, `bip44` and `path`
#[derive(Serialize, Debug, Clone)]
pub struct KeyOutput {
    /// Compressed public key (hex, 33 bytes)
    pub public_key: String,
    /// Chain code (hex, 32 bytes)
    pub chain_code: String,
    /// 65-byte public serialization (hex)
    pub serialized: String,
    /// BIP-32 fingerprint (hex, 4 bytes)
    pub fingerprint: String,
    /// P2PKH address
    pub address: String,
    pub network: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// WIF private key, only with --show-secret
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wif: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct AddressEntry {
    pub index: u32,
    pub address: String,
    pub public_key: String,
}

/// Receive addresses of one BIP-44 account
#[derive(Serialize, Debug, Clone)]
pub struct AddressListOutput {
    pub coin: u32,
    pub account: u32,
    pub network: String,
    pub addresses: Vec<AddressEntry>,
    #[serde(rename = "type")]
    pub event_type: String,
}

/// Options shared by every command
pub struct KeySource<'a> {
    pub mnemonic: &'a str,
    pub passphrase: &'a str,
    pub network: Network,
}

impl KeySource<'_> {
    fn master(&self) -> Result<MasterKey> {
        MasterKey::from_mnemonic(self.mnemonic, self.passphrase)
            .context("Failed to build master key from mnemonic")
    }
}

fn network_name(network: Network) -> &'static str {
    match network {
        Network::Bitcoin => "mainnet",
        Network::Testnet => "testnet",
        Network::Signet => "signet",
        Network::Regtest => "regtest",
        _ => "unknown",
    }
}

fn public_output(
    public: &PublicDerivationKey,
    network: Network,
    event_type: &str,
) -> Result<KeyOutput> {
    let address = public
        .p2pkh_address(network)
        .context("Failed to build address")?;

    Ok(KeyOutput {
        public_key: hex::encode(public.to_compressed()),
        chain_code: hex::encode(public.chain_code()),
        serialized: hex::encode(public.to_bytes()),
        fingerprint: hex::encode(public.fingerprint()),
        address: address.to_string(),
        network: network_name(network).to_string(),
        path: None,
        tag: None,
        wif: None,
        event_type: event_type.to_string(),
    })
}

fn private_output(
    key: &PrivateDerivationKey,
    network: Network,
    show_secret: bool,
    event_type: &str,
) -> Result<KeyOutput> {
    let mut output = public_output(key.public_key()?, network, event_type)?;
    if show_secret {
        output.wif = Some(key.to_wif(network)?);
    }
    Ok(output)
}

fn summarize(title: &str, output: &KeyOutput) -> String {
    let mut out = String::new();
    out.push_str(&format!("{title}\n\n"));
    if let Some(path) = &output.path {
        out.push_str(&format!("Path:        {path}\n"));
    }
    if let Some(tag) = &output.tag {
        out.push_str(&format!("Tag:         {tag}\n"));
    }
    out.push_str(&format!("Fingerprint: {}\n", output.fingerprint));
    out.push_str(&format!("Public key:  {}\n", output.public_key));
    out.push_str(&format!("Chain code:  {}\n", output.chain_code));
    out.push_str(&format!("Address:     {} ({})\n", output.address, output.network));
    if output.wif.is_some() {
        out.push_str("\nNEVER share the WIF private key!\n");
    }
    out
}

fn finish(title: &str, output: KeyOutput) -> Result<CommandResult> {
    Ok(CommandResult {
        output: summarize(title, &output),
        result: serde_json::to_string(&output)?,
    })
}

// ============================================================================
// Commands
// ============================================================================

/// Master public key for a mnemonic
pub fn master_core(source: &KeySource, show_secret: bool) -> Result<CommandResult> {
    let master = source.master()?;
    let output = private_output(&master, source.network, show_secret, "master_key")?;
    finish("Master Key (BIP-32)", output)
}

/// Tag-derived child of the master key
///
/// With `public`, the child is derived from the master public key alone.
pub fn tag_core(
    source: &KeySource,
    tag: &str,
    public: bool,
    show_secret: bool,
) -> Result<CommandResult> {
    let master = source.master()?;

    let mut output = if public {
        let child = derive_public_tagged(master.public_key()?, tag)
            .with_context(|| format!("Failed to derive public child for tag '{tag}'"))?;
        public_output(&child, source.network, "tag_public_key")?
    } else {
        let child = derive_private_tagged(&master, tag)
            .with_context(|| format!("Failed to derive child for tag '{tag}'"))?;
        private_output(&child, source.network, show_secret, "tag_key")?
    };
    output.tag = Some(tag.to_string());

    finish("Tag-Derived Key", output)
}

/// Derive a key at an arbitrary path
pub fn path_core(source: &KeySource, path: &str, show_secret: bool) -> Result<CommandResult> {
    let path: DerivationPath = path
        .parse()
        .with_context(|| format!("Invalid derivation path '{path}'"))?;
    let master = source.master()?;

    let leaf = derive_private_path(&master, &path)
        .with_context(|| format!("Failed to derive {path}"))?;
    let mut output = private_output(&leaf, source.network, show_secret, "path_key")?;
    output.path = Some(path.to_string());

    finish("Derived Key", output)
}

/// Derive the BIP-44 leaf `m/44'/coin'/account'/channel/index`
pub fn bip44_core(
    source: &KeySource,
    bip44: &Bip44Path,
    show_secret: bool,
) -> Result<CommandResult> {
    let path = bip44.to_derivation_path()?;
    let master = source.master()?;

    let leaf = derive_private_path(&master, &path)
        .with_context(|| format!("Failed to derive {bip44}"))?;
    let mut output = private_output(&leaf, source.network, show_secret, "bip44_key")?;
    output.path = Some(path.to_string());

    finish("BIP-44 Key", output)
}

/// First `count` receive addresses of a BIP-44 account
pub fn addresses_core(
    source: &KeySource,
    coin: u32,
    account: u32,
    count: u32,
) -> Result<CommandResult> {
    let master = source.master()?;
    let listed = list_receive_addresses(&master, coin, account, count, source.network)
        .context("Failed to list receive addresses")?;

    let mut out = String::new();
    out.push_str(&format!(
        "Receive addresses for m/44'/{coin}'/{account}'/0 ({})\n\n",
        network_name(source.network)
    ));
    for (address, _, index) in &listed {
        out.push_str(&format!("  [{index}] {address}\n"));
    }

    let output = AddressListOutput {
        coin,
        account,
        network: network_name(source.network).to_string(),
        addresses: listed
            .into_iter()
            .map(|(address, public_key, index)| AddressEntry {
                index,
                address,
                public_key,
            })
            .collect(),
        event_type: "receive_addresses".to_string(),
    };

    Ok(CommandResult {
        output: out,
        result: serde_json::to_string(&output)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &str = "all all all all all all all all all all all all";

    fn source() -> KeySource<'static> {
        KeySource {
            mnemonic: ALL,
            passphrase: "",
            network: Network::Bitcoin,
        }
    }

    #[test]
    fn test_master_core_json() {
        let result = master_core(&source(), false).unwrap();
        let json: serde_json::Value = serde_json::from_str(&result.result).unwrap();
        assert_eq!(json["type"], "master_key");
        assert_eq!(
            json["public_key"],
            "03e3b30e8c21923752a408242e069941fedbaef7db7161f7e2c5f3fdafe7e25ddc"
        );
        assert!(json.get("wif").is_none());
    }

    #[test]
    fn test_tag_core_public_matches_private() {
        let private = tag_core(&source(), "test@user.net", false, false).unwrap();
        let public = tag_core(&source(), "test@user.net", true, false).unwrap();

        let a: serde_json::Value = serde_json::from_str(&private.result).unwrap();
        let b: serde_json::Value = serde_json::from_str(&public.result).unwrap();
        assert_eq!(a["serialized"], b["serialized"]);
        assert_eq!(
            a["public_key"],
            "03116c913ca1d674bf9d0d475330d904479ccb99d48444c054d44ea870fb0d2731"
        );
    }

    #[test]
    fn test_path_core_rejects_bad_path() {
        assert!(path_core(&source(), "m/44'/x", false).is_err());
    }

    #[test]
    fn test_bad_mnemonic() {
        let bad = KeySource {
            mnemonic: "not a real mnemonic",
            passphrase: "",
            network: Network::Bitcoin,
        };
        assert!(master_core(&bad, false).is_err());
    }
}
