//! Index derivation checked against the `bitcoin` crate's BIP-32 implementation

use bitcoin::bip32::{DerivationPath as BtcPath, Xpriv};
use bitcoin::secp256k1::Secp256k1;
use bitcoin::Network;
use hdtag::{
    derive_bip44_address, derive_private_path, derive_public_path, Bip44Path, DerivationPath,
    MasterKey,
};

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn seed() -> [u8; 64] {
    bip39::Mnemonic::parse_in(bip39::Language::English, ABANDON)
        .unwrap()
        .to_seed("")
}

fn check_path(path: &str) {
    let secp = Secp256k1::new();
    let seed = seed();

    let reference_root = Xpriv::new_master(Network::Bitcoin, &seed).unwrap();
    let reference_path: BtcPath = path.parse().unwrap();
    let reference = reference_root.derive_priv(&secp, &reference_path).unwrap();

    let master = MasterKey::from_seed(&seed).unwrap();
    let path: DerivationPath = path.parse().unwrap();
    let ours = derive_private_path(&master, &path).unwrap();

    assert_eq!(
        *ours.scalar().unwrap(),
        reference.private_key.secret_bytes(),
        "scalar mismatch at {path}"
    );
    assert_eq!(
        &ours.chain_code().unwrap(),
        reference.chain_code.as_bytes(),
        "chain code mismatch at {path}"
    );
}

#[test]
fn test_master_matches_xpriv() {
    check_path("m");
}

#[test]
fn test_bip44_path_matches_xpriv() {
    check_path("m/44'/0'/0'/0/0");
    check_path("m/44'/0'/0'/1/7");
    check_path("m/44'/60'/2'/0/19");
}

#[test]
fn test_mixed_paths_match_xpriv() {
    check_path("m/0");
    check_path("m/0'/1/2'/2/1000000000");
    check_path("m/2147483647'/1");
}

#[test]
fn test_public_path_matches_reference_pubkey() {
    let secp = Secp256k1::new();
    let seed = seed();

    let reference_root = Xpriv::new_master(Network::Bitcoin, &seed).unwrap();
    let reference_path: BtcPath = "m/44'/0'/0'/0/3".parse().unwrap();
    let reference = reference_root.derive_priv(&secp, &reference_path).unwrap();
    let reference_pubkey = reference.private_key.public_key(&secp);

    let master = MasterKey::from_seed(&seed).unwrap();
    let account = derive_private_path(&master, &"m/44'/0'/0'".parse().unwrap()).unwrap();
    let leaf = derive_public_path(account.public_key().unwrap(), &"m/0/3".parse().unwrap())
        .unwrap();

    assert_eq!(leaf.to_public_key().unwrap(), reference_pubkey);
}

#[test]
fn test_wif_and_addresses() {
    let master = MasterKey::from_mnemonic(ABANDON, "").unwrap();
    let path = Bip44Path::receive(0, 0, 0);

    let (address, _) = derive_bip44_address(&master, &path, Network::Bitcoin).unwrap();
    assert_eq!(address.to_string(), "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");

    let leaf = derive_private_path(&master, &path.to_derivation_path().unwrap()).unwrap();
    assert_eq!(
        leaf.to_wif(Network::Bitcoin).unwrap(),
        "L4p2b9VAf8k5aUahF1JCJUzZkgNEAqLfq8DDdQiyAprQAKSbu8hf"
    );

    let segwit = leaf
        .public_key()
        .unwrap()
        .p2wpkh_address(Network::Bitcoin)
        .unwrap();
    assert!(segwit.to_string().starts_with("bc1q"));

    let testnet = leaf
        .public_key()
        .unwrap()
        .p2pkh_address(Network::Testnet)
        .unwrap()
        .to_string();
    assert!(testnet.starts_with('m') || testnet.starts_with('n'));
}
