#![allow(dead_code)]

pub const TEST_CHAIN_ID: u64 = 1;
pub const TEST_WALLET_HEX: &str = "0x5afe00000000000000000000000000000000c0de";
pub const HELLO_WORLD: &str = "Hello World!";
pub const HELLO_WORLD_CONTENT_HASH: &str = "0xec3608877ecbf8084c29896b7eab2a368b2b3c8d003288584d145613dfa4706c";

/// Owner private keys; addresses are sorted by the builders, not here.
pub const OWNER_KEYS: [[u8; 32]; 4] = [[0x11; 32], [0x22; 32], [0x33; 32], [0x44; 32]];

/// EIP-712 reference "Mail" example.
pub const MAIL_TYPED_DATA_JSON: &str = r#"{
  "types": {
    "EIP712Domain": [
      { "name": "name", "type": "string" },
      { "name": "version", "type": "string" },
      { "name": "chainId", "type": "uint256" },
      { "name": "verifyingContract", "type": "address" }
    ],
    "Person": [
      { "name": "name", "type": "string" },
      { "name": "wallet", "type": "address" }
    ],
    "Mail": [
      { "name": "from", "type": "Person" },
      { "name": "to", "type": "Person" },
      { "name": "contents", "type": "string" }
    ]
  },
  "primaryType": "Mail",
  "domain": {
    "name": "Ether Mail",
    "version": "1",
    "chainId": 1,
    "verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"
  },
  "message": {
    "from": { "name": "Cow", "wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826" },
    "to": { "name": "Bob", "wallet": "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB" },
    "contents": "Hello, Bob!"
  }
}"#;

pub const MAIL_SIGNING_HASH: &str = "0xbe609aee343fb3c4b28e1df9e632fca64fcfaede20f02e86244efddf30957bd2";
