// Copyright 2025 Fondazione LINKS

// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at

//     http://www.apache.org/licenses/LICENSE-2.0

// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use digest::HashMarker;
use elliptic_curve::hash2curve::{ExpandMsg, ExpandMsgXmd, ExpandMsgXof};
use sha2::Sha256;
use sha3::Shake256;

/// Domain separation and hashing choices of a deployment.
///
/// Prover, Verifier and issuer must agree on the ciphersuite: every generator,
/// attribute hash, marker hash and Fiat-Shamir challenge is derived through it.
pub trait DeidCiphersuite: Clone + Copy + PartialEq + Eq + core::fmt::Debug + Send + Sync + 'static {
    const ID: &'static [u8];
    const GENERATOR_SEED: &'static [u8];
    const GENERATOR_SEED_DST: &'static [u8];
    const GENERATOR_DST: &'static [u8];
    const UNIQUENESS_SEED: &'static [u8];
    const LINKAGE_SEED: &'static [u8];
    const BLINDING_SEED: &'static [u8];
    const MESSAGE_DST: &'static [u8];
    const MARKER_DST: &'static [u8];
    const CHALLENGE_DST: &'static [u8];
    const TABLE_KEY_DST: &'static [u8];
    const KEYGEN_DST: &'static [u8];
    const IKM_LEN: usize = 32;
    const EXPAND_LEN: usize = 48;
    type HashAlg: HashMarker;
    type Expander: for<'a> ExpandMsg<'a>;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Bls12381Shake256 {}
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Bls12381Sha256 {}

impl DeidCiphersuite for Bls12381Shake256 {
    const ID: &'static [u8] = b"DEID_BLS12381_XOF:SHAKE-256_SSWU_RO_";
    const GENERATOR_SEED: &'static [u8] = b"DEID_BLS12381_XOF:SHAKE-256_SSWU_RO_MESSAGE_GENERATOR_SEED";
    const GENERATOR_SEED_DST: &'static [u8] = b"DEID_BLS12381_XOF:SHAKE-256_SSWU_RO_SIG_GENERATOR_SEED_";
    const GENERATOR_DST: &'static [u8] = b"DEID_BLS12381_XOF:SHAKE-256_SSWU_RO_SIG_GENERATOR_DST_";
    const UNIQUENESS_SEED: &'static [u8] = b"DEID_BLS12381_XOF:SHAKE-256_SSWU_RO_UNIQUENESS_H";
    const LINKAGE_SEED: &'static [u8] = b"DEID_BLS12381_XOF:SHAKE-256_SSWU_RO_LINKAGE_H";
    const BLINDING_SEED: &'static [u8] = b"DEID_BLS12381_XOF:SHAKE-256_SSWU_RO_BLINDING_H";
    const MESSAGE_DST: &'static [u8] = b"DEID_BLS12381_XOF:SHAKE-256_SSWU_RO_MAP_MSG_TO_SCALAR_AS_HASH_";
    const MARKER_DST: &'static [u8] = b"DEID_BLS12381_XOF:SHAKE-256_SSWU_RO_MAP_MARKER_TO_SCALAR_AS_HASH_";
    const CHALLENGE_DST: &'static [u8] = b"DEID_BLS12381_XOF:SHAKE-256_SSWU_RO_H2S_CHALLENGE_";
    const TABLE_KEY_DST: &'static [u8] = b"DEID_BLS12381_XOF:SHAKE-256_SSWU_RO_TABLE_KEY_";
    const KEYGEN_DST: &'static [u8] = b"DEID_BLS12381_XOF:SHAKE-256_SSWU_RO_KEYGEN_DST_";
    type HashAlg = Shake256;
    type Expander = ExpandMsgXof<Self::HashAlg>;
}

impl DeidCiphersuite for Bls12381Sha256 {
    const ID: &'static [u8] = b"DEID_BLS12381_XMD:SHA-256_SSWU_RO_";
    const GENERATOR_SEED: &'static [u8] = b"DEID_BLS12381_XMD:SHA-256_SSWU_RO_MESSAGE_GENERATOR_SEED";
    const GENERATOR_SEED_DST: &'static [u8] = b"DEID_BLS12381_XMD:SHA-256_SSWU_RO_SIG_GENERATOR_SEED_";
    const GENERATOR_DST: &'static [u8] = b"DEID_BLS12381_XMD:SHA-256_SSWU_RO_SIG_GENERATOR_DST_";
    const UNIQUENESS_SEED: &'static [u8] = b"DEID_BLS12381_XMD:SHA-256_SSWU_RO_UNIQUENESS_H";
    const LINKAGE_SEED: &'static [u8] = b"DEID_BLS12381_XMD:SHA-256_SSWU_RO_LINKAGE_H";
    const BLINDING_SEED: &'static [u8] = b"DEID_BLS12381_XMD:SHA-256_SSWU_RO_BLINDING_H";
    const MESSAGE_DST: &'static [u8] = b"DEID_BLS12381_XMD:SHA-256_SSWU_RO_MAP_MSG_TO_SCALAR_AS_HASH_";
    const MARKER_DST: &'static [u8] = b"DEID_BLS12381_XMD:SHA-256_SSWU_RO_MAP_MARKER_TO_SCALAR_AS_HASH_";
    const CHALLENGE_DST: &'static [u8] = b"DEID_BLS12381_XMD:SHA-256_SSWU_RO_H2S_CHALLENGE_";
    const TABLE_KEY_DST: &'static [u8] = b"DEID_BLS12381_XMD:SHA-256_SSWU_RO_TABLE_KEY_";
    const KEYGEN_DST: &'static [u8] = b"DEID_BLS12381_XMD:SHA-256_SSWU_RO_KEYGEN_DST_";
    type HashAlg = Sha256;
    type Expander = ExpandMsgXmd<Self::HashAlg>;
}
