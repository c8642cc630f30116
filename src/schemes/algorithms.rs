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

use core::marker::PhantomData;
use serde::{Deserialize, Serialize};
use crate::deid::ciphersuites::{Bls12381Sha256, Bls12381Shake256, DeidCiphersuite};
use crate::deid::keys::{IssuerPublicKey, IssuerSecretKey, MarkerPublicKey, MarkerSecretKey};
use crate::keys::key::{PrivateKey, PublicKey};

/// CL-style multi-message signature used by the issuer over record attributes.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Cls<CS: DeidCiphersuite>(PhantomData<CS>);

/// Boneh-Boyen signature used to bind marker strings to a credential.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BonehBoyen<CS: DeidCiphersuite>(PhantomData<CS>);

pub type ClsBls12381Sha256 = Cls<Bls12381Sha256>;
pub type ClsBls12381Shake256 = Cls<Bls12381Shake256>;
pub type BonehBoyenBls12381Sha256 = BonehBoyen<Bls12381Sha256>;
pub type BonehBoyenBls12381Shake256 = BonehBoyen<Bls12381Shake256>;

pub trait Scheme: Eq + 'static + Sized {
    type Ciphersuite: DeidCiphersuite;
    type PrivKey: PrivateKey;
    type PubKey: PublicKey;
}

impl<CS: DeidCiphersuite> Scheme for Cls<CS> {
    type Ciphersuite = CS;
    type PrivKey = IssuerSecretKey;
    type PubKey = IssuerPublicKey;
}

impl<CS: DeidCiphersuite> Scheme for BonehBoyen<CS> {
    type Ciphersuite = CS;
    type PrivKey = MarkerSecretKey;
    type PubKey = MarkerPublicKey;
}
