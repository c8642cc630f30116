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

use bls12_381_plus::{G2Affine, G2Projective, Scalar};
use elliptic_curve::group::Curve;
use ff::Field;
use serde::{Deserialize, Serialize};
use crate::errors::Error;
use crate::keys::pair::KeyPair;
use crate::keys::key::{PrivateKey, PublicKey};
use crate::schemes::algorithms::{BonehBoyen, Cls};
use crate::utils::util::deid_utils::{get_random, hash_to_scalar, i2osp};
use super::ciphersuites::DeidCiphersuite;

macro_rules! g2_public_key {
    ($name:ident, $what:literal) => {
        #[doc = concat!("Public key of the ", $what, ", a point of G2.")]
        #[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
        pub struct $name(pub G2Projective);

        impl $name {
            pub fn to_bytes(&self) -> [u8; G2Affine::COMPRESSED_BYTES] {
                self.0.to_affine().to_compressed()
            }

            pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
                let bytes: [u8; G2Affine::COMPRESSED_BYTES] =
                    bytes.try_into().map_err(|_| Error::KeyDeserializationError)?;
                let g2 = Option::<G2Affine>::from(G2Affine::from_compressed(&bytes))
                    .ok_or(Error::KeyDeserializationError)?;
                Ok(Self(G2Projective::from(g2)))
            }

            pub fn encode(&self) -> String {
                hex::encode(self.to_bytes())
            }
        }

        impl PublicKey for $name {
            type Output = [u8; G2Affine::COMPRESSED_BYTES];

            fn to_bytes(&self) -> Self::Output {
                self.to_bytes()
            }

            fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
                Self::from_bytes(bytes)
            }

            fn encode(&self) -> String {
                self.encode()
            }
        }
    };
}

macro_rules! scalar_secret_key {
    ($name:ident, $what:literal) => {
        #[doc = concat!("Secret key of the ", $what, ".")]
        #[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
        pub struct $name(pub Scalar);

        impl $name {
            //in BE order
            pub fn to_bytes(&self) -> [u8; Scalar::BYTES] {
                self.0.to_be_bytes()
            }

            pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
                let bytes: [u8; Scalar::BYTES] =
                    bytes.try_into().map_err(|_| Error::KeyDeserializationError)?;
                let s = Option::<Scalar>::from(Scalar::from_be_bytes(&bytes))
                    .ok_or(Error::KeyDeserializationError)?;
                Ok(Self(s))
            }

            pub fn encode(&self) -> String {
                hex::encode(self.to_bytes())
            }
        }

        impl PrivateKey for $name {
            type Output = [u8; Scalar::BYTES];

            fn to_bytes(&self) -> Self::Output {
                self.to_bytes()
            }

            fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
                Self::from_bytes(bytes)
            }

            fn encode(&self) -> String {
                self.encode()
            }
        }
    };
}

g2_public_key!(IssuerPublicKey, "record issuer");
g2_public_key!(MarkerPublicKey, "marker signer");
scalar_secret_key!(IssuerSecretKey, "record issuer");
scalar_secret_key!(MarkerSecretKey, "marker signer");

impl<CS: DeidCiphersuite> KeyPair<Cls<CS>> {
    /// Uniform secret from the OS entropy source, `pub = g2 * priv`.
    pub fn random() -> Result<Self, Error> {
        let sk = random_secret()?;
        Ok(Self { public: IssuerPublicKey(sk_to_pk(&sk)), private: IssuerSecretKey(sk) })
    }

    pub fn generate(key_material: &[u8], key_info: Option<&[u8]>) -> Result<Self, Error> {
        let sk = key_gen::<CS>(key_material, key_info)?;
        Ok(Self { public: IssuerPublicKey(sk_to_pk(&sk)), private: IssuerSecretKey(sk) })
    }
}

impl<CS: DeidCiphersuite> KeyPair<BonehBoyen<CS>> {
    pub fn random() -> Result<Self, Error> {
        let sk = random_secret()?;
        Ok(Self { public: MarkerPublicKey(sk_to_pk(&sk)), private: MarkerSecretKey(sk) })
    }

    pub fn generate(key_material: &[u8], key_info: Option<&[u8]>) -> Result<Self, Error> {
        let sk = key_gen::<CS>(key_material, key_info)?;
        Ok(Self { public: MarkerPublicKey(sk_to_pk(&sk)), private: MarkerSecretKey(sk) })
    }
}

fn random_secret() -> Result<Scalar, Error> {
    let sk = get_random()?;
    if bool::from(sk.is_zero()) {
        return Err(Error::KeyGenError("zero secret key".to_owned()));
    }
    Ok(sk)
}

/// Deterministic secret key derivation.
///
/// # Inputs:
/// * `key_material` (REQUIRED), a secret octet string of at least `CS::IKM_LEN` bytes.
/// * `key_info` (OPTIONAL), an octet string. Defaults to an empty string if
/// not supplied.
pub(crate) fn key_gen<CS: DeidCiphersuite>(key_material: &[u8], key_info: Option<&[u8]>) -> Result<Scalar, Error> {
    if key_material.len() < CS::IKM_LEN {
        return Err(Error::KeyGenError("length(key_material) < 32".to_owned()));
    }

    let key_info = key_info.unwrap_or(&[]);

    if key_info.len() > 65535 {
        return Err(Error::KeyGenError("length(key_info) > 65535".to_owned()));
    }

    // derive_input = key_material || I2OSP(length(key_info), 2) || key_info
    let derive_input = [key_material, &i2osp(key_info.len(), 2), key_info].concat();

    let sk = hash_to_scalar::<CS>(&derive_input, CS::KEYGEN_DST)?;
    if bool::from(sk.is_zero()) {
        return Err(Error::KeyGenError("zero secret key".to_owned()));
    }
    Ok(sk)
}

fn sk_to_pk(sk: &Scalar) -> G2Projective {
    G2Projective::GENERATOR * sk
}

/// Keys a Verifier trusts: the record issuer and every marker signer.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TrustRoot {
    pub issuer: IssuerPublicKey,
    pub marker_keys: Vec<MarkerPublicKey>,
}

impl TrustRoot {
    pub fn new(issuer: IssuerPublicKey, marker_keys: Vec<MarkerPublicKey>) -> Self {
        Self { issuer, marker_keys }
    }

    pub fn marker_key(&self, index: usize) -> Option<&MarkerPublicKey> {
        self.marker_keys.get(index)
    }

    pub fn marker_index(&self, key: &MarkerPublicKey) -> Option<usize> {
        self.marker_keys.iter().position(|k| k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deid::ciphersuites::{Bls12381Sha256, Bls12381Shake256};
    use crate::schemes::algorithms::{BonehBoyenBls12381Sha256, ClsBls12381Sha256, ClsBls12381Shake256};

    const IKM: &str = "746869732d49532d6a7573742d616e2d546573742d494b4d2d746f2d67656e65726174652d246528724074232d6b6579";

    #[test]
    fn deterministic_keygen() {
        let ikm = hex::decode(IKM).unwrap();
        let kp = KeyPair::<ClsBls12381Sha256>::generate(&ikm, Some(b"issuer")).unwrap();
        let kp2 = KeyPair::<ClsBls12381Sha256>::generate(&ikm, Some(b"issuer")).unwrap();
        assert_eq!(kp, kp2);

        let other_info = KeyPair::<ClsBls12381Sha256>::generate(&ikm, None).unwrap();
        assert_ne!(kp.public_key(), other_info.public_key());

        let other_suite = KeyPair::<ClsBls12381Shake256>::generate(&ikm, Some(b"issuer")).unwrap();
        assert_ne!(kp.public_key(), other_suite.public_key());

        assert_eq!(kp.public_key().0, G2Projective::GENERATOR * kp.private_key().0);
    }

    #[test]
    fn short_key_material_is_rejected() {
        let res = KeyPair::<BonehBoyenBls12381Sha256>::generate(&[7u8; 31], None);
        assert!(matches!(res, Err(Error::KeyGenError(_))));
        let _ = key_gen::<Bls12381Shake256>(&[7u8; 32], None).unwrap();
    }

    #[test]
    fn keys_round_trip_through_bytes() {
        let kp = KeyPair::<BonehBoyen<Bls12381Sha256>>::random().unwrap();
        let pk = MarkerPublicKey::from_bytes(&kp.public_key().to_bytes()).unwrap();
        let sk = MarkerSecretKey::from_bytes(&kp.private_key().to_bytes()).unwrap();
        assert_eq!(&pk, kp.public_key());
        assert_eq!(&sk, kp.private_key());
        assert_eq!(pk.encode().len(), 2 * G2Affine::COMPRESSED_BYTES);

        assert_eq!(IssuerPublicKey::from_bytes(&[0u8; 95]), Err(Error::KeyDeserializationError));
        assert_eq!(IssuerSecretKey::from_bytes(&[0xffu8; 32]), Err(Error::KeyDeserializationError));
    }

    #[test]
    fn trust_root_lookup() {
        let a = KeyPair::<BonehBoyen<Bls12381Sha256>>::random().unwrap();
        let b = KeyPair::<BonehBoyen<Bls12381Sha256>>::random().unwrap();
        let issuer = KeyPair::<Cls<Bls12381Sha256>>::random().unwrap();
        let trust = TrustRoot::new(*issuer.public_key(), vec![*a.public_key()]);
        assert_eq!(trust.marker_index(a.public_key()), Some(0));
        assert_eq!(trust.marker_index(b.public_key()), None);
        assert!(trust.marker_key(1).is_none());
    }
}
