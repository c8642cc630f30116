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

use std::sync::Arc;
use bls12_381_plus::{pairing, G1Affine, G1Projective, G2Affine, G2Projective, Gt};
use elliptic_curve::group::Curve;
use elliptic_curve::hash2curve::{ExpandMsg, Expander};
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use crate::errors::Error;
use super::ciphersuites::DeidCiphersuite;
use super::config::ProtocolConfig;

/// Public parameters shared by issuer, Prover and Verifier.
///
/// `generators[0]` is the constant offset term, `generators[i + 1]` the base
/// of attribute slot `i` and the last generator the base of the signature
/// randomizer `s`. `uH`, `lH` and `iH` carry the uniqueness secret, the
/// linkage secret and every blinding factor respectively.
#[derive(Clone, PartialEq, Debug)]
pub struct PublicParameters<CS: DeidCiphersuite> {
    pub(crate) config: ProtocolConfig,
    pub(crate) g1: G1Projective,
    pub(crate) g2: G2Projective,
    pub(crate) e: Gt,
    pub(crate) generators: Vec<G1Projective>,
    pub(crate) uH: G1Projective,
    pub(crate) lH: G1Projective,
    pub(crate) iH: G1Projective,
    _cs: core::marker::PhantomData<CS>,
}

impl<CS: DeidCiphersuite> Serialize for PublicParameters<CS> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let result: Vec<String> = self
            .generators
            .iter()
            .map(|item| hex::encode(item.to_affine().to_compressed()))
            .collect();

        let mut state = serializer.serialize_struct("PublicParameters", 5)?;
        state.serialize_field("MessageCount", &self.config.message_count())?;
        state.serialize_field("UH", &hex::encode(self.uH.to_affine().to_compressed()))?;
        state.serialize_field("LH", &hex::encode(self.lH.to_affine().to_compressed()))?;
        state.serialize_field("IH", &hex::encode(self.iH.to_affine().to_compressed()))?;
        state.serialize_field("Generators", &result)?;
        state.end()
    }
}

impl<CS: DeidCiphersuite> PublicParameters<CS> {
    /// Builds the parameters for records of `message_count` attributes.
    ///
    /// Every point is derived deterministically from the ciphersuite seeds,
    /// so two parties running `setup` with the same suite and size obtain
    /// the same parameters.
    pub fn setup(message_count: usize) -> Result<Arc<Self>, Error> {
        let config = ProtocolConfig::new(message_count)?;

        let g1 = G1Projective::GENERATOR;
        let g2 = G2Projective::GENERATOR;
        let e = pairing(&G1Affine::generator(), &G2Affine::generator());

        let generators = Self::create_generators(config.generator_count())?;

        let uH = G1Projective::hash::<CS::Expander>(CS::UNIQUENESS_SEED, CS::GENERATOR_DST);
        let lH = G1Projective::hash::<CS::Expander>(CS::LINKAGE_SEED, CS::GENERATOR_DST);
        let iH = G1Projective::hash::<CS::Expander>(CS::BLINDING_SEED, CS::GENERATOR_DST);

        log::debug!(
            "public parameters ready: {} attribute slots, {} generators",
            config.message_count(),
            generators.len()
        );

        Ok(Arc::new(Self {
            config,
            g1,
            g2,
            e,
            generators,
            uH,
            lH,
            iH,
            _cs: core::marker::PhantomData,
        }))
    }

    fn create_generators(len: usize) -> Result<Vec<G1Projective>, Error> {
        let mut generators: Vec<G1Projective> = Vec::with_capacity(len);

        let mut v = vec![0u8; CS::EXPAND_LEN];
        let mut buffer = vec![0u8; CS::EXPAND_LEN];

        CS::Expander::expand_message(&[CS::GENERATOR_SEED], &[CS::GENERATOR_SEED_DST], CS::EXPAND_LEN)
            .map_err(|_| Error::GeneratorsError)?
            .fill_bytes(&mut v);

        let mut n = 1u32;
        while generators.len() < len {
            v.extend_from_slice(&n.to_be_bytes());
            CS::Expander::expand_message(&[&v], &[CS::GENERATOR_SEED_DST], CS::EXPAND_LEN)
                .map_err(|_| Error::GeneratorsError)?
                .fill_bytes(&mut buffer);
            v = buffer.clone();
            n += 1;
            let candidate = G1Projective::hash::<CS::Expander>(&v, CS::GENERATOR_DST);
            if !generators.contains(&candidate) {
                generators.push(candidate);
            }
        }

        Ok(generators)
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn message_count(&self) -> usize {
        self.config.message_count()
    }

    pub fn g1(&self) -> &G1Projective {
        &self.g1
    }

    pub fn g2(&self) -> &G2Projective {
        &self.g2
    }

    /// `e(g1, g2)`
    pub fn e(&self) -> &Gt {
        &self.e
    }

    pub fn generators(&self) -> &[G1Projective] {
        &self.generators
    }

    /// Base of the signature randomizer `s`.
    pub(crate) fn s_generator(&self) -> &G1Projective {
        &self.generators[self.generators.len() - 1]
    }

    pub fn uH(&self) -> &G1Projective {
        &self.uH
    }

    pub fn lH(&self) -> &G1Projective {
        &self.lH
    }

    pub fn iH(&self) -> &G1Projective {
        &self.iH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deid::ciphersuites::{Bls12381Sha256, Bls12381Shake256};
    use group::Group;

    #[test]
    fn setup_is_deterministic() {
        let params = PublicParameters::<Bls12381Sha256>::setup(5).unwrap();
        let again = PublicParameters::<Bls12381Sha256>::setup(5).unwrap();
        assert_eq!(params, again);
        assert_eq!(params.generators().len(), 7);

        let other = PublicParameters::<Bls12381Shake256>::setup(5).unwrap();
        assert_ne!(params.generators()[0], other.generators()[0]);
    }

    #[test]
    fn auxiliary_points_are_independent() {
        let params = PublicParameters::<Bls12381Sha256>::setup(3).unwrap();
        let points = [params.uH, params.lH, params.iH];
        for (i, p) in points.iter().enumerate() {
            assert!(!bool::from(p.is_identity()));
            assert!(!params.generators().contains(p));
            for q in &points[i + 1..] {
                assert_ne!(p, q);
            }
        }
        for (i, g) in params.generators().iter().enumerate() {
            assert!(!params.generators()[i + 1..].contains(g));
        }
    }

    #[test]
    fn serializes_generators_as_hex() {
        let params = PublicParameters::<Bls12381Sha256>::setup(2).unwrap();
        let json = serde_json::to_value(params.as_ref()).unwrap();
        assert_eq!(json["MessageCount"], 2);
        assert_eq!(json["Generators"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn rejects_empty_records() {
        assert!(PublicParameters::<Bls12381Sha256>::setup(0).is_err());
    }
}
