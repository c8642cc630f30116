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

use bls12_381_plus::{pairing, G1Projective, G2Projective, Gt};
use elliptic_curve::group::Curve;
use super::ciphersuites::DeidCiphersuite;
use super::keys::IssuerPublicKey;
use super::params::PublicParameters;

pub(crate) fn pair(p: &G1Projective, q: &G2Projective) -> Gt {
    pairing(&p.to_affine(), &q.to_affine())
}

/// Pairings that depend only on the public parameters and the issuer key,
/// computed once per Prover or Verifier.
#[derive(Clone, PartialEq, Debug)]
pub(crate) struct PairingBases {
    /// `e(iH, pub)`
    pub(crate) iH_pub: Gt,
    /// `e(iH, g2)`
    pub(crate) iH_g2: Gt,
    /// `e(uH, g2)`
    pub(crate) uH_g2: Gt,
    /// `e(h[i + 1], g2)` for every attribute slot, then `e(h[last], g2)`.
    pub(crate) generators_g2: Vec<Gt>,
}

impl PairingBases {
    pub(crate) fn new<CS: DeidCiphersuite>(params: &PublicParameters<CS>, issuer: &IssuerPublicKey) -> Self {
        let g2 = params.g2.to_affine();
        let iH = params.iH.to_affine();
        Self {
            iH_pub: pairing(&iH, &issuer.0.to_affine()),
            iH_g2: pairing(&iH, &g2),
            uH_g2: pairing(&params.uH.to_affine(), &g2),
            generators_g2: params.generators[1..]
                .iter()
                .map(|h| pairing(&h.to_affine(), &g2))
                .collect(),
        }
    }

    /// Bases of the combined knowledge proof, in response order:
    /// `e(A, g2)`, `e(iH, pub)`, `e(iH, g2)`, attributes, `s`, `u` blinding,
    /// `l` blinding.
    pub(crate) fn knowledge_bases(&self, a_g2: Gt) -> Vec<Gt> {
        let mut bases = Vec::with_capacity(self.generators_g2.len() + 5);
        bases.push(a_g2);
        bases.push(self.iH_pub);
        bases.push(self.iH_g2);
        bases.extend_from_slice(&self.generators_g2);
        bases.push(self.iH_g2);
        bases.push(self.iH_g2);
        bases
    }

    /// Bases of the uniqueness proof: `e(uH, T)`, `e(uH, g2)`, `e(iH, g2)`.
    pub(crate) fn row_bases(&self, uH_table: Gt) -> Vec<Gt> {
        vec![uH_table, self.uH_g2, self.iH_g2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deid::ciphersuites::Bls12381Sha256;
    use crate::keys::pair::KeyPair;
    use crate::schemes::algorithms::Cls;

    #[test]
    fn knowledge_bases_follow_config() {
        let params = PublicParameters::<Bls12381Sha256>::setup(5).unwrap();
        let kp = KeyPair::<Cls<Bls12381Sha256>>::random().unwrap();
        let bases = PairingBases::new(&params, kp.public_key());

        let knowledge = bases.knowledge_bases(params.e);
        assert_eq!(knowledge.len(), params.config().proof_count());
        assert_eq!(knowledge[params.config().attribute_position(0)], pair(&params.generators[1], &params.g2));
        assert_eq!(bases.row_bases(params.e).len(), params.config().row_proof_count());
    }
}
