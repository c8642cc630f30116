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

use bls12_381_plus::{multi_miller_loop, G1Affine, G1Projective, G2Prepared, Scalar};
use elliptic_curve::group::Curve;
use group::Group;
use serde::{Deserialize, Serialize};
use crate::errors::Error;
use crate::utils::message::deid_message::DeidMessage;
use super::ciphersuites::DeidCiphersuite;
use super::keys::{MarkerPublicKey, MarkerSecretKey};
use super::params::PublicParameters;

/// Boneh-Boyen signature `g1 / (y + h + l)` on a marker hash `h`, bound to a
/// credential through its linkage secret `l`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MarkerSignature(pub(crate) G1Projective);

impl MarkerSignature {
    pub fn sign<CS: DeidCiphersuite>(
        params: &PublicParameters<CS>,
        sk: &MarkerSecretKey,
        marker: &DeidMessage,
        link_secret: &Scalar,
    ) -> Result<Self, Error> {
        let exp = Option::<Scalar>::from((sk.0 + marker.value + link_secret).invert())
            .ok_or(Error::SignatureGenerationError("Invert scalar failed".to_owned()))?;
        Ok(Self(params.g1 * exp))
    }

    /// Checks `e(sig, pk + g2 * (h + l)) == e(g1, g2)`.
    pub fn verify<CS: DeidCiphersuite>(
        &self,
        params: &PublicParameters<CS>,
        pk: &MarkerPublicKey,
        marker: &DeidMessage,
        link_secret: &Scalar,
    ) -> bool {
        if bool::from(self.0.is_identity()) {
            return false;
        }

        let sig = self.0.to_affine();
        let g1 = (-params.g1).to_affine();
        let key = G2Prepared::from((pk.0 + params.g2 * (marker.value + link_secret)).to_affine());
        let base = G2Prepared::from(params.g2.to_affine());

        let pairing = multi_miller_loop(&[(&sig, &key), (&g1, &base)]).final_exponentiation();
        bool::from(pairing.is_identity())
    }

    pub fn point(&self) -> &G1Projective {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; G1Affine::COMPRESSED_BYTES] {
        self.0.to_affine().to_compressed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deid::ciphersuites::Bls12381Sha256;
    use crate::keys::pair::KeyPair;
    use crate::schemes::algorithms::BonehBoyen;
    use crate::utils::util::deid_utils::get_random;

    #[test]
    fn marker_signature_is_bound_to_link_secret() {
        let params = PublicParameters::<Bls12381Sha256>::setup(2).unwrap();
        let kp = KeyPair::<BonehBoyen<Bls12381Sha256>>::random().unwrap();
        let marker = DeidMessage::map_marker_to_scalar_as_hash::<Bls12381Sha256>(b"chr1\t12345\tA\tG").unwrap();
        let (l1, l2) = (get_random().unwrap(), get_random().unwrap());

        let sig = MarkerSignature::sign(&params, kp.private_key(), &marker, &l1).unwrap();
        assert!(sig.verify(&params, kp.public_key(), &marker, &l1));
        assert!(!sig.verify(&params, kp.public_key(), &marker, &l2));

        let other = DeidMessage::map_marker_to_scalar_as_hash::<Bls12381Sha256>(b"chr1\t12345\tA\tT").unwrap();
        assert!(!sig.verify(&params, kp.public_key(), &other, &l1));
    }
}
