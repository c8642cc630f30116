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
use crate::utils::util::deid_utils::{calculate_random_scalars, OctetReader};
use super::ciphersuites::DeidCiphersuite;
use super::keys::{IssuerPublicKey, IssuerSecretKey};
use super::params::PublicParameters;

/// Issuer signature over an attribute vector.
///
/// `c` and `s` are signature randomizers, `u` is the record uniqueness secret
/// and `l` its linkage secret. The holder keeps all of them: they are the
/// witnesses of every later disclosure proof.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Signature {
    pub(crate) sigma: G1Projective,
    pub(crate) c: Scalar,
    pub(crate) s: Scalar,
    pub(crate) u: Scalar,
    pub(crate) l: Scalar,
}

impl Signature {
    pub const BYTES: usize = G1Affine::COMPRESSED_BYTES + 4 * Scalar::BYTES;

    pub fn sigma(&self) -> &G1Projective {
        &self.sigma
    }

    pub fn c(&self) -> &Scalar {
        &self.c
    }

    pub fn s(&self) -> &Scalar {
        &self.s
    }

    pub fn u(&self) -> &Scalar {
        &self.u
    }

    pub fn l(&self) -> &Scalar {
        &self.l
    }

    /// Signs already hashed attributes with fresh `c`, `s`, `u` and `l`.
    pub fn sign<CS: DeidCiphersuite>(
        params: &PublicParameters<CS>,
        sk: &IssuerSecretKey,
        messages: &[DeidMessage],
    ) -> Result<Self, Error> {
        let random_scalars = calculate_random_scalars(4)?;
        let (c, s, u, l) = (random_scalars[0], random_scalars[1], random_scalars[2], random_scalars[3]);
        Self::sign_with(params, sk, messages, c, s, u, l)
    }

    /// Signs with caller-chosen randomizers and secrets.
    pub(crate) fn sign_with<CS: DeidCiphersuite>(
        params: &PublicParameters<CS>,
        sk: &IssuerSecretKey,
        messages: &[DeidMessage],
        c: Scalar,
        s: Scalar,
        u: Scalar,
        l: Scalar,
    ) -> Result<Self, Error> {
        let mult = signed_base(params, messages, &u, &l, &s)?;

        let exp = Option::<Scalar>::from((sk.0 + c).invert())
            .ok_or(Error::SignatureGenerationError("Invert scalar failed".to_owned()))?;

        let sigma = mult * exp;
        if bool::from(sigma.is_identity()) {
            return Err(Error::G1IdentityError);
        }

        Ok(Self { sigma, c, s, u, l })
    }

    /// Checks `e(sigma, g2 * c + pk) == e(mult, g2)`.
    pub fn verify<CS: DeidCiphersuite>(
        &self,
        params: &PublicParameters<CS>,
        pk: &IssuerPublicKey,
        messages: &[DeidMessage],
    ) -> Result<bool, Error> {
        let mult = signed_base(params, messages, &self.u, &self.l, &self.s)?;

        if bool::from(self.sigma.is_identity()) {
            return Ok(false);
        }

        let sigma_affine = self.sigma.to_affine();
        let mult_affine = (-mult).to_affine();
        let key = G2Prepared::from((params.g2 * self.c + pk.0).to_affine());
        let base = G2Prepared::from(params.g2.to_affine());

        let term1 = (&sigma_affine, &key);
        let term2 = (&mult_affine, &base);

        let pairing = multi_miller_loop(&[term1, term2]).final_exponentiation();

        Ok(bool::from(pairing.is_identity()))
    }

    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        let mut bytes = [0u8; Self::BYTES];
        let mut offset = 0;
        let sigma = self.sigma.to_affine().to_compressed();
        bytes[..sigma.len()].copy_from_slice(&sigma);
        offset += sigma.len();
        for scalar in [&self.c, &self.s, &self.u, &self.l] {
            bytes[offset..offset + Scalar::BYTES].copy_from_slice(&scalar.to_be_bytes());
            offset += Scalar::BYTES;
        }
        bytes
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        let mut reader = OctetReader::new(data);
        let sigma: G1Projective = reader.element()?;
        let c: Scalar = reader.element()?;
        let s: Scalar = reader.element()?;
        let u: Scalar = reader.element()?;
        let l: Scalar = reader.element()?;
        reader.finish()?;

        if bool::from(sigma.is_identity()) {
            return Err(Error::G1IdentityError);
        }

        Ok(Self { sigma, c, s, u, l })
    }

    pub fn encode(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

/// `h0 + sum(h[i+1] * m_i) + uH * u + lH * l + h[last] * s`
pub(crate) fn signed_base<CS: DeidCiphersuite>(
    params: &PublicParameters<CS>,
    messages: &[DeidMessage],
    u: &Scalar,
    l: &Scalar,
    s: &Scalar,
) -> Result<G1Projective, Error> {
    let message_count = params.message_count();
    if messages.len() != message_count {
        return Err(Error::InvalidNumberOfMessages { expected: message_count, found: messages.len() });
    }
    if params.generators.len() != message_count + 2 {
        return Err(Error::NotEnoughGenerators);
    }

    let mut mult = params.generators[0];
    for (generator, message) in params.generators[1..=message_count].iter().zip(messages) {
        mult += generator * message.value;
    }
    mult += params.uH * u + params.lH * l + params.s_generator() * s;

    Ok(mult)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff::Field;
    use crate::deid::ciphersuites::{Bls12381Sha256, Bls12381Shake256};
    use crate::keys::pair::KeyPair;
    use crate::schemes::algorithms::Cls;

    fn signed<CS: DeidCiphersuite>() -> (std::sync::Arc<PublicParameters<CS>>, KeyPair<Cls<CS>>, Vec<DeidMessage>, Signature) {
        let params = PublicParameters::<CS>::setup(4).unwrap();
        let kp = KeyPair::<Cls<CS>>::random().unwrap();
        let messages = DeidMessage::messages_to_scalar::<CS, _>(&["SEX=F", "AGE=64", "ZIP=100", "DX=I10"]).unwrap();
        let signature = Signature::sign(&params, kp.private_key(), &messages).unwrap();
        (params, kp, messages, signature)
    }

    #[test]
    fn sign_and_verify() {
        let (params, kp, messages, signature) = signed::<Bls12381Sha256>();
        assert!(signature.verify(&params, kp.public_key(), &messages).unwrap());

        let (params, kp, messages, signature) = signed::<Bls12381Shake256>();
        assert!(signature.verify(&params, kp.public_key(), &messages).unwrap());
    }

    #[test]
    fn any_changed_input_breaks_the_signature() {
        let (params, kp, messages, signature) = signed::<Bls12381Sha256>();

        let mut wrong = messages.clone();
        wrong[2] = DeidMessage::map_message_to_scalar_as_hash::<Bls12381Sha256>(b"ZIP=101").unwrap();
        assert!(!signature.verify(&params, kp.public_key(), &wrong).unwrap());

        for tweak in 0..3 {
            let mut forged = signature;
            match tweak {
                0 => forged.s += Scalar::ONE,
                1 => forged.u += Scalar::ONE,
                _ => forged.l += Scalar::ONE,
            }
            assert!(!forged.verify(&params, kp.public_key(), &messages).unwrap());
        }

        let other = KeyPair::<Cls<Bls12381Sha256>>::random().unwrap();
        assert!(!signature.verify(&params, other.public_key(), &messages).unwrap());
    }

    #[test]
    fn wrong_message_count_is_an_error() {
        let (params, kp, messages, signature) = signed::<Bls12381Sha256>();
        let res = signature.verify(&params, kp.public_key(), &messages[..3]);
        assert_eq!(res, Err(Error::InvalidNumberOfMessages { expected: 4, found: 3 }));
    }

    #[test]
    fn bytes_round_trip() {
        let (params, kp, messages, signature) = signed::<Bls12381Sha256>();
        let bytes = signature.to_bytes();
        let decoded = Signature::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, signature);
        assert!(decoded.verify(&params, kp.public_key(), &messages).unwrap());
        assert!(Signature::from_bytes(&bytes[1..]).is_err());
    }
}
