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

//! Verification engine shared by every Schnorr sub-proof of the disclosure
//! protocol, in either source group or in the pairing target group.

use bls12_381_plus::Scalar;
use ff::Field;
use group::Group;

/// Checks `commitment == statement * challenge + sum(generators[i] * responses[i])`.
///
/// Responses equal to zero are skipped, which is how disclosed slots are
/// carried through the combined knowledge proof. A length mismatch between
/// responses and generators is a failed proof.
pub fn verify_schnorr<G>(statement: &G, commitment: &G, challenge: &Scalar, responses: &[Scalar], generators: &[G]) -> bool
where
    G: Group<Scalar = Scalar>,
{
    if responses.len() != generators.len() {
        return false;
    }

    let mut right = *statement * *challenge;
    for (generator, response) in generators.iter().zip(responses) {
        if bool::from(response.is_zero()) {
            continue;
        }
        right += *generator * *response;
    }

    right == *commitment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::util::deid_utils::get_random;
    use bls12_381_plus::{pairing, G1Affine, G1Projective, G2Affine, Gt};

    #[test]
    fn g1_proof_of_opening() {
        let g = G1Projective::GENERATOR;
        let h = g * get_random().unwrap();
        let (a, b) = (get_random().unwrap(), get_random().unwrap());
        let statement = g * a + h * b;

        let (ra, rb) = (get_random().unwrap(), get_random().unwrap());
        let commitment = g * ra + h * rb;
        let c = get_random().unwrap();
        let responses = [ra - a * c, rb - b * c];

        assert!(verify_schnorr(&statement, &commitment, &c, &responses, &[g, h]));
        assert!(!verify_schnorr(&statement, &commitment, &c, &[responses[1], responses[0]], &[g, h]));
        assert!(!verify_schnorr(&statement, &commitment, &c, &responses[..1], &[g, h]));
    }

    #[test]
    fn gt_proof_with_skipped_slot() {
        let e = pairing(&G1Affine::generator(), &G2Affine::generator());
        let f: Gt = e * get_random().unwrap();
        let x = get_random().unwrap();
        let statement = e * x;

        let rx = get_random().unwrap();
        let commitment = e * rx;
        let c = get_random().unwrap();

        assert!(verify_schnorr(&statement, &commitment, &c, &[rx - x * c, Scalar::ZERO], &[e, f]));
        assert!(!verify_schnorr(&statement, &commitment, &c, &[rx - x * c, Scalar::ONE], &[e, f]));
    }
}
