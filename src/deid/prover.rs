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
use bls12_381_plus::{G1Projective, Gt, Scalar};
use ff::Field;
use crate::errors::Error;
use crate::utils::util::deid_utils::{calculate_random_scalars, challenge, get_random, normalize_indexes, pedersen_commit};
use super::ciphersuites::DeidCiphersuite;
use super::config::OPENING_RESPONSE_COUNT;
use super::credential::Credential;
use super::keys::TrustRoot;
use super::pairings::{pair, PairingBases};
use super::params::PublicParameters;
use super::proof::{MarkerProof, MarkerSecrets, ProofPublic, ProofSecrets};
use super::table::TableKey;

/// Holder of one or more credentials.
#[derive(Clone, Debug)]
pub struct Prover<CS: DeidCiphersuite> {
    params: Arc<PublicParameters<CS>>,
    trust: TrustRoot,
    credentials: Vec<Credential>,
    bases: PairingBases,
}

impl<CS: DeidCiphersuite> Prover<CS> {
    pub fn new(params: Arc<PublicParameters<CS>>, trust: TrustRoot, credentials: Vec<Credential>) -> Result<Self, Error> {
        let expected = params.message_count();
        if let Some(cred) = credentials.iter().find(|c| c.hashes.len() != expected) {
            return Err(Error::InvalidNumberOfMessages { expected, found: cred.hashes.len() });
        }
        let bases = PairingBases::new(&params, &trust.issuer);
        Ok(Self { params, trust, credentials, bases })
    }

    pub fn params(&self) -> &Arc<PublicParameters<CS>> {
        &self.params
    }

    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    /// Builds a disclosure proof for credential `record`, revealing the
    /// attribute slots in `disclosed` and the markers in `markers`, tagged
    /// for the table keyed by `table_key`.
    ///
    /// Indexes are deduplicated and sorted: the Verifier must receive the
    /// disclosed markers in increasing index order.
    pub fn new_proof(
        &self,
        record: usize,
        disclosed: &[usize],
        markers: &[usize],
        table_key: &TableKey,
    ) -> Result<(ProofPublic, ProofSecrets), Error> {
        let params = self.params.as_ref();
        let config = params.config();
        let n = config.message_count();

        let cred = self.credentials.get(record).ok_or(Error::InvalidRecordIndex(record))?;
        let disclosed = normalize_indexes(disclosed, n, Error::InvalidDisclosedIndex)?;
        let markers = normalize_indexes(markers, cred.markers.len(), Error::InvalidMarkerIndex)?;

        let sig = &cred.signature;
        let (c, s, u, l) = (sig.c, sig.s, sig.u, sig.l);
        let g1 = params.g1;
        let iH = params.iH;

        let r = get_random()?;
        let open = get_random()?;
        let u_blind = get_random()?;
        let l_blind = get_random()?;
        let rc = r * c;
        let open_c = open * c;

        let A = sig.sigma + iH * r;
        let B = pedersen_commit(&g1, &iH, &r, &open);
        let Bc = B * c;

        // [r, open, c, c*r, c*open]
        let opening_randoms = calculate_random_scalars(OPENING_RESPONSE_COUNT)?;
        let cmt_pf1 = pedersen_commit(&g1, &iH, &opening_randoms[0], &opening_randoms[1]);
        let cmt_pf2 = B * opening_randoms[2];
        let cmt_pf2b = pedersen_commit(&g1, &iH, &opening_randoms[3], &opening_randoms[4]);

        let cmt_u = pedersen_commit(&params.uH, &iH, &u, &u_blind);
        let cmt_l = pedersen_commit(&params.lH, &iH, &l, &l_blind);

        let uH_table = pair(&params.uH, &table_key.0);
        let row_id = uH_table * u;

        let a_g2 = pair(&A, &params.g2);
        let knowledge_bases = self.bases.knowledge_bases(a_g2);

        let mut knowledge_secrets = Vec::with_capacity(config.proof_count());
        knowledge_secrets.push(c);
        knowledge_secrets.push(-r);
        knowledge_secrets.push(-rc);
        knowledge_secrets.extend(cred.hashes.iter().map(|m| -m.value));
        knowledge_secrets.push(-s);
        knowledge_secrets.push(u_blind);
        knowledge_secrets.push(l_blind);

        let mut knowledge_randoms = calculate_random_scalars(config.proof_count())?;
        knowledge_randoms[0] = opening_randoms[2];
        knowledge_randoms[1] = -opening_randoms[0];
        knowledge_randoms[2] = -opening_randoms[3];
        for &i in &disclosed {
            knowledge_randoms[config.attribute_position(i)] = Scalar::ZERO;
        }

        let mut cmt_pf3 = Gt::IDENTITY;
        for (base, k) in knowledge_bases.iter().zip(&knowledge_randoms) {
            if bool::from(k.is_zero()) {
                continue;
            }
            cmt_pf3 += base * k;
        }

        let mut left_top = params.generators[0] + cmt_u + cmt_l;
        for &i in &disclosed {
            left_top += params.generators[i + 1] * cred.hashes[i].value;
        }
        let left = pair(&left_top, &params.g2) - pair(&A, &self.trust.issuer.0);

        let fsc = challenge::<CS, Gt>(&cmt_pf3, &left, &knowledge_bases[0])?;

        let opening_secrets = [r, open, c, rc, open_c];
        let mut responses: Vec<Scalar> = opening_randoms
            .iter()
            .zip(opening_secrets.iter())
            .map(|(k, w)| k - w * fsc)
            .collect();
        let knowledge_start = responses.len();
        responses.extend(
            knowledge_randoms
                .iter()
                .zip(&knowledge_secrets)
                .map(|(k, w)| k - w * fsc),
        );
        for &i in &disclosed {
            responses[knowledge_start + config.attribute_position(i)] = Scalar::ZERO;
        }

        let row_bases = self.bases.row_bases(uH_table);
        let row_secrets = [-u, u, u_blind];
        let mut row_randoms = calculate_random_scalars(config.row_proof_count())?;
        // the tag exponent and the cmtU exponent are the same u
        row_randoms[0] = -row_randoms[1];
        let cmt_pf4 = row_bases
            .iter()
            .zip(&row_randoms)
            .fold(Gt::IDENTITY, |acc, (base, k)| acc + base * k);
        let left4 = pair(&cmt_u, &params.g2) - row_id;
        let fsc4 = challenge::<CS, Gt>(&cmt_pf4, &left4, &row_bases[0])?;
        let row_responses: Vec<Scalar> = row_randoms
            .iter()
            .zip(row_secrets.iter())
            .map(|(k, w)| k - w * fsc4)
            .collect();

        let (marker, marker_secrets) = if markers.is_empty() {
            (None, None)
        } else {
            let (proof, secrets) = self.marker_proof(cred, &markers, &l, &l_blind, &cmt_l)?;
            (Some(proof), Some(secrets))
        };

        log::debug!(
            "proof for record {}: {} of {} attributes disclosed, {} markers disclosed",
            record,
            disclosed.len(),
            n,
            markers.len()
        );

        let public = ProofPublic {
            A,
            B,
            Bc,
            cmt_pf1,
            cmt_pf2,
            cmt_pf2b,
            cmt_pf3,
            cmt_pf4,
            row_id,
            cmt_u,
            cmt_l,
            responses,
            row_responses,
            marker,
        };

        let secrets = ProofSecrets {
            r,
            open,
            u_blind,
            l_blind,
            opening_randoms,
            knowledge_randoms,
            row_randoms,
            marker: marker_secrets,
        };

        Ok((public, secrets))
    }

    fn marker_proof(
        &self,
        cred: &Credential,
        markers: &[usize],
        l: &Scalar,
        l_blind: &Scalar,
        cmt_l: &G1Projective,
    ) -> Result<(MarkerProof, MarkerSecrets), Error> {
        let params = self.params.as_ref();
        let signer_index = self
            .trust
            .marker_index(&cred.marker_signer)
            .ok_or(Error::UnknownMarkerSigner)?;

        let y1 = get_random()?;
        let y2 = get_random()?;
        let cmt_y = pedersen_commit(&params.lH, &params.iH, &y1, &y2);
        let fsc2 = challenge::<CS, G1Projective>(cmt_l, &cmt_y, &params.iH)?;

        let z_l = y1 - l * fsc2;
        let mut responses = vec![z_l, y2 - l_blind * fsc2];

        let rho = calculate_random_scalars(markers.len())?;
        let a = calculate_random_scalars(markers.len())?;
        let mut blinded_signatures = Vec::with_capacity(markers.len());
        let mut cmt_snip = Vec::with_capacity(markers.len());

        for ((&j, rho_j), a_j) in markers.iter().zip(&rho).zip(&a) {
            let blinded = cred.markers[j].signature.0 * rho_j;
            let snip = params.e * a_j + pair(&blinded, &params.g2) * (-y1);
            responses.push(a_j - rho_j * fsc2);
            blinded_signatures.push(blinded);
            cmt_snip.push(snip);
        }

        Ok((
            MarkerProof { signer_index, cmt_y, blinded_signatures, cmt_snip, responses },
            MarkerSecrets { y1, y2, rho, a },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deid::ciphersuites::Bls12381Sha256;
    use crate::keys::pair::KeyPair;
    use crate::schemes::algorithms::{BonehBoyen, Cls};

    type CS = Bls12381Sha256;

    #[test]
    fn disclosed_slots_carry_zero_randoms_and_responses() {
        let params = PublicParameters::<CS>::setup(4).unwrap();
        let issuer = KeyPair::<Cls<CS>>::random().unwrap();
        let signer = KeyPair::<BonehBoyen<CS>>::random().unwrap();
        let trust = TrustRoot::new(*issuer.public_key(), vec![*signer.public_key()]);
        let cred = Credential::issue(&params, &issuer, &signer, &["w", "x", "y", "z"][..], &["m"][..]).unwrap();
        let prover = Prover::new(params.clone(), trust, vec![cred]).unwrap();
        let key = TableKey::from_phrase::<CS>(b"unit");

        let (proof, secrets) = prover.new_proof(0, &[3, 1, 3], &[0], &key).unwrap();
        let config = params.config();
        let knowledge = &proof.responses[OPENING_RESPONSE_COUNT..];

        for i in 0..config.message_count() {
            let position = config.attribute_position(i);
            let disclosed = i == 1 || i == 3;
            assert_eq!(bool::from(secrets.knowledge_randoms[position].is_zero()), disclosed);
            assert_eq!(bool::from(knowledge[position].is_zero()), disclosed);
        }

        assert_eq!(knowledge[0], proof.responses[2]);
        assert_eq!(knowledge[1], -proof.responses[0]);
        assert_eq!(knowledge[2], -proof.responses[3]);
        assert_eq!(proof.row_id, pair(&(params.uH * cred_u(&prover)), &key.0));
        assert_eq!(secrets.marker().map(|m| m.rho().len()), Some(1));
    }

    fn cred_u(prover: &Prover<CS>) -> Scalar {
        prover.credentials[0].signature.u
    }

    #[test]
    fn mismatched_credentials_are_rejected() {
        let params = PublicParameters::<CS>::setup(2).unwrap();
        let wide = PublicParameters::<CS>::setup(3).unwrap();
        let issuer = KeyPair::<Cls<CS>>::random().unwrap();
        let signer = KeyPair::<BonehBoyen<CS>>::random().unwrap();
        let trust = TrustRoot::new(*issuer.public_key(), vec![*signer.public_key()]);
        let cred = Credential::issue(&wide, &issuer, &signer, &["x", "y", "z"][..], &[][..]).unwrap();

        let res = Prover::new(params, trust, vec![cred]);
        assert!(matches!(res, Err(Error::InvalidNumberOfMessages { expected: 2, found: 3 })));
    }
}
