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
use crate::utils::message::deid_message::DeidMessage;
use crate::utils::schnorr::verify_schnorr;
use crate::utils::util::deid_utils::challenge;
use super::ciphersuites::DeidCiphersuite;
use super::config::OPENING_RESPONSE_COUNT;
use super::keys::TrustRoot;
use super::pairings::{pair, PairingBases};
use super::params::PublicParameters;
use super::proof::{MarkerProof, ProofPublic};
use super::table::TableKey;

/// Checks disclosure proofs against a trust root.
#[derive(Clone, Debug)]
pub struct Verifier<CS: DeidCiphersuite> {
    params: Arc<PublicParameters<CS>>,
    trust: TrustRoot,
    bases: PairingBases,
}

/// Values recomputed from a proof and the claimed disclosure, consumed by
/// [`Verifier::finish_verification`].
#[derive(Clone, Debug)]
pub struct ProcessedProof {
    disclosed: Vec<usize>,
    knowledge_bases: Vec<Gt>,
    left: Gt,
    fsc: Scalar,
    row_bases: Vec<Gt>,
    left4: Gt,
    fsc4: Scalar,
}

impl<CS: DeidCiphersuite> Verifier<CS> {
    pub fn new(params: Arc<PublicParameters<CS>>, trust: TrustRoot) -> Self {
        let bases = PairingBases::new(&params, &trust.issuer);
        Self { params, trust, bases }
    }

    pub fn params(&self) -> &Arc<PublicParameters<CS>> {
        &self.params
    }

    pub fn trust(&self) -> &TrustRoot {
        &self.trust
    }

    /// Verifies `proof` for the claimed attribute values `(value, slot)` and
    /// the claimed marker strings, given in increasing marker index order.
    ///
    /// `Ok(false)` is a rejected proof. Malformed claims (slot out of range,
    /// repeated slot) are errors.
    pub fn verify_proof(
        &self,
        proof: &ProofPublic,
        table_key: &TableKey,
        disclosed: &[(String, usize)],
        markers: &[String],
    ) -> Result<bool, Error> {
        match self.process_proof(proof, table_key, disclosed)? {
            Some(processed) => self.finish_verification(proof, &processed, markers),
            None => Ok(false),
        }
    }

    /// Recomputes the left-hand sides and challenges of the knowledge and
    /// uniqueness proofs. `None` when the proof shape does not match the
    /// protocol configuration.
    pub fn process_proof(
        &self,
        proof: &ProofPublic,
        table_key: &TableKey,
        disclosed: &[(String, usize)],
    ) -> Result<Option<ProcessedProof>, Error> {
        let params = self.params.as_ref();
        let config = params.config();
        let n = config.message_count();

        let mut slots: Vec<usize> = Vec::with_capacity(disclosed.len());
        let mut left_top = params.generators[0] + proof.cmt_u + proof.cmt_l;
        for (value, slot) in disclosed {
            if *slot >= n || slots.contains(slot) {
                return Err(Error::InvalidDisclosedIndex(*slot));
            }
            slots.push(*slot);
            let m = DeidMessage::map_message_to_scalar_as_hash::<CS>(value.as_bytes())?;
            left_top += params.generators[slot + 1] * m.value;
        }
        slots.sort_unstable();

        if proof.responses.len() != config.response_count() {
            log::debug!(
                "proof rejected: {} responses, expected {}",
                proof.responses.len(),
                config.response_count()
            );
            return Ok(None);
        }
        if proof.row_responses.len() != config.row_response_count() {
            log::debug!("proof rejected: {} row responses", proof.row_responses.len());
            return Ok(None);
        }

        let knowledge_bases = self.bases.knowledge_bases(pair(&proof.A, &params.g2));
        let left = pair(&left_top, &params.g2) - pair(&proof.A, &self.trust.issuer.0);
        let fsc = challenge::<CS, Gt>(&proof.cmt_pf3, &left, &knowledge_bases[0])?;

        let row_bases = self.bases.row_bases(pair(&params.uH, &table_key.0));
        let left4 = pair(&proof.cmt_u, &params.g2) - proof.row_id;
        let fsc4 = challenge::<CS, Gt>(&proof.cmt_pf4, &left4, &row_bases[0])?;

        Ok(Some(ProcessedProof { disclosed: slots, knowledge_bases, left, fsc, row_bases, left4, fsc4 }))
    }

    /// Runs every Schnorr check of the proof over the processed values.
    pub fn finish_verification(
        &self,
        proof: &ProofPublic,
        processed: &ProcessedProof,
        markers: &[String],
    ) -> Result<bool, Error> {
        let params = self.params.as_ref();
        let config = params.config();
        let fsc = &processed.fsc;

        if bool::from(proof.A.is_identity()) || bool::from(proof.B.is_identity()) {
            log::debug!("proof rejected: identity commitment");
            return Ok(false);
        }

        let (opening, knowledge) = proof.responses.split_at(OPENING_RESPONSE_COUNT);

        if !verify_schnorr(&proof.B, &proof.cmt_pf1, fsc, &opening[0..2], &[params.g1, params.iH]) {
            log::debug!("proof rejected: opening of B");
            return Ok(false);
        }
        if !verify_schnorr(&proof.Bc, &proof.cmt_pf2, fsc, &opening[2..3], &[proof.B]) {
            log::debug!("proof rejected: Bc = B * c");
            return Ok(false);
        }
        if !verify_schnorr(&proof.Bc, &proof.cmt_pf2b, fsc, &opening[3..5], &[params.g1, params.iH]) {
            log::debug!("proof rejected: opening of Bc");
            return Ok(false);
        }

        // c, -r and -c*r are shared with the openings above
        if knowledge[0] != opening[2] || knowledge[1] != -opening[0] || knowledge[2] != -opening[3] {
            log::debug!("proof rejected: openings not linked to the knowledge proof");
            return Ok(false);
        }

        for &i in &processed.disclosed {
            if !bool::from(knowledge[config.attribute_position(i)].is_zero()) {
                log::debug!("proof rejected: response present for disclosed slot {}", i);
                return Ok(false);
            }
        }

        if !verify_schnorr(&processed.left, &proof.cmt_pf3, fsc, knowledge, &processed.knowledge_bases) {
            log::debug!("proof rejected: knowledge of signature");
            return Ok(false);
        }

        if proof.row_responses[0] != -proof.row_responses[1] {
            log::debug!("proof rejected: row tag not bound to the uniqueness secret");
            return Ok(false);
        }

        if !verify_schnorr(
            &processed.left4,
            &proof.cmt_pf4,
            &processed.fsc4,
            &proof.row_responses,
            &processed.row_bases,
        ) {
            log::debug!("proof rejected: uniqueness tag");
            return Ok(false);
        }

        match (&proof.marker, markers.is_empty()) {
            (None, true) => Ok(true),
            (Some(marker), false) => self.verify_markers(proof, marker, markers),
            _ => {
                log::debug!("proof rejected: marker disclosure does not match the claim");
                Ok(false)
            }
        }
    }

    fn verify_markers(&self, proof: &ProofPublic, marker: &MarkerProof, markers: &[String]) -> Result<bool, Error> {
        let params = self.params.as_ref();

        let Some(signer) = self.trust.marker_key(marker.signer_index) else {
            log::debug!("proof rejected: unknown marker signer {}", marker.signer_index);
            return Ok(false);
        };

        let count = markers.len();
        if marker.blinded_signatures.len() != count
            || marker.cmt_snip.len() != count
            || marker.responses.len() != count + 2
        {
            log::debug!("proof rejected: marker proof carries the wrong number of elements");
            return Ok(false);
        }

        let fsc2 = challenge::<CS, G1Projective>(&proof.cmt_l, &marker.cmt_y, &params.iH)?;

        if !verify_schnorr(&proof.cmt_l, &marker.cmt_y, &fsc2, &marker.responses[0..2], &[params.lH, params.iH]) {
            log::debug!("proof rejected: knowledge of the linkage secret");
            return Ok(false);
        }

        let neg_z_l = -marker.responses[0];
        for (j, value) in markers.iter().enumerate() {
            let blinded = &marker.blinded_signatures[j];
            if bool::from(blinded.is_identity()) {
                log::debug!("proof rejected: identity marker signature {}", j);
                return Ok(false);
            }

            let h = DeidMessage::map_marker_to_scalar_as_hash::<CS>(value.as_bytes())?;
            let left = pair(blinded, &(signer.0 + params.g2 * h.value));
            let generators = [params.e, pair(blinded, &params.g2)];
            let responses = [marker.responses[j + 2], neg_z_l];

            if !verify_schnorr(&left, &marker.cmt_snip[j], &fsc2, &responses, &generators) {
                log::debug!("proof rejected: marker {}", j);
                return Ok(false);
            }
        }

        Ok(true)
    }
}
