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

use bls12_381_plus::{G1Projective, Gt, Scalar};
use crate::errors::Error;
use crate::utils::util::deid_utils::{i2osp, CanonicalBytes, OctetReader};

/// Everything a Verifier receives for one disclosure.
///
/// Responses are laid out as `[r, open, c, c*r, c*open]` followed by the
/// combined knowledge proof responses, one per base of
/// [`ProtocolConfig::proof_count`](super::config::ProtocolConfig::proof_count).
/// A disclosed attribute slot carries a zero response.
#[derive(Clone, PartialEq, Debug)]
pub struct ProofPublic {
    pub(crate) A: G1Projective,
    pub(crate) B: G1Projective,
    pub(crate) Bc: G1Projective,
    pub(crate) cmt_pf1: G1Projective,
    pub(crate) cmt_pf2: G1Projective,
    pub(crate) cmt_pf2b: G1Projective,
    pub(crate) cmt_pf3: Gt,
    pub(crate) cmt_pf4: Gt,
    pub(crate) row_id: Gt,
    pub(crate) cmt_u: G1Projective,
    pub(crate) cmt_l: G1Projective,
    pub(crate) responses: Vec<Scalar>,
    pub(crate) row_responses: Vec<Scalar>,
    pub(crate) marker: Option<MarkerProof>,
}

/// Proof that a subset of marker strings was signed under the credential
/// linkage secret.
///
/// `responses` holds `[z_l, z_lblind]` followed by one `z_rho` per disclosed
/// marker.
#[derive(Clone, PartialEq, Debug)]
pub struct MarkerProof {
    pub(crate) signer_index: usize,
    pub(crate) cmt_y: G1Projective,
    pub(crate) blinded_signatures: Vec<G1Projective>,
    pub(crate) cmt_snip: Vec<Gt>,
    pub(crate) responses: Vec<Scalar>,
}

/// Blinding scalars of one proof. Never leaves the Prover and must not be
/// reused for a second proof.
#[derive(Debug)]
pub struct ProofSecrets {
    pub(crate) r: Scalar,
    pub(crate) open: Scalar,
    pub(crate) u_blind: Scalar,
    pub(crate) l_blind: Scalar,
    pub(crate) opening_randoms: Vec<Scalar>,
    pub(crate) knowledge_randoms: Vec<Scalar>,
    pub(crate) row_randoms: Vec<Scalar>,
    pub(crate) marker: Option<MarkerSecrets>,
}

#[derive(Debug)]
pub struct MarkerSecrets {
    pub(crate) y1: Scalar,
    pub(crate) y2: Scalar,
    pub(crate) rho: Vec<Scalar>,
    pub(crate) a: Vec<Scalar>,
}

impl ProofSecrets {
    /// Blinding factor of the signature inside `A`.
    pub fn r(&self) -> &Scalar {
        &self.r
    }

    /// Opening randomness of `B`.
    pub fn open(&self) -> &Scalar {
        &self.open
    }

    pub fn u_blind(&self) -> &Scalar {
        &self.u_blind
    }

    pub fn l_blind(&self) -> &Scalar {
        &self.l_blind
    }

    /// Randoms of the `B` and `Bc` openings, in response order.
    pub fn opening_randoms(&self) -> &[Scalar] {
        &self.opening_randoms
    }

    pub fn knowledge_randoms(&self) -> &[Scalar] {
        &self.knowledge_randoms
    }

    pub fn row_randoms(&self) -> &[Scalar] {
        &self.row_randoms
    }

    pub fn marker(&self) -> Option<&MarkerSecrets> {
        self.marker.as_ref()
    }
}

impl MarkerSecrets {
    /// Randoms of the linkage secret commitment `cmtY`.
    pub fn y(&self) -> (&Scalar, &Scalar) {
        (&self.y1, &self.y2)
    }

    pub fn rho(&self) -> &[Scalar] {
        &self.rho
    }

    pub fn a(&self) -> &[Scalar] {
        &self.a
    }
}

fn push_elements<T: CanonicalBytes>(bytes: &mut Vec<u8>, elements: &[T]) {
    bytes.extend_from_slice(&i2osp(elements.len(), 8));
    for e in elements {
        bytes.extend_from_slice(&e.to_canonical());
    }
}

fn read_elements<T: CanonicalBytes>(reader: &mut OctetReader) -> Result<Vec<T>, Error> {
    let len = reader.length()?;
    reader.elements(len)
}

impl ProofPublic {
    /// Per-row, per-table uniqueness tag `e(uH * u, T)`.
    pub fn row_id(&self) -> &Gt {
        &self.row_id
    }

    pub fn responses(&self) -> &[Scalar] {
        &self.responses
    }

    pub fn row_responses(&self) -> &[Scalar] {
        &self.row_responses
    }

    pub fn marker_proof(&self) -> Option<&MarkerProof> {
        self.marker.as_ref()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for point in [&self.A, &self.B, &self.Bc, &self.cmt_pf1, &self.cmt_pf2, &self.cmt_pf2b] {
            bytes.extend_from_slice(&point.to_canonical());
        }
        for gt in [&self.cmt_pf3, &self.cmt_pf4, &self.row_id] {
            bytes.extend_from_slice(&gt.to_canonical());
        }
        bytes.extend_from_slice(&self.cmt_u.to_canonical());
        bytes.extend_from_slice(&self.cmt_l.to_canonical());
        push_elements(&mut bytes, &self.responses);
        push_elements(&mut bytes, &self.row_responses);

        match &self.marker {
            None => bytes.push(0u8),
            Some(marker) => {
                bytes.push(1u8);
                bytes.extend_from_slice(&i2osp(marker.signer_index, 8));
                bytes.extend_from_slice(&marker.cmt_y.to_canonical());
                push_elements(&mut bytes, &marker.blinded_signatures);
                push_elements(&mut bytes, &marker.cmt_snip);
                push_elements(&mut bytes, &marker.responses);
            }
        }

        bytes
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        let mut reader = OctetReader::new(data);

        let A = reader.element()?;
        let B = reader.element()?;
        let Bc = reader.element()?;
        let cmt_pf1 = reader.element()?;
        let cmt_pf2 = reader.element()?;
        let cmt_pf2b = reader.element()?;
        let cmt_pf3 = reader.element()?;
        let cmt_pf4 = reader.element()?;
        let row_id = reader.element()?;
        let cmt_u = reader.element()?;
        let cmt_l = reader.element()?;
        let responses = read_elements(&mut reader)?;
        let row_responses = read_elements(&mut reader)?;

        let marker = match reader.byte()? {
            0 => None,
            1 => Some(MarkerProof {
                signer_index: reader.length()?,
                cmt_y: reader.element()?,
                blinded_signatures: read_elements(&mut reader)?,
                cmt_snip: read_elements(&mut reader)?,
                responses: read_elements(&mut reader)?,
            }),
            flag => return Err(Error::DeserializationError(format!("invalid marker flag {}", flag))),
        };

        reader.finish()?;

        Ok(Self {
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
        })
    }

    pub fn encode(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl MarkerProof {
    /// Index of the marker signer inside the Verifier trust root.
    pub fn signer_index(&self) -> usize {
        self.signer_index
    }

    pub fn blinded_signatures(&self) -> &[G1Projective] {
        &self.blinded_signatures
    }
}
