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

use serde::{Deserialize, Serialize};
use crate::errors::Error;
use crate::keys::pair::KeyPair;
use crate::schemes::algorithms::{BonehBoyen, Cls};
use crate::utils::message::deid_message::DeidMessage;
use super::ciphersuites::DeidCiphersuite;
use super::keys::{MarkerPublicKey, TrustRoot};
use super::marker::MarkerSignature;
use super::params::PublicParameters;
use super::signature::Signature;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SignedMarker {
    pub marker: String,
    pub(crate) hash: DeidMessage,
    pub(crate) signature: MarkerSignature,
}

impl SignedMarker {
    pub fn signature(&self) -> &MarkerSignature {
        &self.signature
    }
}

/// A signed record held by its Prover: the attributes, their hashes, the
/// issuer signature and every marker signed under the record linkage secret.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Credential {
    pub(crate) messages: Vec<String>,
    pub(crate) hashes: Vec<DeidMessage>,
    pub(crate) signature: Signature,
    pub(crate) markers: Vec<SignedMarker>,
    pub(crate) marker_signer: MarkerPublicKey,
}

impl Credential {
    pub fn issue<CS: DeidCiphersuite, M: AsRef<str>>(
        params: &PublicParameters<CS>,
        issuer: &KeyPair<Cls<CS>>,
        marker_signer: &KeyPair<BonehBoyen<CS>>,
        messages: &[M],
        markers: &[M],
    ) -> Result<Self, Error> {
        let hashes = DeidMessage::messages_to_scalar::<CS, M>(messages)?;
        let signature = Signature::sign(params, issuer.private_key(), &hashes)?;

        let markers = markers
            .iter()
            .map(|m| {
                let hash = DeidMessage::map_marker_to_scalar_as_hash::<CS>(m.as_ref().as_bytes())?;
                let signature = MarkerSignature::sign(params, marker_signer.private_key(), &hash, &signature.l)?;
                Ok(SignedMarker { marker: m.as_ref().to_owned(), hash, signature })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        log::debug!("issued credential: {} attributes, {} markers", hashes.len(), markers.len());

        Ok(Self {
            messages: messages.iter().map(|m| m.as_ref().to_owned()).collect(),
            hashes,
            signature,
            markers,
            marker_signer: *marker_signer.public_key(),
        })
    }

    /// Issuer-side sanity check of the attribute signature and of every
    /// marker signature against the trust root.
    pub fn verify<CS: DeidCiphersuite>(&self, params: &PublicParameters<CS>, trust: &TrustRoot) -> Result<bool, Error> {
        if !self.signature.verify(params, &trust.issuer, &self.hashes)? {
            log::debug!("credential rejected: attribute signature");
            return Ok(false);
        }

        if trust.marker_index(&self.marker_signer).is_none() {
            return Err(Error::UnknownMarkerSigner);
        }

        for (j, signed) in self.markers.iter().enumerate() {
            if !signed.signature.verify(params, &self.marker_signer, &signed.hash, &self.signature.l) {
                log::debug!("credential rejected: marker signature {}", j);
                return Ok(false);
            }
        }

        Ok(true)
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn hashes(&self) -> &[DeidMessage] {
        &self.hashes
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn markers(&self) -> &[SignedMarker] {
        &self.markers
    }

    pub fn marker_signer(&self) -> &MarkerPublicKey {
        &self.marker_signer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deid::ciphersuites::Bls12381Sha256;

    type CS = Bls12381Sha256;

    #[test]
    fn issued_credential_verifies() {
        let params = PublicParameters::<CS>::setup(3).unwrap();
        let issuer = KeyPair::<Cls<CS>>::random().unwrap();
        let signer = KeyPair::<BonehBoyen<CS>>::random().unwrap();
        let trust = TrustRoot::new(*issuer.public_key(), vec![*signer.public_key()]);

        let cred = Credential::issue(&params, &issuer, &signer, &["x", "y", "z"][..], &["m0", "m1"][..]).unwrap();
        assert!(cred.verify(&params, &trust).unwrap());
        assert_eq!(cred.markers().len(), 2);

        let stranger = TrustRoot::new(*issuer.public_key(), vec![]);
        assert_eq!(cred.verify(&params, &stranger), Err(Error::UnknownMarkerSigner));
    }

    #[test]
    fn marker_signatures_do_not_transfer_between_credentials() {
        let params = PublicParameters::<CS>::setup(1).unwrap();
        let issuer = KeyPair::<Cls<CS>>::random().unwrap();
        let signer = KeyPair::<BonehBoyen<CS>>::random().unwrap();
        let trust = TrustRoot::new(*issuer.public_key(), vec![*signer.public_key()]);

        let first = Credential::issue(&params, &issuer, &signer, &["a"][..], &["m"][..]).unwrap();
        let mut second = Credential::issue(&params, &issuer, &signer, &["a"][..], &["m"][..]).unwrap();
        assert_ne!(first.signature().l(), second.signature().l());

        second.markers = first.markers.clone();
        assert!(!second.verify(&params, &trust).unwrap());
    }

    #[test]
    fn record_width_must_match_parameters() {
        let params = PublicParameters::<CS>::setup(3).unwrap();
        let issuer = KeyPair::<Cls<CS>>::random().unwrap();
        let signer = KeyPair::<BonehBoyen<CS>>::random().unwrap();
        let res = Credential::issue(&params, &issuer, &signer, &["x", "y"][..], &[][..]);
        assert_eq!(res, Err(Error::InvalidNumberOfMessages { expected: 3, found: 2 }));
    }
}
