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

pub mod deid_message {
    use bls12_381_plus::Scalar;
    use serde::{Deserialize, Serialize};
    use crate::deid::ciphersuites::DeidCiphersuite;
    use crate::errors::Error;
    use crate::utils::util::deid_utils::hash_to_scalar;

    /// A record attribute or a marker string mapped to the scalar field.
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
    pub struct DeidMessage {
        pub value: Scalar,
    }

    impl DeidMessage {
        pub fn new(msg: Scalar) -> Self {
            Self { value: msg }
        }

        pub fn map_message_to_scalar_as_hash<CS: DeidCiphersuite>(data: &[u8]) -> Result<Self, Error> {
            let scalar = hash_to_scalar::<CS>(data, CS::MESSAGE_DST)?;
            Ok(Self { value: scalar })
        }

        /// Markers live in their own hash domain so that a marker string can
        /// never stand in for an attribute of the same text.
        pub fn map_marker_to_scalar_as_hash<CS: DeidCiphersuite>(data: &[u8]) -> Result<Self, Error> {
            let scalar = hash_to_scalar::<CS>(data, CS::MARKER_DST)?;
            Ok(Self { value: scalar })
        }

        pub fn messages_to_scalar<CS: DeidCiphersuite, M: AsRef<str>>(messages: &[M]) -> Result<Vec<Self>, Error> {
            messages
                .iter()
                .map(|m| Self::map_message_to_scalar_as_hash::<CS>(m.as_ref().as_bytes()))
                .collect()
        }
    }

}
