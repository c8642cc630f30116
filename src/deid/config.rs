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

/// Hidden per-record secrets folded into every signature: the uniqueness
/// secret `u` and the linkage secret `l`.
pub const SPECIAL_COUNT: usize = 2;

/// Fixed openings proven ahead of the combined knowledge proof
/// (`r`, `open`, `c`, `c*r`, `c*open`).
pub const OPENING_RESPONSE_COUNT: usize = 5;

/// Bases of the uniqueness sub-proof: `e(uH, T)`, `e(uH, g2)`, `e(iH, g2)`.
pub const ROW_PROOF_COUNT: usize = 3;

/// Every size used by the protocol, derived from the number of attribute slots.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ProtocolConfig {
    message_count: usize,
}

impl ProtocolConfig {
    pub fn new(message_count: usize) -> Result<Self, Error> {
        let config = Self { message_count };
        config.validate()?;
        Ok(config)
    }

    pub fn message_count(&self) -> usize {
        self.message_count
    }

    pub fn special_count(&self) -> usize {
        SPECIAL_COUNT
    }

    /// Slot 0 (offset), one slot per attribute and a last slot for `s`.
    pub fn generator_count(&self) -> usize {
        self.message_count + 2
    }

    /// Target-group bases of the combined knowledge proof: `e(A, g2)`,
    /// `e(iH, pub)`, `e(iH, g2)`, one per attribute, one for `s` and one per
    /// special secret.
    pub fn proof_count(&self) -> usize {
        self.message_count + SPECIAL_COUNT + 4
    }

    pub fn response_count(&self) -> usize {
        self.proof_count() + OPENING_RESPONSE_COUNT
    }

    pub fn row_proof_count(&self) -> usize {
        ROW_PROOF_COUNT
    }

    pub fn row_response_count(&self) -> usize {
        ROW_PROOF_COUNT
    }

    /// Position, inside the combined knowledge proof, of the base paired with
    /// attribute slot `index`.
    pub fn attribute_position(&self, index: usize) -> usize {
        3 + index
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.message_count == 0 {
            return Err(Error::InvalidConfig("message_count must be at least 1".to_owned()));
        }

        // bases: e(A,g2), e(iH,pub), e(iH,g2), attributes, s, specials
        let bases = 3 + self.message_count + 1 + SPECIAL_COUNT;
        if bases != self.proof_count() {
            return Err(Error::InvalidConfig("proof_count drifted from the generator layout".to_owned()));
        }
        if self.attribute_position(self.message_count - 1) + 1 != self.generator_count() + 1 {
            return Err(Error::InvalidConfig("attribute bases overlap the s base".to_owned()));
        }
        if self.response_count() != self.proof_count() + OPENING_RESPONSE_COUNT {
            return Err(Error::InvalidConfig("response_count drifted from proof_count".to_owned()));
        }
        if self.row_proof_count() != self.row_response_count() {
            return Err(Error::InvalidConfig("row proof and row response counts differ".to_owned()));
        }
        Ok(())
    }
}
