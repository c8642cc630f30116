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

use thiserror::Error;

/// Errors raised by the library.
///
/// A proof or signature that simply does not verify is never an error: the
/// verification functions return `Ok(false)` for that. The variants below are
/// reserved for malformed inputs and for failures of the underlying primitives.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Error during keypair generation")]
    KeyGenError(String),
    #[error("Invalid key")]
    KeyDeserializationError,
    #[error("Invalid protocol configuration: {0}")]
    InvalidConfig(String),
    #[error("Error during computation of a Signature")]
    SignatureGenerationError(String),
    #[error("Error during hash to scalar computation")]
    HashToScalarError,
    #[error("Error during generators computation")]
    GeneratorsError,
    #[error("Not enough Generators")]
    NotEnoughGenerators,
    #[error(" A == Identity_G1")]
    G1IdentityError,
    #[error("Error during deserialization")]
    DeserializationError(String),
    #[error("Expected {expected} messages, found {found}")]
    InvalidNumberOfMessages { expected: usize, found: usize },
    #[error("Invalid disclosed index: {0}")]
    InvalidDisclosedIndex(usize),
    #[error("Invalid marker index: {0}")]
    InvalidMarkerIndex(usize),
    #[error("Invalid record index: {0}")]
    InvalidRecordIndex(usize),
    #[error("Marker signer is not part of the trust root")]
    UnknownMarkerSigner,
    #[error("Table construction failed")]
    TableMismatch(String),
    #[error("Randomness source failure")]
    RandomnessError,
    #[error("Failed to compute the challenge")]
    ChallengeComputationFailed,
}
