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

//! Selective disclosure of signed records.
//!
//! An issuer signs a fixed-width attribute vector together with two hidden
//! per-record secrets, the uniqueness secret `u` and the linkage secret `l`,
//! and signs a list of marker strings bound to `l`. The holder later proves
//! possession of the signature while revealing a chosen subset of attributes
//! and markers. Each proof carries a row tag `e(uH * u, T)` for a table key
//! `T`, so that a Verifier can spot two rows drawn from the same record
//! inside one table.

pub mod ciphersuites;
pub mod config;
pub mod credential;
pub mod keys;
pub mod marker;
pub(crate) mod pairings;
pub mod params;
pub mod proof;
pub mod prover;
pub mod signature;
pub mod table;
pub mod verifier;
