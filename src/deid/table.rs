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

use std::collections::HashSet;
use bls12_381_plus::{G2Projective, Gt};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use crate::errors::Error;
use crate::utils::util::deid_utils::{normalize_indexes, CanonicalBytes};
use super::ciphersuites::DeidCiphersuite;
use super::proof::ProofPublic;
use super::prover::Prover;
use super::verifier::Verifier;

/// Batch key `T`, hashed into G2 from the table phrase.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TableKey(pub(crate) G2Projective);

impl TableKey {
    pub fn from_phrase<CS: DeidCiphersuite>(phrase: &[u8]) -> Self {
        Self(G2Projective::hash::<CS::Expander>(phrase, CS::TABLE_KEY_DST))
    }

    pub fn point(&self) -> &G2Projective {
        &self.0
    }
}

/// Slots of one credential to disclose in a table row.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Disclosure {
    pub record: usize,
    pub slots: Vec<usize>,
}

impl Disclosure {
    pub fn new(record: usize, slots: Vec<usize>) -> Self {
        Self { record, slots }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Row {
    pub disclosed_attributes: Vec<(String, usize)>,
    pub disclosed_markers: Vec<String>,
    pub proof: ProofPublic,
    pub row_id: Gt,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Table {
    table_key: TableKey,
    rows: Vec<Row>,
}

impl Table {
    /// One row per entry of `disclosures`, the marker slots of row `i` taken
    /// from `marker_disclosures[i]`. Both lists must name the same records
    /// in the same order.
    pub fn new<CS: DeidCiphersuite>(
        phrase: &str,
        prover: &Prover<CS>,
        disclosures: &[Disclosure],
        marker_disclosures: &[Disclosure],
    ) -> Result<Self, Error> {
        if disclosures.len() != marker_disclosures.len() {
            return Err(Error::TableMismatch(format!(
                "{} attribute disclosures for {} marker disclosures",
                disclosures.len(),
                marker_disclosures.len()
            )));
        }
        if let Some((i, _)) = disclosures
            .iter()
            .zip(marker_disclosures)
            .enumerate()
            .find(|(_, (d, m))| d.record != m.record)
        {
            return Err(Error::TableMismatch(format!("row {} names two different records", i)));
        }

        let table_key = TableKey::from_phrase::<CS>(phrase.as_bytes());

        #[cfg(feature = "parallel")]
        let rows = disclosures
            .par_iter()
            .zip(marker_disclosures.par_iter())
            .map(|(d, m)| build_row(prover, &table_key, d, m))
            .collect::<Result<Vec<Row>, Error>>()?;

        #[cfg(not(feature = "parallel"))]
        let rows = disclosures
            .iter()
            .zip(marker_disclosures)
            .map(|(d, m)| build_row(prover, &table_key, d, m))
            .collect::<Result<Vec<Row>, Error>>()?;

        log::debug!("table built with {} rows", rows.len());

        Ok(Self { table_key, rows })
    }

    pub fn table_key(&self) -> &TableKey {
        &self.table_key
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut Vec<Row> {
        &mut self.rows
    }

    pub fn check<CS: DeidCiphersuite>(&self, verifier: &Verifier<CS>) -> Result<bool, Error> {
        check_table(verifier, &self.table_key, &self.rows)
    }
}

fn build_row<CS: DeidCiphersuite>(
    prover: &Prover<CS>,
    table_key: &TableKey,
    disclosure: &Disclosure,
    marker_disclosure: &Disclosure,
) -> Result<Row, Error> {
    let (proof, _secrets) = prover.new_proof(disclosure.record, &disclosure.slots, &marker_disclosure.slots, table_key)?;

    let cred = &prover.credentials()[disclosure.record];
    let slots = normalize_indexes(&disclosure.slots, cred.messages.len(), Error::InvalidDisclosedIndex)?;
    let markers = normalize_indexes(&marker_disclosure.slots, cred.markers.len(), Error::InvalidMarkerIndex)?;

    Ok(Row {
        disclosed_attributes: slots.iter().map(|&i| (cred.messages[i].clone(), i)).collect(),
        disclosed_markers: markers.iter().map(|&j| cred.markers[j].marker.clone()).collect(),
        row_id: proof.row_id,
        proof,
    })
}

/// Accepts a table only if every row tag is distinct and every row proof
/// verifies under `table_key`. A row whose claim is malformed counts as a
/// rejected row.
pub fn check_table<CS: DeidCiphersuite>(verifier: &Verifier<CS>, table_key: &TableKey, rows: &[Row]) -> Result<bool, Error> {
    let mut seen: HashSet<Vec<u8>> = HashSet::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        if row.row_id != row.proof.row_id {
            log::warn!("row {}: tag differs from the one inside its proof", i);
            return Ok(false);
        }
        if !seen.insert(row.row_id.to_canonical()) {
            log::warn!("row {}: duplicate row tag", i);
            return Ok(false);
        }
    }

    let verify_row = |(i, row): (usize, &Row)| {
        match verifier.verify_proof(&row.proof, table_key, &row.disclosed_attributes, &row.disclosed_markers) {
            Ok(ok) => ok,
            Err(e) => {
                log::warn!("row {}: malformed claim: {}", i, e);
                false
            }
        }
    };

    #[cfg(feature = "parallel")]
    let results: Vec<bool> = rows.par_iter().enumerate().map(verify_row).collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<bool> = rows.iter().enumerate().map(verify_row).collect();

    if let Some(i) = results.iter().position(|ok| !ok) {
        log::warn!("row {}: proof rejected", i);
        return Ok(false);
    }

    Ok(true)
}
