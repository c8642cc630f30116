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

mod deid_example {
    use rand::Rng;
    use zkdeid::{
        deid::{
            ciphersuites::DeidCiphersuite,
            credential::Credential,
            keys::TrustRoot,
            params::PublicParameters,
            prover::Prover,
            table::{Disclosure, Table},
            verifier::Verifier,
        },
        errors::Error,
        keys::pair::KeyPair,
        schemes::algorithms::{BonehBoyen, Cls},
        utils::util::deid_utils::encode,
    };

    const RECORDS: [[&str; 5]; 3] = [
        ["SEX=F", "AGE=64", "ZIP=10115", "DX=I10", "SITE=BER-01"],
        ["SEX=M", "AGE=51", "ZIP=20095", "DX=E11", "SITE=HAM-02"],
        ["SEX=F", "AGE=38", "ZIP=80331", "DX=J45", "SITE=MUC-01"],
    ];

    const MARKERS: [&str; 4] = [
        "chr1\t69511\trs2691305\tA\tG\t.\tPASS\tGT=1/1",
        "chr7\t117559590\trs113993960\tATCT\tA\t.\tPASS\tGT=0/1",
        "chr11\t5227002\trs334\tT\tA\t.\tPASS\tGT=0/1",
        "chr17\t43045712\trs80357906\tC\tT\t.\tPASS\tGT=0/0",
    ];

    pub(crate) fn deid_main<CS: DeidCiphersuite>() -> Result<(), Error> {
        let params = PublicParameters::<CS>::setup(RECORDS[0].len())?;

        let mut rng = rand::thread_rng();
        let key_material: Vec<u8> = (0..CS::IKM_LEN).map(|_| rng.gen()).collect();

        log::info!("Keypair Generation");
        let issuer = KeyPair::<Cls<CS>>::generate(&key_material, Some(b"issuer"))?;
        let signer = KeyPair::<BonehBoyen<CS>>::generate(&key_material, Some(b"marker signer"))?;
        log::info!("Issuer PK: {}", issuer.public_key().encode());
        log::info!("Marker PK: {}", signer.public_key().encode());

        let trust = TrustRoot::new(*issuer.public_key(), vec![*signer.public_key()]);

        log::info!("Credential Issuance...");
        let credentials = RECORDS
            .iter()
            .map(|record| Credential::issue(&params, &issuer, &signer, &record[..], &MARKERS[..]))
            .collect::<Result<Vec<_>, Error>>()?;
        for (i, cred) in credentials.iter().enumerate() {
            assert!(cred.verify(&params, &trust)?, "Credential {} is INVALID", i);
            log::info!("Credential {}: {}", i, cred.signature().encode());
        }

        let prover = Prover::new(params.clone(), trust.clone(), credentials)?;
        let verifier = Verifier::new(params, trust);

        let disclosures = [
            Disclosure::new(0, vec![0, 1]),
            Disclosure::new(1, vec![3]),
            Disclosure::new(2, vec![1, 3]),
        ];
        let marker_disclosures = [
            Disclosure::new(0, vec![1]),
            Disclosure::new(1, vec![]),
            Disclosure::new(2, vec![0, 2]),
        ];

        log::info!("Table Construction...");
        let table = Table::new("study-42/export-7", &prover, &disclosures, &marker_disclosures)?;
        for (i, row) in table.rows().iter().enumerate() {
            log::info!("Row {}: {:?} {:?}", i, row.disclosed_attributes, row.disclosed_markers);
            log::info!("Row {} tag: {}", i, encode(&row.row_id));
            log::info!("Row {} proof: {} bytes", i, row.proof.to_bytes().len());
        }

        log::info!("Table verification...");
        assert!(table.check(&verifier)?, "Table verification FAILED!");
        log::info!("Table is VALID");

        Ok(())
    }
}

fn main() {
    use crate::deid_example::deid_main;
    use std::env;
    use zkdeid::deid::ciphersuites::{Bls12381Sha256, Bls12381Shake256};

    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        println!(
            "Usage: {} <cipher_suite>
                Ciphersuites:
                    - BLS12-381-SHA-256
                    - BLS12-381-SHAKE-256",
            args[0]
        );
        return;
    }

    let cipher_suite = &args[1];

    let res = match cipher_suite.as_str() {
        "BLS12-381-SHA-256" => {
            log::info!("Ciphersuite: BLS12-381-SHA-256");
            deid_main::<Bls12381Sha256>()
        }
        "BLS12-381-SHAKE-256" => {
            log::info!("Ciphersuite: BLS12-381-SHAKE-256");
            deid_main::<Bls12381Shake256>()
        }
        _ => {
            println!("Unknown cipher suite: {}", cipher_suite);
            return;
        }
    };

    if let Err(e) = res {
        log::error!("{}", e);
    }
}
