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

pub mod deid_utils {
    use bls12_381_plus::{G1Affine, G1Projective, G2Affine, G2Projective, Gt, Scalar};
    use elliptic_curve::group::Curve;
    use elliptic_curve::hash2curve::{ExpandMsg, Expander};
    use rand::rngs::OsRng;
    use rand::RngCore;
    use crate::deid::ciphersuites::DeidCiphersuite;
    use crate::errors::Error;

    /// Fixed-width canonical encoding of a group or field element.
    pub trait CanonicalBytes: Sized {
        const BYTES: usize;
        fn to_canonical(&self) -> Vec<u8>;
        fn from_canonical(bytes: &[u8]) -> Result<Self, Error>;
    }

    impl CanonicalBytes for Scalar {
        const BYTES: usize = Scalar::BYTES;

        //in BE order
        fn to_canonical(&self) -> Vec<u8> {
            self.to_be_bytes().to_vec()
        }

        fn from_canonical(bytes: &[u8]) -> Result<Self, Error> {
            let bytes: [u8; Scalar::BYTES] = bytes
                .try_into()
                .map_err(|_| Error::DeserializationError("invalid scalar length".to_owned()))?;
            Option::<Scalar>::from(Scalar::from_be_bytes(&bytes))
                .ok_or(Error::DeserializationError("scalar out of range".to_owned()))
        }
    }

    impl CanonicalBytes for G1Projective {
        const BYTES: usize = G1Affine::COMPRESSED_BYTES;

        fn to_canonical(&self) -> Vec<u8> {
            self.to_affine().to_compressed().to_vec()
        }

        fn from_canonical(bytes: &[u8]) -> Result<Self, Error> {
            let bytes: [u8; G1Affine::COMPRESSED_BYTES] = bytes
                .try_into()
                .map_err(|_| Error::DeserializationError("invalid G1 length".to_owned()))?;
            Option::<G1Affine>::from(G1Affine::from_compressed(&bytes))
                .map(G1Projective::from)
                .ok_or(Error::DeserializationError("invalid G1 point".to_owned()))
        }
    }

    impl CanonicalBytes for G2Projective {
        const BYTES: usize = G2Affine::COMPRESSED_BYTES;

        fn to_canonical(&self) -> Vec<u8> {
            self.to_affine().to_compressed().to_vec()
        }

        fn from_canonical(bytes: &[u8]) -> Result<Self, Error> {
            let bytes: [u8; G2Affine::COMPRESSED_BYTES] = bytes
                .try_into()
                .map_err(|_| Error::DeserializationError("invalid G2 length".to_owned()))?;
            Option::<G2Affine>::from(G2Affine::from_compressed(&bytes))
                .map(G2Projective::from)
                .ok_or(Error::DeserializationError("invalid G2 point".to_owned()))
        }
    }

    impl CanonicalBytes for Gt {
        const BYTES: usize = Gt::BYTES;

        fn to_canonical(&self) -> Vec<u8> {
            self.to_bytes().to_vec()
        }

        fn from_canonical(bytes: &[u8]) -> Result<Self, Error> {
            let bytes: [u8; Gt::BYTES] = bytes
                .try_into()
                .map_err(|_| Error::DeserializationError("invalid Gt length".to_owned()))?;
            Option::<Gt>::from(Gt::from_bytes(&bytes))
                .ok_or(Error::DeserializationError("invalid Gt element".to_owned()))
        }
    }

    /// Hex rendering of an element, for logs and demos only.
    pub fn encode<T: CanonicalBytes>(element: &T) -> String {
        hex::encode(element.to_canonical())
    }

    pub fn i2osp(integer: usize, octet_length: usize) -> Vec<u8> {
        let mut octets = vec![0u8; octet_length];
        let bytes = (integer as u64).to_be_bytes();
        let take = octet_length.min(bytes.len());
        octets[octet_length - take..].copy_from_slice(&bytes[bytes.len() - take..]);
        octets
    }

    pub fn hash_to_scalar<CS: DeidCiphersuite>(msg_octets: &[u8], dst: &[u8]) -> Result<Scalar, Error> {
        let mut uniform_bytes = [0u8; 48];
        CS::Expander::expand_message(&[msg_octets], &[dst], CS::EXPAND_LEN)
            .map_err(|_| Error::HashToScalarError)?
            .fill_bytes(&mut uniform_bytes);

        Ok(Scalar::from_okm(&uniform_bytes))
    }

    /// Uniform scalar drawn from the operating system entropy source.
    pub fn get_random() -> Result<Scalar, Error> {
        let mut buf = [0u8; 48];
        OsRng.try_fill_bytes(&mut buf).map_err(|_| Error::RandomnessError)?;
        Ok(Scalar::from_okm(&buf))
    }

    pub fn calculate_random_scalars(count: usize) -> Result<Vec<Scalar>, Error> {
        (0..count).map(|_| get_random()).collect()
    }

    /// g * a + h * b
    pub fn pedersen_commit(g: &G1Projective, h: &G1Projective, a: &Scalar, b: &Scalar) -> G1Projective {
        g * a + h * b
    }

    /// Fiat-Shamir challenge over three elements of the same group.
    ///
    /// Each element is written with its canonical encoding, the concatenation
    /// is hashed to a scalar under the ciphersuite challenge DST.
    pub fn challenge<CS, T>(a: &T, b: &T, c: &T) -> Result<Scalar, Error>
    where
        CS: DeidCiphersuite,
        T: CanonicalBytes,
    {
        let mut c_arr: Vec<u8> = Vec::with_capacity(3 * T::BYTES);
        c_arr.extend_from_slice(&a.to_canonical());
        c_arr.extend_from_slice(&b.to_canonical());
        c_arr.extend_from_slice(&c.to_canonical());

        hash_to_scalar::<CS>(&c_arr, CS::CHALLENGE_DST).map_err(|_| Error::ChallengeComputationFailed)
    }

    /// Sequential reader over a canonical byte encoding.
    pub struct OctetReader<'a> {
        bytes: &'a [u8],
        offset: usize,
    }

    impl<'a> OctetReader<'a> {
        pub fn new(bytes: &'a [u8]) -> Self {
            Self { bytes, offset: 0 }
        }

        pub fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
            let end = self
                .offset
                .checked_add(len)
                .filter(|end| *end <= self.bytes.len())
                .ok_or(Error::DeserializationError("unexpected end of input".to_owned()))?;
            let slice = &self.bytes[self.offset..end];
            self.offset = end;
            Ok(slice)
        }

        pub fn element<T: CanonicalBytes>(&mut self) -> Result<T, Error> {
            T::from_canonical(self.take(T::BYTES)?)
        }

        pub fn elements<T: CanonicalBytes>(&mut self, count: usize) -> Result<Vec<T>, Error> {
            (0..count).map(|_| self.element()).collect()
        }

        /// 8-byte big-endian length prefix.
        pub fn length(&mut self) -> Result<usize, Error> {
            let bytes: [u8; 8] = self
                .take(8)?
                .try_into()
                .map_err(|_| Error::DeserializationError("invalid length prefix".to_owned()))?;
            usize::try_from(u64::from_be_bytes(bytes))
                .map_err(|_| Error::DeserializationError("length prefix overflow".to_owned()))
        }

        pub fn byte(&mut self) -> Result<u8, Error> {
            Ok(self.take(1)?[0])
        }

        pub fn finish(self) -> Result<(), Error> {
            if self.offset != self.bytes.len() {
                return Err(Error::DeserializationError("trailing bytes".to_owned()));
            }
            Ok(())
        }
    }

    /// Sorts, deduplicates and bounds-checks a list of slot indexes.
    pub fn normalize_indexes(indexes: &[usize], length: usize, err: fn(usize) -> Error) -> Result<Vec<usize>, Error> {
        let mut indexes = indexes.to_vec();
        indexes.sort_unstable();
        indexes.dedup();
        if let Some(&invalid) = indexes.iter().find(|&&i| i >= length) {
            return Err(err(invalid));
        }
        Ok(indexes)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::deid::ciphersuites::{Bls12381Sha256, Bls12381Shake256};
        use bls12_381_plus::pairing;

        fn random_gt() -> Gt {
            pairing(&G1Affine::generator(), &G2Affine::generator()) * get_random().unwrap()
        }

        #[test]
        fn challenge_is_deterministic() {
            let (a, b, c) = (random_gt(), random_gt(), random_gt());
            let fsc = challenge::<Bls12381Sha256, _>(&a, &b, &c).unwrap();
            let fsc2 = challenge::<Bls12381Sha256, _>(&a, &b, &c).unwrap();
            assert_eq!(fsc, fsc2);

            let fsc3 = challenge::<Bls12381Sha256, _>(&a, &b, &random_gt()).unwrap();
            assert_ne!(fsc, fsc3);
            let fsc4 = challenge::<Bls12381Shake256, _>(&a, &b, &c).unwrap();
            assert_ne!(fsc, fsc4);
        }

        #[test]
        fn challenge_depends_on_order() {
            let g = G1Projective::GENERATOR;
            let h = g * get_random().unwrap();
            let first = challenge::<Bls12381Sha256, _>(&g, &h, &g).unwrap();
            let second = challenge::<Bls12381Sha256, _>(&h, &g, &g).unwrap();
            assert_ne!(first, second);
        }

        #[test]
        fn canonical_widths() {
            assert_eq!(<Scalar as CanonicalBytes>::BYTES, 32);
            assert_eq!(<G1Projective as CanonicalBytes>::BYTES, 48);
            assert_eq!(<G2Projective as CanonicalBytes>::BYTES, 96);
            assert_eq!(<Gt as CanonicalBytes>::BYTES, 576);

            let e = random_gt();
            assert_eq!(Gt::from_canonical(&e.to_canonical()).unwrap(), e);
            let s = get_random().unwrap();
            assert_eq!(Scalar::from_canonical(&s.to_canonical()).unwrap(), s);
        }

        #[test]
        fn i2osp_big_endian() {
            assert_eq!(i2osp(258, 2), vec![1u8, 2u8]);
            assert_eq!(i2osp(5, 8), vec![0, 0, 0, 0, 0, 0, 0, 5]);
        }

        #[test]
        fn indexes_are_checked() {
            let err = normalize_indexes(&[0, 7], 5, Error::InvalidDisclosedIndex).unwrap_err();
            assert_eq!(err, Error::InvalidDisclosedIndex(7));
            assert_eq!(normalize_indexes(&[3, 1, 3], 5, Error::InvalidDisclosedIndex).unwrap(), vec![1, 3]);
        }

        #[test]
        fn truncated_input_is_rejected() {
            let mut reader = OctetReader::new(&[0u8; 4]);
            assert!(reader.length().is_err());
        }
    }
}
