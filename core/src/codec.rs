use rkyv::api::high::{HighDeserializer, HighSerializer, HighValidator};
use rkyv::bytecheck::CheckBytes;
use rkyv::rancor::Error;
use rkyv::ser::allocator::ArenaHandle;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};

use crate::error::CodecError;
use crate::snapshot::GameSnapshot;

pub fn encode<T>(value: &T) -> Result<Vec<u8>, CodecError>
where
    T: for<'a> Serialize<HighSerializer<AlignedVec, ArenaHandle<'a>, Error>>,
{
    rkyv::to_bytes::<Error>(value)
        .map(|bytes| bytes.into_vec())
        .map_err(CodecError::Encode)
}

/// Validates `bytes` before deserializing. Input is copied into an aligned
/// buffer first, since it may come from a file or a base64 string.
pub fn decode<T>(bytes: &[u8]) -> Result<T, CodecError>
where
    T: Archive,
    T::Archived:
        for<'a> CheckBytes<HighValidator<'a, Error>> + Deserialize<T, HighDeserializer<Error>>,
{
    let mut aligned = AlignedVec::<16>::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);
    rkyv::from_bytes::<T, Error>(&aligned).map_err(CodecError::Decode)
}

pub fn encode_snapshot(snapshot: &GameSnapshot) -> Result<Vec<u8>, CodecError> {
    encode(snapshot)
}

pub fn decode_snapshot(bytes: &[u8]) -> Result<GameSnapshot, CodecError> {
    decode(bytes)
}
