//! Wire format of the proof exchange.
//!
//! A request is the raw UTF-8 bytes of an identifier, with no prefix or delimiter: the
//! request/response turn-taking is the only framing. A response is a 4-byte big-endian
//! signed length `N` followed by `N` payload bytes, which split into `N / W` digests of
//! the agreed width `W`. The session ends with the literal sentinel `close`.

use byteorder::{BigEndian, ByteOrder};

use crate::error::ProtocolError;

/// Size of the response length header
pub const HEADER_LEN: usize = 4;

/// Message telling the authority the session is over
pub const SESSION_SENTINEL: &str = "close";

/// Bytes sent to request the proof of `identifier`
pub fn encode_request(identifier: &str) -> &[u8] {
    identifier.as_bytes()
}

/// Decode the payload length announced by a response header.
///
/// The length is validated before any payload is read: it must be non-negative, within
/// `max_payload`, and a whole number of `digest_width` chunks.
pub fn decode_header(
    header: &[u8; HEADER_LEN],
    digest_width: usize,
    max_payload: usize,
) -> Result<usize, ProtocolError> {
    let raw = BigEndian::read_i32(header);
    let length = usize::try_from(raw).map_err(|_| ProtocolError::NegativeLength(raw))?;

    if length > max_payload {
        return Err(ProtocolError::PayloadTooLarge {
            length,
            limit: max_payload,
        });
    }
    check_alignment(length, digest_width)?;

    Ok(length)
}

/// Split a payload into its ordered digest strings
pub fn decode_proof(payload: &[u8], digest_width: usize) -> Result<Vec<String>, ProtocolError> {
    check_alignment(payload.len(), digest_width)?;

    payload
        .chunks_exact(digest_width)
        .enumerate()
        .map(|(index, chunk)| {
            std::str::from_utf8(chunk)
                .map(str::to_owned)
                .map_err(|source| ProtocolError::InvalidEncoding { index, source })
        })
        .collect()
}

/// Frame a proof as the authority sends it: length header, then the concatenated nodes
pub fn encode_response(proof: &[String]) -> Result<Vec<u8>, ProtocolError> {
    let payload_len: usize = proof.iter().map(String::len).sum();
    let announced = i32::try_from(payload_len).map_err(|_| ProtocolError::PayloadTooLarge {
        length: payload_len,
        limit: i32::MAX as usize,
    })?;

    let mut message = vec![0u8; HEADER_LEN];
    BigEndian::write_i32(&mut message, announced);
    message.reserve(payload_len);
    for node in proof {
        message.extend_from_slice(node.as_bytes());
    }
    Ok(message)
}

fn check_alignment(length: usize, digest_width: usize) -> Result<(), ProtocolError> {
    if digest_width == 0 || length % digest_width != 0 {
        return Err(ProtocolError::Misaligned {
            length,
            width: digest_width,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: usize = 32;
    const LIMIT: usize = 1 << 20;

    fn header(length: i32) -> [u8; HEADER_LEN] {
        length.to_be_bytes()
    }

    fn digests(count: usize) -> Vec<String> {
        (0..count)
            .map(|i| format!("{:0>32}", format!("{:x}", 0xabc0 + i)))
            .collect()
    }

    #[test]
    fn test_header_is_big_endian() {
        let bytes: [u8; HEADER_LEN] = hex::decode("00000040").unwrap().try_into().unwrap();
        assert_eq!(decode_header(&bytes, WIDTH, LIMIT).unwrap(), 64);
        assert_eq!(decode_header(&header(0), WIDTH, LIMIT).unwrap(), 0);
    }

    #[test]
    fn test_header_rejects_negative_length() {
        assert!(matches!(
            decode_header(&header(-32), WIDTH, LIMIT),
            Err(ProtocolError::NegativeLength(-32))
        ));
    }

    #[test]
    fn test_header_rejects_misaligned_length() {
        assert!(matches!(
            decode_header(&header(33), WIDTH, LIMIT),
            Err(ProtocolError::Misaligned {
                length: 33,
                width: 32
            })
        ));
    }

    #[test]
    fn test_header_rejects_oversized_payload() {
        assert!(matches!(
            decode_header(&header(64), WIDTH, 32),
            Err(ProtocolError::PayloadTooLarge {
                length: 64,
                limit: 32
            })
        ));
    }

    #[test]
    fn test_decode_preserves_order() {
        let proof = digests(3);
        let message = encode_response(&proof).unwrap();
        assert_eq!(message.len(), HEADER_LEN + 3 * WIDTH);

        let length = decode_header(&message[..HEADER_LEN].try_into().unwrap(), WIDTH, LIMIT)
            .unwrap();
        let decoded = decode_proof(&message[HEADER_LEN..HEADER_LEN + length], WIDTH).unwrap();
        assert_eq!(decoded, proof);
    }

    #[test]
    fn test_decode_empty_payload() {
        assert!(decode_proof(&[], WIDTH).unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_trailing_partial_chunk() {
        let payload = vec![b'a'; WIDTH + 5];
        assert!(matches!(
            decode_proof(&payload, WIDTH),
            Err(ProtocolError::Misaligned { length: 37, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let mut payload = vec![b'a'; 2 * WIDTH];
        payload[WIDTH + 1] = 0xff;
        assert!(matches!(
            decode_proof(&payload, WIDTH),
            Err(ProtocolError::InvalidEncoding { index: 1, .. })
        ));
    }

    #[test]
    fn test_encode_request_is_raw_bytes() {
        assert_eq!(encode_request("tx1"), b"tx1");
        assert_eq!(encode_request(SESSION_SENTINEL), b"close");
    }
}
