use skypost_core::Dimensions;

/// The 8-byte PNG signature preceding the IHDR chunk.
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Offset of the IHDR width field: signature (8) + chunk length (4) + tag (4).
const IHDR_WIDTH_OFFSET: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PngError {
    #[error("file too short to be a PNG ({0} bytes)")]
    Truncated(usize),
    #[error("not a PNG: bad signature")]
    BadSignature,
    #[error("not a PNG: missing IHDR chunk")]
    MissingIhdr,
}

/// Read width and height from the IHDR chunk of a PNG byte stream.
///
/// IHDR is required to be the first chunk, so the dimensions always sit at a
/// fixed offset: two big-endian u32s right after the chunk tag.
pub fn parse_png_dimensions(bytes: &[u8]) -> Result<Dimensions, PngError> {
    if bytes.len() < IHDR_WIDTH_OFFSET + 8 {
        return Err(PngError::Truncated(bytes.len()));
    }
    if bytes[..8] != PNG_SIGNATURE {
        return Err(PngError::BadSignature);
    }
    if &bytes[12..16] != b"IHDR" {
        return Err(PngError::MissingIhdr);
    }

    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    Ok(Dimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_header(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(24);
        bytes.extend_from_slice(&PNG_SIGNATURE);
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes
    }

    #[test]
    fn reads_dimensions_from_ihdr() {
        assert_eq!(
            parse_png_dimensions(&png_header(800, 600)),
            Ok(Dimensions {
                width: 800,
                height: 600
            })
        );
    }

    #[test]
    fn handles_large_and_tiny_dimensions() {
        assert_eq!(
            parse_png_dimensions(&png_header(3840, 2160)),
            Ok(Dimensions {
                width: 3840,
                height: 2160
            })
        );
        assert_eq!(
            parse_png_dimensions(&png_header(1, 1)),
            Ok(Dimensions {
                width: 1,
                height: 1
            })
        );
    }

    #[test]
    fn rejects_truncated_input() {
        assert_eq!(
            parse_png_dimensions(&[0u8; 10]),
            Err(PngError::Truncated(10))
        );
    }

    #[test]
    fn rejects_wrong_signature() {
        let mut bytes = png_header(1, 1);
        bytes[0] = 0x00;
        assert_eq!(parse_png_dimensions(&bytes), Err(PngError::BadSignature));
    }

    #[test]
    fn rejects_missing_ihdr() {
        let mut bytes = png_header(1, 1);
        bytes[12..16].copy_from_slice(b"IDAT");
        assert_eq!(parse_png_dimensions(&bytes), Err(PngError::MissingIhdr));
    }
}
