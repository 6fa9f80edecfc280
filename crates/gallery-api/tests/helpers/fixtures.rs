//! Test fixtures: minimal PNG/JPEG/MP4 blobs.

/// Minimal valid 1x1 PNG bytes.
pub fn minimal_png() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0x89, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ]
}

/// JPEG start/end markers around an empty payload; enough for a content-type check.
pub fn minimal_jpeg() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0xFF, 0xD9]
}

/// Minimal MP4 (ftyp + mdat).
pub fn minimal_mp4() -> Vec<u8> {
    let mut mp4 = Vec::new();
    mp4.extend_from_slice(&[0x00, 0x00, 0x00, 0x20]);
    mp4.extend_from_slice(b"ftyp");
    mp4.extend_from_slice(b"isom");
    mp4.extend_from_slice(&[0x00, 0x00, 0x02, 0x00]);
    mp4.extend_from_slice(b"isomiso2mp41");
    mp4.extend_from_slice(&[0x00, 0x00, 0x00, 0x08]);
    mp4.extend_from_slice(b"mdat");
    mp4
}

/// PNG signature padded to `size` bytes.
pub fn png_of_size(size: usize) -> Vec<u8> {
    let mut data = minimal_png();
    data.resize(size.max(data.len()), 0);
    data
}
