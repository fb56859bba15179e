/// At most `width` bytes of `bytes`.
pub fn truncate(bytes: &[u8], width: usize) -> &[u8] {
    &bytes[..bytes.len().min(width)]
}

/// The part of `bytes` visible in a window starting at `offset` that is
/// `width` columns wide. Empty if the window starts past the end.
pub fn window(bytes: &[u8], offset: usize, width: usize) -> &[u8] {
    if offset >= bytes.len() {
        return &[];
    }
    truncate(&bytes[offset..], width)
}
