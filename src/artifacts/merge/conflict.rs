use bytes::Bytes;

const CURRENT_MARKER: &str = "<<<<<<< HEAD";
const SEPARATOR: &str = "=======";
const END_MARKER: &str = ">>>>>>>";

/// Working file content for a path both sides changed differently
///
/// An absent side contributes empty content.
pub fn conflict_content(current: Option<&[u8]>, incoming: Option<&[u8]>) -> Bytes {
    let mut content = Vec::new();

    content.extend_from_slice(CURRENT_MARKER.as_bytes());
    content.push(b'\n');
    content.extend_from_slice(current.unwrap_or_default());
    content.push(b'\n');
    content.extend_from_slice(SEPARATOR.as_bytes());
    content.push(b'\n');
    content.extend_from_slice(incoming.unwrap_or_default());
    content.push(b'\n');
    content.extend_from_slice(END_MARKER.as_bytes());
    content.push(b'\n');

    Bytes::from(content)
}
