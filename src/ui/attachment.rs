use std::fs;
use std::io;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

/// Upper bound on attachment size.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Reads an image file into a base64 `data:` URL.
pub fn encode_image_file(path: impl AsRef<Path>) -> io::Result<String> {
    let path = path.as_ref();
    let mime = mime_for(path).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "unsupported image type")
    })?;
    let bytes = fs::read(path)?;
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "image is too large"));
    }
    Ok(format!("data:{mime};base64,{}", B64.encode(bytes)))
}

/// Decoded size of a `data:` URL payload, for display.
pub fn payload_size(data_url: &str) -> Option<usize> {
    let (_, encoded) = data_url.split_once(";base64,")?;
    B64.decode(encoded).ok().map(|bytes| bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("rust_chatroom_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn encodes_png_as_data_url() {
        let path = temp_file("pixel.PNG", &[0x89, b'P', b'N', b'G']);
        let url = encode_image_file(&path).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(payload_size(&url), Some(4));
    }

    #[test]
    fn rejects_unknown_extension() {
        let path = temp_file("notes.txt", b"hello");
        let err = encode_image_file(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = encode_image_file("/definitely/not/here.jpg").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
