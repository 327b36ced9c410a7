use encoding_rs::{UTF_8, WINDOWS_1252};
use memmap2::Mmap;
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::utils::constants::DEFAULT_BUFFER_SIZE;
use crate::error::Result;

/// Read a text file that may be UTF-8 (with or without BOM) or legacy Windows-1252.
pub fn read_text(path: &Path, use_mmap: bool) -> Result<String> {
    let file = File::open(path)?;

    if use_mmap && file.metadata()?.len() > 0 {
        let mmap = unsafe { Mmap::map(&file)? };
        return Ok(decode(&mmap).into_owned());
    }

    let mut bytes = Vec::with_capacity(DEFAULT_BUFFER_SIZE);
    let mut file = file;
    file.read_to_end(&mut bytes)?;
    Ok(decode(&bytes).into_owned())
}

/// Decode bytes as UTF-8, falling back to Windows-1252 when they are not valid UTF-8.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let (text, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return text;
    }

    tracing::debug!("input is not valid UTF-8, decoding as Windows-1252");
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_decode_utf8_with_bom() {
        let bytes = b"\xEF\xBB\xBFtanggal,stasiun";
        assert_eq!(decode(bytes), "tanggal,stasiun");
    }

    #[test]
    fn test_decode_windows_1252_fallback() {
        // 0xB5 is the micro sign in Windows-1252 and invalid on its own in UTF-8
        let bytes = b"Conc. (\xB5g/m3)";
        assert_eq!(decode(bytes), "Conc. (\u{b5}g/m3)");
    }

    #[test]
    fn test_read_text_with_and_without_mmap() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "a,b\n1,2\n")?;

        assert_eq!(read_text(file.path(), false)?, "a,b\n1,2\n");
        assert_eq!(read_text(file.path(), true)?, "a,b\n1,2\n");

        let empty = NamedTempFile::new()?;
        assert_eq!(read_text(empty.path(), true)?, "");
        Ok(())
    }
}
