//! Stream one file through a [`DigestComputer`].

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::digest::DigestComputer;

/// Read `path` to the end in one pass, feeding `computer` through `buffer`. Returns bytes read.
///
/// The caller resets `computer` beforehand. On error the computer holds a partial state that
/// must be discarded. The file handle is closed on every path out of this function.
pub fn hash_file(computer: &mut DigestComputer, path: &Path, buffer: &mut [u8]) -> io::Result<u64> {
    let mut file = File::open(path)?;
    let mut total = 0_u64;
    loop {
        let n = match file.read(buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        computer.update(&buffer[..n]);
        total += n as u64;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::digest::digest_bytes;

    #[test]
    fn small_buffer_matches_one_shot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        let data: Vec<u8> = (0..5000u32).map(|i| (i * 7 % 256) as u8).collect();
        std::fs::write(&path, &data).unwrap();

        let mut computer = DigestComputer::new();
        let mut buf = [0u8; 64];
        let n = hash_file(&mut computer, &path, &mut buf).unwrap();
        assert_eq!(n, data.len() as u64);
        assert_eq!(computer.digests(), digest_bytes(&data));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut computer = DigestComputer::new();
        let mut buf = [0u8; 16];
        let err = hash_file(&mut computer, &dir.path().join("gone"), &mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
