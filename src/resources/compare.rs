//! Recursive content comparison of files and directory trees.
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;

const CHUNK: usize = 8 * 1024;

/// Return `true` if `a` and `b` hold identical content.
///
/// Symbolic links are followed. Regular files are equal when their bytes are
/// equal; directories are equal when they contain the same entry names and
/// every pair of entries is itself deeply equal. A file is never equal to a
/// directory, and special files (sockets, FIFOs, devices) are never equal to
/// anything.
///
/// # Errors
///
/// Returns an error if either side cannot be read.
pub fn deep_equal(a: &Path, b: &Path) -> io::Result<bool> {
    let meta_a = fs::metadata(a)?;
    let meta_b = fs::metadata(b)?;

    if meta_a.is_dir() && meta_b.is_dir() {
        return dirs_equal(a, b);
    }
    if meta_a.is_file() && meta_b.is_file() {
        if meta_a.len() != meta_b.len() {
            return Ok(false);
        }
        return files_equal(a, b);
    }
    Ok(false)
}

fn entry_names(dir: &Path) -> io::Result<BTreeSet<OsString>> {
    fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect()
}

fn dirs_equal(a: &Path, b: &Path) -> io::Result<bool> {
    let names = entry_names(a)?;
    if names != entry_names(b)? {
        return Ok(false);
    }
    for name in &names {
        if !deep_equal(&a.join(name), &b.join(name))? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn files_equal(a: &Path, b: &Path) -> io::Result<bool> {
    let mut reader_a = BufReader::new(File::open(a)?);
    let mut reader_b = BufReader::new(File::open(b)?);
    let mut buf_a = vec![0u8; CHUNK];
    let mut buf_b = vec![0u8; CHUNK];
    loop {
        let n = read_full(&mut reader_a, &mut buf_a)?;
        let m = read_full(&mut reader_b, &mut buf_b)?;
        if buf_a.get(..n) != buf_b.get(..m) {
            return Ok(false);
        }
        if n == 0 {
            return Ok(true);
        }
    }
}

/// Fill `buf` as far as the reader allows; returns the number of bytes read.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while let Some(rest) = buf.get_mut(filled..)
        && !rest.is_empty()
    {
        match reader.read(rest) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
