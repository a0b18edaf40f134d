use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Escribe `contents` en `path` pasando por un archivo temporal hermano.
///
/// El `rename` final es atómico en el mismo sistema de archivos, así que un
/// lector nunca ve un `morrowland.toml` a medio escribir.
pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  let tmp_path = path.with_extension("tmp");

  {
    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(contents.as_bytes())?;
    tmp_file.sync_all()?;
  }

  fs::rename(&tmp_path, path)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn replaces_existing_file_and_leaves_no_tmp() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("morrowland.toml");
    fs::write(&path, "old = 1\n").unwrap();

    atomic_write_str(&path, "new = 2\n").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "new = 2\n");
    assert!(!path.with_extension("tmp").exists());
  }
}
