use std::path::Path;

use super::error::{Error, Result};
use super::memory::{MEM_SIZE, PROGRAM_START};

/// Read a raw ROM image. The image is rejected here if it cannot fit in
/// program memory, so nothing is started with a truncated program.
pub fn read_rom<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let program = std::fs::read(path).map_err(|source| Error::RomRead {
        path: path.to_path_buf(),
        source,
    })?;

    let capacity = MEM_SIZE - PROGRAM_START;
    if program.len() > capacity {
        return Err(Error::RomTooLarge { size: program.len(), capacity });
    }

    log::info!("Read {} bytes from {:?}", program.len(), path);
    Ok(program)
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn missing_file_is_a_rom_read_error() {
        let path = std::env::temp_dir().join("fake-chip-8-does-not-exist.ch8");
        match read_rom(&path) {
            Err(Error::RomRead { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected RomRead, got {:?}", other),
        }
    }

    #[test]
    fn reads_and_checks_size() {
        let dir = std::env::temp_dir();

        let small = dir.join(format!("fake-chip-8-small-{}.ch8", std::process::id()));
        std::fs::write(&small, &[0x12u8, 0x00]).unwrap();
        assert_eq!(read_rom(&small).unwrap(), vec![0x12, 0x00]);
        std::fs::remove_file(&small).unwrap();

        let big = dir.join(format!("fake-chip-8-big-{}.ch8", std::process::id()));
        std::fs::write(&big, vec![0u8; MEM_SIZE]).unwrap();
        assert!(matches!(read_rom(&big), Err(Error::RomTooLarge { size: 4096, capacity: 3584 })));
        std::fs::remove_file(&big).unwrap();
    }
}
