use std::fs::File;

/// The bytes of a trace file, memory mapped where the platform supports it
pub enum TraceBytes {
    #[cfg(unix)]
    Mapped(memmap2::Mmap),
    Buffered(Vec<u8>),
}

impl AsRef<[u8]> for TraceBytes {
    fn as_ref(&self) -> &[u8] {
        match self {
            #[cfg(unix)]
            TraceBytes::Mapped(map) => map,
            TraceBytes::Buffered(bytes) => bytes,
        }
    }
}

pub fn read_trace(file: File) -> Result<TraceBytes, String> {
    // Compatibility on other systems
    #[cfg(not(unix))]
    {
        use std::io::Read;
        let mut file = file;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| format!("Couldn't read the trace file: {e}"))?;
        Ok(TraceBytes::Buffered(bytes))
    }
    // Memory map the file for speed on unix systems; the simulator reads the
    // trace strictly sequentially, so advise the OS accordingly
    #[cfg(unix)]
    {
        use memmap2::{Advice, Mmap};
        unsafe {
            let m = Mmap::map(&file).map_err(|e| format!("Couldn't memory map the file: {e}"))?;
            m.advise(Advice::Sequential)
                .map_err(|e| format!("Failed to provide access advice to the OS, {e}"))?;
            Ok(TraceBytes::Mapped(m))
        }
    }
}
