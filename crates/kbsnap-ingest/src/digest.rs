use std::io::Write;

/// Rule separating file sections in the flat digest.
const SECTION_RULE: &str =
    "================================================";

/// Serializes one ingestion into the flat text digest format.
///
/// Layout: summary header, indented directory listing, then one section per
/// file. Downstream consumers split on the `=` rule — the format is a
/// compatibility contract, not a style choice.
pub struct DigestWriter<W: Write> {
    out: W,
    bytes_written: u64,
}

impl<W: Write> DigestWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            bytes_written: 0,
        }
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn emit(&mut self, s: &str) -> std::io::Result<()> {
        self.out.write_all(s.as_bytes())?;
        self.bytes_written += s.len() as u64;
        Ok(())
    }

    /// Summary header at the top of the digest.
    pub fn header(&mut self, label: &str, reference: &str, file_count: usize) -> std::io::Result<()> {
        self.emit(&format!(
            "Repository: {label}\nRef: {reference}\nFiles analyzed: {file_count}\n\n"
        ))
    }

    /// Indented directory listing of every included file path.
    pub fn tree(&mut self, paths: &[&str]) -> std::io::Result<()> {
        self.emit("Directory structure:\n")?;
        for path in paths {
            let depth = path.matches('/').count();
            let name = path.rsplit('/').next().unwrap_or(path);
            self.emit(&format!("{}{}\n", "    ".repeat(depth), name))?;
        }
        self.emit("\n")
    }

    /// One file section: rule, path line, rule, content.
    pub fn section(&mut self, path: &str, content: &str) -> std::io::Result<()> {
        self.emit(&format!("{SECTION_RULE}\nFILE: {path}\n{SECTION_RULE}\n"))?;
        self.emit(content)?;
        if !content.ends_with('\n') {
            self.emit("\n")?;
        }
        self.emit("\n")
    }

    pub fn finish(mut self) -> std::io::Result<u64> {
        self.out.flush()?;
        Ok(self.bytes_written)
    }
}

/// True when the extension marks a file we never inline into a text digest.
pub fn is_binary_path(path: &str) -> bool {
    const BINARY_EXTS: &[&str] = &[
        "png", "jpg", "jpeg", "gif", "webp", "ico", "bmp", "pdf", "zip", "gz", "tgz", "bz2",
        "xz", "tar", "7z", "woff", "woff2", "ttf", "otf", "eot", "mp3", "mp4", "mov", "avi",
        "wav", "ogg", "wasm", "exe", "dll", "so", "dylib", "class", "jar", "bin", "dat",
    ];
    path.rsplit('.')
        .next()
        .map(|ext| BINARY_EXTS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
