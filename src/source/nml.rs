// src/source/nml.rs
//! NML (djnml) file source for Dow Jones newswire archives.
//!
//! An `.nml` file is a concatenation of `<doc>` documents, one per story,
//! each terminated by `</doc>`. Files are read line by line and split on
//! that terminator, so a multi-gigabyte archive is never held in memory;
//! each chunk is then deserialized with quick-xml.

use anyhow::{Context, Result};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ScreenError;
use crate::source::types::StorySource;
use crate::story::RawStory;

use chrono::{DateTime, NaiveDateTime, Utc};

// --- djnml document shape (only the fields the screener consumes) ---

#[derive(Debug, Deserialize)]
struct Doc {
    djnml: Djnml,
}

#[derive(Debug, Deserialize)]
struct Djnml {
    head: Head,
    body: Option<Body>,
}

#[derive(Debug, Deserialize)]
struct Head {
    docdata: DocData,
}

#[derive(Debug, Deserialize)]
struct DocData {
    djn: Djn,
}

#[derive(Debug, Deserialize)]
struct Djn {
    #[serde(rename = "djn-newswires")]
    newswires: Newswires,
}

#[derive(Debug, Deserialize)]
struct Newswires {
    #[serde(rename = "djn-mdata")]
    mdata: Mdata,
}

#[derive(Debug, Deserialize)]
struct Mdata {
    #[serde(rename = "@accession-number")]
    accession_number: Option<String>,
    #[serde(rename = "@display-date")]
    display_date: Option<String>,
    #[serde(rename = "djn-coding")]
    coding: Option<Coding>,
}

#[derive(Debug, Deserialize)]
struct Coding {
    #[serde(rename = "djn-company")]
    company: Option<Company>,
}

#[derive(Debug, Deserialize)]
struct Company {
    #[serde(rename = "c", default)]
    codes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Body {
    text: Option<TextBlock>,
}

#[derive(Debug, Deserialize)]
struct TextBlock {
    #[serde(rename = "p", default)]
    paragraphs: Vec<String>,
}

/// Timestamp formats seen in djnml display-date attributes, most common
/// first. Naive values are treated as UTC.
const DISPLAY_DATE_FORMATS: &[&str] = &["%Y%m%dT%H%M%S", "%Y%m%dT%H%M", "%Y-%m-%d %H:%M:%S"];

fn parse_display_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DISPLAY_DATE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

fn raw_story_from_doc(doc: Doc) -> Result<RawStory, ScreenError> {
    let mdata = doc.djnml.head.docdata.djn.newswires.mdata;

    let id = mdata
        .accession_number
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ScreenError::malformed("missing accession-number"))?;

    let display_date = mdata
        .display_date
        .ok_or_else(|| ScreenError::malformed(format!("story {id}: missing display-date")))?;
    let timestamp = parse_display_date(&display_date).ok_or_else(|| {
        ScreenError::malformed(format!("story {id}: unparseable display-date {display_date:?}"))
    })?;

    let companies = mdata
        .coding
        .and_then(|c| c.company)
        .map(|c| c.codes)
        .unwrap_or_default();

    let text = doc
        .djnml
        .body
        .and_then(|b| b.text)
        .map(|t| t.paragraphs.join(" "))
        .unwrap_or_default();

    Ok(RawStory {
        id,
        timestamp,
        companies,
        text,
    })
}

/// Streaming story source over one or more `.nml` files, consumed in the
/// given (sorted) order.
pub struct NmlFileSource {
    files: VecDeque<PathBuf>,
    reader: Option<BufReader<File>>,
    current: Option<PathBuf>,
}

impl NmlFileSource {
    pub fn new(files: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            files: files.into_iter().collect(),
            reader: None,
            current: None,
        }
    }

    /// All `.nml` files directly under `dir`, in lexicographic order —
    /// archive files are named by date, so this is chronological order.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_context(|| format!("listing nml directory {}", dir.display()))?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "nml"))
            .collect();
        files.sort();
        Ok(Self::new(files))
    }

    /// Read lines until the `</doc>` terminator; `None` at end of file.
    fn next_chunk(reader: &mut BufReader<File>) -> Result<Option<String>, std::io::Error> {
        let mut chunk = String::new();
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                // Trailing partial document (no terminator) is dropped,
                // matching the reference reader.
                return Ok(None);
            }
            chunk.push_str(&line);
            if line.contains("</doc>") {
                return Ok(Some(chunk));
            }
        }
    }

    fn parse_chunk(&self, chunk: &str) -> Result<RawStory, ScreenError> {
        let doc: Doc = from_str(chunk).map_err(|e| {
            ScreenError::malformed(format!(
                "unparseable document in {}: {e}",
                self.current
                    .as_deref()
                    .map(Path::display)
                    .map(|d| d.to_string())
                    .unwrap_or_default()
            ))
        })?;
        raw_story_from_doc(doc)
    }
}

impl StorySource for NmlFileSource {
    fn next_story(&mut self) -> Option<Result<RawStory, ScreenError>> {
        loop {
            if self.reader.is_none() {
                let path = self.files.pop_front()?;
                debug!(file = %path.display(), "opening nml file");
                match File::open(&path) {
                    Ok(f) => {
                        self.reader = Some(BufReader::new(f));
                        self.current = Some(path);
                    }
                    Err(e) => return Some(Err(ScreenError::Io(e))),
                }
            }

            let reader = self.reader.as_mut().expect("reader present");
            match Self::next_chunk(reader) {
                Ok(Some(chunk)) => {
                    if chunk.trim().is_empty() {
                        continue;
                    }
                    return Some(self.parse_chunk(&chunk));
                }
                Ok(None) => {
                    // Move on to the next file.
                    self.reader = None;
                    self.current = None;
                }
                Err(e) => return Some(Err(ScreenError::Io(e))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<doc>
<djnml><head><docdata><djn><djn-newswires>
<djn-mdata accession-number="20011004000123" display-date="20011004T1201">
<djn-coding><djn-company><c>ACME</c><c>ACME.O</c></djn-company></djn-coding>
</djn-mdata>
</djn-newswires></djn></docdata></head>
<body><headline>Acme beats estimates</headline>
<text><p>Acme Corp reported strong quarterly earnings.</p>
<p>Shares rose in late trading.</p></text></body>
</djnml>
</doc>"#;

    fn write_nml(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2001_sample.nml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn parses_a_complete_document() {
        let (_dir, path) = write_nml(SAMPLE);
        let mut src = NmlFileSource::new([path]);
        let story = src.next_story().unwrap().unwrap();
        assert_eq!(story.id, "20011004000123");
        assert_eq!(story.companies, vec!["ACME", "ACME.O"]);
        assert!(story.text.contains("quarterly earnings"));
        assert_eq!(story.timestamp.format("%Y-%m-%d %H:%M").to_string(), "2001-10-04 12:01");
        assert!(src.next_story().is_none());
    }

    #[test]
    fn missing_accession_number_is_malformed_not_fatal() {
        let broken = SAMPLE.replace(" accession-number=\"20011004000123\"", "");
        let (_dir, path) = write_nml(&format!("{broken}\n{SAMPLE}"));
        let mut src = NmlFileSource::new([path]);

        let first = src.next_story().unwrap();
        assert!(matches!(first, Err(ScreenError::MalformedStory { .. })));

        // The stream continues past the bad document.
        let second = src.next_story().unwrap().unwrap();
        assert_eq!(second.id, "20011004000123");
    }

    #[test]
    fn display_date_formats() {
        assert!(parse_display_date("20011004T1201").is_some());
        assert!(parse_display_date("20011004T120159").is_some());
        assert!(parse_display_date("2001-10-04T12:01:59Z").is_some());
        assert!(parse_display_date("not a date").is_none());
    }

    #[test]
    fn multiple_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.nml");
        let b = dir.path().join("b.nml");
        std::fs::write(&a, SAMPLE).unwrap();
        std::fs::write(&b, SAMPLE.replace("20011004000123", "20011004000456")).unwrap();

        let mut src = NmlFileSource::from_dir(dir.path()).unwrap();
        assert_eq!(src.next_story().unwrap().unwrap().id, "20011004000123");
        assert_eq!(src.next_story().unwrap().unwrap().id, "20011004000456");
        assert!(src.next_story().is_none());
    }
}
