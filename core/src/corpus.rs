//! NDJSON corpus reader: one JSON object per line, fields `url`, `title`,
//! `text`. Malformed lines are skipped; records missing a url or text are
//! skipped too.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

pub fn load(path: &Path) -> Result<Vec<Document>> {
    let file = File::open(path).with_context(|| format!("cannot open corpus {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut documents = Vec::new();
    let mut skipped = 0usize;
    for line in reader.lines() {
        let line = line.with_context(|| format!("read error in {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Document>(&line) {
            Ok(doc) if !doc.url.is_empty() && !doc.text.is_empty() => documents.push(doc),
            Ok(_) => skipped += 1,
            Err(err) => {
                skipped += 1;
                tracing::debug!(error = %err, "skipping malformed corpus line");
            }
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "skipped unusable corpus lines");
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_records_and_skips_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.ndjson");
        let mut f = File::create(&path).unwrap();
        writeln!(f, r#"{{"url":"d1","title":"One","text":"Текст раз"}}"#).unwrap();
        writeln!(f, "not json at all").unwrap();
        writeln!(f, r#"{{"url":"","title":"no url","text":"x"}}"#).unwrap();
        writeln!(f, r#"{{"url":"d2","title":"no text","text":""}}"#).unwrap();
        writeln!(f, r#"{{"url":"d3","text":"титул не обязателен"}}"#).unwrap();
        drop(f);

        let docs = load(&path).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].url, "d1");
        assert_eq!(docs[1].url, "d3");
        assert_eq!(docs[1].title, "");
    }

    #[test]
    fn decodes_unicode_escapes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.ndjson");
        std::fs::write(
            &path,
            "{\"url\":\"d1\",\"title\":\"\",\"text\":\"\\u042f\\u0437\\u044b\\u043a\"}\n",
        )
        .unwrap();
        let docs = load(&path).unwrap();
        assert_eq!(docs[0].text, "Язык");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load(Path::new("/definitely/not/here.ndjson")).is_err());
    }
}
