//! Binary snapshot of the full engine state, so a restart skips re-indexing.
//!
//! Frame layout, all integers little-endian u64, `lstr` = length + raw bytes:
//!
//! ```text
//! "IRDUMP01"
//! section 1: N, then N x (lstr url, lstr title, lstr text)
//! section 2: M, then M x lstr            -- doc-id -> url table
//! section 3: T, then T x (lstr term, P, P x (doc_id, frequency))
//! section 4: total_terms, unique_terms, then unique_terms x (lstr term, count)
//! section 5: total_tokens, index_time_ms
//! "IREND000"
//! ```
//!
//! Loading builds a fresh `Engine`; anything unexpected (bad magic, short
//! read, bad trailer) is an error the caller answers by re-ingesting the
//! corpus.

use crate::corpus::Document;
use crate::engine::{Engine, Metadata};
use crate::index::{DocId, InvertedIndex, Posting, PostingList};
use crate::zipf::ZipfAnalyzer;
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

const MAGIC: &[u8; 8] = b"IRDUMP01";
const TRAILER: &[u8; 8] = b"IREND000";

fn write_u64<W: Write>(w: &mut W, value: u64) -> Result<()> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn write_lstr<W: Write>(w: &mut W, value: &str) -> Result<()> {
    write_u64(w, value.len() as u64)?;
    w.write_all(value.as_bytes())?;
    Ok(())
}

fn read_u64<R: Read>(r: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf).context("truncated snapshot")?;
    Ok(u64::from_le_bytes(buf))
}

fn read_lstr<R: Read>(r: &mut R) -> Result<String> {
    let len = read_u64(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf).context("truncated snapshot")?;
    String::from_utf8(buf).context("snapshot string is not UTF-8")
}

pub fn save(engine: &Engine, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("cannot create snapshot {}", path.display()))?;
    let mut w = BufWriter::new(file);

    w.write_all(MAGIC)?;

    write_u64(&mut w, engine.documents.len() as u64)?;
    for doc in &engine.documents {
        write_lstr(&mut w, &doc.url)?;
        write_lstr(&mut w, &doc.title)?;
        write_lstr(&mut w, &doc.text)?;
    }

    let urls = engine.index.documents();
    write_u64(&mut w, urls.len() as u64)?;
    for url in urls {
        write_lstr(&mut w, url)?;
    }

    let mut terms: Vec<(&str, &PostingList)> = Vec::with_capacity(engine.index.vocabulary_size());
    engine.index.for_each_term(|term, list| terms.push((term, list)));
    write_u64(&mut w, terms.len() as u64)?;
    for (term, list) in terms {
        write_lstr(&mut w, term)?;
        write_u64(&mut w, list.postings.len() as u64)?;
        for posting in &list.postings {
            write_u64(&mut w, posting.doc_id as u64)?;
            write_u64(&mut w, posting.frequency as u64)?;
        }
    }

    write_u64(&mut w, engine.zipf.total_terms())?;
    write_u64(&mut w, engine.zipf.unique_terms() as u64)?;
    let mut counts: Vec<(&str, u64)> = Vec::with_capacity(engine.zipf.unique_terms());
    engine.zipf.for_each_term(|term, count| counts.push((term, count)));
    for (term, count) in counts {
        write_lstr(&mut w, term)?;
        write_u64(&mut w, count)?;
    }

    write_u64(&mut w, engine.metadata.total_tokens)?;
    write_u64(&mut w, engine.metadata.index_time_ms)?;

    w.write_all(TRAILER)?;
    w.flush()?;
    Ok(())
}

pub fn load(path: &Path) -> Result<Engine> {
    let file =
        File::open(path).with_context(|| format!("cannot open snapshot {}", path.display()))?;
    let mut r = BufReader::new(file);

    let mut magic = [0u8; 8];
    r.read_exact(&mut magic).context("truncated snapshot")?;
    if &magic != MAGIC {
        bail!("bad snapshot magic");
    }

    let doc_count = read_u64(&mut r)? as usize;
    let mut documents = Vec::with_capacity(doc_count);
    for _ in 0..doc_count {
        let url = read_lstr(&mut r)?;
        let title = read_lstr(&mut r)?;
        let text = read_lstr(&mut r)?;
        documents.push(Document { url, title, text });
    }

    let mut index = InvertedIndex::new();
    let ordinal_count = read_u64(&mut r)? as usize;
    for _ in 0..ordinal_count {
        let url = read_lstr(&mut r)?;
        index.push_document(&url);
    }

    let term_count = read_u64(&mut r)? as usize;
    for _ in 0..term_count {
        let term = read_lstr(&mut r)?;
        let posting_count = read_u64(&mut r)? as usize;
        let mut list = PostingList::default();
        list.postings.reserve(posting_count);
        for _ in 0..posting_count {
            let doc_id = read_u64(&mut r)? as DocId;
            let frequency = read_u64(&mut r)? as u32;
            list.postings.push(Posting { doc_id, frequency });
        }
        index.insert_posting_list(&term, list);
    }

    let mut zipf = ZipfAnalyzer::new();
    let total_terms = read_u64(&mut r)?;
    let unique_terms = read_u64(&mut r)? as usize;
    for _ in 0..unique_terms {
        let term = read_lstr(&mut r)?;
        let count = read_u64(&mut r)?;
        zipf.restore_term(&term, count);
    }
    zipf.set_total_terms(total_terms);

    let metadata = Metadata {
        total_tokens: read_u64(&mut r)?,
        index_time_ms: read_u64(&mut r)?,
    };

    let mut trailer = [0u8; 8];
    r.read_exact(&mut trailer).context("truncated snapshot")?;
    if &trailer != TRAILER {
        bail!("bad snapshot trailer");
    }

    Ok(Engine::from_parts(documents, index, zipf, metadata))
}
