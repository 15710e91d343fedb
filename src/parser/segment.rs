use std::sync::LazyLock;

use regex::Regex;

static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{6}(?:\s*-\s*\d{6})?)\s+GRADES?:\s*([0-9][0-9\-, ]*)").unwrap());
static UC_CSU_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"UC/CSU:\s*(["']?[A-G]["']?|None|N/A|Pending)"#).unwrap());
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][A-Z\s]{5,40}$").unwrap());

/// What the anchor line already tells us about the course.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorHeader {
    pub name: String,
    pub numbers: String,
    pub grades: String,
    pub uc_csu: String,
}

#[derive(Debug, Clone)]
pub struct Chunk {
    pub text: String,
    pub header: Option<AnchorHeader>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Anchors,
    Headings,
    Paragraphs,
}

#[derive(Debug)]
pub struct Segmentation {
    pub strategy: Strategy,
    /// Chunks before the length filter.
    pub raw_count: usize,
    pub chunks: Vec<Chunk>,
}

pub struct Segmenter {
    pub min_chunks: usize,
    pub min_chunk_len: usize,
}

impl Segmenter {
    pub fn new(min_chunks: usize, min_chunk_len: usize) -> Self {
        Segmenter {
            min_chunks: min_chunks.max(1),
            min_chunk_len,
        }
    }

    /// Anchors first; headings, then paragraphs, when too few chunks survive.
    pub fn segment(&self, text: &str) -> Segmentation {
        let ladder: [(Strategy, fn(&str) -> Vec<Chunk>); 2] = [
            (Strategy::Anchors, split_on_anchors),
            (Strategy::Headings, split_on_headings),
        ];

        for (strategy, split) in ladder {
            let raw = split(text);
            let raw_count = raw.len();
            let chunks = self.keep_long(raw);
            if chunks.len() >= self.min_chunks {
                return Segmentation {
                    strategy,
                    raw_count,
                    chunks,
                };
            }
            tracing::debug!(?strategy, found = chunks.len(), "too few chunks, falling back");
        }

        let raw = split_on_paragraphs(text);
        let raw_count = raw.len();
        Segmentation {
            strategy: Strategy::Paragraphs,
            raw_count,
            chunks: self.keep_long(raw),
        }
    }

    fn keep_long(&self, chunks: Vec<Chunk>) -> Vec<Chunk> {
        chunks
            .into_iter()
            .filter(|c| c.text.trim().chars().count() >= self.min_chunk_len)
            .collect()
    }
}

struct Anchor {
    start: usize,
    header: AnchorHeader,
}

fn find_anchors(text: &str) -> Vec<Anchor> {
    let mut offsets = Vec::new();
    let mut pos = 0;
    for line in text.split('\n') {
        offsets.push((pos, line));
        pos += line.len() + 1;
    }

    let mut anchors: Vec<Anchor> = Vec::new();
    let mut last_anchor_line: Option<usize> = None;
    for (i, (offset, raw_line)) in offsets.iter().enumerate() {
        let line = raw_line.trim_end();
        let Some(m) = ANCHOR_RE.captures(line) else {
            continue;
        };
        let whole = m.get(0).map(|g| (g.start(), g.end())).unwrap_or((0, 0));

        // UC/CSU marker on the same line after the grades, or on the next one
        let uc = UC_CSU_RE
            .captures(&line[whole.1..])
            .or_else(|| offsets.get(i + 1).and_then(|(_, next)| UC_CSU_RE.captures(next)))
            .map(|c| c[1].trim_matches(|ch| ch == '"' || ch == '\'').to_string());
        let Some(uc_csu) = uc else {
            continue;
        };

        let mut start = *offset;
        let mut name = line[..whole.0].trim().to_string();
        if name.is_empty() && i > 0 && last_anchor_line != Some(i - 1) {
            let (prev_offset, prev) = offsets[i - 1];
            name = prev.trim().to_string();
            // after the first anchor, the previous chunk runs right up to this one
            if anchors.is_empty() {
                start = prev_offset;
            }
        }

        anchors.push(Anchor {
            start,
            header: AnchorHeader {
                name,
                numbers: m[1].to_string(),
                grades: m[2].trim().to_string(),
                uc_csu,
            },
        });
        last_anchor_line = Some(i);
    }
    anchors
}

fn split_on_anchors(text: &str) -> Vec<Chunk> {
    let anchors = find_anchors(text);
    let mut chunks = Vec::with_capacity(anchors.len());
    for (i, anchor) in anchors.iter().enumerate() {
        let end = anchors.get(i + 1).map(|a| a.start).unwrap_or(text.len());
        chunks.push(Chunk {
            text: text[anchor.start..end].to_string(),
            header: Some(anchor.header.clone()),
        });
    }
    chunks
}

/// A heading only opens a section when a paragraph break sits next to it.
fn split_on_headings(text: &str) -> Vec<Chunk> {
    let lines: Vec<&str> = text.split('\n').collect();
    let blank_at = |j: usize| lines.get(j).is_some_and(|l| l.trim().is_empty());

    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for (i, line) in lines.iter().copied().enumerate() {
        let boundary = HEADING_RE.is_match(line.trim_end()) && ((i > 0 && blank_at(i - 1)) || blank_at(i + 1));
        if boundary && !current.is_empty() {
            chunks.push(current.join("\n"));
            current.clear();
        }
        current.push(line);
    }
    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }
    // a single piece means no heading boundary was found at all
    if chunks.len() < 2 {
        return Vec::new();
    }
    chunks.into_iter().map(plain_chunk).collect()
}

fn split_on_paragraphs(text: &str) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                chunks.push(current.join("\n"));
                current.clear();
            }
            continue;
        }
        current.push(line);
    }
    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }
    chunks.into_iter().map(plain_chunk).collect()
}

fn plain_chunk(text: String) -> Chunk {
    Chunk {
        text: text.trim().to_string(),
        header: None,
    }
}
