//! Skip-annotated postings: the `(doc_id, skip_target)` tuple form used for
//! AND/OR/NOT evaluation, plus the postings algebra itself.

/// One entry of a skip-annotated postings list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: u32,
    /// 0-based index, within the same list, this entry can skip forward to.
    pub skip: usize,
}

/// `floor(sqrt(len))` if `len >= 16`, else `0`.
pub fn skip_interval(len: usize) -> usize {
    if len >= 16 {
        (len as f64).sqrt().floor() as usize
    } else {
        0
    }
}

/// Builds a fresh, self-consistent skip-annotated list from plain doc IDs.
/// Every list handed to [`and_postings`]/[`or_postings`]/[`not_postings`] —
/// whether freshly read off disk or the output of a prior operator — is
/// annotated this way, so skip targets are always valid indices into the
/// list they are attached to: operator output never carries over another
/// list's skip indices, so there is nothing stale to follow by mistake.
pub fn annotate(ids: Vec<u32>) -> Vec<Posting> {
    let len = ids.len();
    let interval = skip_interval(len);
    ids.into_iter()
        .enumerate()
        .map(|(i, doc_id)| Posting {
            doc_id,
            skip: std::cmp::min(i + interval, len.saturating_sub(1)),
        })
        .collect()
}

/// Parses a final-postings-file line: space-separated `(doc_id,skip)`
/// tokens with a trailing space before the newline.
pub fn parse_postings_line(line: &str) -> Vec<Posting> {
    line.split_whitespace()
        .filter_map(|token| {
            let inner = token.trim_start_matches('(').trim_end_matches(')');
            let (doc_id, skip) = inner.split_once(',')?;
            Some(Posting {
                doc_id: doc_id.parse().ok()?,
                skip: skip.parse().ok()?,
            })
        })
        .collect()
}

const SKIP_POINTER_GAP: usize = 16;

/// AND(p, q): skip-pointer intersection. Whichever side is behind advances
/// via its skip pointer while doing so stays at or behind the other side's
/// current doc ID, falling back to a plain increment otherwise.
pub fn and_postings(p: &[Posting], q: &[Posting]) -> Vec<Posting> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);

    while i < p.len() && j < q.len() {
        if p[i].doc_id == q[j].doc_id {
            result.push(p[i].doc_id);
            i += 1;
            j += 1;
        } else if p[i].doc_id < q[j].doc_id {
            if p.len() >= SKIP_POINTER_GAP {
                let mut advanced = false;
                while p[i].skip < p.len() - 1 && p[p[i].skip].doc_id <= q[j].doc_id {
                    i = p[i].skip;
                    advanced = true;
                }
                if !advanced {
                    i += 1;
                }
            } else {
                i += 1;
            }
        } else if q.len() >= SKIP_POINTER_GAP {
            let mut advanced = false;
            while q[j].skip < q.len() - 1 && q[q[j].skip].doc_id <= p[i].doc_id {
                j = q[j].skip;
                advanced = true;
            }
            if !advanced {
                j += 1;
            }
        } else {
            j += 1;
        }
    }

    annotate(result)
}

/// OR(p, q): linear merge of two ascending lists, deduplicating on equal
/// doc IDs.
pub fn or_postings(p: &[Posting], q: &[Posting]) -> Vec<Posting> {
    let mut result = Vec::with_capacity(p.len() + q.len());
    let (mut i, mut j) = (0usize, 0usize);

    while i < p.len() && j < q.len() {
        match p[i].doc_id.cmp(&q[j].doc_id) {
            std::cmp::Ordering::Equal => {
                result.push(p[i].doc_id);
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Less => {
                result.push(p[i].doc_id);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                result.push(q[j].doc_id);
                j += 1;
            }
        }
    }
    result.extend(p[i..].iter().map(|e| e.doc_id));
    result.extend(q[j..].iter().map(|e| e.doc_id));

    annotate(result)
}

/// NOT(p, universal): every doc ID in `universal` that does not appear in
/// `p`. An empty `p` returns `universal` verbatim.
pub fn not_postings(p: &[Posting], universal: &[Posting]) -> Vec<Posting> {
    if p.is_empty() {
        return universal.to_vec();
    }

    let mut result = Vec::with_capacity(universal.len());
    let mut p_idx = 0usize;
    for entry in universal {
        if p_idx < p.len() && entry.doc_id == p[p_idx].doc_id {
            p_idx += 1;
        } else {
            result.push(entry.doc_id);
        }
    }

    annotate(result)
}
