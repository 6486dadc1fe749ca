//! Citation line shown under a card's answer.

use crate::domain::Source;

const PREFIX: &str = "Source:";

/// Compress page numbers into sorted, deduplicated ranges: `1–3, 5, 8–9`
pub fn compress_pages(pages: &[i64]) -> String {
  let mut nums = pages.to_vec();
  nums.sort_unstable();
  nums.dedup();

  let mut ranges: Vec<(i64, i64)> = Vec::new();
  for n in nums {
    match ranges.last_mut() {
      Some((_, end)) if n == *end + 1 => *end = n,
      _ => ranges.push((n, n)),
    }
  }

  ranges
    .iter()
    .map(|&(start, end)| {
      if start == end {
        start.to_string()
      } else {
        format!("{start}–{end}")
      }
    })
    .collect::<Vec<_>>()
    .join(", ")
}

/// Render citations grouped by file, in the order files first appear.
pub fn format_sources(sources: &[Source]) -> String {
  let mut by_file: Vec<(&str, Vec<i64>)> = Vec::new();

  for source in sources {
    let file = source.file.as_str();
    if file.is_empty() {
      continue;
    }
    let pages = source.page_numbers();
    match by_file.iter_mut().find(|(f, _)| *f == file) {
      Some((_, existing)) => existing.extend(pages),
      None => by_file.push((file, pages.collect())),
    }
  }

  if by_file.is_empty() {
    return format!("{PREFIX} –");
  }

  let parts: Vec<String> = by_file
    .iter()
    .map(|(file, pages)| {
      let page_text = compress_pages(pages);
      if page_text.is_empty() {
        file.to_string()
      } else {
        format!("{file} (p. {page_text})")
      }
    })
    .collect();

  format!("{PREFIX} {}", parts.join("; "))
}
