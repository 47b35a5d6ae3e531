//! # Header Module
//!
//! Line splitting and copyright header replacement.
//!
//! A header is the run of lines at the very top of a file that all start with
//! the comment marker. It is replaced wholesale by the canonical block; a file
//! that does not start with a comment gets the block inserted above its first
//! line.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::CodestyleConfig;

/// Matches one line break in any of the `\r\n`, `\r` or `\n` conventions.
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("line break regex must compile"));

/// Splits file content into lines, dropping empty lines at both ends.
///
/// Interior empty lines are kept.
pub fn split_lines(content: &str) -> Vec<&str> {
  let lines: Vec<&str> = LINE_BREAK.split(content).collect();

  let start = lines.iter().position(|line| !line.is_empty()).unwrap_or(lines.len());
  let end = lines.iter().rposition(|line| !line.is_empty()).map_or(start, |i| i + 1);

  lines[start..end].to_vec()
}

/// Joins lines with `\n` and terminates the result with a final `\n`.
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
  let mut joined = String::with_capacity(lines.iter().map(|l| l.as_ref().len() + 1).sum());
  for line in lines {
    joined.push_str(line.as_ref());
    joined.push('\n');
  }
  if lines.is_empty() {
    joined.push('\n');
  }
  joined
}

/// Finds and replaces the leading comment header of a line sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRewriter {
  comment_marker: String,
  header: Vec<String>,
}

impl HeaderRewriter {
  pub fn new(comment_marker: impl Into<String>, header: Vec<String>) -> Self {
    Self {
      comment_marker: comment_marker.into(),
      header,
    }
  }

  pub fn from_config(config: &CodestyleConfig) -> Self {
    Self::new(config.comment_marker.clone(), config.header.clone())
  }

  /// Returns the span of the existing header.
  ///
  /// The span always starts at 0. It is empty when the first line is not a
  /// comment, and otherwise stops before the first line that is not.
  pub fn find_header(&self, lines: &[&str]) -> Range<usize> {
    let end = lines
      .iter()
      .take_while(|line| line.starts_with(self.comment_marker.as_str()))
      .count();
    0..end
  }

  /// Returns `lines` with the existing header replaced by the canonical one.
  pub fn rewrite<'a>(&'a self, lines: &[&'a str]) -> Vec<&'a str> {
    let span = self.find_header(lines);

    let mut rewritten = Vec::with_capacity(self.header.len() + lines.len() - span.len());
    rewritten.extend(self.header.iter().map(String::as_str));
    rewritten.extend_from_slice(&lines[span.end..]);
    rewritten
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{DEFAULT_COMMENT_MARKER, DEFAULT_HEADER};

  fn rewriter() -> HeaderRewriter {
    HeaderRewriter::new(
      DEFAULT_COMMENT_MARKER,
      DEFAULT_HEADER.iter().map(|s| (*s).to_string()).collect(),
    )
  }

  // === Line splitting ===

  #[test]
  fn test_split_lines_trims_blank_edges() {
    let lines = split_lines("\n\nint x;\n\nint y;\n\n\n");
    assert_eq!(lines, vec!["int x;", "", "int y;"]);
  }

  #[test]
  fn test_split_lines_mixed_line_endings() {
    let lines = split_lines("a\r\nb\rc\nd");
    assert_eq!(lines, vec!["a", "b", "c", "d"]);
  }

  #[test]
  fn test_split_lines_keeps_crlf_blank_lines_single() {
    let lines = split_lines("a\r\n\r\nb\r\n");
    assert_eq!(lines, vec!["a", "", "b"]);
  }

  #[test]
  fn test_split_lines_empty_and_blank_content() {
    assert!(split_lines("").is_empty());
    assert!(split_lines("\n\r\n\r").is_empty());
  }

  #[test]
  fn test_split_then_join_preserves_interior_lines() {
    let content = "\n\n#import <Foundation/Foundation.h>\n\n@interface Foo : NSObject\n  @end  \n\n";
    let joined = join_lines(&split_lines(content));
    assert_eq!(joined, "#import <Foundation/Foundation.h>\n\n@interface Foo : NSObject\n  @end  \n");
  }

  #[test]
  fn test_join_lines_adds_trailing_newline() {
    assert_eq!(join_lines(&["a", "b"]), "a\nb\n");
    assert_eq!(join_lines::<&str>(&[]), "\n");
  }

  // === Header detection ===

  #[test]
  fn test_find_header_comment_run() {
    let lines = ["// old", "// header", "// done", "int x;"];
    assert_eq!(rewriter().find_header(&lines), 0..3);
  }

  #[test]
  fn test_find_header_no_leading_comment() {
    let lines = ["int x;", "// not a header"];
    assert_eq!(rewriter().find_header(&lines), 0..0);
  }

  #[test]
  fn test_find_header_stops_at_blank_line() {
    let lines = ["// a", "", "// b", "int x;"];
    assert_eq!(rewriter().find_header(&lines), 0..1);
  }

  #[test]
  fn test_find_header_whole_file() {
    let lines = ["// a", "// b"];
    assert_eq!(rewriter().find_header(&lines), 0..2);
  }

  #[test]
  fn test_find_header_empty_sequence() {
    assert_eq!(rewriter().find_header(&[]), 0..0);
  }

  #[test]
  fn test_find_header_indented_comment_is_not_header() {
    let lines = ["  // indented", "int x;"];
    assert_eq!(rewriter().find_header(&lines), 0..0);
  }

  // === Replacement ===

  #[test]
  fn test_rewrite_replaces_existing_header() {
    let rewriter = rewriter();
    let lines = ["// old", "// header", "// done", "int x;"];

    let rewritten = rewriter.rewrite(&lines);

    assert_eq!(rewritten, vec!["//", "// Copyright (c) ... All rights reserved.", "//", "int x;"]);
  }

  #[test]
  fn test_rewrite_inserts_header_when_missing() {
    let rewriter = rewriter();
    let lines = ["int x;"];

    let rewritten = rewriter.rewrite(&lines);

    assert_eq!(rewritten.len(), 4);
    assert_eq!(&rewritten[..3], DEFAULT_HEADER);
    assert_eq!(rewritten[3], "int x;");
  }

  #[test]
  fn test_rewrite_is_idempotent() {
    let rewriter = rewriter();
    let lines = ["// Created by someone", "//", "", "#import \"Foo.h\""];

    let once = rewriter.rewrite(&lines);
    let twice = rewriter.rewrite(&once);

    assert_eq!(once, twice);
  }

  #[test]
  fn test_rewrite_custom_marker() {
    let rewriter = HeaderRewriter::new("#", vec!["# Copyright".to_string()]);
    let lines = ["#!/bin/sh", "# old", "echo hi"];

    assert_eq!(rewriter.rewrite(&lines), vec!["# Copyright", "echo hi"]);
  }
}
