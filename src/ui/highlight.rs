//! Lightweight HTML/CSS highlighting for code snippets

use std::ops::Range;

use eframe::egui::{text::LayoutJob, Color32, FontId, TextFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Text,
    Tag,
    AttrValue,
    Comment,
}

/// Split a snippet into highlight tokens covering every byte exactly once
pub fn tokenize(code: &str) -> Vec<(TokenKind, Range<usize>)> {
    let bytes = code.as_bytes();
    let len = code.len();
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    let flush = |tokens: &mut Vec<(TokenKind, Range<usize>)>, start: usize, end: usize| {
        if start < end {
            tokens.push((TokenKind::Text, start..end));
        }
    };

    while i < len {
        let rest = &code[i..];

        // Comments, HTML or CSS
        let comment_end = if rest.starts_with("<!--") {
            Some(rest.find("-->").map(|e| i + e + 3).unwrap_or(len))
        } else if rest.starts_with("/*") {
            Some(rest.find("*/").map(|e| i + e + 2).unwrap_or(len))
        } else {
            None
        };
        if let Some(end) = comment_end {
            flush(&mut tokens, text_start, i);
            tokens.push((TokenKind::Comment, i..end));
            i = end;
            text_start = i;
            continue;
        }

        let opens_tag = bytes[i] == b'<'
            && bytes
                .get(i + 1)
                .map(|b| b.is_ascii_alphabetic() || *b == b'/' || *b == b'!')
                .unwrap_or(false);
        if opens_tag {
            flush(&mut tokens, text_start, i);
            let mut seg_start = i;
            let mut quote: Option<u8> = None;
            let mut j = i + 1;
            let mut closed = false;
            while j < len {
                let c = bytes[j];
                match quote {
                    Some(q) if c == q => {
                        j += 1;
                        tokens.push((TokenKind::AttrValue, seg_start..j));
                        seg_start = j;
                        quote = None;
                    }
                    Some(_) => j += 1,
                    None if c == b'"' || c == b'\'' => {
                        if seg_start < j {
                            tokens.push((TokenKind::Tag, seg_start..j));
                        }
                        seg_start = j;
                        quote = Some(c);
                        j += 1;
                    }
                    None if c == b'>' => {
                        j += 1;
                        tokens.push((TokenKind::Tag, seg_start..j));
                        closed = true;
                        break;
                    }
                    None => j += 1,
                }
            }
            if !closed && seg_start < len {
                let kind = if quote.is_some() { TokenKind::AttrValue } else { TokenKind::Tag };
                tokens.push((kind, seg_start..len));
            }
            i = j;
            text_start = i;
            continue;
        }

        i += rest.chars().next().map(char::len_utf8).unwrap_or(1);
    }

    flush(&mut tokens, text_start, len);
    tokens
}

fn color_for(kind: TokenKind, dark: bool) -> Color32 {
    match (kind, dark) {
        (TokenKind::Text, true) => Color32::from_rgb(171, 178, 191),
        (TokenKind::Text, false) => Color32::from_rgb(56, 58, 66),
        (TokenKind::Tag, true) => Color32::from_rgb(224, 108, 117),
        (TokenKind::Tag, false) => Color32::from_rgb(228, 86, 73),
        (TokenKind::AttrValue, true) => Color32::from_rgb(152, 195, 121),
        (TokenKind::AttrValue, false) => Color32::from_rgb(80, 161, 79),
        (TokenKind::Comment, _) => Color32::from_rgb(128, 128, 128),
    }
}

/// Build a colored monospace layout for `code`
pub fn layout_job(code: &str, font_size: f32, dark: bool) -> LayoutJob {
    let mut job = LayoutJob::default();
    for (kind, range) in tokenize(code) {
        job.append(
            &code[range],
            0.0,
            TextFormat {
                font_id: FontId::monospace(font_size),
                color: color_for(kind, dark),
                ..Default::default()
            },
        );
    }
    job
}

/// The first `max_lines` lines of a snippet, with a marker if cut
pub fn excerpt(code: &str, max_lines: usize) -> String {
    let mut lines = code.lines();
    let head: Vec<&str> = lines.by_ref().take(max_lines).collect();
    let mut out = head.join("\n");
    if lines.next().is_some() {
        out.push_str("\n…");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(code: &str) -> Vec<(TokenKind, &str)> {
        tokenize(code)
            .into_iter()
            .map(|(kind, range)| (kind, &code[range]))
            .collect()
    }

    #[test]
    fn test_tokenize_tags_and_attributes() {
        assert_eq!(
            pieces(r#"<p class="x">hi</p>"#),
            vec![
                (TokenKind::Tag, "<p class="),
                (TokenKind::AttrValue, "\"x\""),
                (TokenKind::Tag, ">"),
                (TokenKind::Text, "hi"),
                (TokenKind::Tag, "</p>"),
            ]
        );
    }

    #[test]
    fn test_tokenize_comments() {
        assert_eq!(
            pieces("a<!-- c -->b/* css */"),
            vec![
                (TokenKind::Text, "a"),
                (TokenKind::Comment, "<!-- c -->"),
                (TokenKind::Text, "b"),
                (TokenKind::Comment, "/* css */"),
            ]
        );
    }

    #[test]
    fn test_tokenize_covers_input() {
        for code in ["1 < 2 and 3 > 2", "<div title='é>'>ü", "<unterminated", "<!-- open", ""] {
            let joined: String = tokenize(code).into_iter().map(|(_, r)| &code[r]).collect();
            assert_eq!(joined, code);
        }
        assert_eq!(pieces("1 < 2"), vec![(TokenKind::Text, "1 < 2")]);
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("a\nb\nc", 2), "a\nb\n…");
        assert_eq!(excerpt("a\nb", 2), "a\nb");
    }
}
